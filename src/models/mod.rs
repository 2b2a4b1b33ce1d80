pub mod movie;
pub mod similarity;
pub mod track;
pub mod user;
pub mod verification;

pub use movie::{
    EnrichedMovie, MovieSearchResponse, Person, TmdbCredits, TmdbMovieDetails, TmdbVideo,
    TrailerResponse,
};
pub use similarity::{SimilarUserDetails, SimilarityDocument, SimilarityEntry, SimilarityQuery};
pub use track::{AudioFeatures, PlaylistEntry, Track, TrackInfo, UserTaste};
pub use user::{
    CreateUserRequest, DeleteUserRequest, EmailCheckRequest, FollowOutcome, FollowRequest,
    FollowedUser, LoginForm, MessageResponse, NewUser, NicknameCheckRequest,
    PasswordResetRequest, Token, UpdateMoviesRequest, UpdateUserRequest, User, UserChanges,
    UserResponse,
};
pub use verification::{EmailVerification, VerificationConfirmRequest, VerificationRequest};
