use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    auth::jwt::JwtConfig,
    db::{SimilarityStore, TrackStore, UserStore, VerificationStore},
    services::{mailer::Mailer, tmdb::MovieProvider},
};

/// Shared application state
///
/// Every backend sits behind a trait object so the router can be driven
/// with in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tracks: Arc<dyn TrackStore>,
    pub similarity: Arc<dyn SimilarityStore>,
    pub verification: Arc<dyn VerificationStore>,
    pub mailer: Arc<dyn Mailer>,
    pub movies: Arc<dyn MovieProvider>,
    pub jwt: JwtConfig,
    /// Directory profile images are written to
    pub upload_dir: PathBuf,
}
