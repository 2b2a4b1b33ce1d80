use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod extract;
pub mod follows;
pub mod playlist;
pub mod profile;
pub mod similarity;
pub mod state;
pub mod tmdb;
pub mod tracks;
pub mod users;
pub mod verification;

pub use state::AppState;

/// Largest accepted profile image upload
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/user", user_routes())
        .nest("/tmdb", tmdb_routes())
        .nest("/similarity", similarity_routes())
        .nest("/api", music_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Accounts, follows, profile images, verification
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/check/email", post(users::check_email))
        .route("/check/nickname", post(users::check_nickname))
        .route("/create", post(users::create))
        .route("/delete", delete(users::delete))
        .route("/login", post(users::login))
        .route("/validate", post(users::validate))
        .route("/update", put(users::update))
        .route("/update/movies", put(users::update_movies))
        .route("/follow", post(follows::follow))
        .route("/follow/delete", delete(follows::unfollow))
        .route("/follow/info", get(follows::info))
        .route(
            "/profile/upload",
            post(profile::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/profile/get", get(profile::get))
        .route("/verify/email", post(verification::request))
        .route("/verify/email/confirm", post(verification::confirm))
        .route("/password/reset", post(users::reset_password))
}

fn tmdb_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(tmdb::search))
        .route("/:movie_id/videos", get(tmdb::videos))
}

fn similarity_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(similarity::list))
        .route("/top", get(similarity::top))
        .route("/user", get(similarity::user))
        .route("/details", get(similarity::details))
}

/// Tunetalk tracks and playlists
fn music_routes() -> Router<AppState> {
    Router::new()
        .route("/tracks/init", post(tracks::init))
        .route("/tracks/audio-features", put(tracks::audio_features))
        .route("/tracks/all", get(tracks::all))
        .route("/playlist/add", post(playlist::add))
        .route("/playlist/delete", delete(playlist::delete))
        .route("/playlist/:user_id", get(playlist::user_tracks))
        .route("/playlist/:user_id/taste", get(playlist::taste))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
