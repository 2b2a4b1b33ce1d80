use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinetalk_api::{
    config::Config,
    db::{
        create_pool, create_redis_client, PgSimilarityStore, PgTrackStore, PgUserStore,
        RedisVerificationStore,
    },
    routes::{create_router, AppState},
    services::{
        mailer::{DisabledMailer, Mailer, SmtpMailer},
        tmdb::TmdbProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinetalk_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    tracing::info!("Database pool ready, migrations applied");

    let redis_client =
        create_redis_client(&config.redis_url).context("Invalid Redis configuration")?;

    let mailer: Arc<dyn Mailer> = match config.smtp() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email delivery disabled");
            Arc::new(DisabledMailer)
        }
    };

    let state = AppState {
        users: Arc::new(PgUserStore::new(pool.clone())),
        tracks: Arc::new(PgTrackStore::new(pool.clone())),
        similarity: Arc::new(PgSimilarityStore::new(pool)),
        verification: Arc::new(RedisVerificationStore::new(redis_client)),
        mailer,
        movies: Arc::new(TmdbProvider::new(config.tmdb())),
        jwt: config.jwt(),
        upload_dir: PathBuf::from(&config.upload_dir),
    };

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
