use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memes_es::config::Config;
use memes_es::constants::{DEFAULT_MAX_MEME_SIZE, MAX_MEME_SIZE_KEY, MEME_EMOJI};
use memes_es::database::Database;
use memes_es::fetcher::HttpFetcher;
use memes_es::handlers::{self, AppState};
use memes_es::retriever::MemeRetriever;
use memes_es::settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memes_es=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize settings store
    let db = Database::new(&config.database_url).await?;
    db.migrate().await?;

    // Make sure the size budget exists before the first command runs
    let max_meme_size = settings::get_or_init(
        &db,
        MAX_MEME_SIZE_KEY,
        &config.config_scope,
        &DEFAULT_MAX_MEME_SIZE.to_string(),
    )
    .await?;
    tracing::info!("max_meme_size = {} bytes", max_meme_size);

    let fetcher = HttpFetcher::new(&config)?;
    let retriever = MemeRetriever::new(
        Arc::new(fetcher),
        Arc::new(db),
        config.config_scope.clone(),
        config.max_attempts,
    );

    let app = handlers::router(Arc::new(AppState { retriever }));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("{} memes-es listening on {}", MEME_EMOJI, addr);
    tracing::info!("📖 API docs available at http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
