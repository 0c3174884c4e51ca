use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nemt_records::config::Config;
use nemt_records::db::Database;
use nemt_records::handlers::AppState;
use nemt_records::routes::create_router;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, makes sure the tables of the
/// configured variant and the uploads directory exist, then serves HTTP.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nemt_records=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Schema must exist before the first request
    let db = Database::new(&config.database_url, config.enforce_foreign_keys)?;
    db.init_schema(config.variant).await?;

    tokio::fs::create_dir_all(config.uploads_dir()).await?;
    tracing::info!("Uploads directory: {}", config.uploads_dir().display());

    let addr = config.bind_addr();
    let app_state = Arc::new(AppState { db, config });
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
