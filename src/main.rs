//! Study Sheet server binary.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use study_sheet::config::Config;
use study_sheet::db::{self, Repository};
use study_sheet::{create_router, load_seed, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Study Sheet backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let pruned = repo.delete_expired_sessions(Utc::now()).await?;
    if pruned > 0 {
        tracing::info!("Removed {} expired sessions", pruned);
    }

    // Normalize the seed sheet once, if configured
    let seed = match &config.seed_path {
        Some(path) => {
            let document = load_seed(path).await?;
            tracing::info!(
                "Loaded seed sheet from {:?}: {} topics, {} questions",
                path,
                document.topics.len(),
                document.question_count()
            );
            Some(Arc::new(document))
        }
        None => {
            tracing::info!("No seed sheet configured (STUDY_SEED_PATH)");
            None
        }
    };

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
        seed,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
