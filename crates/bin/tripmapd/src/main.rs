//! # tripmapd — tripmap daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Create the `MySQL` connection pool and, if asked, the schema
//! - Prepare the upload directories
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;

use tripmap_adapter_files_local::LocalFileStore;
use tripmap_adapter_http_axum::state::AppState;
use tripmap_adapter_storage_mysql_sqlx::{
    MysqlMapRepository, MysqlMarkerRepository, MysqlMultimediaRepository,
};
use tripmap_app::services::map_service::MapService;
use tripmap_app::services::marker_service::MarkerService;
use tripmap_app::services::multimedia_service::MultimediaService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = config.storage_config().build().await?;
    let pool = db.pool().clone();
    tracing::info!("database connection pool created");

    // Uploads
    let files = LocalFileStore::initialize(&config.storage.base_dir).await?;
    let uploads_dir = files.uploads_dir();

    // Repositories
    let map_repo = MysqlMapRepository::new(pool.clone());
    let marker_repo = MysqlMarkerRepository::new(pool.clone());
    let multimedia_repo = MysqlMultimediaRepository::new(pool);

    // Services
    let map_service = MapService::new(map_repo);
    let marker_service = MarkerService::new(marker_repo.clone());
    let multimedia_service = MultimediaService::new(multimedia_repo, marker_repo, files);

    // HTTP
    let state = AppState::new(map_service, marker_service, multimedia_service, uploads_dir);
    let app = tripmap_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "tripmapd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
