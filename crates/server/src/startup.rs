use std::{path::PathBuf, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;
use service::{
    roadmap::RoadmapStore,
    storage::PersistOptions,
};

/// Any origin may call the API.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the data file and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_file = PathBuf::from(&cfg.storage.data_file);
    common::env::ensure_data_dir(&data_file).await?;

    let options = PersistOptions {
        indent: cfg.storage.indent,
        atomic_writes: cfg.storage.atomic_writes,
    };
    let store = RoadmapStore::open(&data_file, options).await;
    info!(
        file = %data_file.display(),
        outcome = ?store.load_outcome(),
        atomic_writes = cfg.storage.atomic_writes,
        "roadmap store opened"
    );

    let state = ServerState::new(Arc::new(store));
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: load the store, bind, and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "roadmap server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("roadmap server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, shutting down"),
        Err(e) => {
            // without a signal handler, serve until the process is killed
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
