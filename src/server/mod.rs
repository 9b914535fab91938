pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    convert::{Dispatcher, Toolkit},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the HTTP routes over an existing dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>, max_upload_bytes: usize) -> Router {
    let app_state = handlers::AppState { dispatcher };

    Router::new()
        .route("/convert", post(handlers::convert))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    let scratch_dir = config.conversion.scratch_dir();
    tokio::fs::create_dir_all(&scratch_dir).await?;
    info!("Scratch directory: {}", scratch_dir.display());
    info!(
        "Document tool: {} {:?}",
        config.conversion.document_tool.command, config.conversion.document_tool.args
    );

    let toolkit = Toolkit::new(&config.conversion);
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(toolkit)));

    let app = router(dispatcher, config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
