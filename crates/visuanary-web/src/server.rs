//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use visuanary::client::ModelClient;

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - The form at `/`
/// - REST API at `/api/*`
pub fn build_router(client: Arc<dyn ModelClient>, max_upload_bytes: usize) -> Router {
    let app_state = AppState {
        client,
        max_upload_bytes,
    };

    Router::new()
        .route("/", get(api::index))
        .route("/api/modes", get(api::get_modes))
        .route("/api/generate", post(api::post_generate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind `bind_addr`, spawn the server, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("server exited: {e}");
        }
    });

    Ok(addr)
}
