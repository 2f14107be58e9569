//! Browser form for the Visuanary medical image analyzer.
//!
//! `visuanary-web` serves a single page where the user uploads an image,
//! types an optional note, picks one of four output modes, and presses
//! generate. The page posts the form to `/api/generate`, which runs one
//! [`submit`](visuanary::flow::submit) against the configured
//! [`ModelClient`] and returns the [`Outcome`](visuanary::flow::Outcome)
//! as JSON.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use visuanary::prelude::*;
//! use visuanary_web::{WebConfig, spawn_web};
//!
//! let client = GeminiClient::new(ClientConfig::from_env()?)?;
//! let addr = spawn_web(Arc::new(client), WebConfig::default()).await?;
//! println!("Open http://{addr}");
//! ```
//!
//! # Routes
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | The form |
//! | `GET /api/modes` | The four `{key, label}` choices |
//! | `POST /api/generate` | `multipart/form-data` with `image`, `note`, `mode` |

mod api;
pub mod form;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use visuanary::client::ModelClient;

/// Default upload cap: Gemini's inline-data request limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8501`.
    pub bind_addr: SocketAddr,
    /// Largest accepted request body. Default: [`DEFAULT_MAX_UPLOAD_BYTES`].
    pub max_upload_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Bind the server and run it on a Tokio task.
///
/// Returns the bound address (useful when binding port 0). The server runs
/// until the Tokio runtime shuts down.
pub async fn spawn_web(
    client: Arc<dyn ModelClient>,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let router = server::build_router(client, config.max_upload_bytes);
    server::start_server(router, config.bind_addr).await
}
