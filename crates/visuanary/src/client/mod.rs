//! The narrow seam between a submission and the hosted model.
//!
//! [`ModelClient::invoke`] takes a fully built [`ModelRequest`] and returns
//! the model's text or a [`ModelError`]. [`GeminiClient`] talks to the real
//! API; [`FakeModelClient`] scripts answers and failures for tests.

mod fake;
mod gemini;

pub use fake::FakeModelClient;
pub use gemini::GeminiClient;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::request::ModelRequest;

/// Boxed future returned by [`ModelClient::invoke`].
pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;

/// Error type for model calls. The `Display` text is shown to the user.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("Gemini API HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("prompt was blocked by the model: {0}")]
    Blocked(String),

    #[error("model returned no text (finish reason: {})", .0.as_deref().unwrap_or("unknown"))]
    EmptyResponse(Option<String>),

    /// Failure injected by a test double.
    #[error("{0}")]
    Injected(String),
}

/// A hosted model reachable through one request/response call.
///
/// Uses a boxed future so the trait stays dyn-compatible and the web layer
/// can hold an `Arc<dyn ModelClient>`.
pub trait ModelClient: Send + Sync {
    /// Send `request` and return the response text.
    fn invoke<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
