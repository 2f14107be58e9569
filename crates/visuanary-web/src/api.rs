//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use visuanary::client::ModelClient;
use visuanary::flow::{Outcome, submit};
use visuanary::mode::Mode;

use crate::form::{FormError, read_submission};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ModelClient>,
    pub max_upload_bytes: usize,
}

/// GET / — The form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// One radio option.
#[derive(Serialize)]
pub struct ModeOption {
    pub key: &'static str,
    pub label: &'static str,
    pub requires_image: bool,
}

/// GET /api/modes — The four choices, in display order.
pub async fn get_modes() -> Json<Vec<ModeOption>> {
    Json(
        Mode::ALL
            .into_iter()
            .map(|m| ModeOption {
                key: m.key(),
                label: m.label(),
                requires_image: m.requires_image(),
            })
            .collect(),
    )
}

/// POST /api/generate — Run one submission.
///
/// Returns the [`Outcome`] as JSON: 200 when rendered, 422 for the
/// missing-image warning, 502 when the model call failed. Malformed forms
/// get 400 and oversized uploads 413 before the flow starts.
pub async fn post_generate(
    State(app): State<AppState>,
    multipart: Multipart,
) -> Result<Response, FormError> {
    let submission = read_submission(multipart, app.max_upload_bytes).await?;
    let outcome = submit(app.client.as_ref(), submission).await;
    let status = match &outcome {
        Outcome::Rendered { .. } => StatusCode::OK,
        Outcome::Warning { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Error { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(outcome)).into_response())
}
