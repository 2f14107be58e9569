//! Decoding the `multipart/form-data` submission.
//!
//! Fields: `image` (optional file), `note` (optional text), `mode` (one of
//! the four radio labels). Unknown fields are ignored. A file input left
//! empty arrives as a part with no filename and no bytes, and counts as no
//! image.

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use visuanary::flow::Submission;
use visuanary::mode::{UnknownLabel, resolve};
use visuanary::request::ImageBlob;

/// File extensions the upload field accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// The request could not be turned into a [`Submission`].
#[derive(Debug, Error)]
pub enum FormError {
    #[error("malformed form data: {0}")]
    Multipart(MultipartError),

    #[error("image is too large (limit {limit} bytes)")]
    TooLarge { limit: usize },

    #[error("missing form field: mode")]
    MissingMode,

    #[error(transparent)]
    UnknownMode(#[from] UnknownLabel),

    #[error("unsupported image type: {0:?} (expected JPG, JPEG or PNG)")]
    UnsupportedImage(String),
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let status = match &self {
            FormError::Multipart(e) => e.status(),
            FormError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({
            "status": "invalid",
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Whether `file_name` has one of the [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_image(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

impl FormError {
    /// Classify a multipart failure; body-limit rejections name the limit.
    pub fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            FormError::TooLarge { limit }
        } else {
            FormError::Multipart(err)
        }
    }
}

/// Read every field and build the submission.
///
/// `limit` is the body limit the router enforces, reported back when an
/// upload exceeds it.
pub async fn read_submission(
    mut multipart: Multipart,
    limit: usize,
) -> Result<Submission, FormError> {
    let fail = |e| FormError::from_multipart(e, limit);
    let mut image = None;
    let mut note = None;
    let mut label = None;

    while let Some(field) = multipart.next_field().await.map_err(fail)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(fail)?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                if !is_accepted_image(&file_name) {
                    return Err(FormError::UnsupportedImage(file_name));
                }
                image = Some(ImageBlob::new(data.to_vec()));
            }
            "note" => note = Some(field.text().await.map_err(fail)?),
            "mode" => label = Some(field.text().await.map_err(fail)?),
            _ => {}
        }
    }

    let label = label.ok_or(FormError::MissingMode)?;
    let (mode, _) = resolve(&label)?;
    Ok(Submission { mode, image, note })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_jpeg_and_png_any_case() {
        assert!(is_accepted_image("rash.jpg"));
        assert!(is_accepted_image("RASH.JPEG"));
        assert!(is_accepted_image("scan.final.Png"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_accepted_image("scan.gif"));
        assert!(!is_accepted_image("report.pdf"));
        assert!(!is_accepted_image("jpg"));
        assert!(!is_accepted_image(""));
    }

    #[test]
    fn unknown_mode_message_names_the_label() {
        let err = FormError::from(UnknownLabel("Astrology".into()));
        assert_eq!(err.to_string(), "unknown mode label: \"Astrology\"");
    }

    #[test]
    fn too_large_names_the_limit() {
        let err = FormError::TooLarge { limit: 1024 };
        assert_eq!(err.to_string(), "image is too large (limit 1024 bytes)");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn missing_mode_is_a_bad_request() {
        let err = FormError::MissingMode;
        assert_eq!(err.to_string(), "missing form field: mode");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
