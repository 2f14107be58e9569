//! One submission, end to end.
//!
//! ```text
//! Idle ─▶ validate ─▶ Building ─▶ Invoking ─▶ Rendering ─▶ Idle
//!            │                       │
//!            └─▶ Warning             └─▶ Error
//! ```
//!
//! Every call to [`submit`] starts from scratch; no state survives between
//! submissions. A missing image stops the flow before the model is called,
//! and a failed call stops it before anything is rendered.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::ModelClient;
use crate::mode::{Mode, UnknownLabel, resolve};
use crate::prompt::UserNote;
use crate::render::{Rendered, render};
use crate::request::{ImageBlob, build};

/// What the user filled in on the form.
#[derive(Debug, Clone)]
pub struct Submission {
    pub mode: Mode,
    pub image: Option<ImageBlob>,
    pub note: Option<String>,
}

impl Submission {
    /// Build a submission from the form's radio label.
    pub fn from_label(
        label: &str,
        image: Option<ImageBlob>,
        note: Option<String>,
    ) -> Result<Self, UnknownLabel> {
        let (mode, _) = resolve(label)?;
        Ok(Self { mode, image, note })
    }
}

/// Terminal state of a submission, shown to the user as-is.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A precondition failed; the model was not called.
    Warning { message: String },
    /// The model call failed; nothing was rendered.
    Error { message: String },
    /// The model answered.
    Rendered { result: Rendered },
}

impl Outcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Outcome::Rendered { .. })
    }
}

/// Run one submission against `client`.
pub async fn submit<C>(client: &C, submission: Submission) -> Outcome
where
    C: ModelClient + ?Sized,
{
    let Submission { mode, image, note } = submission;
    let note = UserNote::new(note.as_deref());

    let request = match build(mode, image, &note) {
        Ok(request) => request,
        Err(e) => {
            info!("Submission rejected: mode={mode}, {e}");
            return Outcome::Warning {
                message: e.to_string(),
            };
        }
    };

    debug!(
        "Invoking {} for mode={}, image={}",
        client.model_name(),
        mode,
        request.has_image()
    );

    let text = match client.invoke(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Model call failed: mode={mode}: {e}");
            return Outcome::Error {
                message: format!("Error: {e}"),
            };
        }
    };

    let result = render(mode, &text);
    info!("Submission complete: mode={mode}, {} chars", text.len());
    Outcome::Rendered { result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakeModelClient;
    use crate::prompt::DEFAULT_NOTE;
    use crate::render::NO_SCORE_NOTICE;

    fn image() -> Option<ImageBlob> {
        Some(ImageBlob::new(vec![0xff, 0xd8]))
    }

    fn submission(mode: Mode, image: Option<ImageBlob>, note: Option<&str>) -> Submission {
        Submission {
            mode,
            image,
            note: note.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn missing_image_never_calls_model() {
        let fake = FakeModelClient::with_text("Severity: 5/10");
        for mode in [Mode::Analysis, Mode::Severity, Mode::LocalRecommendation] {
            let outcome = submit(&fake, submission(mode, None, Some("hurts"))).await;
            assert_eq!(
                outcome,
                Outcome::Warning {
                    message: "Please upload an image first.".into()
                }
            );
        }
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn empathy_without_image_calls_model_with_prompt_only() {
        let fake = FakeModelClient::with_text("You're doing great.");
        let outcome = submit(&fake, submission(Mode::Empathy, None, None)).await;

        assert!(outcome.is_rendered());
        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].parts().len(), 1);
        assert!(!requests[0].has_image());
        assert!(requests[0].prompt().contains(DEFAULT_NOTE));
    }

    #[tokio::test]
    async fn severity_is_parsed() {
        let fake = FakeModelClient::with_text("Severity: 7/10");
        let outcome = submit(&fake, submission(Mode::Severity, image(), None)).await;
        match outcome {
            Outcome::Rendered {
                result: Rendered::Severity { score, indicator, .. },
            } => {
                assert_eq!(score, 7);
                assert!((indicator - 0.7).abs() < 1e-6);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_severity_is_a_notice_not_an_error() {
        let fake = FakeModelClient::with_text("no score available");
        let outcome = submit(&fake, submission(Mode::Severity, image(), None)).await;
        assert_eq!(
            outcome,
            Outcome::Rendered {
                result: Rendered::NoScore {
                    notice: NO_SCORE_NOTICE.into()
                }
            }
        );
    }

    #[tokio::test]
    async fn injected_failure_is_reported_verbatim() {
        let fake = FakeModelClient::failing("quota exceeded");
        let outcome = submit(&fake, submission(Mode::Analysis, image(), None)).await;
        assert_eq!(
            outcome,
            Outcome::Error {
                message: "Error: quota exceeded".into()
            }
        );
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn note_reaches_the_prompt_stripped() {
        let fake = FakeModelClient::with_text("See a dermatologist.");
        submit(
            &fake,
            submission(Mode::LocalRecommendation, image(), Some("  itchy rash \n")),
        )
        .await;
        let prompt = fake.requests()[0].prompt().to_string();
        assert!(prompt.contains("User note: \"itchy rash\""));
    }

    #[tokio::test]
    async fn submissions_are_independent() {
        let fake = FakeModelClient::with_text("ok");
        fake.push_failure("transient");

        let first = submit(&fake, submission(Mode::Empathy, None, None)).await;
        let second = submit(&fake, submission(Mode::Empathy, None, None)).await;
        assert!(matches!(first, Outcome::Error { .. }));
        assert!(second.is_rendered());
    }

    #[test]
    fn from_label_resolves_mode() {
        let s = Submission::from_label("💬 Empathetic Guidance", None, None).unwrap();
        assert_eq!(s.mode, Mode::Empathy);
        assert!(Submission::from_label("Empathy", None, None).is_err());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(Outcome::Warning {
            message: "Please upload an image first.".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["message"], "Please upload an image first.");
    }
}
