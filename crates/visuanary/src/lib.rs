//! Medical image interpretation via a hosted multimodal model.
//!
//! `visuanary` turns one form submission (an optional image, an optional
//! note, and one of four output [`Mode`]s) into a single Gemini
//! `generateContent` call, then shapes the answer for display. All image
//! understanding happens on the model side; this crate only selects the
//! prompt, assembles the payload, and post-processes the text.
//!
//! # Getting started
//!
//! ```ignore
//! use visuanary::prelude::*;
//!
//! let config = ClientConfig::from_env()?;
//! let client = GeminiClient::new(config)?;
//!
//! let submission = Submission::from_label(
//!     "📉 Severity Score",
//!     Some(ImageBlob::new(std::fs::read("rash.jpg")?)),
//!     Some("Appeared yesterday, itchy.".into()),
//! )?;
//! let outcome = submit(&client, submission).await;
//! ```
//!
//! # Where to find things
//!
//! - **Modes, labels, headers:** [`mode`].
//! - **Prompt text:** [`prompt::template_for`].
//! - **Payload assembly and the image precondition:** [`request::build`].
//! - **Calling the model:** the [`ModelClient`](client::ModelClient) trait,
//!   [`GeminiClient`](client::GeminiClient), and
//!   [`FakeModelClient`](client::FakeModelClient) for tests.
//! - **Severity parsing and headers:** [`render`].
//! - **One submission end to end:** [`flow::submit`].

pub mod client;
pub mod config;
pub mod flow;
pub mod mode;
pub mod prelude;
pub mod prompt;
pub mod render;
pub mod request;

pub use mode::Mode;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::request::{ModelRequest, Part};

// ── Request types ──────────────────────────────────────────────────

/// `generateContent` request body.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Wire form of a [`ModelRequest`]: one user turn, parts in order,
    /// images base64-encoded inline.
    pub fn from_request(request: &ModelRequest, generation: &GenerationConfig) -> Self {
        let parts = request
            .parts()
            .iter()
            .map(|part| match part {
                Part::Image(blob) => WirePart::InlineData {
                    inline_data: InlineData {
                        mime_type: blob.mime_type.to_string(),
                        data: STANDARD.encode(&blob.data),
                    },
                },
                Part::Text(text) => WirePart::Text { text: text.clone() },
            })
            .collect();

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: generation.clone(),
        }
    }
}

/// One conversation turn.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// A part as it appears on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WirePart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
    /// Any part kind this crate does not send (function calls, file data).
    Other(serde_json::Value),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded).
    pub data: String,
}

// ── Response types ─────────────────────────────────────────────────

/// `generateContent` response body.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
    pub error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Error object returned by Google APIs in place of a result.
#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

/// Error envelope used on non-2xx responses.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiError,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut text = String::new();
        let mut found = false;
        for part in &content.parts {
            if let WirePart::Text { text: t } = part {
                text.push_str(t);
                found = true;
            }
        }
        found.then_some(text)
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::UserNote;
    use crate::request::{ImageBlob, build};

    #[test]
    fn wire_request_keeps_part_order_and_encodes_image() {
        let req = build(
            Mode::Analysis,
            Some(ImageBlob::new(b"abc".to_vec())),
            &UserNote::from("note"),
        )
        .unwrap();
        let body = GenerateContentRequest::from_request(&req, &GenerationConfig::default());
        let json = serde_json::to_value(&body).unwrap();

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
        assert!(parts[1]["text"].as_str().unwrap().contains("\"note\""));
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["topK"], 32);
    }

    #[test]
    fn prompt_only_request_has_single_text_part() {
        let req = build(Mode::Empathy, None, &UserNote::default()).unwrap();
        let body = GenerateContentRequest::from_request(&req, &GenerationConfig::default());
        let json = serde_json::to_value(&body).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].get("text").is_some());
    }

    #[test]
    fn response_text_joins_text_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Severity: "}, {"text": "7/10"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 5, "totalTokenCount": 125}
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Severity: 7/10"));
        assert_eq!(resp.finish_reason(), Some("STOP"));
        assert_eq!(resp.usage_metadata.unwrap().total_token_count, Some(125));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), None);
        assert_eq!(resp.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn candidate_without_text_parts_has_no_text() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "f"}}]}, "finishReason": "OTHER"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), None);
    }
}
