//! Output modes and the mapping from UI labels to modes and display headers.
//!
//! The form offers a closed set of four choices. Each is identified by a
//! stable key (`analysis`, `severity`, `local`, `empathy`) that selects a
//! prompt template and, for every mode except [`Mode::Severity`], a fixed
//! header shown above the model's answer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header used when an identifier has no dedicated header.
pub const FALLBACK_HEADER: &str = "Result";

/// The user's selected output type.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free-form medical analysis of the image.
    Analysis,
    /// A single 1–10 triage score.
    Severity,
    /// Which specialists to see and what to do next.
    #[serde(rename = "local")]
    LocalRecommendation,
    /// Reassuring guidance; the only mode that works without an image.
    Empathy,
}

impl Mode {
    /// Every mode, in the order the form presents them.
    pub const ALL: [Mode; 4] = [
        Mode::Analysis,
        Mode::Severity,
        Mode::LocalRecommendation,
        Mode::Empathy,
    ];

    /// Stable identifier used for template and header lookup.
    pub fn key(self) -> &'static str {
        match self {
            Mode::Analysis => "analysis",
            Mode::Severity => "severity",
            Mode::LocalRecommendation => "local",
            Mode::Empathy => "empathy",
        }
    }

    /// Label shown on the form's radio option.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Analysis => "🔬 AI Medical Analysis",
            Mode::Severity => "📉 Severity Score",
            Mode::LocalRecommendation => "🧑‍⚕️ Local Recommendations",
            Mode::Empathy => "💬 Empathetic Guidance",
        }
    }

    pub fn from_key(key: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.label() == label)
    }

    /// Whether a submission in this mode must carry an image.
    pub fn requires_image(self) -> bool {
        self != Mode::Empathy
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The label did not match any of the four form options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode label: {0:?}")]
pub struct UnknownLabel(pub String);

/// Resolve a form label to its mode and, when it has one, its display header.
///
/// Severity has no header here because its renderer produces its own
/// score heading. The header is informational: it is the same string
/// [`crate::render::render`] places on a `Text` result, so callers that
/// only need the mode can drop it.
pub fn resolve(label: &str) -> Result<(Mode, Option<&'static str>), UnknownLabel> {
    let mode = Mode::from_label(label).ok_or_else(|| UnknownLabel(label.to_string()))?;
    let header = match mode {
        Mode::Severity => None,
        other => Some(header_for(other.key())),
    };
    Ok((mode, header))
}

/// Display header for a mode identifier, falling back to [`FALLBACK_HEADER`].
pub fn header_for(key: &str) -> &'static str {
    match key {
        "analysis" => Mode::Analysis.label(),
        "local" => Mode::LocalRecommendation.label(),
        "empathy" => Mode::Empathy.label(),
        _ => FALLBACK_HEADER,
    }
}
