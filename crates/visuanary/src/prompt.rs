//! Static prompt templates, one per [`Mode`].
//!
//! Each template carries exactly one [`SLOT`], filled with the user's note
//! (or [`DEFAULT_NOTE`] when the note is blank) before the prompt is sent.

use crate::mode::Mode;

/// Substitution marker present once in every template.
pub const SLOT: &str = "{user_note}";

/// Note used when the user leaves the text field empty.
pub const DEFAULT_NOTE: &str = "No additional note.";

const ANALYSIS: &str = r#"
You are a medical image analysis assistant. Carefully study the image and the user's note, then:
• Identify visible abnormalities.
• Explain what they might indicate.
• Suggest tests / precautions / possible treatments.
• End with a short disclaimer: "This is not a medical diagnosis; please consult a doctor."
Respond professionally, clearly, and concisely.
User note: "{user_note}"
"#;

const SEVERITY: &str = r#"
You are a triage assistant. Analyse the image (and the user's note if provided) and output ONLY a line in the exact format:
Severity: X/10
where X is an integer 1–10 (10 = most severe).
No extra text.
User note: "{user_note}"
"#;

const LOCAL: &str = r#"
You are a healthcare navigator. Based on the image and user's note, suggest the most relevant specialist types
(e.g., dermatologist, orthopaedic surgeon).
Provide 2‑3 next‑step actions (e.g., book appointment, get test).
Keep it under 120 words.
User note: "{user_note}"
"#;

const EMPATHY: &str = r#"
Speak to a patient who feels nervous describing their symptoms.
Reassure them in warm, friendly language.
Suggest 3–4 simple questions they can answer about the issue (onset, pain level, changes, triggers).
Encourage honesty and remind them there's no judgement.
Do NOT analyse the image.
User note: "{user_note}"
"#;

/// A prompt with a single `{user_note}` fill-in point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    text: &'static str,
}

impl PromptTemplate {
    /// The raw template text, slot included.
    pub fn as_str(&self) -> &'static str {
        self.text
    }

    /// Fill the slot with `note`.
    pub fn render(&self, note: &UserNote) -> String {
        self.text.replacen(SLOT, note.as_str(), 1)
    }
}

/// Template for a mode. Total over [`Mode`].
pub fn template_for(mode: Mode) -> PromptTemplate {
    let text = match mode {
        Mode::Analysis => ANALYSIS,
        Mode::Severity => SEVERITY,
        Mode::LocalRecommendation => LOCAL,
        Mode::Empathy => EMPATHY,
    };
    PromptTemplate { text }
}

/// The user's free-text note, stripped, or [`DEFAULT_NOTE`] when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNote(String);

impl UserNote {
    pub fn new(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Self(s.to_string()),
            _ => Self(DEFAULT_NOTE.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserNote {
    fn default() -> Self {
        Self::new(None)
    }
}

impl From<&str> for UserNote {
    fn from(raw: &str) -> Self {
        Self::new(Some(raw))
    }
}
