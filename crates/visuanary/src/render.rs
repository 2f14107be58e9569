//! Shapes the model's text for display.
//!
//! Severity answers are reduced to a score and a 0.0–1.0 indicator; every
//! other mode shows the raw text under its header.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::mode::{Mode, header_for};

/// Shown when a severity answer contains no digits.
pub const NO_SCORE_NOTICE: &str = "AI did not return a numeric severity score.";

/// Top of the severity scale.
pub const SEVERITY_SCALE: u32 = 10;

static SEVERITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}").unwrap());

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A\d\z").unwrap());

/// First run of one or two decimal digits in `text`, scanning left to right.
///
/// Any Unicode decimal digit counts (`"٧"` and `"７"` are both 7). Values
/// above the scale are returned as-is; `"123"` yields `12`.
pub fn extract_severity(text: &str) -> Option<u32> {
    let m = SEVERITY_PATTERN.find(text)?;
    m.as_str()
        .chars()
        .try_fold(0, |acc, c| Some(acc * 10 + digit_value(c)?))
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0; 4];
    DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Numeric value of a Unicode decimal digit.
///
/// Decimal digits are allocated in contiguous runs of ten starting at zero,
/// so the value is the offset from the start of the contiguous block,
/// modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut offset = 0;
    let mut cp = c as u32;
    while let Some(prev) = cp.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        cp -= 1;
    }
    Some(offset % 10)
}

/// Fraction of the full scale, capped at 1.0.
pub fn severity_indicator(score: u32) -> f32 {
    score.min(SEVERITY_SCALE) as f32 / SEVERITY_SCALE as f32
}

/// What the page displays for a successful model call.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    /// The extracted score. `score` is shown uncapped; only `indicator` is
    /// clamped to the scale.
    Severity {
        score: u32,
        indicator: f32,
        heading: String,
    },
    /// Severity mode, but the answer had no number in it.
    NoScore { notice: String },
    /// Any other mode: the model's text, untouched.
    Text { header: String, body: String },
}

/// Render `text` for `mode`.
pub fn render(mode: Mode, text: &str) -> Rendered {
    match mode {
        Mode::Severity => match extract_severity(text) {
            Some(score) => Rendered::Severity {
                score,
                indicator: severity_indicator(score),
                heading: format!("📉 Severity Score: {score}/{SEVERITY_SCALE}"),
            },
            None => Rendered::NoScore {
                notice: NO_SCORE_NOTICE.to_string(),
            },
        },
        other => Rendered::Text {
            header: header_for(other.key()).to_string(),
            body: text.to_string(),
        },
    }
}
