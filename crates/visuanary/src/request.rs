//! Assembles the outbound [`ModelRequest`] for one submission.
//!
//! This is the only place the image precondition is checked: every mode
//! except [`Mode::Empathy`] needs an image, and a missing one stops the
//! submission before any network traffic.

use thiserror::Error;

use crate::mode::Mode;
use crate::prompt::{UserNote, template_for};

/// Content type attached to every uploaded image.
///
/// The bytes are passed through untouched; the upload form only accepts
/// JPEG and PNG files and the model sniffs the real encoding itself.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Raw image bytes plus their declared content type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl ImageBlob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: IMAGE_MIME_TYPE,
            data: data.into(),
        }
    }
}

impl std::fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// One element of the ordered request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Image(ImageBlob),
    Text(String),
}

/// Ordered parts sent to the model: zero-or-one image, then one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    mode: Mode,
    parts: Vec<Part>,
}

impl ModelRequest {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn has_image(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::Image(_)))
    }

    /// The rendered prompt, always the final part.
    pub fn prompt(&self) -> &str {
        match self.parts.last() {
            Some(Part::Text(text)) => text,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Please upload an image first.")]
    MissingImage,
}

/// Build the request for `mode`, rejecting a missing image unless the mode
/// is [`Mode::Empathy`].
pub fn build(
    mode: Mode,
    image: Option<ImageBlob>,
    note: &UserNote,
) -> Result<ModelRequest, BuildError> {
    if mode.requires_image() && image.is_none() {
        return Err(BuildError::MissingImage);
    }

    let prompt = template_for(mode).render(note);
    let mut parts = Vec::with_capacity(2);
    if let Some(blob) = image {
        parts.push(Part::Image(blob));
    }
    parts.push(Part::Text(prompt));

    Ok(ModelRequest { mode, parts })
}
