//! Convenience re-exports for common `visuanary` types.
//!
//! ```ignore
//! use visuanary::prelude::*;
//! ```

pub use crate::client::{FakeModelClient, GeminiClient, ModelClient, ModelError};
pub use crate::config::{ClientConfig, GenerationConfig};
pub use crate::flow::{Outcome, Submission, submit};
pub use crate::mode::{Mode, header_for, resolve};
pub use crate::prompt::{UserNote, template_for};
pub use crate::render::{Rendered, extract_severity, render};
pub use crate::request::{ImageBlob, ModelRequest, Part, build};
