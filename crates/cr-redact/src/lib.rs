//! Render-time rating markers and redaction
//!
//! The first rendering pass wraps gated content in marker tokens
//! ([`markers`]); the final pass hands the whole document to a
//! [`Redactor`], which removes or unwraps every marked region according to
//! the viewer's permissions.

pub mod markers;
pub mod redactor;

pub use markers::{InlineMarkers, block_end, block_markers, block_start};
pub use redactor::{RedactError, RedactionInfo, Redactor};
