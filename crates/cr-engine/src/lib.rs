//! Host-facing content rating engine
//!
//! Wires the alias table, rating store and redactor together and exposes
//! the calls a rendering pipeline makes: directive and marker emission
//! during the first pass, redaction at output time, and the media gate
//! wherever a single file is about to be shown, listed or scored.

pub mod emitter;
pub mod engine;
pub mod gate;
pub mod session;

pub use emitter::MarkerEmitter;
pub use engine::RatingEngine;
pub use gate::{ImageDisplay, MediaGate};
pub use session::{RenderSession, RenderedArtifact};
