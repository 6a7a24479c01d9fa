//! Paint pass and drawing backends.

pub mod paint;
pub mod recorder;
pub mod target;

pub use paint::{Painter, VisualState, DEFAULT_TEXT_SIZE};
pub use recorder::{DrawCommand, Recorder};
pub use target::RenderTarget;
