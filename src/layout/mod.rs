//! Layout: lengths, the top-down layout pass and the hit-test map.

pub mod engine;
pub mod length;
pub mod spatial;

pub use engine::{content_area, LayoutEngine};
pub use length::{Layout2d, Length};
pub use spatial::{HitEntry, SpatialMap};
