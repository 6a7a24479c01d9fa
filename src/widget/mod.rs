//! Widget kinds and lifecycle tracking.

pub mod kind;
pub mod lifecycle;

pub use kind::{PropertySpec, WidgetKind};
pub use lifecycle::{LifecycleEvent, LifecycleTracker};
