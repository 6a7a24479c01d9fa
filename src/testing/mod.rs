//! Headless testing helpers: [`Pilot`] and draw-list snapshots.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{commands_to_string, render_to_string, tree_to_string};
