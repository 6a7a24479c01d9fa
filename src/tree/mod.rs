//! Widget tree: slotmap-backed arena with parent/child links, z-order,
//! name queries and renderer binding.

pub mod node;
pub mod query;
pub mod style;
pub mod tree;

pub use node::{Widget, WidgetId};
pub use tree::{RendererChange, WidgetTree};
