//! # trellis
//!
//! The core of a retained-mode widget toolkit: a widget tree, shared and
//! swappable renderers, a deduplicating texture cache, and the layout and
//! event passes that tie them together.
//!
//! Rendering is backend-agnostic. The paint pass issues draw calls against a
//! [`RenderTarget`](render::RenderTarget); the crate ships a
//! [`Recorder`](render::Recorder) that keeps them as a list.
//!
//! ## Core Systems
//!
//! - **[`tree`]**: Slotmap-backed widget arena with z-ordered children, name lookup and renderer binding
//! - **[`widget`]**: Widget kinds, their renderer property tables, lifecycle notifications
//! - **[`renderer`]**: Reference-counted property maps shared between widgets, copy-on-write per widget
//! - **[`theme`]**: Theme file tokenizer and parser, built-in default theme
//! - **[`texture`]**: Single-flight, refcounted texture cache over a pluggable loader
//! - **[`layout`]**: Absolute and relative placement, taffy-backed box layouts, spatial hit map
//! - **[`event`]**: Input events, key bindings, hover/press/focus dispatch, widget signals
//! - **[`render`]**: Paint pass and draw-call recording
//! - **[`gui`]**: The [`Gui`] owning everything above, configured by [`GuiConfig`]
//! - **[`testing`]**: Headless [`Pilot`](testing::Pilot) and snapshot helpers
//! - **[`geometry`]**: Offset, Size, Region, Spacing primitives

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod renderer;
pub mod texture;
pub mod theme;
pub mod tree;
pub mod widget;

// Passes
pub mod event;
pub mod focus;
pub mod layout;
pub mod render;

// Application
pub mod gui;
pub mod testing;

pub use error::{Error, Result};
pub use gui::{Gui, GuiConfig};
pub use renderer::{Color, Renderer, RendererData, TextureRef, Value};
pub use texture::{Texture, TextureKey, TextureLoader, TextureManager};
pub use theme::Theme;
pub use tree::{Widget, WidgetId, WidgetTree};
pub use widget::WidgetKind;
