//! Event system: input types, key bindings, dispatch, widget signals.

pub mod binding;
pub mod dispatch;
pub mod input;
pub mod signal;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use dispatch::EventDispatcher;
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
pub use signal::{ConnectionId, SignalKind, Signals, WidgetEvent, DEFAULT_QUEUE_LIMIT};
