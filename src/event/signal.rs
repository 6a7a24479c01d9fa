//! Widget signals.
//!
//! Interaction produces [`WidgetEvent`]s. [`Signals`] delivers each event to
//! the callbacks connected for that widget and kind, then keeps it in a queue
//! for callers that prefer polling.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::tree::node::WidgetId;

/// Events kept for polling before the oldest are dropped.
pub const DEFAULT_QUEUE_LIMIT: usize = 1024;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Kind of a [`WidgetEvent`], used to select callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Pressed,
    Checked,
    Unchecked,
    MouseEntered,
    MouseLeft,
    Focused,
    Unfocused,
    RendererChanged,
    Action,
}

/// Something that happened to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A button was clicked or activated from the keyboard.
    Pressed { id: WidgetId },
    Checked { id: WidgetId },
    Unchecked { id: WidgetId },
    MouseEntered { id: WidgetId },
    MouseLeft { id: WidgetId },
    Focused { id: WidgetId },
    Unfocused { id: WidgetId },
    /// A renderer property of the widget changed value.
    RendererChanged { id: WidgetId, property: String },
    /// A custom key binding fired while the widget had focus.
    Action { id: WidgetId, name: String },
}

impl WidgetEvent {
    pub fn id(&self) -> WidgetId {
        match self {
            WidgetEvent::Pressed { id }
            | WidgetEvent::Checked { id }
            | WidgetEvent::Unchecked { id }
            | WidgetEvent::MouseEntered { id }
            | WidgetEvent::MouseLeft { id }
            | WidgetEvent::Focused { id }
            | WidgetEvent::Unfocused { id }
            | WidgetEvent::RendererChanged { id, .. }
            | WidgetEvent::Action { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            WidgetEvent::Pressed { .. } => SignalKind::Pressed,
            WidgetEvent::Checked { .. } => SignalKind::Checked,
            WidgetEvent::Unchecked { .. } => SignalKind::Unchecked,
            WidgetEvent::MouseEntered { .. } => SignalKind::MouseEntered,
            WidgetEvent::MouseLeft { .. } => SignalKind::MouseLeft,
            WidgetEvent::Focused { .. } => SignalKind::Focused,
            WidgetEvent::Unfocused { .. } => SignalKind::Unfocused,
            WidgetEvent::RendererChanged { .. } => SignalKind::RendererChanged,
            WidgetEvent::Action { .. } => SignalKind::Action,
        }
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Identifies a connected callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

type Callback = Box<dyn FnMut(&WidgetEvent)>;

struct Connection {
    id: ConnectionId,
    widget: WidgetId,
    kind: SignalKind,
    callback: Callback,
}

/// Callback registry plus a bounded queue of emitted events.
///
/// The queue keeps at most `queue_limit` events; when full, the oldest one is
/// dropped. A limit of 0 turns polling off and events only reach callbacks.
pub struct Signals {
    next_id: u64,
    connections: Vec<Connection>,
    queue: VecDeque<WidgetEvent>,
    queue_limit: usize,
    dropped: usize,
}

impl Signals {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            connections: Vec::new(),
            queue: VecDeque::new(),
            queue_limit: DEFAULT_QUEUE_LIMIT,
            dropped: 0,
        }
    }

    /// Set the queue limit (builder).
    pub fn with_queue_limit(mut self, limit: usize) -> Self {
        self.set_queue_limit(limit);
        self
    }

    /// Change the queue limit, dropping the oldest events that no longer fit.
    pub fn set_queue_limit(&mut self, limit: usize) {
        self.queue_limit = limit;
        while self.queue.len() > limit {
            self.queue.pop_front();
            self.dropped += 1;
        }
    }

    pub fn queue_limit(&self) -> usize {
        self.queue_limit
    }

    /// Number of events dropped from a full queue so far.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Call `callback` whenever `widget` emits an event of `kind`.
    ///
    /// Callbacks run in connection order.
    pub fn connect(
        &mut self,
        widget: WidgetId,
        kind: SignalKind,
        callback: impl FnMut(&WidgetEvent) + 'static,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.connections.push(Connection {
            id,
            widget,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove one callback. Returns whether it was connected.
    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != connection);
        self.connections.len() != before
    }

    /// Remove every callback of a widget. Returns how many were removed.
    pub fn disconnect_widget(&mut self, widget: WidgetId) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| c.widget != widget);
        before - self.connections.len()
    }

    /// Deliver an event to its callbacks and queue it.
    pub fn emit(&mut self, event: WidgetEvent) {
        let (widget, kind) = (event.id(), event.kind());
        for connection in self
            .connections
            .iter_mut()
            .filter(|c| c.widget == widget && c.kind == kind)
        {
            (connection.callback)(&event);
        }
        if self.queue_limit == 0 {
            return;
        }
        if self.queue.len() >= self.queue_limit {
            self.queue.pop_front();
            self.dropped += 1;
            if self.dropped == 1 || self.dropped % self.queue_limit == 0 {
                debug!(dropped = self.dropped, limit = self.queue_limit, "event queue full, dropping oldest");
            }
        }
        self.queue.push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<WidgetEvent> {
        self.queue.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signals")
            .field("connections", &self.connections.len())
            .field("queued", &self.queue.len())
            .field("queue_limit", &self.queue_limit)
            .finish()
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}
