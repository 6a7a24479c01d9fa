//! Widget lifecycle: attach, detach, destroy.
//!
//! The `LifecycleTracker` records which widgets are currently reachable from
//! the tree root and accumulates lifecycle events that the GUI drains to drop
//! stale input state and signal handlers.

use std::collections::HashSet;

use crate::tree::node::WidgetId;

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events that occur during the widget lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The widget became reachable from the root.
    Attached { id: WidgetId },
    /// The widget is no longer reachable from the root but still exists.
    Detached { id: WidgetId },
    /// The widget was removed from the arena; its id is stale.
    Destroyed { id: WidgetId },
}

impl LifecycleEvent {
    pub fn id(&self) -> WidgetId {
        match *self {
            LifecycleEvent::Attached { id }
            | LifecycleEvent::Detached { id }
            | LifecycleEvent::Destroyed { id } => id,
        }
    }
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks attached widgets and queues lifecycle events in order.
///
/// Queueing can be switched off; attachment is tracked either way.
#[derive(Debug)]
pub struct LifecycleTracker {
    attached: HashSet<WidgetId>,
    pending: Vec<LifecycleEvent>,
    recording: bool,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self { attached: HashSet::new(), pending: Vec::new(), recording: true }
    }

    /// Turn event queueing on or off. Turning it off drops pending events.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
        if !recording {
            self.pending.clear();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn record(&mut self, event: LifecycleEvent) {
        if self.recording {
            self.pending.push(event);
        }
    }

    /// Record that a widget became attached. No event if it already was.
    pub fn on_attach(&mut self, id: WidgetId) {
        if self.attached.insert(id) {
            self.record(LifecycleEvent::Attached { id });
        }
    }

    /// Record that a widget was detached. No event if it was not attached.
    pub fn on_detach(&mut self, id: WidgetId) {
        if self.attached.remove(&id) {
            self.record(LifecycleEvent::Detached { id });
        }
    }

    /// Record that a widget was destroyed, detaching it first if needed.
    pub fn on_destroy(&mut self, id: WidgetId) {
        self.on_detach(id);
        self.record(LifecycleEvent::Destroyed { id });
    }

    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.attached.contains(&id)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Drain all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}
