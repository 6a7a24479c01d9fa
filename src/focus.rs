//! Keyboard focus order.
//!
//! [`FocusChain`] keeps the tab order of widgets that can take focus: attached,
//! focusable, effectively visible and effectively enabled, in paint order.

use crate::tree::node::WidgetId;
use crate::tree::tree::WidgetTree;

/// Ordered list of focusable widgets with a cursor.
///
/// The chain is rebuilt from the tree before each traversal. Focus wraps in
/// both directions.
#[derive(Debug, Default)]
pub struct FocusChain {
    widgets: Vec<WidgetId>,
    current: Option<usize>,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recollect the focusable widgets.
    ///
    /// The current widget keeps the cursor if it is still in the chain.
    pub fn rebuild(&mut self, tree: &WidgetTree) {
        let old = self.current();
        let root = tree.root();
        self.widgets = tree
            .walk_depth_first(root)
            .into_iter()
            .filter(|&id| id != root && Self::can_take_focus(tree, id))
            .collect();
        self.current = old.and_then(|id| self.widgets.iter().position(|&w| w == id));
    }

    /// Whether `id` could be focused right now.
    pub fn can_take_focus(tree: &WidgetTree, id: WidgetId) -> bool {
        tree.get(id).is_some_and(|w| w.is_focusable())
            && tree.is_attached(id)
            && tree.is_effectively_visible(id)
            && tree.is_effectively_enabled(id)
    }

    pub fn current(&self) -> Option<WidgetId> {
        self.current.and_then(|idx| self.widgets.get(idx).copied())
    }

    /// Advance to the next widget, wrapping around.
    pub fn next(&mut self) -> Option<WidgetId> {
        if self.widgets.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.widgets.len(),
            None => 0,
        };
        self.current = Some(next);
        self.widgets.get(next).copied()
    }

    /// Step back to the previous widget, wrapping around.
    pub fn previous(&mut self) -> Option<WidgetId> {
        if self.widgets.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.widgets.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.widgets.get(prev).copied()
    }

    /// Move the cursor to `id`. Returns `false` if it is not in the chain.
    pub fn set_current(&mut self, id: WidgetId) -> bool {
        match self.widgets.iter().position(|&w| w == id) {
            Some(pos) => {
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
