//! Tree operations: create, attach, detach, destroy, z-order, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::layout::length::Layout2d;
use crate::widget::{LifecycleEvent, LifecycleTracker};

use super::node::{Widget, WidgetId};

/// Empty slice constant for returning when a widget has no children.
const EMPTY_CHILDREN: &[WidgetId] = &[];

/// A renderer property of a widget changed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererChange {
    pub id: WidgetId,
    pub property: String,
}

/// The widget tree, backed by a slotmap arena.
///
/// All widgets live in a single `SlotMap`, attached or not. Parent/child
/// relationships are stored in secondary maps; a child list is the paint
/// order of its widgets (last = topmost). The root is a [`Group`] created
/// with the tree and can never be removed.
///
/// [`Group`]: crate::widget::WidgetKind::Group
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, Widget>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    root: WidgetId,
    pub(crate) layout_dirty: bool,
    pub(crate) renderer_changes: Vec<RendererChange>,
    lifecycle: LifecycleTracker,
    notify: bool,
}

impl WidgetTree {
    /// Create a tree holding only the root group.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Widget::group());
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        let mut lifecycle = LifecycleTracker::new();
        lifecycle.set_recording(false);
        lifecycle.on_attach(root);
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            root,
            layout_dirty: true,
            renderer_changes: Vec::new(),
            lifecycle,
            notify: false,
        }
    }

    /// Insert a detached widget.
    ///
    /// Fails with [`Error::InvalidGeometry`] on a negative size, a negative
    /// ratio or non-finite values.
    pub fn create(&mut self, widget: Widget) -> Result<WidgetId> {
        widget.position.validate(false)?;
        widget.size.validate(true)?;
        if !widget.ratio.is_finite() || widget.ratio < 0.0 {
            return Err(Error::InvalidGeometry(format!("invalid ratio {}", widget.ratio)));
        }
        let type_name = widget.kind.type_name();
        let id = self.nodes.insert(widget);
        self.children.insert(id, Vec::new());
        trace!(?id, type_name, "widget created");
        Ok(id)
    }

    /// Create a widget and attach it to `parent` in one step.
    pub fn insert(&mut self, parent: WidgetId, widget: Widget) -> Result<WidgetId> {
        self.ensure(parent)?;
        let id = self.create(widget)?;
        if let Err(err) = self.add_child(parent, id) {
            self.remove_subtree(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Append `child` to `parent`'s children (topmost position).
    ///
    /// A child that belongs to another parent is moved. Fails with
    /// [`Error::InvalidState`] if `parent` cannot hold children, if `child`
    /// is already below `parent`, or if the move would create a cycle.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        self.check_link(parent, child)?;
        if let Some(old) = self.parent.get(child).copied() {
            warn!(?child, ?old, new = ?parent, "widget already has a parent, moving it");
            self.unlink(child);
        }
        self.link(parent, child);
        Ok(())
    }

    /// Move `child` under `new_parent`, appending it on top.
    pub fn reparent(&mut self, child: WidgetId, new_parent: WidgetId) -> Result<()> {
        if self.parent(child) == Some(new_parent) {
            return Ok(());
        }
        self.check_link(new_parent, child)?;
        self.unlink(child);
        self.link(new_parent, child);
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// Returns `false` if `child` is not a child of `parent`. The child is
    /// not destroyed and can be attached again.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<bool> {
        self.ensure(parent)?;
        if self.parent.get(child) != Some(&parent) {
            return Ok(false);
        }
        self.unlink(child);
        Ok(true)
    }

    /// Detach a widget from whatever parent it has.
    pub fn detach(&mut self, id: WidgetId) -> Result<bool> {
        self.ensure(id)?;
        if self.parent.contains_key(id) {
            self.unlink(id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove a widget and all its descendants from the arena.
    ///
    /// Drops every renderer reference and texture handle they hold.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        self.ensure(id)?;
        if id == self.root {
            return Err(Error::InvalidState("the root widget cannot be destroyed".into()));
        }
        if self.parent.contains_key(id) {
            self.unlink(id);
        }
        let removed = self.remove_subtree(id);
        debug!(?id, removed, "widget destroyed");
        Ok(())
    }

    /// Destroy every widget below the root.
    pub fn clear(&mut self) {
        let mut removed = 0;
        for child in self.children(self.root).to_vec() {
            self.unlink(child);
            removed += self.remove_subtree(child);
        }
        debug!(removed, "tree cleared");
    }

    fn check_link(&self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let parent_widget = self.widget(parent)?;
        self.ensure(child)?;
        if !parent_widget.kind.is_container() {
            return Err(Error::InvalidState(format!(
                "{} cannot hold children",
                parent_widget.kind.type_name()
            )));
        }
        if child == self.root {
            return Err(Error::InvalidState("the root widget cannot be a child".into()));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::InvalidState(format!(
                "adding {child:?} under {parent:?} would create a cycle"
            )));
        }
        if self.is_ancestor(parent, child) {
            return Err(Error::InvalidState(format!(
                "{child:?} is already a descendant of {parent:?}"
            )));
        }
        Ok(())
    }

    fn link(&mut self, parent: WidgetId, child: WidgetId) {
        if let Some(list) = self.children.get_mut(parent) {
            list.push(child);
        }
        self.parent.insert(child, parent);
        if self.is_attached(parent) {
            for id in self.walk_depth_first(child) {
                self.lifecycle.on_attach(id);
            }
        }
        self.layout_dirty = true;
    }

    fn unlink(&mut self, child: WidgetId) {
        let was_attached = self.is_attached(child);
        if let Some(old) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(old) {
                siblings.retain(|&c| c != child);
            }
        }
        for id in self.walk_depth_first(child) {
            if was_attached {
                self.lifecycle.on_detach(id);
            }
            if let Some(widget) = self.nodes.get_mut(id) {
                widget.clear_interaction();
            }
        }
        self.layout_dirty = true;
    }

    /// Remove a detached subtree from the arena, returning the number of
    /// widgets removed.
    fn remove_subtree(&mut self, id: WidgetId) -> usize {
        let mut queue = VecDeque::from([id]);
        let mut removed = 0;
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                self.lifecycle.on_destroy(current);
                removed += 1;
            }
        }
        removed
    }

    // -- lookup --------------------------------------------------------------

    /// The root group.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    /// Like [`get`](Self::get), failing with [`Error::WidgetNotFound`].
    pub fn widget(&self, id: WidgetId) -> Result<&Widget> {
        self.nodes.get(id).ok_or(Error::WidgetNotFound(id))
    }

    pub(crate) fn widget_mut(&mut self, id: WidgetId) -> Result<&mut Widget> {
        self.nodes.get_mut(id).ok_or(Error::WidgetNotFound(id))
    }

    fn ensure(&self, id: WidgetId) -> Result<()> {
        self.widget(id).map(|_| ())
    }

    /// Number of widgets in the arena, attached or not, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    /// Children in paint order. Empty if the widget has none or does not exist.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors from the immediate parent up to the topmost one.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Whether the widget is reachable from the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Whether the widget and all its ancestors are enabled.
    pub fn is_effectively_enabled(&self, id: WidgetId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|w| self.nodes.get(w).is_some_and(|w| w.enabled))
    }

    /// Whether the widget and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: WidgetId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|w| self.nodes.get(w).is_some_and(|w| w.visible))
    }

    /// Pre-order depth-first traversal starting from `start` (paint order).
    pub fn walk_depth_first(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        result
    }

    // -- z-order -------------------------------------------------------------

    /// Position of the widget among its siblings (0 = drawn first).
    pub fn child_index(&self, id: WidgetId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Move the widget to `index` among its siblings.
    pub fn set_child_index(&mut self, id: WidgetId, index: usize) -> Result<()> {
        self.ensure(id)?;
        let parent = self
            .parent(id)
            .ok_or_else(|| Error::InvalidState(format!("{id:?} has no parent")))?;
        let Some(siblings) = self.children.get_mut(parent) else {
            return Err(Error::InvalidState(format!("{parent:?} has no child list")));
        };
        if index >= siblings.len() {
            return Err(Error::InvalidState(format!(
                "index {index} out of range for {} children",
                siblings.len()
            )));
        }
        if let Some(current) = siblings.iter().position(|&c| c == id) {
            let widget = siblings.remove(current);
            siblings.insert(index, widget);
            self.layout_dirty = true;
        }
        Ok(())
    }

    /// Draw the widget above all its siblings.
    pub fn move_to_front(&mut self, id: WidgetId) -> Result<()> {
        let last = self.sibling_count(id)? - 1;
        self.set_child_index(id, last)
    }

    /// Draw the widget below all its siblings.
    pub fn move_to_back(&mut self, id: WidgetId) -> Result<()> {
        self.sibling_count(id)?;
        self.set_child_index(id, 0)
    }

    /// Swap the widget with the sibling directly above it.
    pub fn move_forward(&mut self, id: WidgetId) -> Result<()> {
        let count = self.sibling_count(id)?;
        match self.child_index(id) {
            Some(index) if index + 1 < count => self.set_child_index(id, index + 1),
            _ => Ok(()),
        }
    }

    /// Swap the widget with the sibling directly below it.
    pub fn move_backward(&mut self, id: WidgetId) -> Result<()> {
        self.sibling_count(id)?;
        match self.child_index(id) {
            Some(index) if index > 0 => self.set_child_index(id, index - 1),
            _ => Ok(()),
        }
    }

    fn sibling_count(&self, id: WidgetId) -> Result<usize> {
        self.ensure(id)?;
        let parent = self
            .parent(id)
            .ok_or_else(|| Error::InvalidState(format!("{id:?} has no parent")))?;
        Ok(self.children(parent).len())
    }

    // -- state ---------------------------------------------------------------

    /// Show or hide a widget. Hiding clears hover, press and focus below it.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<()> {
        self.widget_mut(id)?.visible = visible;
        if !visible {
            self.clear_interaction_below(id);
        }
        self.layout_dirty = true;
        Ok(())
    }

    /// Enable or disable a widget. Disabling clears hover, press and focus
    /// below it.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<()> {
        self.widget_mut(id)?.enabled = enabled;
        if !enabled {
            self.clear_interaction_below(id);
        }
        self.layout_dirty = true;
        Ok(())
    }

    pub fn set_focusable(&mut self, id: WidgetId, focusable: bool) -> Result<()> {
        let widget = self.widget_mut(id)?;
        widget.focusable = focusable;
        if !focusable {
            widget.focused = false;
        }
        Ok(())
    }

    pub fn set_position(&mut self, id: WidgetId, position: impl Into<Layout2d>) -> Result<()> {
        let position = position.into();
        position.validate(false)?;
        self.widget_mut(id)?.position = position;
        self.layout_dirty = true;
        Ok(())
    }

    pub fn set_size(&mut self, id: WidgetId, size: impl Into<Layout2d>) -> Result<()> {
        let size = size.into();
        size.validate(true)?;
        self.widget_mut(id)?.size = size;
        self.layout_dirty = true;
        Ok(())
    }

    /// Share of the free space the widget gets inside a box layout.
    pub fn set_ratio(&mut self, id: WidgetId, ratio: f32) -> Result<()> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(Error::InvalidGeometry(format!("invalid ratio {ratio}")));
        }
        self.widget_mut(id)?.ratio = ratio;
        self.layout_dirty = true;
        Ok(())
    }

    pub fn set_name(&mut self, id: WidgetId, name: Option<String>) -> Result<()> {
        self.widget_mut(id)?.name = name;
        Ok(())
    }

    /// Replace the text of a button, label or check box.
    pub fn set_text(&mut self, id: WidgetId, text: impl Into<String>) -> Result<()> {
        let widget = self.widget_mut(id)?;
        let type_name = widget.kind.type_name();
        let slot = widget
            .kind
            .text_mut()
            .ok_or_else(|| Error::InvalidState(format!("{type_name} has no text")))?;
        *slot = text.into();
        Ok(())
    }

    /// Set the checked state of a check box. Returns whether it changed.
    pub fn set_checked(&mut self, id: WidgetId, checked: bool) -> Result<bool> {
        let widget = self.widget_mut(id)?;
        let type_name = widget.kind.type_name();
        let slot = widget
            .kind
            .checked_mut()
            .ok_or_else(|| Error::InvalidState(format!("{type_name} cannot be checked")))?;
        let changed = *slot != checked;
        *slot = checked;
        Ok(changed)
    }

    pub(crate) fn set_hover(&mut self, id: WidgetId, hover: bool) {
        if let Some(w) = self.nodes.get_mut(id) {
            w.hover = hover;
        }
    }

    pub(crate) fn set_mouse_down(&mut self, id: WidgetId, down: bool) {
        if let Some(w) = self.nodes.get_mut(id) {
            w.mouse_down = down;
        }
    }

    pub(crate) fn set_focused(&mut self, id: WidgetId, focused: bool) {
        if let Some(w) = self.nodes.get_mut(id) {
            w.focused = focused;
        }
    }

    fn clear_interaction_below(&mut self, id: WidgetId) {
        for w in self.walk_depth_first(id) {
            if let Some(widget) = self.nodes.get_mut(w) {
                widget.clear_interaction();
            }
        }
    }

    // -- bookkeeping ---------------------------------------------------------

    /// Whether anything changed since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }

    /// Queue lifecycle and renderer notifications for
    /// [`drain_lifecycle`](Self::drain_lifecycle) and
    /// [`drain_renderer_changes`](Self::drain_renderer_changes).
    ///
    /// Off for a new tree. Turning it off drops anything still queued.
    pub fn set_notifications(&mut self, enabled: bool) {
        self.notify = enabled;
        self.lifecycle.set_recording(enabled);
        if !enabled {
            self.renderer_changes.clear();
        }
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notify
    }

    pub(crate) fn push_renderer_change(&mut self, id: WidgetId, property: &str) {
        if self.notify {
            self.renderer_changes.push(RendererChange { id, property: property.to_owned() });
        }
    }

    /// Drain attach / detach / destroy events, oldest first.
    pub fn drain_lifecycle(&mut self) -> Vec<LifecycleEvent> {
        self.lifecycle.drain()
    }

    /// Drain renderer property changes, oldest first.
    pub fn drain_renderer_changes(&mut self) -> Vec<RendererChange> {
        std::mem::take(&mut self.renderer_changes)
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetKind;
    use pretty_assertions::assert_eq;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (WidgetTree, WidgetId, WidgetId, WidgetId, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let a = tree.insert(root, Widget::panel().with_name("a")).unwrap();
        let b = tree.insert(root, Widget::panel().with_name("b")).unwrap();
        let c = tree.insert(a, Widget::button("c").with_name("c")).unwrap();
        let d = tree.insert(a, Widget::label("d").with_name("d")).unwrap();
        (tree, root, a, b, c, d)
    }

    #[test]
    fn new_tree_has_root_group() {
        let tree = WidgetTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.widget(tree.root()).unwrap().kind, WidgetKind::Group);
        assert!(tree.is_attached(tree.root()));
    }

    #[test]
    fn insert_sets_parent_and_children() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn create_rejects_negative_size() {
        let mut tree = WidgetTree::new();
        let err = tree.create(Widget::button("x").sized((-1.0, 10.0))).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        let err = tree.create(Widget::button("x").at((f32::NAN, 0.0))).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn add_then_remove_restores_children() {
        let (mut tree, root, a, b, ..) = build_tree();
        let before = tree.children(root).to_vec();
        let e = tree.create(Widget::label("e")).unwrap();
        tree.add_child(root, e).unwrap();
        assert_eq!(tree.children(root), &[a, b, e]);
        assert!(tree.remove_child(root, e).unwrap());
        assert_eq!(tree.children(root), before.as_slice());
        assert!(tree.contains(e));
        assert_eq!(tree.parent(e), None);
    }

    #[test]
    fn remove_child_of_other_parent_returns_false() {
        let (mut tree, _root, _a, b, c, _d) = build_tree();
        assert!(!tree.remove_child(b, c).unwrap());
    }

    #[test]
    fn add_child_rejects_cycles() {
        let (mut tree, _root, a, _b, c, _d) = build_tree();
        let err = tree.add_child(c, a);
        assert!(err.is_err());
        let err = tree.add_child(a, a).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn add_child_rejects_cycle_through_containers() {
        let (mut tree, root, a, ..) = build_tree();
        let inner = tree.insert(a, Widget::group()).unwrap();
        let err = tree.add_child(inner, a).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        let err = tree.add_child(inner, root).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn add_child_rejects_existing_descendant() {
        let (mut tree, root, a, _b, c, _d) = build_tree();
        assert!(matches!(tree.add_child(a, c), Err(Error::InvalidState(_))));
        assert!(matches!(tree.add_child(root, c), Err(Error::InvalidState(_))));
    }

    #[test]
    fn add_child_rejects_non_container() {
        let (mut tree, _root, _a, _b, c, _d) = build_tree();
        let e = tree.create(Widget::label("e")).unwrap();
        assert!(matches!(tree.add_child(c, e), Err(Error::InvalidState(_))));
    }

    #[test]
    fn add_child_moves_from_unrelated_parent() {
        let (mut tree, _root, a, b, c, d) = build_tree();
        tree.add_child(b, c).unwrap();
        assert_eq!(tree.parent(c), Some(b));
        assert_eq!(tree.children(a), &[d]);
        assert_eq!(tree.children(b), &[c]);
    }

    #[test]
    fn reparent_keeps_subtree() {
        let (mut tree, root, a, b, c, d) = build_tree();
        tree.reparent(a, b).unwrap();
        assert_eq!(tree.ancestors(c), vec![a, b, root]);
        assert_eq!(tree.children(a), &[c, d]);
    }

    #[test]
    fn destroy_removes_subtree() {
        let (mut tree, root, a, b, c, d) = build_tree();
        tree.destroy(a).unwrap();
        assert!(!tree.contains(a));
        assert!(!tree.contains(c));
        assert!(!tree.contains(d));
        assert_eq!(tree.children(root), &[b]);
        assert!(matches!(tree.widget(c), Err(Error::WidgetNotFound(_))));
    }

    #[test]
    fn destroy_root_fails() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        assert!(matches!(tree.destroy(root), Err(Error::InvalidState(_))));
    }

    #[test]
    fn stale_ids_are_not_found() {
        let (mut tree, root, a, ..) = build_tree();
        tree.destroy(a).unwrap();
        assert!(matches!(tree.add_child(root, a), Err(Error::WidgetNotFound(_))));
        assert!(matches!(tree.remove_child(a, root), Err(Error::WidgetNotFound(_))));
    }

    #[test]
    fn walks() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(tree.walk_breadth_first(root), vec![root, a, b, c, d]);
        assert_eq!(tree.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn z_order_moves() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let ids: Vec<WidgetId> = (0..3)
            .map(|i| tree.insert(root, Widget::label(i.to_string())).unwrap())
            .collect();

        tree.move_to_front(ids[0]).unwrap();
        assert_eq!(tree.children(root), &[ids[1], ids[2], ids[0]]);
        tree.move_to_back(ids[0]).unwrap();
        assert_eq!(tree.children(root), &[ids[0], ids[1], ids[2]]);
        tree.move_forward(ids[0]).unwrap();
        assert_eq!(tree.children(root), &[ids[1], ids[0], ids[2]]);
        tree.move_backward(ids[2]).unwrap();
        assert_eq!(tree.children(root), &[ids[1], ids[2], ids[0]]);
        tree.move_forward(ids[0]).unwrap();
        assert_eq!(tree.child_index(ids[0]), Some(2));
        tree.set_child_index(ids[0], 1).unwrap();
        assert_eq!(tree.child_index(ids[0]), Some(1));
        assert!(tree.set_child_index(ids[0], 3).is_err());
    }

    #[test]
    fn z_order_on_detached_widget_fails() {
        let mut tree = WidgetTree::new();
        let w = tree.create(Widget::label("x")).unwrap();
        assert!(matches!(tree.move_to_front(w), Err(Error::InvalidState(_))));
    }

    #[test]
    fn disabling_clears_interaction() {
        let (mut tree, _root, a, _b, c, _d) = build_tree();
        tree.set_hover(c, true);
        tree.set_focused(c, true);
        tree.set_enabled(a, false).unwrap();
        let w = tree.widget(c).unwrap();
        assert!(!w.is_hovered());
        assert!(!w.is_focused());
        assert!(!tree.is_effectively_enabled(c));
        assert!(tree.widget(c).unwrap().is_enabled());
    }

    #[test]
    fn removal_clears_interaction() {
        let (mut tree, _root, a, _b, c, _d) = build_tree();
        tree.set_mouse_down(c, true);
        tree.remove_child(a, c).unwrap();
        assert!(!tree.widget(c).unwrap().is_mouse_down());
    }

    #[test]
    fn lifecycle_follows_attachment() {
        let mut tree = WidgetTree::new();
        tree.set_notifications(true);
        let root = tree.root();

        let group = tree.create(Widget::group()).unwrap();
        let leaf = tree.insert(group, Widget::label("x")).unwrap();
        assert!(tree.drain_lifecycle().is_empty());

        tree.add_child(root, group).unwrap();
        assert_eq!(
            tree.drain_lifecycle(),
            vec![
                LifecycleEvent::Attached { id: group },
                LifecycleEvent::Attached { id: leaf },
            ]
        );

        tree.destroy(group).unwrap();
        assert_eq!(
            tree.drain_lifecycle(),
            vec![
                LifecycleEvent::Detached { id: group },
                LifecycleEvent::Detached { id: leaf },
                LifecycleEvent::Destroyed { id: group },
                LifecycleEvent::Destroyed { id: leaf },
            ]
        );
    }

    #[test]
    fn notifications_are_opt_in() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        for _ in 0..1000 {
            let id = tree.insert(root, Widget::label("x")).unwrap();
            tree.set_property(id, "TextColor", crate::renderer::Color::RED).unwrap();
            tree.destroy(id).unwrap();
        }
        assert!(tree.drain_lifecycle().is_empty());
        assert!(tree.drain_renderer_changes().is_empty());

        tree.set_notifications(true);
        let id = tree.insert(root, Widget::label("x")).unwrap();
        assert_eq!(tree.drain_lifecycle(), vec![LifecycleEvent::Attached { id }]);
    }

    #[test]
    fn clear_keeps_only_the_root() {
        let (mut tree, root, a, b, c, d) = build_tree();
        tree.set_notifications(true);
        tree.drain_lifecycle();
        tree.clear();

        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
        assert!([a, b, c, d].iter().all(|&id| !tree.contains(id)));
        let events = tree.drain_lifecycle();
        assert!(events.contains(&LifecycleEvent::Detached { id: d }));
        assert!(events.contains(&LifecycleEvent::Destroyed { id: d }));

        let again = tree.insert(root, Widget::label("x")).unwrap();
        assert_eq!(tree.children(root), &[again]);
    }

    #[test]
    fn text_and_checked() {
        let (mut tree, _root, a, _b, c, _d) = build_tree();
        tree.set_text(c, "Save").unwrap();
        assert_eq!(tree.widget(c).unwrap().kind.text(), Some("Save"));
        assert!(tree.set_text(a, "x").is_err());

        let cb = tree.insert(a, Widget::check_box("remember")).unwrap();
        assert!(tree.set_checked(cb, true).unwrap());
        assert!(!tree.set_checked(cb, true).unwrap());
        assert!(tree.set_checked(c, true).is_err());
    }
}
