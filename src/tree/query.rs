//! Tree queries: by name, by kind, by predicate.

use std::collections::VecDeque;

use super::node::{Widget, WidgetId};
use super::tree::WidgetTree;

impl WidgetTree {
    /// Find a widget by name anywhere below the root, nearest first.
    ///
    /// The search is breadth-first, so a direct child wins over a deeper
    /// widget with the same name.
    pub fn find(&self, name: &str) -> Option<WidgetId> {
        self.find_from(self.root(), name)
    }

    /// Find a widget by name in the subtree of `start` (excluding `start`).
    pub fn find_from(&self, start: WidgetId, name: &str) -> Option<WidgetId> {
        let mut queue: VecDeque<WidgetId> = self.children(start).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if self.get(current).and_then(|w| w.name.as_deref()) == Some(name) {
                return Some(current);
            }
            queue.extend(self.children(current).iter().copied());
        }
        None
    }

    /// Attached widgets of the given kind, in paint order.
    pub fn find_by_kind(&self, type_name: &str) -> Vec<WidgetId> {
        self.query_all(|w| w.kind.type_name() == type_name)
    }

    /// Attached widgets matching an arbitrary predicate, in paint order.
    pub fn query_all(&self, predicate: impl Fn(&Widget) -> bool) -> Vec<WidgetId> {
        self.walk_depth_first(self.root())
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::node::Widget;
    use crate::tree::tree::WidgetTree;

    /// ```text
    ///        root
    ///       /    \
    ///   sidebar   main
    ///    /  \        \
    ///  save cancel   save (nested deeper)
    /// ```
    fn build_query_tree() -> WidgetTree {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let sidebar = tree.insert(root, Widget::panel().with_name("sidebar")).unwrap();
        let main = tree.insert(root, Widget::group().with_name("main")).unwrap();
        tree.insert(sidebar, Widget::button("Save").with_name("save")).unwrap();
        tree.insert(sidebar, Widget::button("Cancel").with_name("cancel")).unwrap();
        let inner = tree.insert(main, Widget::group()).unwrap();
        tree.insert(inner, Widget::label("deep").with_name("save")).unwrap();
        tree
    }

    #[test]
    fn find_by_name() {
        let tree = build_query_tree();
        let id = tree.find("sidebar").unwrap();
        assert_eq!(tree.get(id).unwrap().kind.type_name(), "Panel");
        assert!(tree.find("nonexistent").is_none());
    }

    #[test]
    fn find_prefers_nearest() {
        let tree = build_query_tree();
        let id = tree.find("save").unwrap();
        assert_eq!(tree.get(id).unwrap().kind.type_name(), "Button");
    }

    #[test]
    fn find_from_searches_subtree() {
        let tree = build_query_tree();
        let main = tree.find("main").unwrap();
        let id = tree.find_from(main, "save").unwrap();
        assert_eq!(tree.get(id).unwrap().kind.type_name(), "Label");
        assert!(tree.find_from(main, "cancel").is_none());
    }

    #[test]
    fn find_ignores_detached_widgets() {
        let mut tree = build_query_tree();
        tree.create(Widget::label("x").with_name("floating")).unwrap();
        assert!(tree.find("floating").is_none());
    }

    #[test]
    fn find_by_kind_in_paint_order() {
        let tree = build_query_tree();
        let buttons = tree.find_by_kind("Button");
        assert_eq!(buttons.len(), 2);
        assert_eq!(tree.get(buttons[0]).unwrap().name.as_deref(), Some("save"));
        assert_eq!(tree.find_by_kind("Group").len(), 3);
    }

    #[test]
    fn query_all_focusable() {
        let tree = build_query_tree();
        assert_eq!(tree.query_all(|w| w.is_focusable()).len(), 2);
    }
}
