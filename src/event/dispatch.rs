//! Input dispatch: hover, press, click, focus and key bindings.
//!
//! [`EventDispatcher`] turns raw [`InputEvent`]s into widget state changes and
//! [`WidgetEvent`]s. Mouse input goes to the widget the [`SpatialMap`] reports
//! at the pointer. Key input goes to the focused widget and bubbles up through
//! its ancestors until one of them handles it.

use tracing::trace;

use super::binding::{BindingAction, KeyBindingRegistry};
use super::input::{InputEvent, KeyEvent, MouseAction, MouseBtn, MouseEvent};
use super::signal::{Signals, WidgetEvent};
use crate::error::{Error, Result};
use crate::focus::FocusChain;
use crate::layout::spatial::SpatialMap;
use crate::tree::node::WidgetId;
use crate::tree::tree::WidgetTree;
use crate::widget::WidgetKind;

/// Interaction state between input events.
#[derive(Debug)]
pub struct EventDispatcher {
    bindings: KeyBindingRegistry,
    chain: FocusChain,
    hovered: Option<WidgetId>,
    pressed: Option<WidgetId>,
    focused: Option<WidgetId>,
}

impl EventDispatcher {
    /// A dispatcher with the default key bindings.
    pub fn new() -> Self {
        Self::with_bindings(KeyBindingRegistry::with_defaults())
    }

    pub fn with_bindings(bindings: KeyBindingRegistry) -> Self {
        Self {
            bindings,
            chain: FocusChain::new(),
            hovered: None,
            pressed: None,
            focused: None,
        }
    }

    pub fn bindings(&self) -> &KeyBindingRegistry {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Handle one input event. Returns whether a widget consumed it.
    ///
    /// `hits` must come from a layout pass over the current tree.
    pub fn dispatch(
        &mut self,
        tree: &mut WidgetTree,
        hits: &SpatialMap,
        event: &InputEvent,
        signals: &mut Signals,
    ) -> bool {
        self.sync(tree);
        match event {
            InputEvent::Mouse(mouse) => self.on_mouse(tree, hits, mouse, signals),
            InputEvent::Key(key) => self.on_key(tree, key, signals),
            InputEvent::FocusLost => {
                self.set_hovered(tree, None, signals);
                if let Some(p) = self.pressed.take() {
                    tree.set_mouse_down(p, false);
                }
                false
            }
            InputEvent::Resize(_) | InputEvent::FocusGained | InputEvent::Paste(_) => false,
        }
    }

    /// Give keyboard focus to `id`.
    ///
    /// Returns `false` if the widget cannot take focus (not focusable, hidden,
    /// disabled or detached).
    pub fn focus(&mut self, tree: &mut WidgetTree, id: WidgetId, signals: &mut Signals) -> Result<bool> {
        if !tree.contains(id) {
            return Err(Error::WidgetNotFound(id));
        }
        self.sync(tree);
        if !FocusChain::can_take_focus(tree, id) {
            return Ok(false);
        }
        self.set_focused(tree, Some(id), signals);
        Ok(true)
    }

    /// Drop keyboard focus, if any widget has it.
    pub fn unfocus(&mut self, tree: &mut WidgetTree, signals: &mut Signals) {
        self.sync(tree);
        self.set_focused(tree, None, signals);
    }

    /// Forget a widget that was detached or destroyed.
    pub fn forget(&mut self, id: WidgetId) {
        for slot in [&mut self.hovered, &mut self.pressed, &mut self.focused] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }

    /// `start` followed by its ancestors up to the root.
    ///
    /// Empty if `start` is not in the tree.
    pub fn bubble_path(tree: &WidgetTree, start: WidgetId) -> Vec<WidgetId> {
        if !tree.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(tree.ancestors(start));
        path
    }

    // -- mouse ---------------------------------------------------------------

    fn on_mouse(
        &mut self,
        tree: &mut WidgetTree,
        hits: &SpatialMap,
        mouse: &MouseEvent,
        signals: &mut Signals,
    ) -> bool {
        let target = hits.widget_at(mouse.position);
        match mouse.kind {
            MouseAction::Moved | MouseAction::Drag(_) => {
                self.set_hovered(tree, target, signals);
                target.is_some()
            }
            MouseAction::Down(MouseBtn::Left) => {
                self.set_hovered(tree, target, signals);
                if let Some(p) = self.pressed.take() {
                    tree.set_mouse_down(p, false);
                }
                let focus = target.and_then(|id| {
                    Self::bubble_path(tree, id)
                        .into_iter()
                        .find(|&w| FocusChain::can_take_focus(tree, w))
                });
                self.set_focused(tree, focus, signals);
                if let Some(id) = target {
                    self.pressed = Some(id);
                    tree.set_mouse_down(id, true);
                }
                target.is_some()
            }
            MouseAction::Up(MouseBtn::Left) => {
                self.set_hovered(tree, target, signals);
                if let Some(p) = self.pressed.take() {
                    tree.set_mouse_down(p, false);
                    // A click needs press and release on the same widget.
                    if target == Some(p) {
                        self.activate(tree, p, signals);
                        return true;
                    }
                }
                target.is_some()
            }
            _ => target.is_some(),
        }
    }

    fn set_hovered(&mut self, tree: &mut WidgetTree, target: Option<WidgetId>, signals: &mut Signals) {
        if self.hovered == target {
            return;
        }
        if let Some(old) = self.hovered.take() {
            tree.set_hover(old, false);
            signals.emit(WidgetEvent::MouseLeft { id: old });
        }
        if let Some(id) = target {
            tree.set_hover(id, true);
            signals.emit(WidgetEvent::MouseEntered { id });
            self.hovered = Some(id);
        }
    }

    // -- keyboard ------------------------------------------------------------

    fn on_key(&mut self, tree: &mut WidgetTree, key: &KeyEvent, signals: &mut Signals) -> bool {
        let Some(action) = self.bindings.resolve(key).cloned() else {
            return false;
        };
        trace!(?key, ?action, "key binding");
        match action {
            BindingAction::FocusNext | BindingAction::FocusPrevious => {
                self.chain.rebuild(tree);
                match self.focused {
                    Some(id) if self.chain.set_current(id) => {}
                    _ => self.chain.clear(),
                }
                let next = if action == BindingAction::FocusNext {
                    self.chain.next()
                } else {
                    self.chain.previous()
                };
                self.set_focused(tree, next, signals);
                next.is_some()
            }
            BindingAction::Activate => {
                let Some(focused) = self.focused else {
                    return false;
                };
                for id in Self::bubble_path(tree, focused) {
                    if self.activate(tree, id, signals) {
                        return true;
                    }
                }
                false
            }
            BindingAction::Unfocus => {
                let had_focus = self.focused.is_some();
                self.set_focused(tree, None, signals);
                had_focus
            }
            BindingAction::Custom(name) => {
                let id = self.focused.unwrap_or_else(|| tree.root());
                signals.emit(WidgetEvent::Action { id, name });
                true
            }
        }
    }

    // -- shared --------------------------------------------------------------

    /// Press a button or toggle a check box. Returns `false` for other kinds.
    fn activate(&mut self, tree: &mut WidgetTree, id: WidgetId, signals: &mut Signals) -> bool {
        let Some(widget) = tree.get(id) else {
            return false;
        };
        match &widget.kind {
            WidgetKind::Button { .. } => {
                signals.emit(WidgetEvent::Pressed { id });
                true
            }
            WidgetKind::CheckBox { checked, .. } => {
                let checked = !*checked;
                if let Ok(true) = tree.set_checked(id, checked) {
                    signals.emit(if checked {
                        WidgetEvent::Checked { id }
                    } else {
                        WidgetEvent::Unchecked { id }
                    });
                }
                true
            }
            _ => false,
        }
    }

    fn set_focused(&mut self, tree: &mut WidgetTree, target: Option<WidgetId>, signals: &mut Signals) {
        if self.focused == target {
            return;
        }
        if let Some(old) = self.focused.take() {
            tree.set_focused(old, false);
            signals.emit(WidgetEvent::Unfocused { id: old });
        }
        if let Some(id) = target {
            tree.set_focused(id, true);
            signals.emit(WidgetEvent::Focused { id });
            self.focused = Some(id);
        }
    }

    /// Drop references whose widget flag was cleared by the tree (hidden,
    /// disabled, detached or destroyed).
    fn sync(&mut self, tree: &WidgetTree) {
        if self.hovered.is_some_and(|id| !tree.get(id).is_some_and(|w| w.is_hovered())) {
            self.hovered = None;
        }
        if self.pressed.is_some_and(|id| !tree.get(id).is_some_and(|w| w.is_mouse_down())) {
            self.pressed = None;
        }
        if self.focused.is_some_and(|id| !tree.get(id).is_some_and(|w| w.is_focused())) {
            self.focused = None;
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::{Key, Modifiers};
    use crate::geometry::Size;
    use crate::layout::engine::LayoutEngine;
    use crate::tree::node::Widget;

    struct Fixture {
        tree: WidgetTree,
        hits: SpatialMap,
        dispatcher: EventDispatcher,
        signals: Signals,
        button: WidgetId,
        check: WidgetId,
        label: WidgetId,
    }

    impl Fixture {
        /// ```text
        /// root
        /// ├── button  (0,0 100x20)
        /// ├── panel   (0,50 200x100)
        /// │   └── check (10,10 50x20 inside the panel)
        /// └── label   (300,0 50x20)
        /// ```
        fn new() -> Self {
            let mut tree = WidgetTree::new();
            let root = tree.root();
            let button = tree
                .insert(root, Widget::button("ok").sized((100.0, 20.0)))
                .unwrap();
            let panel = tree
                .insert(root, Widget::panel().at((0.0, 50.0)).sized((200.0, 100.0)))
                .unwrap();
            let check = tree
                .insert(panel, Widget::check_box("opt").at((10.0, 10.0)).sized((50.0, 20.0)))
                .unwrap();
            let label = tree
                .insert(root, Widget::label("text").at((300.0, 0.0)).sized((50.0, 20.0)))
                .unwrap();
            let mut fixture = Self {
                tree,
                hits: SpatialMap::new(),
                dispatcher: EventDispatcher::new(),
                signals: Signals::new(),
                button,
                check,
                label,
            };
            fixture.relayout();
            fixture
        }

        fn relayout(&mut self) {
            LayoutEngine::new()
                .compute(&mut self.tree, Size::new(400.0, 300.0), &mut self.hits)
                .unwrap();
        }

        fn send(&mut self, event: InputEvent) -> bool {
            self.dispatcher
                .dispatch(&mut self.tree, &self.hits, &event, &mut self.signals)
        }

        fn click(&mut self, x: f32, y: f32) {
            self.send(InputEvent::mouse_down(x, y));
            self.send(InputEvent::mouse_up(x, y));
        }

        fn events(&mut self) -> Vec<WidgetEvent> {
            self.signals.drain()
        }
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut f = Fixture::new();
        assert!(f.send(InputEvent::mouse_move(5.0, 5.0)));
        assert!(f.tree.widget(f.button).unwrap().is_hovered());
        assert!(!f.send(InputEvent::mouse_move(390.0, 290.0)));
        assert!(!f.tree.widget(f.button).unwrap().is_hovered());
        assert_eq!(f.dispatcher.hovered(), None);
        let b = f.button;
        assert_eq!(
            f.events(),
            vec![WidgetEvent::MouseEntered { id: b }, WidgetEvent::MouseLeft { id: b }]
        );
    }

    #[test]
    fn click_presses_button_and_focuses_it() {
        let mut f = Fixture::new();
        f.send(InputEvent::mouse_down(5.0, 5.0));
        assert!(f.tree.widget(f.button).unwrap().is_mouse_down());
        f.send(InputEvent::mouse_up(5.0, 5.0));
        assert!(!f.tree.widget(f.button).unwrap().is_mouse_down());
        assert!(f.tree.widget(f.button).unwrap().is_focused());
        let b = f.button;
        assert_eq!(
            f.events(),
            vec![
                WidgetEvent::MouseEntered { id: b },
                WidgetEvent::Focused { id: b },
                WidgetEvent::Pressed { id: b },
            ]
        );
    }

    #[test]
    fn release_elsewhere_is_not_a_click() {
        let mut f = Fixture::new();
        f.send(InputEvent::mouse_down(5.0, 5.0));
        f.send(InputEvent::mouse_up(390.0, 290.0));
        assert!(!f.events().iter().any(|e| matches!(e, WidgetEvent::Pressed { .. })));
        assert_eq!(f.dispatcher.pressed(), None);
    }

    #[test]
    fn click_toggles_check_box() {
        let mut f = Fixture::new();
        f.click(20.0, 65.0);
        assert_eq!(f.tree.widget(f.check).unwrap().kind.checked(), Some(true));
        f.click(20.0, 65.0);
        assert_eq!(f.tree.widget(f.check).unwrap().kind.checked(), Some(false));
        let c = f.check;
        let toggles: Vec<_> = f
            .events()
            .into_iter()
            .filter(|e| matches!(e, WidgetEvent::Checked { .. } | WidgetEvent::Unchecked { .. }))
            .collect();
        assert_eq!(toggles, vec![WidgetEvent::Checked { id: c }, WidgetEvent::Unchecked { id: c }]);
    }

    #[test]
    fn clicking_unfocusable_widget_drops_focus() {
        let mut f = Fixture::new();
        f.click(5.0, 5.0);
        f.events();
        f.click(310.0, 5.0);
        assert_eq!(f.dispatcher.focused(), None);
        let b = f.button;
        let l = f.label;
        assert_eq!(
            f.events(),
            vec![
                WidgetEvent::MouseLeft { id: b },
                WidgetEvent::MouseEntered { id: l },
                WidgetEvent::Unfocused { id: b },
            ]
        );
    }

    #[test]
    fn disabled_widget_receives_nothing() {
        let mut f = Fixture::new();
        f.tree.set_enabled(f.button, false).unwrap();
        f.relayout();
        assert!(!f.send(InputEvent::mouse_down(5.0, 5.0)));
        f.send(InputEvent::mouse_up(5.0, 5.0));
        assert!(f.events().is_empty());
    }

    #[test]
    fn tab_cycles_focus() {
        let mut f = Fixture::new();
        assert!(f.send(InputEvent::key(Key::Tab)));
        assert_eq!(f.dispatcher.focused(), Some(f.button));
        f.send(InputEvent::key(Key::Tab));
        assert_eq!(f.dispatcher.focused(), Some(f.check));
        f.send(InputEvent::key(Key::Tab));
        assert_eq!(f.dispatcher.focused(), Some(f.button));
        f.send(InputEvent::Key(KeyEvent::new(Key::BackTab, Modifiers::SHIFT)));
        assert_eq!(f.dispatcher.focused(), Some(f.check));
        assert!(f.tree.widget(f.check).unwrap().is_focused());
        assert!(!f.tree.widget(f.button).unwrap().is_focused());
    }

    #[test]
    fn space_activates_focused_widget() {
        let mut f = Fixture::new();
        assert!(!f.send(InputEvent::key(Key::Char(' '))));
        let mut signals = Signals::new();
        assert!(f.dispatcher.focus(&mut f.tree, f.check, &mut signals).unwrap());
        assert!(f.send(InputEvent::key(Key::Char(' '))));
        assert_eq!(f.tree.widget(f.check).unwrap().kind.checked(), Some(true));
        assert!(f.send(InputEvent::key(Key::Enter)));
        assert_eq!(f.tree.widget(f.check).unwrap().kind.checked(), Some(false));
    }

    #[test]
    fn escape_unfocuses() {
        let mut f = Fixture::new();
        f.send(InputEvent::key(Key::Tab));
        assert!(f.send(InputEvent::key(Key::Escape)));
        assert_eq!(f.dispatcher.focused(), None);
        assert!(!f.send(InputEvent::key(Key::Escape)));
    }

    #[test]
    fn custom_binding_reports_action() {
        let mut f = Fixture::new();
        f.dispatcher
            .bindings_mut()
            .bind(Key::Char('s'), Modifiers::CTRL, BindingAction::Custom("save".into()));
        f.send(InputEvent::key(Key::Tab));
        f.events();
        assert!(f.send(InputEvent::Key(KeyEvent::new(Key::Char('s'), Modifiers::CTRL))));
        let b = f.button;
        assert_eq!(f.events(), vec![WidgetEvent::Action { id: b, name: "save".into() }]);
    }

    #[test]
    fn focus_rejects_unfocusable_and_missing() {
        let mut f = Fixture::new();
        let mut signals = Signals::new();
        assert!(!f.dispatcher.focus(&mut f.tree, f.label, &mut signals).unwrap());
        let gone = f.label;
        f.tree.destroy(gone).unwrap();
        assert!(matches!(
            f.dispatcher.focus(&mut f.tree, gone, &mut signals),
            Err(Error::WidgetNotFound(_))
        ));
    }

    #[test]
    fn hiding_focused_widget_drops_reference() {
        let mut f = Fixture::new();
        f.send(InputEvent::key(Key::Tab));
        f.tree.set_visible(f.button, false).unwrap();
        f.relayout();
        f.send(InputEvent::key(Key::Tab));
        assert_eq!(f.dispatcher.focused(), Some(f.check));
    }

    #[test]
    fn focus_lost_clears_hover_and_press() {
        let mut f = Fixture::new();
        f.send(InputEvent::mouse_down(5.0, 5.0));
        f.send(InputEvent::FocusLost);
        let button = f.tree.widget(f.button).unwrap();
        assert!(!button.is_hovered());
        assert!(!button.is_mouse_down());
        assert_eq!(f.dispatcher.pressed(), None);
    }

    #[test]
    fn forget_drops_references() {
        let mut f = Fixture::new();
        f.click(5.0, 5.0);
        f.dispatcher.forget(f.button);
        assert_eq!(f.dispatcher.hovered(), None);
        assert_eq!(f.dispatcher.focused(), None);
    }

    #[test]
    fn bubble_path() {
        let f = Fixture::new();
        let panel = f.tree.parent(f.check).unwrap();
        assert_eq!(
            EventDispatcher::bubble_path(&f.tree, f.check),
            vec![f.check, panel, f.tree.root()]
        );
    }
}
