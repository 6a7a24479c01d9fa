//! Renderer binding: swap shared renderers, copy-on-write property edits,
//! shared edits that reach every holder.

use tracing::{debug, trace};

use crate::error::Result;
use crate::renderer::{Renderer, TextureRef, Value};
use crate::texture::Texture;

use super::node::{ResolvedTexture, WidgetId};
use super::tree::WidgetTree;

impl WidgetTree {
    /// The widget's renderer handle. Cloning it shares the data.
    pub fn renderer(&self, id: WidgetId) -> Result<Renderer> {
        Ok(self.widget(id)?.renderer.clone())
    }

    /// Replace the widget's renderer.
    ///
    /// Returns the names of the properties whose value differs between the
    /// old and the new renderer, in name order; each one is also queued as a
    /// [`RendererChange`](super::tree::RendererChange).
    pub fn set_renderer(&mut self, id: WidgetId, renderer: Renderer) -> Result<Vec<String>> {
        let changed = self.bind_renderer(id, renderer)?;
        self.widget_mut(id)?.custom_renderer = true;
        Ok(changed)
    }

    /// Bind a theme renderer, keeping the widget themed.
    pub(crate) fn apply_theme_renderer(&mut self, id: WidgetId, renderer: Renderer) -> Result<Vec<String>> {
        self.bind_renderer(id, renderer)
    }

    fn bind_renderer(&mut self, id: WidgetId, renderer: Renderer) -> Result<Vec<String>> {
        let widget = self.widget_mut(id)?;
        if widget.renderer.ptr_eq(&renderer) {
            return Ok(Vec::new());
        }
        let changed = widget.renderer.data().diff(&renderer.data());
        widget.renderer = renderer;
        widget.textures.retain(|property, _| !changed.contains(property));
        debug!(?id, changed = changed.len(), "renderer replaced");

        if !changed.is_empty() {
            self.layout_dirty = true;
        }
        for property in &changed {
            self.push_renderer_change(id, property);
        }
        Ok(changed)
    }

    /// Set a property on this widget only.
    ///
    /// If the renderer is shared with other widgets or a theme, the widget
    /// first gets a private copy. Fails with
    /// [`Error::UnknownProperty`](crate::Error::UnknownProperty) or
    /// [`Error::PropertyType`](crate::Error::PropertyType) when the widget
    /// kind does not accept the value. Returns whether the value changed.
    pub fn set_property(
        &mut self,
        id: WidgetId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<bool> {
        let widget = self.widget_mut(id)?;
        let value = widget.kind.validate_property(name, value.into())?;
        if widget.renderer.get(name).as_ref() == Some(&value) {
            return Ok(false);
        }
        if widget.renderer.is_shared() {
            trace!(?id, property = name, "copying shared renderer before write");
            widget.renderer = widget.renderer.detached_copy();
        }
        widget.renderer.set_shared(name, value);
        widget.textures.remove(name);

        self.push_renderer_change(id, name);
        self.layout_dirty = true;
        Ok(true)
    }

    /// Set a property on the widget's shared renderer.
    ///
    /// Every widget holding the same renderer sees the change and gets a
    /// [`RendererChange`](super::tree::RendererChange). Returns the number of widgets notified.
    pub fn set_shared_property(
        &mut self,
        id: WidgetId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<usize> {
        let widget = self.widget(id)?;
        let value = widget.kind.validate_property(name, value.into())?;
        let renderer = widget.renderer.clone();
        if !renderer.set_shared(name, value) {
            return Ok(0);
        }

        let holders: Vec<WidgetId> = self
            .nodes
            .iter()
            .filter(|(_, w)| w.renderer.ptr_eq(&renderer))
            .map(|(holder, _)| holder)
            .collect();
        for &holder in &holders {
            if let Some(w) = self.nodes.get_mut(holder) {
                w.textures.remove(name);
            }
            self.push_renderer_change(holder, name);
        }
        debug!(?id, property = name, holders = holders.len(), "shared renderer property set");
        self.layout_dirty = true;
        Ok(holders.len())
    }

    /// Texture properties of attached widgets that have no resolved handle
    /// for their current value. Stale handles are dropped on the way.
    pub(crate) fn pending_textures(&mut self) -> Vec<(WidgetId, String, TextureRef)> {
        let mut pending = Vec::new();
        for id in self.walk_depth_first(self.root()) {
            let Some(widget) = self.nodes.get_mut(id) else { continue };
            let wanted: Vec<(String, TextureRef)> = widget
                .renderer
                .data()
                .textures()
                .map(|(name, reference)| (name.to_owned(), reference.clone()))
                .collect();
            widget
                .textures
                .retain(|name, resolved| wanted.iter().any(|(n, r)| n == name && *r == resolved.reference));
            for (name, reference) in wanted {
                if !widget.textures.contains_key(&name) {
                    pending.push((id, name, reference));
                }
            }
        }
        pending
    }

    /// Store a texture resolved for `property`.
    pub(crate) fn store_texture(
        &mut self,
        id: WidgetId,
        property: String,
        reference: TextureRef,
        texture: Texture,
    ) -> Result<()> {
        self.widget_mut(id)?
            .textures
            .insert(property, ResolvedTexture { reference, texture });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::renderer::{Color, RendererData};
    use crate::tree::node::Widget;
    use pretty_assertions::assert_eq;

    fn tree_with_buttons(n: usize) -> (WidgetTree, Vec<WidgetId>, Renderer) {
        let mut tree = WidgetTree::new();
        tree.set_notifications(true);
        let root = tree.root();
        let shared = Renderer::default();
        let ids = (0..n)
            .map(|i| {
                tree.insert(root, Widget::button(i.to_string()).with_renderer(shared.clone()))
                    .unwrap()
            })
            .collect();
        (tree, ids, shared)
    }

    #[test]
    fn set_renderer_reports_differing_properties() {
        let (mut tree, ids, _) = tree_with_buttons(1);
        let replacement = Renderer::new(
            RendererData::defaults()
                .with("BackgroundColor", Color::RED)
                .with("TextColorHover", Color::BLUE),
        );
        let changed = tree.set_renderer(ids[0], replacement.clone()).unwrap();
        assert_eq!(changed, vec!["BackgroundColor", "TextColorHover"]);
        assert!(tree.renderer(ids[0]).unwrap().ptr_eq(&replacement));

        let queued: Vec<String> = tree
            .drain_renderer_changes()
            .into_iter()
            .map(|c| c.property)
            .collect();
        assert_eq!(queued, changed);
    }

    #[test]
    fn set_same_renderer_is_noop() {
        let (mut tree, ids, shared) = tree_with_buttons(1);
        assert!(tree.set_renderer(ids[0], shared).unwrap().is_empty());
        assert!(tree.drain_renderer_changes().is_empty());
    }

    #[test]
    fn copy_on_write_does_not_leak() {
        let (mut tree, ids, shared) = tree_with_buttons(2);
        assert!(tree.set_property(ids[0], "BackgroundColor", Color::RED).unwrap());

        let first = tree.renderer(ids[0]).unwrap();
        let second = tree.renderer(ids[1]).unwrap();
        assert!(!first.ptr_eq(&shared));
        assert!(second.ptr_eq(&shared));
        assert_eq!(first.data().color("BackgroundColor"), Some(Color::RED));
        assert_eq!(second.data().color("BackgroundColor"), Some(Color::rgb(245, 245, 245)));
    }

    #[test]
    fn unchanged_value_does_not_copy() {
        let (mut tree, ids, shared) = tree_with_buttons(2);
        assert!(!tree.set_property(ids[0], "Opacity", 1.0).unwrap());
        assert!(tree.renderer(ids[0]).unwrap().ptr_eq(&shared));
    }

    #[test]
    fn shared_property_reaches_every_holder() {
        let (mut tree, ids, shared) = tree_with_buttons(3);
        let _ = tree.drain_renderer_changes();
        let notified = tree.set_shared_property(ids[1], "TextColor", Color::BLUE).unwrap();
        assert_eq!(notified, 3);
        assert_eq!(shared.data().color("TextColor"), Some(Color::BLUE));

        let mut changed: Vec<WidgetId> = tree.drain_renderer_changes().into_iter().map(|c| c.id).collect();
        changed.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(changed, expected);
    }

    #[test]
    fn property_validation() {
        let (mut tree, ids, _) = tree_with_buttons(1);
        assert!(matches!(
            tree.set_property(ids[0], "CheckColor", Color::RED),
            Err(Error::UnknownProperty { .. })
        ));
        assert!(matches!(
            tree.set_shared_property(ids[0], "TextColor", true),
            Err(Error::PropertyType { .. })
        ));
    }

    #[test]
    fn opacity_clamped_on_write() {
        let (mut tree, ids, _) = tree_with_buttons(1);
        tree.set_property(ids[0], "Opacity", 3.0).unwrap();
        assert_eq!(tree.renderer(ids[0]).unwrap().data().number("Opacity"), Some(1.0));
    }

    #[test]
    fn pending_textures_lists_unresolved_properties() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let pic = tree
            .insert(root, Widget::picture(TextureRef::new("logo.png")))
            .unwrap();
        let detached = tree.create(Widget::picture(TextureRef::new("other.png"))).unwrap();

        let pending = tree.pending_textures();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, pic);
        assert_eq!(pending[0].1, "Texture");
        assert_eq!(pending[0].2.id, "logo.png");
        assert!(tree.contains(detached));
    }
}
