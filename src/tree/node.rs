//! Node types: WidgetId, Widget.

use std::collections::HashMap;

use slotmap::new_key_type;

use crate::geometry::Region;
use crate::layout::length::Layout2d;
use crate::renderer::{Renderer, RendererData, TextureRef};
use crate::texture::Texture;
use crate::widget::WidgetKind;

new_key_type! {
    /// Unique identifier for a widget. Copy, lightweight (u64).
    pub struct WidgetId;
}

/// A texture handle resolved for one renderer property.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedTexture {
    pub reference: TextureRef,
    pub texture: Texture,
}

/// Data associated with a single widget.
#[derive(Debug)]
pub struct Widget {
    /// Optional name used by [`WidgetTree::find`](super::WidgetTree::find).
    pub name: Option<String>,
    pub kind: WidgetKind,
    pub(crate) position: Layout2d,
    pub(crate) size: Layout2d,
    /// Share of the free space inside a box layout.
    pub(crate) ratio: f32,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) focusable: bool,

    /// Absolute bounds computed by the last layout pass.
    pub(crate) bounds: Region,

    pub(crate) hover: bool,
    pub(crate) mouse_down: bool,
    pub(crate) focused: bool,

    pub(crate) renderer: Renderer,
    /// Whether the renderer was chosen explicitly rather than by the theme.
    pub(crate) custom_renderer: bool,
    pub(crate) textures: HashMap<String, ResolvedTexture>,
}

impl Widget {
    /// Create a widget of the given kind with the default renderer.
    pub fn new(kind: WidgetKind) -> Self {
        let focusable = kind.can_focus();
        Self {
            name: None,
            kind,
            position: Layout2d::default(),
            size: Layout2d::default(),
            ratio: 1.0,
            visible: true,
            enabled: true,
            focusable,
            bounds: Region::EMPTY,
            hover: false,
            mouse_down: false,
            focused: false,
            renderer: Renderer::default(),
            custom_renderer: false,
            textures: HashMap::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(WidgetKind::Group)
    }

    pub fn panel() -> Self {
        Self::new(WidgetKind::Panel)
    }

    pub fn horizontal_layout() -> Self {
        Self::new(WidgetKind::HorizontalLayout)
    }

    pub fn vertical_layout() -> Self {
        Self::new(WidgetKind::VerticalLayout)
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button { text: text.into() })
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label { text: text.into() })
    }

    pub fn check_box(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::CheckBox { text: text.into(), checked: false })
    }

    /// A picture showing `texture`. The picture gets its own renderer.
    pub fn picture(texture: TextureRef) -> Self {
        Self::new(WidgetKind::Picture)
            .with_renderer(Renderer::new(RendererData::new().with("Texture", texture)))
    }

    /// Set the name (builder).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the position relative to the parent's inner area (builder).
    pub fn at(mut self, position: impl Into<Layout2d>) -> Self {
        self.position = position.into();
        self
    }

    /// Set the size (builder).
    pub fn sized(mut self, size: impl Into<Layout2d>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the box layout ratio (builder).
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    /// Use this renderer instead of the theme's (builder).
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self.custom_renderer = true;
        self
    }

    /// Set visibility (builder).
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set whether the widget receives input (builder).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set whether the widget takes keyboard focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    // -- read access ---------------------------------------------------------

    pub fn position(&self) -> Layout2d {
        self.position
    }

    pub fn size(&self) -> Layout2d {
        self.size
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Absolute bounds from the last layout pass.
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The bound renderer. Clone it to share it with other widgets.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The texture resolved for a renderer property, if prepared.
    pub fn texture(&self, property: &str) -> Option<&Texture> {
        self.textures.get(property).map(|r| &r.texture)
    }

    pub(crate) fn clear_interaction(&mut self) {
        self.hover = false;
        self.mouse_down = false;
        self.focused = false;
    }
}
