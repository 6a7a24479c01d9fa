//! Paint pass.
//!
//! [`Painter`] walks the tree in paint order (parents before children,
//! siblings first to last) and issues draw primitives for every visible
//! widget. Colors and textures come from the widget's renderer, with state
//! variants (`Hover`, `Down`, `Disabled`, `Focused`) falling back to the base
//! property.

use crate::error::{Error, Result};
use crate::geometry::{Offset, Region, Spacing};
use crate::layout::engine::content_area;
use crate::renderer::{Color, RendererData};
use crate::texture::Texture;
use crate::tree::node::{Widget, WidgetId};
use crate::tree::tree::WidgetTree;
use crate::widget::WidgetKind;

use super::target::RenderTarget;

/// Text size used when neither the renderer nor the painter set one.
pub const DEFAULT_TEXT_SIZE: f32 = 13.0;

// ---------------------------------------------------------------------------
// Interaction state
// ---------------------------------------------------------------------------

/// Visual state of a widget, in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Disabled,
    Down,
    Hover,
    Focused,
    Normal,
}

impl VisualState {
    fn of(widget: &Widget, enabled: bool) -> Self {
        if !enabled {
            VisualState::Disabled
        } else if widget.is_mouse_down() && widget.is_hovered() {
            VisualState::Down
        } else if widget.is_hovered() {
            VisualState::Hover
        } else if widget.is_focused() {
            VisualState::Focused
        } else {
            VisualState::Normal
        }
    }

    /// Property suffixes to try, most specific first. The bare name is the
    /// final fallback.
    fn suffixes(self) -> &'static [&'static str] {
        match self {
            VisualState::Disabled => &["Disabled", ""],
            VisualState::Down => &["Down", "Hover", ""],
            VisualState::Hover => &["Hover", ""],
            VisualState::Focused => &["Focused", ""],
            VisualState::Normal => &[""],
        }
    }
}

/// Property lookups for one widget in one state.
struct Style<'a> {
    widget: &'a Widget,
    data: &'a RendererData,
    state: VisualState,
    opacity: f32,
}

impl Style<'_> {
    fn color(&self, base: &str) -> Option<Color> {
        self.state
            .suffixes()
            .iter()
            .find_map(|suffix| self.data.color(&format!("{base}{suffix}")))
            .map(|c| c.with_opacity(self.opacity))
    }

    fn borders(&self) -> Spacing {
        if self.widget.kind.property_type("Borders").is_some() {
            self.data.spacing("Borders").unwrap_or(Spacing::ZERO)
        } else {
            Spacing::ZERO
        }
    }

    /// The resolved texture for the first state variant of `base` that the
    /// renderer sets.
    ///
    /// Fails with `TextureNotReady` if the property is set but no matching
    /// texture has been prepared.
    fn texture(&self, base: &str) -> Result<Option<&Texture>> {
        for suffix in self.state.suffixes() {
            let name = format!("{base}{suffix}");
            let Some(reference) = self.data.texture(&name) else {
                continue;
            };
            return match self.widget.textures.get(&name) {
                Some(resolved) if resolved.reference == *reference => Ok(Some(&resolved.texture)),
                _ => Err(Error::TextureNotReady(format!(
                    "{} property {name} ({})",
                    self.widget.kind.type_name(),
                    reference.id
                ))),
            };
        }
        Ok(None)
    }

    fn text_size(&self, fallback: f32) -> f32 {
        self.data.number("TextSize").filter(|s| *s > 0.0).unwrap_or(fallback)
    }
}

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

/// Draws a laid-out tree onto a [`RenderTarget`].
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    text_size: f32,
}

impl Painter {
    pub fn new() -> Self {
        Self { text_size: DEFAULT_TEXT_SIZE }
    }

    /// Text size for widgets whose renderer has no `TextSize`.
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }

    /// Paint every visible widget attached to the root.
    ///
    /// Bounds are taken from the last layout pass. Every texture the frame
    /// needs is checked before the first draw call, so a
    /// [`Error::TextureNotReady`] leaves `target` untouched.
    pub fn paint(&self, tree: &WidgetTree, target: &mut dyn RenderTarget) -> Result<()> {
        check_textures(tree, tree.root(), true)?;
        self.paint_widget(tree, tree.root(), 1.0, true, target)
    }

    fn paint_widget(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        parent_opacity: f32,
        parent_enabled: bool,
        target: &mut dyn RenderTarget,
    ) -> Result<()> {
        let widget = tree.widget(id)?;
        if !widget.is_visible() {
            return Ok(());
        }
        let enabled = parent_enabled && widget.is_enabled();
        let data = widget.renderer().data();
        let own_opacity = if enabled {
            data.number("Opacity")
        } else {
            data.number("OpacityDisabled").or_else(|| data.number("Opacity"))
        };
        let style = Style {
            widget,
            data: &data,
            state: VisualState::of(widget, enabled),
            opacity: parent_opacity * own_opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        };

        self.draw_self(&style, target)?;

        let children = tree.children(id);
        if !children.is_empty() {
            target.push_clip(content_area(widget));
            for &child in children {
                if let Err(err) = self.paint_widget(tree, child, style.opacity, enabled, target) {
                    target.pop_clip();
                    return Err(err);
                }
            }
            target.pop_clip();
        }
        Ok(())
    }

    fn draw_self(&self, style: &Style<'_>, target: &mut dyn RenderTarget) -> Result<()> {
        let bounds = style.widget.bounds();
        match &style.widget.kind {
            WidgetKind::Group | WidgetKind::HorizontalLayout | WidgetKind::VerticalLayout => {}
            WidgetKind::Panel => {
                match style.texture("TextureBackground")? {
                    Some(texture) => target.draw_texture(bounds, texture, style.opacity),
                    None => fill(target, bounds, style.color("BackgroundColor")),
                }
                draw_borders(target, bounds, style);
            }
            WidgetKind::Button { text } => {
                match style.texture("Texture")? {
                    Some(texture) => target.draw_texture(bounds, texture, style.opacity),
                    None => {
                        fill(target, bounds, style.color("BackgroundColor"));
                        draw_borders(target, bounds, style);
                    }
                }
                let size = style.text_size(self.text_size);
                let width = target.text_width(text, size);
                let center = bounds.center();
                let position = Offset::new(center.x - width / 2.0, center.y - size / 2.0);
                draw_text(target, position, text, size, style.color("TextColor"));
            }
            WidgetKind::Label { text } => {
                match style.texture("TextureBackground")? {
                    Some(texture) => target.draw_texture(bounds, texture, style.opacity),
                    None => fill(target, bounds, style.color("BackgroundColor")),
                }
                draw_borders(target, bounds, style);
                let inner = content_area(style.widget);
                let size = style.text_size(self.text_size);
                draw_text(target, Offset::new(inner.x, inner.y), text, size, style.color("TextColor"));
            }
            WidgetKind::Picture => {
                if let Some(texture) = style.texture("Texture")? {
                    target.draw_texture(bounds, texture, style.opacity);
                }
            }
            WidgetKind::CheckBox { text, checked } => {
                // The box is a square on the left; the text follows it.
                let side = bounds.height.min(bounds.width);
                let check_box = Region::new(bounds.x, bounds.y, side, side);
                match style.texture(check_box_texture(*checked))? {
                    Some(texture) => target.draw_texture(check_box, texture, style.opacity),
                    None => {
                        fill(target, check_box, style.color("BackgroundColor"));
                        draw_borders(target, check_box, style);
                        if *checked {
                            let inner = check_box.shrink(style.borders()).shrink(Spacing::all(side * 0.2));
                            fill(target, inner, style.color("CheckColor"));
                        }
                    }
                }
                let size = style.text_size(self.text_size);
                let distance = style.data.number("TextDistanceRatio").unwrap_or(0.2) * side;
                let position = Offset::new(
                    check_box.right() + distance,
                    bounds.y + (bounds.height - size) / 2.0,
                );
                draw_text(target, position, text, size, style.color("TextColor"));
            }
        }
        Ok(())
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_box_texture(checked: bool) -> &'static str {
    if checked {
        "TextureChecked"
    } else {
        "TextureUnchecked"
    }
}

/// Texture properties drawn for a widget of this kind.
fn drawn_textures(kind: &WidgetKind) -> &'static [&'static str] {
    match kind {
        WidgetKind::Panel | WidgetKind::Label { .. } => &["TextureBackground"],
        WidgetKind::Button { .. } | WidgetKind::Picture => &["Texture"],
        WidgetKind::CheckBox { checked: true, .. } => &["TextureChecked"],
        WidgetKind::CheckBox { checked: false, .. } => &["TextureUnchecked"],
        WidgetKind::Group | WidgetKind::HorizontalLayout | WidgetKind::VerticalLayout => &[],
    }
}

/// Fail if any visible widget below `id` would draw an unprepared texture.
fn check_textures(tree: &WidgetTree, id: WidgetId, parent_enabled: bool) -> Result<()> {
    let widget = tree.widget(id)?;
    if !widget.is_visible() {
        return Ok(());
    }
    let enabled = parent_enabled && widget.is_enabled();
    {
        let data = widget.renderer().data();
        let style = Style {
            widget,
            data: &data,
            state: VisualState::of(widget, enabled),
            opacity: 1.0,
        };
        for base in drawn_textures(&widget.kind) {
            style.texture(base)?;
        }
    }
    for &child in tree.children(id) {
        check_textures(tree, child, enabled)?;
    }
    Ok(())
}

fn fill(target: &mut dyn RenderTarget, region: Region, color: Option<Color>) {
    if let Some(color) = color.filter(|c| c.a > 0) {
        if !region.is_empty() {
            target.fill_rect(region, color);
        }
    }
}

fn draw_borders(target: &mut dyn RenderTarget, region: Region, style: &Style<'_>) {
    let borders = style.borders();
    if borders.is_zero() || region.is_empty() {
        return;
    }
    if let Some(color) = style.color("BorderColor").filter(|c| c.a > 0) {
        target.draw_borders(region, borders, color);
    }
}

fn draw_text(target: &mut dyn RenderTarget, position: Offset, text: &str, size: f32, color: Option<Color>) {
    if text.is_empty() {
        return;
    }
    if let Some(color) = color.filter(|c| c.a > 0) {
        target.draw_text(position, text, size, color);
    }
}
