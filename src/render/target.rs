//! The drawing backend seam.

use crate::geometry::{Offset, Region, Spacing};
use crate::renderer::Color;
use crate::texture::Texture;

/// Draw primitives the paint pass needs from a backend.
///
/// Coordinates are absolute. Clip regions nest: a pushed region is
/// intersected with the current one by the backend.
pub trait RenderTarget {
    fn fill_rect(&mut self, region: Region, color: Color);

    /// Draw the border band of `region` with the given thickness per side.
    fn draw_borders(&mut self, region: Region, borders: Spacing, color: Color);

    /// Draw one line of text with its top-left corner at `position`.
    fn draw_text(&mut self, position: Offset, text: &str, size: f32, color: Color);

    /// Stretch `texture` over `region`.
    fn draw_texture(&mut self, region: Region, texture: &Texture, opacity: f32);

    fn push_clip(&mut self, region: Region);

    fn pop_clip(&mut self);

    /// Width of `text` at `size`. Backends with real fonts override this.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.6
    }
}
