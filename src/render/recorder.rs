//! A [`RenderTarget`] that records draw calls.

use std::fmt;

use crate::geometry::{Offset, Region, Spacing};
use crate::renderer::Color;
use crate::texture::{Texture, TextureKey};

use super::target::RenderTarget;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { region: Region, color: Color },
    Borders { region: Region, borders: Spacing, color: Color },
    Text { position: Offset, text: String, size: f32, color: Color },
    Texture { region: Region, key: TextureKey, opacity: f32 },
    PushClip(Region),
    PopClip,
}

struct Rect(Region);

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(f, "{},{} {}x{}", r.x, r.y, r.width, r.height)
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Fill { region, color } => write!(f, "fill {} {color}", Rect(*region)),
            DrawCommand::Borders { region, borders: b, color } => write!(
                f,
                "borders {} ({},{},{},{}) {color}",
                Rect(*region),
                b.left,
                b.top,
                b.right,
                b.bottom
            ),
            DrawCommand::Text { position, text, size, color } => {
                write!(f, "text {},{} {text:?} {size} {color}", position.x, position.y)
            }
            DrawCommand::Texture { region, key, opacity } => {
                write!(f, "texture {} {}", Rect(*region), key.id)?;
                if let Some(part) = key.part {
                    write!(f, " part({},{},{},{})", part.x, part.y, part.width, part.height)?;
                }
                if *opacity < 1.0 {
                    write!(f, " opacity={opacity}")?;
                }
                Ok(())
            }
            DrawCommand::PushClip(region) => write!(f, "clip {}", Rect(*region)),
            DrawCommand::PopClip => write!(f, "unclip"),
        }
    }
}

/// Records every draw call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of clip regions currently pushed.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }
}

impl RenderTarget for Recorder {
    fn fill_rect(&mut self, region: Region, color: Color) {
        self.commands.push(DrawCommand::Fill { region, color });
    }

    fn draw_borders(&mut self, region: Region, borders: Spacing, color: Color) {
        self.commands.push(DrawCommand::Borders { region, borders, color });
    }

    fn draw_text(&mut self, position: Offset, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            size,
            color,
        });
    }

    fn draw_texture(&mut self, region: Region, texture: &Texture, opacity: f32) {
        self.commands.push(DrawCommand::Texture {
            region,
            key: texture.key().clone(),
            opacity,
        });
    }

    fn push_clip(&mut self, region: Region) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(region));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}
