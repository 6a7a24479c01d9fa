//! Renderer property values: Color, TextureRef, Value.

use std::fmt;

use crate::geometry::{PixelRect, Spacing};
use crate::texture::TextureKey;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color with 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from red, green and blue.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `rgb`, `rrggbb` or `rrggbbaa` hex digits (without the `#`).
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => Some(Color::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Some(Color::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Color::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// Look up a named color (case-insensitive).
    pub fn from_name(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "yellow" => Color::YELLOW,
            "magenta" => Color::MAGENTA,
            "cyan" => Color::CYAN,
            "transparent" => Color::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    /// Multiply the alpha channel by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f32) -> Color {
        let factor = opacity.clamp(0.0, 1.0);
        Color { a: (self.a as f32 * factor).round() as u8, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

// ---------------------------------------------------------------------------
// TextureRef
// ---------------------------------------------------------------------------

/// A texture as referenced from a renderer property.
///
/// Only names the image; the pixels are acquired through the texture manager
/// before painting.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// Source identifier (usually a path relative to the resource root).
    pub id: String,
    /// Part of the image to use. `None` uses the whole image.
    pub part: Option<PixelRect>,
    /// Nine-slice middle rectangle, relative to the part.
    pub middle: Option<PixelRect>,
    /// Whether the texture is sampled with smoothing.
    pub smooth: bool,
    /// The id is already a full path (set for theme files) and is not
    /// joined with the resource root again.
    pub resolved: bool,
}

impl TextureRef {
    /// Reference a whole image with smoothing enabled.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), part: None, middle: None, smooth: true, resolved: false }
    }

    /// Restrict to a part of the image (builder).
    pub fn with_part(mut self, part: PixelRect) -> Self {
        self.part = Some(part);
        self
    }

    /// Set the nine-slice middle rectangle (builder).
    pub fn with_middle(mut self, middle: PixelRect) -> Self {
        self.middle = Some(middle);
        self
    }

    /// Set smoothing (builder).
    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Mark the id as final (builder).
    pub fn resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    /// The texture manager key for this reference.
    pub fn key(&self) -> TextureKey {
        TextureKey { id: self.id.clone(), part: self.part, smooth: self.smooth }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// The type of a [`Value`], used for property validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Color,
    Number,
    Bool,
    String,
    Spacing,
    Texture,
}

impl ValueType {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Color => "color",
            ValueType::Number => "number",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Spacing => "spacing",
            ValueType::Texture => "texture",
        }
    }
}

/// A single renderer property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Color(Color),
    Number(f32),
    Bool(bool),
    String(String),
    Spacing(Spacing),
    Texture(TextureRef),
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Color(_) => ValueType::Color,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Spacing(_) => ValueType::Spacing,
            Value::Texture(_) => ValueType::Texture,
        }
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n as f32)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f32)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Spacing> for Value {
    fn from(s: Spacing) -> Self {
        Value::Spacing(s)
    }
}

impl From<TextureRef> for Value {
    fn from(t: TextureRef) -> Self {
        Value::Texture(t)
    }
}
