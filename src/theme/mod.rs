//! Themes: named, shared renderers.
//!
//! A [`Theme`] maps section names (one per widget kind, plus any custom ones)
//! to [`Renderer`] handles. Handing out a section clones the handle, so every
//! widget styled from the same section shares one property map.

pub mod parser;
pub mod tokenizer;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Spacing;
use crate::renderer::{Color, Renderer, RendererData, Value};

pub use parser::{parse_theme, ParseError, Section};

const TEXT: Color = Color::rgb(60, 60, 60);
const TEXT_DISABLED: Color = Color::rgb(125, 125, 125);
const FOCUS: Color = Color::rgb(30, 30, 180);

/// A named collection of renderers.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    sections: BTreeMap<String, Renderer>,
    source: Option<PathBuf>,
}

impl Theme {
    /// A theme with no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in theme with a section for every widget kind.
    pub fn builtin() -> Self {
        let mut theme = Self::empty();

        theme.add_renderer(
            "Button",
            RendererData::new()
                .with("Borders", Spacing::all(1.0))
                .with("TextColor", TEXT)
                .with("TextColorHover", Color::BLACK)
                .with("TextColorDown", Color::BLACK)
                .with("TextColorDisabled", TEXT_DISABLED)
                .with("BackgroundColor", Color::rgb(245, 245, 245))
                .with("BackgroundColorHover", Color::WHITE)
                .with("BackgroundColorDown", Color::rgb(235, 235, 235))
                .with("BackgroundColorDisabled", Color::rgb(230, 230, 230))
                .with("BorderColor", TEXT)
                .with("BorderColorHover", Color::BLACK)
                .with("BorderColorDown", Color::BLACK)
                .with("BorderColorDisabled", TEXT_DISABLED)
                .with("BorderColorFocused", FOCUS)
                .with("TextSize", 13.0),
        );
        theme.add_renderer(
            "CheckBox",
            RendererData::new()
                .with("Borders", Spacing::all(1.0))
                .with("TextDistanceRatio", 0.2)
                .with("TextColor", TEXT)
                .with("TextColorHover", Color::BLACK)
                .with("TextColorDisabled", TEXT_DISABLED)
                .with("BackgroundColor", Color::rgb(245, 245, 245))
                .with("BackgroundColorHover", Color::WHITE)
                .with("BackgroundColorDisabled", Color::rgb(230, 230, 230))
                .with("BorderColor", TEXT)
                .with("BorderColorHover", Color::BLACK)
                .with("BorderColorDisabled", TEXT_DISABLED)
                .with("BorderColorFocused", FOCUS)
                .with("CheckColor", TEXT)
                .with("CheckColorHover", Color::BLACK)
                .with("CheckColorDisabled", TEXT_DISABLED)
                .with("TextSize", 13.0),
        );
        theme.add_renderer(
            "Label",
            RendererData::new()
                .with("TextColor", TEXT)
                .with("BackgroundColor", Color::TRANSPARENT)
                .with("BorderColor", TEXT)
                .with("Borders", Spacing::all(0.0))
                .with("TextSize", 13.0),
        );
        theme.add_renderer(
            "Panel",
            RendererData::new()
                .with("BackgroundColor", Color::WHITE)
                .with("BorderColor", Color::BLACK)
                .with("Borders", Spacing::all(0.0)),
        );
        for section in ["Group", "HorizontalLayout", "VerticalLayout", "Picture"] {
            theme.add_renderer(section, RendererData::new());
        }

        theme
    }

    /// Parse theme text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut theme = Self::empty();
        for Section { name, data } in parse_theme(text)? {
            theme.add_renderer(name, data);
        }
        Ok(theme)
    }

    /// Load a theme file. Relative texture ids are resolved against the
    /// file's directory.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sections = parse_theme(&text)?;
        let dir = path.parent().unwrap_or(Path::new(""));
        for section in &mut sections {
            resolve_texture_paths(&mut section.data, dir);
        }

        let mut theme = Self::empty();
        for Section { name, data } in sections {
            theme.add_renderer(name, data);
        }
        theme.source = Some(path.to_path_buf());
        debug!(path = %path.display(), sections = theme.len(), "theme loaded");
        Ok(theme)
    }

    /// The file this theme was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The shared renderer of a section.
    pub fn renderer(&self, section: &str) -> Result<Renderer> {
        self.sections
            .get(section)
            .cloned()
            .ok_or_else(|| Error::MissingSection(section.to_owned()))
    }

    pub fn get(&self, section: &str) -> Option<&Renderer> {
        self.sections.get(section)
    }

    /// Add or replace a section. Returns the previous renderer.
    ///
    /// Widgets holding the previous renderer keep it until re-themed.
    pub fn add_renderer(&mut self, section: impl Into<String>, renderer: impl Into<Renderer>) -> Option<Renderer> {
        self.sections.insert(section.into(), renderer.into())
    }

    /// Remove a section. Returns whether it existed.
    pub fn remove_renderer(&mut self, section: &str) -> bool {
        self.sections.remove(section).is_some()
    }

    /// Section names in sorted order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn resolve_texture_paths(data: &mut RendererData, dir: &Path) {
    let resolved: Vec<(String, Value)> = data
        .textures()
        .map(|(name, texture)| {
            let mut resolved = texture.clone().resolved(true);
            if Path::new(&texture.id).is_relative() {
                resolved.id = dir.join(&texture.id).to_string_lossy().into_owned();
            }
            (name.to_owned(), Value::Texture(resolved))
        })
        .collect();
    for (name, value) in resolved {
        data.set(name, value);
    }
}
