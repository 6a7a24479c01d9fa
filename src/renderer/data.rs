//! RendererData: the property map behind a renderer.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::geometry::Spacing;

use super::value::{Color, TextureRef, Value};

/// Appearance properties of a widget, keyed by property name.
///
/// Keys are kept sorted so two property maps can be diffed in a single merge
/// walk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RendererData {
    properties: BTreeMap<String, Value>,
}

impl RendererData {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The baseline appearance every widget can be drawn with.
    pub fn defaults() -> Self {
        RendererData::new()
            .with("BackgroundColor", Color::rgb(245, 245, 245))
            .with("BorderColor", Color::rgb(60, 60, 60))
            .with("Borders", Spacing::all(1.0))
            .with("TextColor", Color::rgb(60, 60, 60))
            .with("TextSize", 13.0)
            .with("Opacity", 1.0)
    }

    /// Set a property (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set a property. Returns `true` if the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let value = value.into();
        match self.properties.entry(name.into()) {
            btree_map::Entry::Occupied(mut entry) => {
                if *entry.get() == value {
                    false
                } else {
                    entry.insert(value);
                    true
                }
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Raw property lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Whether the property is set.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Color property, if set to a color.
    pub fn color(&self, name: &str) -> Option<Color> {
        match self.properties.get(name) {
            Some(Value::Color(c)) => Some(*c),
            _ => None,
        }
    }

    /// Numeric property, if set to a number.
    pub fn number(&self, name: &str) -> Option<f32> {
        match self.properties.get(name) {
            Some(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean property, if set to a bool.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.properties.get(name) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// String property, if set to a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.properties.get(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Spacing property. A bare number is accepted as uniform spacing.
    pub fn spacing(&self, name: &str) -> Option<Spacing> {
        match self.properties.get(name) {
            Some(Value::Spacing(s)) => Some(*s),
            Some(Value::Number(n)) => Some(Spacing::all(*n)),
            _ => None,
        }
    }

    /// Texture property, if set to a texture reference.
    pub fn texture(&self, name: &str) -> Option<&TextureRef> {
        match self.properties.get(name) {
            Some(Value::Texture(t)) => Some(t),
            _ => None,
        }
    }

    /// All texture references held by this renderer, with their property names.
    pub fn textures(&self) -> impl Iterator<Item = (&str, &TextureRef)> {
        self.properties.iter().filter_map(|(k, v)| match v {
            Value::Texture(t) => Some((k.as_str(), t)),
            _ => None,
        })
    }

    /// Names of properties whose value differs between `self` and `other`.
    ///
    /// A property present in only one of the maps counts as changed (it is
    /// reset to its default on the other side). The result is sorted.
    pub fn diff(&self, other: &RendererData) -> Vec<String> {
        let mut changed = Vec::new();
        let mut old = self.properties.iter().peekable();
        let mut new = other.properties.iter().peekable();

        loop {
            match (old.peek(), new.peek()) {
                (Some((ok, ov)), Some((nk, nv))) => {
                    if ok < nk {
                        changed.push((*ok).clone());
                        old.next();
                    } else if nk < ok {
                        changed.push((*nk).clone());
                        new.next();
                    } else {
                        if ov != nv {
                            changed.push((*ok).clone());
                        }
                        old.next();
                        new.next();
                    }
                }
                (Some((ok, _)), None) => {
                    changed.push((*ok).clone());
                    old.next();
                }
                (None, Some((nk, _))) => {
                    changed.push((*nk).clone());
                    new.next();
                }
                (None, None) => break,
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_reports_changes() {
        let mut data = RendererData::new();
        assert!(data.set("Opacity", 0.5));
        assert!(!data.set("Opacity", 0.5));
        assert!(data.set("Opacity", 0.7));
        assert_eq!(data.number("Opacity"), Some(0.7));
    }

    #[test]
    fn typed_getters_reject_wrong_types() {
        let data = RendererData::new().with("TextColor", Color::RED).with("Opacity", 1.0);
        assert_eq!(data.color("TextColor"), Some(Color::RED));
        assert_eq!(data.number("TextColor"), None);
        assert_eq!(data.color("Opacity"), None);
        assert_eq!(data.color("Missing"), None);
    }

    #[test]
    fn spacing_accepts_number() {
        let data = RendererData::new().with("Borders", 2.0).with("Padding", Spacing::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(data.spacing("Borders"), Some(Spacing::all(2.0)));
        assert_eq!(data.spacing("Padding"), Some(Spacing::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn defaults_are_drawable() {
        let data = RendererData::defaults();
        assert!(data.color("BackgroundColor").is_some());
        assert!(data.color("TextColor").is_some());
        assert_eq!(data.number("Opacity"), Some(1.0));
    }

    #[test]
    fn diff_covers_added_removed_and_changed() {
        let old = RendererData::new()
            .with("A", 1.0)
            .with("B", 2.0)
            .with("D", true);
        let new = RendererData::new()
            .with("B", 3.0)
            .with("C", Color::RED)
            .with("D", true);
        assert_eq!(old.diff(&new), vec!["A", "B", "C"]);
        assert_eq!(new.diff(&old), vec!["A", "B", "C"]);
        assert!(old.diff(&old).is_empty());
    }

    #[test]
    fn textures_lists_texture_properties() {
        let data = RendererData::new()
            .with("Texture", TextureRef::new("a.png"))
            .with("TextureHover", TextureRef::new("b.png"))
            .with("Opacity", 1.0);
        let names: Vec<&str> = data.textures().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Texture", "TextureHover"]);
    }
}
