//! Widget kinds and their capabilities.
//!
//! Every widget in the tree carries a [`WidgetKind`]. The kind decides whether
//! the widget can hold children, whether it takes focus, which renderer
//! properties it understands, and which theme section it is styled from.

use crate::error::{Error, Result};
use crate::renderer::{Value, ValueType};

/// A renderer property a widget kind understands.
pub type PropertySpec = (&'static str, ValueType);

// ---------------------------------------------------------------------------
// Property tables
// ---------------------------------------------------------------------------

const COMMON: &[PropertySpec] = &[
    ("Opacity", ValueType::Number),
    ("OpacityDisabled", ValueType::Number),
    ("Font", ValueType::String),
];

const GROUP: &[PropertySpec] = &[("Padding", ValueType::Spacing)];

const PANEL: &[PropertySpec] = &[
    ("Borders", ValueType::Spacing),
    ("Padding", ValueType::Spacing),
    ("BorderColor", ValueType::Color),
    ("BackgroundColor", ValueType::Color),
    ("TextureBackground", ValueType::Texture),
];

const BOX_LAYOUT: &[PropertySpec] = &[
    ("Padding", ValueType::Spacing),
    ("SpaceBetweenWidgets", ValueType::Number),
];

const BUTTON: &[PropertySpec] = &[
    ("Borders", ValueType::Spacing),
    ("TextSize", ValueType::Number),
    ("TextColor", ValueType::Color),
    ("TextColorHover", ValueType::Color),
    ("TextColorDown", ValueType::Color),
    ("TextColorDisabled", ValueType::Color),
    ("TextColorFocused", ValueType::Color),
    ("BackgroundColor", ValueType::Color),
    ("BackgroundColorHover", ValueType::Color),
    ("BackgroundColorDown", ValueType::Color),
    ("BackgroundColorDisabled", ValueType::Color),
    ("BackgroundColorFocused", ValueType::Color),
    ("BorderColor", ValueType::Color),
    ("BorderColorHover", ValueType::Color),
    ("BorderColorDown", ValueType::Color),
    ("BorderColorDisabled", ValueType::Color),
    ("BorderColorFocused", ValueType::Color),
    ("Texture", ValueType::Texture),
    ("TextureHover", ValueType::Texture),
    ("TextureDown", ValueType::Texture),
    ("TextureDisabled", ValueType::Texture),
    ("TextureFocused", ValueType::Texture),
];

const LABEL: &[PropertySpec] = &[
    ("Borders", ValueType::Spacing),
    ("Padding", ValueType::Spacing),
    ("TextSize", ValueType::Number),
    ("TextColor", ValueType::Color),
    ("BackgroundColor", ValueType::Color),
    ("BorderColor", ValueType::Color),
    ("TextureBackground", ValueType::Texture),
];

const PICTURE: &[PropertySpec] = &[("Texture", ValueType::Texture)];

const CHECK_BOX: &[PropertySpec] = &[
    ("Borders", ValueType::Spacing),
    ("TextSize", ValueType::Number),
    ("TextDistanceRatio", ValueType::Number),
    ("TextColor", ValueType::Color),
    ("TextColorHover", ValueType::Color),
    ("TextColorDisabled", ValueType::Color),
    ("BackgroundColor", ValueType::Color),
    ("BackgroundColorHover", ValueType::Color),
    ("BackgroundColorDisabled", ValueType::Color),
    ("BorderColor", ValueType::Color),
    ("BorderColorHover", ValueType::Color),
    ("BorderColorDisabled", ValueType::Color),
    ("BorderColorFocused", ValueType::Color),
    ("CheckColor", ValueType::Color),
    ("CheckColorHover", ValueType::Color),
    ("CheckColorDisabled", ValueType::Color),
    ("TextureUnchecked", ValueType::Texture),
    ("TextureChecked", ValueType::Texture),
];

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// The specialisation of a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// Invisible container; children are placed by their own position.
    Group,
    /// Container with background and borders.
    Panel,
    /// Container that arranges children in a row.
    HorizontalLayout,
    /// Container that arranges children in a column.
    VerticalLayout,
    Button { text: String },
    Label { text: String },
    /// Shows the renderer's `Texture` property.
    Picture,
    CheckBox { text: String, checked: bool },
}

impl WidgetKind {
    /// Type name, also used as the theme section name.
    pub fn type_name(&self) -> &'static str {
        match self {
            WidgetKind::Group => "Group",
            WidgetKind::Panel => "Panel",
            WidgetKind::HorizontalLayout => "HorizontalLayout",
            WidgetKind::VerticalLayout => "VerticalLayout",
            WidgetKind::Button { .. } => "Button",
            WidgetKind::Label { .. } => "Label",
            WidgetKind::Picture => "Picture",
            WidgetKind::CheckBox { .. } => "CheckBox",
        }
    }

    /// Whether widgets of this kind may hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            WidgetKind::Group
                | WidgetKind::Panel
                | WidgetKind::HorizontalLayout
                | WidgetKind::VerticalLayout
        )
    }

    /// Whether the container arranges its children itself.
    pub fn is_box_layout(&self) -> bool {
        matches!(self, WidgetKind::HorizontalLayout | WidgetKind::VerticalLayout)
    }

    /// Whether widgets of this kind take keyboard focus by default.
    pub fn can_focus(&self) -> bool {
        matches!(self, WidgetKind::Button { .. } | WidgetKind::CheckBox { .. })
    }

    /// Kind-specific renderer properties (without the common ones).
    pub fn properties(&self) -> &'static [PropertySpec] {
        match self {
            WidgetKind::Group => GROUP,
            WidgetKind::Panel => PANEL,
            WidgetKind::HorizontalLayout | WidgetKind::VerticalLayout => BOX_LAYOUT,
            WidgetKind::Button { .. } => BUTTON,
            WidgetKind::Label { .. } => LABEL,
            WidgetKind::Picture => PICTURE,
            WidgetKind::CheckBox { .. } => CHECK_BOX,
        }
    }

    /// Expected value type of a property, or `None` if unknown to this kind.
    pub fn property_type(&self, name: &str) -> Option<ValueType> {
        COMMON
            .iter()
            .chain(self.properties())
            .find(|(prop, _)| *prop == name)
            .map(|(_, ty)| *ty)
    }

    /// Check a property write and normalise the value.
    ///
    /// Opacities are clamped to `[0, 1]`; a bare number is accepted where
    /// spacing is expected.
    pub fn validate_property(&self, name: &str, value: Value) -> Result<Value> {
        let expected = self.property_type(name).ok_or_else(|| Error::UnknownProperty {
            widget_type: self.type_name().to_owned(),
            property: name.to_owned(),
        })?;

        let found = value.value_type();
        let accepted = found == expected
            || (expected == ValueType::Spacing && found == ValueType::Number);
        if !accepted {
            return Err(Error::PropertyType {
                property: name.to_owned(),
                expected: expected.name(),
                found: found.name(),
            });
        }

        let finite = match &value {
            Value::Number(n) => n.is_finite(),
            Value::Spacing(s) => [s.left, s.top, s.right, s.bottom].iter().all(|v| v.is_finite()),
            _ => true,
        };
        if !finite {
            return Err(Error::InvalidGeometry(format!("{name} must be a finite number")));
        }

        Ok(match value {
            Value::Number(n) if name.starts_with("Opacity") => Value::Number(n.clamp(0.0, 1.0)),
            other => other,
        })
    }

    /// Displayed text, for kinds that have one.
    pub fn text(&self) -> Option<&str> {
        match self {
            WidgetKind::Button { text }
            | WidgetKind::Label { text }
            | WidgetKind::CheckBox { text, .. } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            WidgetKind::Button { text }
            | WidgetKind::Label { text }
            | WidgetKind::CheckBox { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Checked state of a check box; `None` for other kinds.
    pub fn checked(&self) -> Option<bool> {
        match self {
            WidgetKind::CheckBox { checked, .. } => Some(*checked),
            _ => None,
        }
    }

    pub(crate) fn checked_mut(&mut self) -> Option<&mut bool> {
        match self {
            WidgetKind::CheckBox { checked, .. } => Some(checked),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Spacing;
    use crate::renderer::Color;

    #[test]
    fn containers() {
        assert!(WidgetKind::Group.is_container());
        assert!(WidgetKind::VerticalLayout.is_container());
        assert!(!WidgetKind::Picture.is_container());
        assert!(!WidgetKind::Button { text: String::new() }.is_container());
    }

    #[test]
    fn focusable_kinds() {
        assert!(WidgetKind::Button { text: "Ok".into() }.can_focus());
        assert!(WidgetKind::CheckBox { text: String::new(), checked: false }.can_focus());
        assert!(!WidgetKind::Label { text: String::new() }.can_focus());
        assert!(!WidgetKind::Panel.can_focus());
    }

    #[test]
    fn common_properties_apply_to_every_kind() {
        assert_eq!(WidgetKind::Group.property_type("Opacity"), Some(ValueType::Number));
        assert_eq!(WidgetKind::Picture.property_type("Font"), Some(ValueType::String));
    }

    #[test]
    fn unknown_property_is_rejected() {
        let err = WidgetKind::Picture
            .validate_property("TextColor", Color::RED.into())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownProperty { ref widget_type, .. } if widget_type == "Picture"));
    }

    #[test]
    fn mismatched_type_is_rejected() {
        let button = WidgetKind::Button { text: "x".into() };
        let err = button.validate_property("TextColor", Value::Number(1.0)).unwrap_err();
        assert!(matches!(err, Error::PropertyType { expected: "color", found: "number", .. }));
    }

    #[test]
    fn opacity_is_clamped() {
        let v = WidgetKind::Panel.validate_property("Opacity", Value::Number(1.5)).unwrap();
        assert_eq!(v, Value::Number(1.0));
        let v = WidgetKind::Panel.validate_property("OpacityDisabled", Value::Number(-0.5)).unwrap();
        assert_eq!(v, Value::Number(0.0));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = WidgetKind::Panel
            .validate_property("Opacity", Value::Number(f32::NAN))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        assert!(WidgetKind::Panel
            .validate_property("Borders", Value::Number(f32::INFINITY))
            .is_err());
        let padding = Spacing::new(1.0, f32::NEG_INFINITY, 1.0, 1.0);
        assert!(WidgetKind::Panel
            .validate_property("Padding", Value::Spacing(padding))
            .is_err());
    }

    #[test]
    fn number_accepted_as_spacing() {
        assert!(WidgetKind::Panel.validate_property("Borders", Value::Number(2.0)).is_ok());
    }

    #[test]
    fn text_and_checked_accessors() {
        let mut kind = WidgetKind::CheckBox { text: "Remember".into(), checked: false };
        assert_eq!(kind.text(), Some("Remember"));
        *kind.checked_mut().unwrap() = true;
        assert_eq!(kind.checked(), Some(true));
        assert_eq!(WidgetKind::Group.text(), None);
    }
}
