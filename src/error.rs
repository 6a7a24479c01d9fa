//! Crate-wide error type.

use std::path::PathBuf;

use crate::theme::parser::ParseError;
use crate::tree::node::WidgetId;

/// Errors produced by trellis operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Geometry that can never be valid: negative sizes, NaN coordinates,
    /// texture parts outside their image.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An operation that conflicts with the current tree state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The widget id is stale or was never issued by this tree.
    #[error("widget {0:?} does not exist")]
    WidgetNotFound(WidgetId),

    /// A texture or other resource could not be loaded.
    #[error("resource '{id}' not found: {reason}")]
    ResourceNotFound { id: String, reason: String },

    /// A texture property was painted before the texture was acquired.
    #[error("texture '{0}' was not resolved before painting")]
    TextureNotReady(String),

    /// The widget kind does not understand the renderer property.
    #[error("widget type '{widget_type}' has no property '{property}'")]
    UnknownProperty { widget_type: String, property: String },

    /// The renderer property exists but the value has the wrong type.
    #[error("property '{property}' expects {expected}, got {found}")]
    PropertyType {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The theme has no renderer section with this name.
    #[error("theme has no section named '{0}'")]
    MissingSection(String),

    #[error(transparent)]
    Theme(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
