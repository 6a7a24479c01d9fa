//! Texture caching.
//!
//! - [`TextureLoader`]: turns source identifiers into decoded RGBA images.
//! - [`TextureManager`]: deduplicates loads by [`TextureKey`] and counts users.
//! - [`Texture`]: RAII handle; the entry lives while any handle does.

pub mod loader;
pub mod manager;

pub use loader::{ImageData, LoadError, MemoryLoader, TextureKey, TextureLoader};
pub use manager::{Texture, TextureData, TextureManager, PLACEHOLDER_ID};
