//! Renderers: shared, swappable appearance objects.
//!
//! A [`Renderer`] is a cheap-to-clone handle to a [`RendererData`]. Widgets
//! that were given the same handle share one property map: writes through
//! [`Renderer::set_shared`] are seen by every holder. Per-widget edits go
//! through the tree, which clones the data first when other holders exist.

pub mod data;
pub mod value;

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

pub use data::RendererData;
pub use value::{Color, TextureRef, Value, ValueType};

/// Shared handle to renderer data.
#[derive(Clone)]
pub struct Renderer {
    data: Rc<RefCell<RendererData>>,
}

impl Renderer {
    /// Wrap renderer data in a new, unshared handle.
    pub fn new(data: RendererData) -> Self {
        Self { data: Rc::new(RefCell::new(data)) }
    }

    /// A handle with no properties set.
    pub fn empty() -> Self {
        Self::new(RendererData::new())
    }

    /// Borrow the property map.
    pub fn data(&self) -> Ref<'_, RendererData> {
        self.data.borrow()
    }

    /// Clone a single property value.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.data.borrow().get(name).cloned()
    }

    /// Write a property into the shared data, visible to every holder.
    ///
    /// Returns `true` if the value changed. Prefer
    /// [`WidgetTree::set_shared_property`](crate::tree::WidgetTree::set_shared_property)
    /// so holders are notified.
    pub fn set_shared(&self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        self.data.borrow_mut().set(name, value)
    }

    /// Remove a property from the shared data.
    pub fn remove_shared(&self, name: &str) -> Option<Value> {
        self.data.borrow_mut().remove(name)
    }

    /// Number of handles pointing at this data.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    /// Whether more than one handle points at this data.
    pub fn is_shared(&self) -> bool {
        self.holders() > 1
    }

    /// Whether both handles point at the same data.
    pub fn ptr_eq(&self, other: &Renderer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// A new, unshared handle holding a copy of the data.
    pub fn detached_copy(&self) -> Renderer {
        Renderer::new(self.data.borrow().clone())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererData::defaults())
    }
}

impl From<RendererData> for Renderer {
    fn from(data: RendererData) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("holders", &self.holders())
            .field("properties", &self.data.borrow().len())
            .finish()
    }
}
