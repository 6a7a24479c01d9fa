//! Spatial map for hit testing.
//!
//! [`SpatialMap`] keeps the hittable widgets of the last layout pass in paint
//! order, each with its region clipped to its ancestors. Later entries are in
//! front of earlier ones, so queries scan from the back.

use crate::geometry::{Offset, Region};
use crate::tree::node::WidgetId;

/// One hittable widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEntry {
    pub id: WidgetId,
    /// Visible part of the widget, clipped by its ancestors.
    pub region: Region,
    /// Whether the widget and all its ancestors are enabled.
    pub enabled: bool,
}

/// Hittable widgets ordered by z-order (last = frontmost).
#[derive(Debug, Default)]
pub struct SpatialMap {
    entries: Vec<HitEntry>,
}

impl SpatialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents. The order of `entries` is the paint order.
    pub fn update_ordered(&mut self, entries: Vec<HitEntry>) {
        self.entries = entries;
    }

    /// The widget that receives input at `point`.
    ///
    /// Returns the frontmost widget containing the point, or `None` if there
    /// is none or if the frontmost one is disabled: a disabled widget still
    /// covers what lies behind it.
    pub fn widget_at(&self, point: Offset) -> Option<WidgetId> {
        self.entry_at(point).filter(|e| e.enabled).map(|e| e.id)
    }

    /// The frontmost entry containing `point`, enabled or not.
    pub fn entry_at(&self, point: Offset) -> Option<&HitEntry> {
        self.entries.iter().rev().find(|e| e.region.contains(point))
    }

    /// All widgets containing `point`, front to back.
    pub fn hit_test(&self, point: Offset) -> Vec<WidgetId> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.region.contains(point))
            .map(|e| e.id)
            .collect()
    }

    /// All widgets whose region overlaps `region`, front to back.
    pub fn widgets_in_region(&self, region: Region) -> Vec<WidgetId> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.region.overlaps(region))
            .map(|e| e.id)
            .collect()
    }

    pub fn entries(&self) -> &[HitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
