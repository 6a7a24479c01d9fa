//! Top-down layout pass.
//!
//! [`LayoutEngine`] computes absolute bounds for every widget below the root
//! and rebuilds the [`SpatialMap`] on the way. Children of plain containers
//! are placed by their own position and size, resolved against the parent's
//! content area. Children of box layouts are distributed by taffy's flexbox
//! according to their ratios.

use taffy::prelude::*;
use taffy::style::{AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, Style};
use taffy::TaffyTree;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::{Region, Size, Spacing};
use crate::tree::node::{Widget, WidgetId};
use crate::tree::tree::WidgetTree;
use crate::widget::WidgetKind;

use super::spatial::{HitEntry, SpatialMap};

/// Runs layout passes. Keeps a scratch taffy tree between passes.
pub struct LayoutEngine {
    taffy: TaffyTree<()>,
}

/// State inherited from the ancestors during the pass.
#[derive(Clone, Copy)]
struct Inherited {
    clip: Region,
    visible: bool,
    enabled: bool,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self { taffy: TaffyTree::new() }
    }

    /// Lay out the whole tree inside `viewport` and rebuild `hits`.
    ///
    /// The root itself is not hittable; only its descendants are.
    pub fn compute(&mut self, tree: &mut WidgetTree, viewport: Size, hits: &mut SpatialMap) -> Result<()> {
        viewport.validate()?;
        let root = tree.root();
        let screen = Region::from_parts(Default::default(), viewport);
        tree.widget_mut(root)?.bounds = screen;

        let mut entries = Vec::new();
        let inherited = Inherited { clip: screen, visible: true, enabled: true };
        self.layout_children(tree, root, inherited, &mut entries)?;

        trace!(hittable = entries.len(), "layout pass complete");
        hits.update_ordered(entries);
        tree.layout_dirty = false;
        Ok(())
    }

    fn layout_children(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        inherited: Inherited,
        entries: &mut Vec<HitEntry>,
    ) -> Result<()> {
        let children = tree.children(id).to_vec();
        if children.is_empty() {
            return Ok(());
        }

        let parent = tree.widget(id)?;
        let content = content_area(parent);
        let placed = match parent.kind {
            WidgetKind::HorizontalLayout => self.box_layout(tree, &children, content, FlexDirection::Row, spacing(parent))?,
            WidgetKind::VerticalLayout => self.box_layout(tree, &children, content, FlexDirection::Column, spacing(parent))?,
            _ => place_absolute(tree, &children, content)?,
        };
        let child_clip = inherited.clip.intersection(content);

        for (child, bounds) in placed {
            let widget = tree.widget_mut(child)?;
            widget.bounds = bounds;
            let state = Inherited {
                clip: child_clip,
                visible: inherited.visible && widget.visible,
                enabled: inherited.enabled && widget.enabled,
            };
            if state.visible {
                entries.push(HitEntry {
                    id: child,
                    region: bounds.intersection(child_clip),
                    enabled: state.enabled,
                });
            }
            let below = Inherited { clip: child_clip.intersection(bounds), ..state };
            self.layout_children(tree, child, below, entries)?;
        }
        Ok(())
    }

    /// Distribute `children` along one axis with taffy.
    ///
    /// Invisible children take no space and keep an empty region at the
    /// content origin.
    fn box_layout(
        &mut self,
        tree: &WidgetTree,
        children: &[WidgetId],
        content: Region,
        direction: FlexDirection,
        gap: f32,
    ) -> Result<Vec<(WidgetId, Region)>> {
        self.taffy.clear();

        let mut leaves = Vec::new();
        for &child in children {
            let widget = tree.widget(child)?;
            if !widget.visible {
                continue;
            }
            let style = Style {
                flex_grow: widget.ratio,
                flex_shrink: 1.0,
                flex_basis: Dimension::from_length(0.0),
                ..Default::default()
            };
            leaves.push((child, self.taffy.new_leaf(style).map_err(layout_error)?));
        }

        let container = Style {
            display: Display::Flex,
            flex_direction: direction,
            gap: taffy::geometry::Size {
                width: LengthPercentage::from_length(gap),
                height: LengthPercentage::from_length(gap),
            },
            size: taffy::geometry::Size {
                width: Dimension::from_length(content.width),
                height: Dimension::from_length(content.height),
            },
            ..Default::default()
        };
        let nodes: Vec<taffy::NodeId> = leaves.iter().map(|(_, node)| *node).collect();
        let root = self.taffy.new_with_children(container, &nodes).map_err(layout_error)?;
        self.taffy
            .compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(content.width),
                    height: AvailableSpace::Definite(content.height),
                },
            )
            .map_err(layout_error)?;

        let mut placed = Vec::with_capacity(children.len());
        for &child in children {
            let bounds = match leaves.iter().find(|(id, _)| *id == child) {
                Some((_, node)) => {
                    let layout = self.taffy.layout(*node).map_err(layout_error)?;
                    Region::new(
                        content.x + layout.location.x,
                        content.y + layout.location.y,
                        layout.size.width,
                        layout.size.height,
                    )
                }
                None => Region::new(content.x, content.y, 0.0, 0.0),
            };
            placed.push((child, bounds));
        }
        Ok(placed)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Place children by their own position and size.
fn place_absolute(tree: &WidgetTree, children: &[WidgetId], content: Region) -> Result<Vec<(WidgetId, Region)>> {
    let parent_size = content.size();
    children
        .iter()
        .map(|&child| {
            let widget = tree.widget(child)?;
            let (x, y) = widget.position.resolve(parent_size);
            let (width, height) = widget.size.resolve(parent_size);
            Ok((child, Region::new(content.x + x, content.y + y, width.max(0.0), height.max(0.0))))
        })
        .collect()
}

/// The area inside borders and padding, where children are placed.
pub fn content_area(widget: &Widget) -> Region {
    let data = widget.renderer.data();
    let side = |name: &str| {
        if widget.kind.property_type(name).is_some() {
            data.spacing(name).unwrap_or(Spacing::ZERO)
        } else {
            Spacing::ZERO
        }
    };
    widget.bounds.shrink(side("Borders") + side("Padding"))
}

fn spacing(widget: &Widget) -> f32 {
    widget
        .renderer
        .data()
        .number("SpaceBetweenWidgets")
        .unwrap_or(0.0)
        .max(0.0)
}

fn layout_error(err: taffy::TaffyError) -> Error {
    Error::InvalidState(format!("layout failed: {err}"))
}
