//! Core geometry types: Offset, Size, Region, Spacing, PixelRect.
//!
//! Widget coordinates are logical pixels stored as `f32`. [`PixelRect`] is the
//! integer rectangle used to cut sub-images out of textures.

use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D position or displacement in logical pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    /// The origin.
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset { x: -self.x, y: -self.y }
    }
}

impl Mul<f32> for Offset {
    type Output = Offset;
    #[inline]
    fn mul(self, rhs: f32) -> Offset {
        Offset { x: self.x * rhs, y: self.y * rhs }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in logical pixels (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Create a new size without validation.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a size, rejecting negative or non-finite dimensions.
    pub fn try_new(width: f32, height: f32) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Check that both dimensions are finite and non-negative.
    pub fn validate(self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "size must be finite, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "size must not be negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Total area (width * height).
    #[inline]
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Convert to a [`Region`] positioned at the origin.
    #[inline]
    pub const fn to_region(self) -> Region {
        Region { x: 0.0, y: 0.0, width: self.width, height: self.height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle defined by position and size.
///
/// The left and top edges are inclusive, the right and bottom edges exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a region from a position and a size.
    #[inline]
    pub const fn from_parts(offset: Offset, size: Size) -> Self {
        Self { x: offset.x, y: offset.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    /// The dimensions.
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// The center point.
    #[inline]
    pub fn center(self) -> Offset {
        Offset { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether the region has no area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether the point lies inside this region.
    #[inline]
    pub fn contains(self, point: Offset) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` is entirely contained within this region.
    #[inline]
    pub fn contains_region(self, other: Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether `other` overlaps this region (non-zero intersection area).
    #[inline]
    pub fn overlaps(self, other: Region) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the intersection of two regions.
    ///
    /// Returns [`Region::EMPTY`] if the regions do not overlap.
    #[inline]
    pub fn intersection(self, other: Region) -> Region {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        let w = x2 - x1;
        let h = y2 - y1;
        if w <= 0.0 || h <= 0.0 {
            Region::EMPTY
        } else {
            Region { x: x1, y: y1, width: w, height: h }
        }
    }

    /// Compute the smallest region containing both `self` and `other`.
    #[inline]
    pub fn union(self, other: Region) -> Region {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Region { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    /// Translate the region by an [`Offset`].
    #[inline]
    pub fn translate(self, offset: Offset) -> Region {
        Region { x: self.x + offset.x, y: self.y + offset.y, ..self }
    }

    /// Contract the region inward by the given [`Spacing`].
    ///
    /// Width and height are clamped to zero.
    #[inline]
    pub fn shrink(self, margin: Spacing) -> Region {
        Region {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.width()).max(0.0),
            height: (self.height - margin.height()).max(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Spacing
// ---------------------------------------------------------------------------

/// Thickness of the four sides of a rectangle, used for borders and padding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spacing {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Spacing {
    /// Zero spacing on all sides.
    pub const ZERO: Spacing = Spacing { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 };

    /// Create spacing with explicit values for each side, in left-top-right-bottom order.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: f32) -> Self {
        Self { left: value, top: value, right: value, bottom: value }
    }

    /// `horizontal` for left/right, `vertical` for top/bottom.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self { left: horizontal, top: vertical, right: horizontal, bottom: vertical }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub fn width(self) -> f32 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub fn height(self) -> f32 {
        self.top + self.bottom
    }

    /// Whether every side is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Spacing::ZERO
    }
}

impl Add for Spacing {
    type Output = Spacing;
    #[inline]
    fn add(self, rhs: Spacing) -> Spacing {
        Spacing {
            left: self.left + rhs.left,
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

// ---------------------------------------------------------------------------
// PixelRect
// ---------------------------------------------------------------------------

/// An integer rectangle in image pixels, used for texture sub-regions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Create a new pixel rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the rectangle fits inside an image of the given dimensions.
    #[inline]
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
