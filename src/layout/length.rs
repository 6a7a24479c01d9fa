//! Position and size values: Length (pixels or percent of parent), Layout2d.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::Size;

/// A single coordinate or extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the parent's inner extent along the same axis.
    Percent(f32),
}

impl Length {
    /// Resolve against the parent's inner extent.
    pub fn resolve(self, parent: f32) -> f32 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => parent * p / 100.0,
        }
    }

    /// The raw number, without unit.
    pub fn value(self) -> f32 {
        match self {
            Length::Px(v) | Length::Percent(v) => v,
        }
    }

    pub fn is_relative(self) -> bool {
        matches!(self, Length::Percent(_))
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl From<f32> for Length {
    fn from(v: f32) -> Self {
        Length::Px(v)
    }
}

impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Length::Px(v as f32)
    }
}

impl From<i32> for Length {
    fn from(v: i32) -> Self {
        Length::Px(v as f32)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Length::Px(v) if v.fract() == 0.0 => write!(f, "{}", v as i64),
            Length::Px(v) => write!(f, "{v}"),
            Length::Percent(p) if p.fract() == 0.0 => write!(f, "{}%", p as i64),
            Length::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parses `10`, `10px` or `50%`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (number, percent) = if let Some(n) = s.strip_suffix('%') {
            (n, true)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, false)
        } else {
            (s, false)
        };
        let value: f32 = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidGeometry(format!("'{s}' is not a length")))?;
        if !value.is_finite() {
            return Err(Error::InvalidGeometry(format!("'{s}' is not finite")));
        }
        Ok(if percent { Length::Percent(value) } else { Length::Px(value) })
    }
}

/// A pair of lengths: a widget's position or size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout2d {
    pub x: Length,
    pub y: Length,
}

impl Layout2d {
    pub fn new(x: impl Into<Length>, y: impl Into<Length>) -> Self {
        Self { x: x.into(), y: y.into() }
    }

    /// Both components in pixels.
    pub fn px(x: f32, y: f32) -> Self {
        Self { x: Length::Px(x), y: Length::Px(y) }
    }

    /// Both components relative to the parent.
    pub fn percent(x: f32, y: f32) -> Self {
        Self { x: Length::Percent(x), y: Length::Percent(y) }
    }

    /// Resolve against the parent's inner size.
    pub fn resolve(self, parent: Size) -> (f32, f32) {
        (self.x.resolve(parent.width), self.y.resolve(parent.height))
    }

    /// Reject non-finite components, and negative ones when `is_size`.
    pub(crate) fn validate(self, is_size: bool) -> Result<()> {
        for length in [self.x, self.y] {
            let v = length.value();
            if !v.is_finite() {
                return Err(Error::InvalidGeometry(format!("non-finite length {v}")));
            }
            if is_size && v < 0.0 {
                return Err(Error::InvalidGeometry(format!("negative size {length}")));
            }
        }
        Ok(())
    }
}

impl From<(f32, f32)> for Layout2d {
    fn from((x, y): (f32, f32)) -> Self {
        Layout2d::px(x, y)
    }
}

impl From<(f64, f64)> for Layout2d {
    fn from((x, y): (f64, f64)) -> Self {
        Layout2d::px(x as f32, y as f32)
    }
}

impl fmt::Display for Layout2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
