#![forbid(unsafe_code)]

//! Continuous 2D geometry for gesture math.
//!
//! Gesture offsets and velocities are sub-pixel continuous, so unlike cell
//! grids these types are `f32`-based. All consumers clamp derived quantities
//! into closed ranges; nothing here is allowed to produce NaN from finite
//! inputs.

use std::ops::{Add, Neg, Sub};

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A 2D offset or velocity in pixels (or pixels per second).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along the given axis.
    #[must_use]
    pub const fn component(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Euclidean magnitude.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Replace the component on `axis`, keeping the other.
    #[must_use]
    pub const fn with_component(self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::Horizontal => Self {
                x: value,
                y: self.y,
            },
            Axis::Vertical => Self {
                x: self.x,
                y: value,
            },
        }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Viewport dimensions in pixels.
///
/// Used to scale gesture distances into progress fractions. A degenerate
/// (zero-extent) viewport is legal; callers must handle the zero denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport, clamping negative dimensions to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Extent along the given axis.
    #[must_use]
    pub const fn extent_along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}
