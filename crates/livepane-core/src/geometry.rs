#![forbid(unsafe_code)]

//! Pixel geometry for the floating preview viewport.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and size of the preview viewport, in pixels.
///
/// Coordinates are relative to the top-left corner of the hosting container.
/// Values are fractional because docked layouts split the container in half.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create new bounds.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same origin, different size.
    #[inline]
    pub const fn with_size(self, width: f64, height: f64) -> Self {
        Self::new(self.x, self.y, width, height)
    }

    /// Whether width and height match `other`, ignoring the origin.
    #[inline]
    pub fn same_size(&self, other: &Bounds) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Size of the layout container hosting the viewport.
///
/// Either dimension is `None` until the host layout has measured it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ContainerSize {
    /// A fully measured container.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// A container that has not been measured yet.
    #[inline]
    pub const fn unmeasured() -> Self {
        Self {
            width: None,
            height: None,
        }
    }

    /// Width, reading an unmeasured dimension as zero.
    #[inline]
    pub fn width_or_zero(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }

    /// Height, reading an unmeasured dimension as zero.
    #[inline]
    pub fn height_or_zero(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    /// Both dimensions as `(width, height)` when both are measured and non-zero.
    ///
    /// A zero dimension is treated like a missing one: the host reports zero
    /// while the container is collapsed or detached.
    pub fn measured(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w != 0.0 && h != 0.0 => Some((w, h)),
            _ => None,
        }
    }

    /// Whether the container is taller than it is wide.
    #[inline]
    pub fn is_portrait(&self) -> bool {
        self.height_or_zero() > self.width_or_zero()
    }
}
