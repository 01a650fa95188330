#![forbid(unsafe_code)]

//! Docking and resize handling for the floating preview viewport.
//!
//! # State machine
//!
//! ```text
//!            dock_right()             dock_bottom()
//!   Free ───────────────▶ DockedRight ◀────────▶ DockedBottom
//!    ▲                        │                       │
//!    └──── on_manual_reposition() ────────────────────┘
//! ```
//!
//! The initial state comes from the container's aspect ratio: portrait
//! containers start docked to the bottom, everything else to the right.
//!
//! # Resize policy
//!
//! - Docked: a size change recomputes the docked bounds and issues them.
//! - Free: once both dimensions are known, the persisted bounds are shrunk
//!   (never below `min_free_extent`) so the viewport stays inside the
//!   container. The origin is kept. A command is issued only if the size
//!   actually changes.
//!
//! The free-state shrink rule is not symmetric: the width test subtracts `x`
//! from the viewport width and the new width adds `x` back, while the height
//! test and new height both use `y` with the opposite sign. Both rules are
//! kept exactly as stated in [`shrink_to_fit`].

use std::rc::Rc;

use livepane_core::{Bounds, ContainerSize};
use tracing::debug;

use crate::config::PreviewConfig;
use crate::state::PreviewState;
use crate::surface::{GeometryCommand, GeometrySink, GeometrySource};

/// How the viewport is placed in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Positioned by the user.
    Free,
    /// Right half of the container.
    DockedRight,
    /// Bottom half of the container.
    DockedBottom,
}

impl Alignment {
    /// Initial alignment for a container.
    #[must_use]
    pub fn initial_for(size: ContainerSize) -> Self {
        if size.is_portrait() {
            Self::DockedBottom
        } else {
            Self::DockedRight
        }
    }

    /// Whether the viewport is docked.
    #[must_use]
    pub const fn is_docked(self) -> bool {
        !matches!(self, Self::Free)
    }
}

/// Bounds of the right-docked viewport: `{0, 0, W/2, H - m}`.
#[must_use]
pub fn right_bounds(size: ContainerSize, margin: f64) -> Bounds {
    let (w, h) = (size.width_or_zero(), size.height_or_zero());
    Bounds::new(0.0, 0.0, w / 2.0, h - margin)
}

/// Bounds of the bottom-docked viewport: `{0, H/2 - m, W - m, H/2}`.
#[must_use]
pub fn bottom_bounds(size: ContainerSize, margin: f64) -> Bounds {
    let (w, h) = (size.width_or_zero(), size.height_or_zero());
    Bounds::new(0.0, h / 2.0 - margin, w - margin, h / 2.0)
}

/// Shrink free-floating bounds to fit a `width` × `height` container.
///
/// - if `width - margin < b.width - b.x`, width becomes `max(min, width - margin + b.x)`
/// - if `height - margin < b.height + b.y`, height becomes `max(min, height - margin - b.y)`
///
/// The origin is unchanged.
#[must_use]
pub fn shrink_to_fit(current: Bounds, width: f64, height: f64, margin: f64, min: f64) -> Bounds {
    let mut new_width = current.width;
    if width - margin < current.width - current.x {
        new_width = min.max(width - margin + current.x);
    }

    let mut new_height = current.height;
    if height - margin < current.height + current.y {
        new_height = min.max(height - margin - current.y);
    }

    current.with_size(new_width, new_height)
}

/// Owns the viewport's alignment and issues geometry commands.
pub struct AlignmentController {
    alignment: Alignment,
    container: ContainerSize,
    margin: f64,
    min_extent: f64,
    state: Rc<dyn PreviewState>,
    sink: Rc<dyn GeometrySink>,
}

impl std::fmt::Debug for AlignmentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentController")
            .field("alignment", &self.alignment)
            .field("container", &self.container)
            .field("margin", &self.margin)
            .field("min_extent", &self.min_extent)
            .finish_non_exhaustive()
    }
}

impl AlignmentController {
    /// Create a controller for a container of `size`.
    ///
    /// No command is issued until a dock action or resize.
    pub fn new(
        size: ContainerSize,
        state: Rc<dyn PreviewState>,
        sink: Rc<dyn GeometrySink>,
        config: &PreviewConfig,
    ) -> Self {
        Self {
            alignment: Alignment::initial_for(size),
            container: size,
            margin: config.dock_margin,
            min_extent: config.min_free_extent,
            state,
            sink,
        }
    }

    /// Current alignment.
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Last container size seen.
    #[must_use]
    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// Dock to the right half and issue the new bounds.
    pub fn dock_right(&mut self) -> Bounds {
        let bounds = right_bounds(self.container, self.margin);
        self.issue(bounds, GeometrySource::DockRight);
        self.alignment = Alignment::DockedRight;
        bounds
    }

    /// Dock to the bottom half and issue the new bounds.
    pub fn dock_bottom(&mut self) -> Bounds {
        let bounds = bottom_bounds(self.container, self.margin);
        self.issue(bounds, GeometrySource::DockBottom);
        self.alignment = Alignment::DockedBottom;
        bounds
    }

    /// The user moved or resized the viewport by hand.
    pub fn on_manual_reposition(&mut self) {
        if self.alignment.is_docked() {
            debug!(from = ?self.alignment, "viewport undocked");
        }
        self.alignment = Alignment::Free;
    }

    /// The hosting container changed size.
    ///
    /// Returns the bounds that were issued, if any.
    pub fn on_container_resize(&mut self, size: ContainerSize) -> Option<Bounds> {
        let previous = std::mem::replace(&mut self.container, size);
        match self.alignment {
            Alignment::DockedRight | Alignment::DockedBottom => {
                if previous == size {
                    return None;
                }
                let bounds = if self.alignment == Alignment::DockedBottom {
                    bottom_bounds(size, self.margin)
                } else {
                    right_bounds(size, self.margin)
                };
                self.issue(bounds, GeometrySource::ContainerResize);
                Some(bounds)
            }
            Alignment::Free => {
                let (width, height) = size.measured()?;
                let current = self.state.geometry();
                let fitted = shrink_to_fit(current, width, height, self.margin, self.min_extent);
                if fitted.same_size(&current) {
                    return None;
                }
                self.issue(fitted, GeometrySource::ContainerResize);
                Some(fitted)
            }
        }
    }

    fn issue(&self, bounds: Bounds, source: GeometrySource) {
        debug!(
            source = source.as_str(),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "geometry command"
        );
        self.sink.set_geometry(GeometryCommand { bounds, source });
    }
}
