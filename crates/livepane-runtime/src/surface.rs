#![forbid(unsafe_code)]

//! Collaborator interfaces: the execution surface, the host view layer, and
//! the geometry command path.
//!
//! The runtime never reaches these through ambient context; every
//! collaborator is handed in explicitly when a [`crate::PreviewPane`] is
//! built or a surface signals readiness.

use livepane_core::Bounds;

/// The embedded surface that runs project code and renders its output.
///
/// Every call is fire-and-forget. The surface owns any debouncing,
/// compilation, or other asynchrony behind these entry points.
pub trait ExecutionSurface {
    /// Queue a normal re-run. The surface may debounce or coalesce.
    fn execute_code(&self);

    /// Re-run now, bypassing any queue or debounce.
    fn execute_code_immediately(&self);

    /// Discard the current execution context and start one for `project_id`.
    fn handle_sandbox_change(&self, project_id: &str);

    /// Re-resolve and reinstall dependencies.
    fn handle_dependencies_change(&self);
}

/// The view layer hosting the preview.
pub trait ViewHost {
    /// Schedule a visual refresh of the preview.
    ///
    /// `on_complete` must run exactly once, after the refresh has committed.
    fn request_refresh(&self, on_complete: Box<dyn FnOnce()>);
}

/// A [`ViewHost`] whose refreshes commit synchronously.
///
/// Suitable for headless hosts and tests: the completion runs inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateViewHost;

impl ViewHost for ImmediateViewHost {
    fn request_refresh(&self, on_complete: Box<dyn FnOnce()>) {
        on_complete();
    }
}

/// Why a geometry command was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometrySource {
    /// Explicit "dock right" action.
    DockRight,
    /// Explicit "dock bottom" action.
    DockBottom,
    /// Recompute after the hosting container changed size.
    ContainerResize,
}

impl GeometrySource {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DockRight => "dock_right",
            Self::DockBottom => "dock_bottom",
            Self::ContainerResize => "container_resize",
        }
    }
}

/// A request to replace the persisted viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryCommand {
    pub bounds: Bounds,
    pub source: GeometrySource,
}

/// The single write path from the runtime into the state tree.
pub trait GeometrySink {
    /// Apply a geometry command.
    fn set_geometry(&self, command: GeometryCommand);
}
