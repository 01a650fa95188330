#![forbid(unsafe_code)]

//! The preview pane: lifecycle of one execution surface plus its viewport.
//!
//! A [`PreviewPane`] is built with everything it needs up front (state
//! accessor, geometry sink, view host, config, container size). The surface
//! joins later: when it reports ready, [`PreviewPane::on_initialized`]
//! attaches the change listeners and hands back their disposer.
//!
//! # Invariants
//!
//! 1. At most one listener set is live per pane. Re-initializing disposes the
//!    previous set before the new one is attached.
//! 2. [`PreviewPane::detach`] and dropping the returned [`ListenerSet`] both
//!    dispose; either order is fine.

use std::rc::Rc;

use livepane_core::{Bounds, ContainerSize, PreviewContent};
use tracing::{info, warn};

use crate::alignment::{Alignment, AlignmentController};
use crate::config::PreviewConfig;
use crate::detector::ChangeDetector;
use crate::reactive::{ListenerRegistry, ListenerSet};
use crate::state::{PACKAGE_JSON_PATH, PreviewState};
use crate::surface::{ExecutionSurface, GeometrySink, ViewHost};

/// A file supplied to the surface in addition to the project's own modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraModule {
    pub path: String,
    pub code: String,
}

/// What the host passes to the surface alongside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameProps {
    /// The viewport shows another panel; keep the surface alive but hidden.
    pub hidden: bool,
    /// The viewport is closed.
    pub no_preview: bool,
    /// Extra files the surface should see.
    pub extra_modules: Vec<ExtraModule>,
}

/// Owns the viewport alignment and the listener set for one surface.
pub struct PreviewPane {
    state: Rc<dyn PreviewState>,
    view_host: Rc<dyn ViewHost>,
    detector: ChangeDetector,
    alignment: AlignmentController,
    active: Option<ListenerRegistry>,
}

impl std::fmt::Debug for PreviewPane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewPane")
            .field("alignment", &self.alignment)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl PreviewPane {
    /// Create a pane for a container of `size`.
    pub fn new(
        state: Rc<dyn PreviewState>,
        sink: Rc<dyn GeometrySink>,
        view_host: Rc<dyn ViewHost>,
        size: ContainerSize,
        config: &PreviewConfig,
    ) -> Self {
        let alignment = AlignmentController::new(size, Rc::clone(&state), sink, config);
        Self {
            state,
            view_host,
            detector: ChangeDetector::new(config.max_evaluation_passes),
            alignment,
            active: None,
        }
    }

    /// The surface is ready: attach listeners referencing it.
    ///
    /// Returns the disposer for this mount.
    pub fn on_initialized(&mut self, surface: Rc<dyn ExecutionSurface>) -> ListenerSet {
        if let Some(previous) = self.active.take() {
            if !previous.is_disposed() {
                warn!("surface initialized again while listeners were live; disposing old set");
                previous.dispose();
            }
        }
        let set = self.detector.attach(
            Rc::clone(&self.state),
            surface,
            Rc::clone(&self.view_host),
        );
        self.active = Some(set.registry().clone());
        set
    }

    /// Discard the surface: dispose its listeners.
    pub fn detach(&mut self) {
        if let Some(registry) = self.active.take() {
            if registry.dispose() {
                info!("preview detached");
            }
        }
    }

    /// Whether a live listener set is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.active.as_ref().is_some_and(|r| !r.is_disposed())
    }

    /// Evaluate the live listener set, if any.
    pub fn evaluate(&self) -> usize {
        self.active.as_ref().map_or(0, ListenerRegistry::evaluate_all)
    }

    /// Current viewport alignment.
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment.alignment()
    }

    /// Dock the viewport to the right half.
    pub fn dock_right(&mut self) -> Bounds {
        self.alignment.dock_right()
    }

    /// Dock the viewport to the bottom half.
    pub fn dock_bottom(&mut self) -> Bounds {
        self.alignment.dock_bottom()
    }

    /// The user dragged the viewport.
    ///
    /// Call this whenever the host persists dragged bounds (for example with
    /// [`crate::EditorStore::drag_viewport`]). Until it is called, a docked
    /// pane treats the next container resize as a docked one and overwrites
    /// the drag.
    pub fn on_manual_reposition(&mut self) {
        self.alignment.on_manual_reposition();
    }

    /// The hosting container was measured at a new size.
    pub fn on_container_resize(&mut self, size: ContainerSize) -> Option<Bounds> {
        self.alignment.on_container_resize(size)
    }

    /// Derive the surface's frame properties from the current state.
    #[must_use]
    pub fn frame_props(&self) -> FrameProps {
        let content = self.state.content();
        let extra_modules = self
            .state
            .package_json_code()
            .map(|code| ExtraModule {
                path: PACKAGE_JSON_PATH.to_owned(),
                code,
            })
            .into_iter()
            .collect();
        FrameProps {
            hidden: content != PreviewContent::Browser,
            no_preview: content == PreviewContent::None,
            extra_modules,
        }
    }
}

impl Drop for PreviewPane {
    fn drop(&mut self) {
        self.detach();
    }
}
