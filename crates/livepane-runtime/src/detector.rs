#![forbid(unsafe_code)]

//! Change detection for one mounted execution surface.
//!
//! [`ChangeDetector::attach`] registers one listener per watched facet of the
//! editor state and returns the [`ListenerSet`] that tears them all down.
//!
//! | Trigger | Watched value | Effect |
//! |---|---|---|
//! | `project_view` | overview mode flag | refresh view, then immediate run |
//! | `forced_render` | force-render counter | immediate run |
//! | `external_resources` | external resource count | immediate run |
//! | `modules_synced` | all-modules-synced flag | immediate run on `true` |
//! | `code` | content signature | settings-gated run |
//! | `current_module` | selected module id | settings-gated run outside overview |
//! | `structure` | structural fingerprint | settings-gated run |
//! | `sandbox` | project id | new execution context |
//! | `dependencies` | dependency count | reinstall dependencies |

use std::rc::Rc;

use livepane_core::{StructuralFingerprint, content_signature};
use tracing::{debug, info};

use crate::dispatch::{Trigger, dispatch};
use crate::reactive::{Listener, ListenerRegistry, ListenerSet};
use crate::state::PreviewState;
use crate::surface::{ExecutionSurface, ViewHost};

/// Builds the listener set for a surface.
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    max_passes: u32,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self {
            max_passes: crate::reactive::listener::DEFAULT_MAX_PASSES,
        }
    }
}

impl ChangeDetector {
    /// Detector whose registries cap re-entrant evaluation at `max_passes`.
    #[must_use]
    pub fn new(max_passes: u32) -> Self {
        Self { max_passes }
    }

    /// Register every listener against `surface` and return their disposer.
    ///
    /// Current values are sampled immediately; nothing fires until a watched
    /// value changes and the registry is evaluated.
    pub fn attach(
        &self,
        state: Rc<dyn PreviewState>,
        surface: Rc<dyn ExecutionSurface>,
        view_host: Rc<dyn ViewHost>,
    ) -> ListenerSet {
        let registry = ListenerRegistry::new(self.max_passes);

        {
            let liveness = registry.liveness();
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::ProjectView.as_str(),
                move || selector_state.is_in_project_view(),
                move |in_overview: &bool| {
                    debug!(in_overview, "project view toggled; refreshing view");
                    let liveness = liveness.clone();
                    let state = Rc::clone(&handler_state);
                    let surface = Rc::clone(&surface);
                    view_host.request_refresh(Box::new(move || {
                        if liveness.is_live() {
                            dispatch(Trigger::ProjectView, state.settings(), surface.as_ref());
                        }
                    }));
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::ForcedRender.as_str(),
                move || selector_state.force_render(),
                move |_: &u64| {
                    dispatch(Trigger::ForcedRender, handler_state.settings(), surface.as_ref());
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::ExternalResources.as_str(),
                move || selector_state.project().external_resource_count(),
                move |_: &usize| {
                    dispatch(Trigger::ExternalResources, handler_state.settings(), surface.as_ref());
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::ModulesSynced.as_str(),
                move || selector_state.all_modules_synced(),
                move |synced: &bool| {
                    if *synced {
                        dispatch(Trigger::ModulesSynced, handler_state.settings(), surface.as_ref());
                    }
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::Code.as_str(),
                move || content_signature(&selector_state.project()),
                move |_: &String| {
                    dispatch(Trigger::Code, handler_state.settings(), surface.as_ref());
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::CurrentModule.as_str(),
                move || selector_state.current_module_id(),
                move |_: &Option<String>| {
                    if !handler_state.is_in_project_view() {
                        dispatch(
                            Trigger::CurrentModule,
                            handler_state.settings(),
                            surface.as_ref(),
                        );
                    }
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let selector_state = Rc::clone(&state);
            let handler_state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::Structure.as_str(),
                move || StructuralFingerprint::of(&selector_state.project()),
                move |_: &StructuralFingerprint| {
                    dispatch(
                        Trigger::Structure,
                        handler_state.settings(),
                        surface.as_ref(),
                    );
                },
            ));
        }

        {
            let surface = Rc::clone(&surface);
            let state = Rc::clone(&state);
            registry.register(Listener::new(
                Trigger::Sandbox.as_str(),
                move || state.project().id.clone(),
                move |project_id: &String| {
                    debug!(%project_id, "project changed; resetting execution context");
                    surface.handle_sandbox_change(project_id);
                },
            ));
        }

        {
            registry.register(Listener::new(
                Trigger::Dependencies.as_str(),
                move || state.project().dependency_count(),
                move |count: &usize| {
                    debug!(count, "dependency set changed");
                    surface.handle_dependencies_change();
                },
            ));
        }

        info!(listeners = registry.len() as u64, "preview listeners attached");
        ListenerSet::new(registry)
    }
}
