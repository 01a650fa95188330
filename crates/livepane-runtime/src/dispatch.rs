#![forbid(unsafe_code)]

//! Maps a detected change to a command on the execution surface.
//!
//! Code, module-selection and structure changes share one settings-gated
//! policy ([`run_for_change`]). Overview toggles, forced renders, external
//! resource changes and module sync always re-run immediately
//! ([`execute_now`]): they are user- or environment-forced refreshes, so the
//! live-preview preference does not apply. [`dispatch`] picks between the two
//! from the trigger.

use livepane_core::Settings;
use tracing::debug;

use crate::surface::ExecutionSurface;

/// The state-tree facet whose change triggered a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ProjectView,
    ForcedRender,
    ExternalResources,
    ModulesSynced,
    Code,
    CurrentModule,
    Structure,
    Sandbox,
    Dependencies,
}

impl Trigger {
    /// Every trigger, in registration order.
    pub const ALL: [Trigger; 9] = [
        Trigger::ProjectView,
        Trigger::ForcedRender,
        Trigger::ExternalResources,
        Trigger::ModulesSynced,
        Trigger::Code,
        Trigger::CurrentModule,
        Trigger::Structure,
        Trigger::Sandbox,
        Trigger::Dependencies,
    ];

    /// Stable name, used as the listener name in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectView => "project_view",
            Self::ForcedRender => "forced_render",
            Self::ExternalResources => "external_resources",
            Self::ModulesSynced => "modules_synced",
            Self::Code => "code",
            Self::CurrentModule => "current_module",
            Self::Structure => "structure",
            Self::Sandbox => "sandbox",
            Self::Dependencies => "dependencies",
        }
    }

    /// Whether this trigger goes through the live-preview settings gate.
    #[must_use]
    pub const fn is_settings_gated(self) -> bool {
        matches!(self, Self::Code | Self::CurrentModule | Self::Structure)
    }
}

/// What a re-run request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Live preview is off; nothing was sent.
    Skipped,
    /// `execute_code` was sent.
    Queued,
    /// `execute_code_immediately` was sent.
    Immediate,
}

/// Settings-gated re-run shared by code, module and structure changes.
pub fn run_for_change(
    trigger: Trigger,
    settings: Settings,
    surface: &dyn ExecutionSurface,
) -> Dispatch {
    let decision = if !settings.live_preview_enabled {
        Dispatch::Skipped
    } else if settings.instant_preview_enabled {
        surface.execute_code_immediately();
        Dispatch::Immediate
    } else {
        surface.execute_code();
        Dispatch::Queued
    };
    debug!(trigger = trigger.as_str(), ?decision, "re-run dispatched");
    decision
}

/// Re-run for `trigger`, through the settings gate when the trigger is gated.
///
/// Only meaningful for re-run triggers; `Sandbox` and `Dependencies` have
/// their own surface commands and are treated as immediate here.
pub fn dispatch(trigger: Trigger, settings: Settings, surface: &dyn ExecutionSurface) -> Dispatch {
    if trigger.is_settings_gated() {
        run_for_change(trigger, settings, surface)
    } else {
        execute_now(trigger, surface)
    }
}

/// Unconditional immediate re-run.
pub fn execute_now(trigger: Trigger, surface: &dyn ExecutionSurface) -> Dispatch {
    surface.execute_code_immediately();
    debug!(trigger = trigger.as_str(), "immediate re-run dispatched");
    Dispatch::Immediate
}
