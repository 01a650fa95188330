#![forbid(unsafe_code)]

//! In-memory editor state with change notification.
//!
//! # Design
//!
//! [`EditorStore`] holds the slice of editor state the preview reads and
//! implements both [`PreviewState`] (reads) and [`GeometrySink`] (the
//! geometry command path). Every mutation bumps a revision and notifies
//! subscribers; [`EditorStore::bind_listeners`] uses that to drive a
//! listener set's evaluation after each change.
//!
//! # Invariants
//!
//! 1. `revision` increments by exactly 1 per mutation that changes state.
//! 2. Subscribers are notified in registration order.
//! 3. Dropping a [`StoreSubscription`] unsubscribes; dead entries are pruned
//!    lazily on the next notification.
//! 4. Callbacks are collected before any runs, so a subscriber may mutate
//!    the store re-entrantly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use livepane_core::{Bounds, PreviewContent, Project, Settings};
use tracing::debug;

use crate::reactive::ListenerSet;
use crate::state::PreviewState;
use crate::surface::{GeometryCommand, GeometrySink};

type CallbackRc = Rc<dyn Fn()>;
type CallbackWeak = Weak<dyn Fn()>;

/// Shared editor state for hosts that do not bring their own store.
pub struct EditorStore {
    project: RefCell<Rc<Project>>,
    settings: Cell<Settings>,
    geometry: Cell<Bounds>,
    project_view: Cell<bool>,
    force_render: Cell<u64>,
    modules_synced: Cell<bool>,
    current_module: RefCell<Option<String>>,
    content: Cell<PreviewContent>,
    revision: Cell<u64>,
    subscribers: RefCell<Vec<CallbackWeak>>,
}

impl fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStore")
            .field("project_id", &self.project.borrow().id)
            .field("settings", &self.settings.get())
            .field("geometry", &self.geometry.get())
            .field("content", &self.content.get())
            .field("revision", &self.revision.get())
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl EditorStore {
    /// Create a store showing `project` in the browser panel.
    ///
    /// Modules start synchronized and the first module, if any, is selected.
    #[must_use]
    pub fn new(project: Project) -> Self {
        let current = project.modules.first().map(|m| m.shortid.clone());
        Self {
            project: RefCell::new(Rc::new(project)),
            settings: Cell::new(Settings::default()),
            geometry: Cell::new(Bounds::default()),
            project_view: Cell::new(false),
            force_render: Cell::new(0),
            modules_synced: Cell::new(true),
            current_module: RefCell::new(current),
            content: Cell::new(PreviewContent::Browser),
            revision: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Number of state-changing mutations so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Replace the whole project.
    pub fn set_project(&self, project: Project) {
        if **self.project.borrow() == project {
            return;
        }
        *self.project.borrow_mut() = Rc::new(project);
        self.changed();
    }

    /// Edit the project in place. Snapshots handed out earlier are unaffected.
    pub fn update_project(&self, f: impl FnOnce(&mut Project)) {
        let changed = {
            let mut current = self.project.borrow_mut();
            let before = Rc::clone(&current);
            f(Rc::make_mut(&mut *current));
            *before != **current
        };
        if changed {
            self.changed();
        }
    }

    /// Replace the preview preferences.
    pub fn set_settings(&self, settings: Settings) {
        if self.settings.replace(settings) != settings {
            self.changed();
        }
    }

    /// Enter or leave the project overview.
    pub fn set_project_view(&self, on: bool) {
        if self.project_view.replace(on) != on {
            self.changed();
        }
    }

    /// Force the preview to re-render.
    pub fn trigger_forced_render(&self) {
        self.force_render.set(self.force_render.get().wrapping_add(1));
        self.changed();
    }

    /// Record whether every module is synchronized.
    pub fn set_all_modules_synced(&self, synced: bool) {
        if self.modules_synced.replace(synced) != synced {
            self.changed();
        }
    }

    /// Open a module in the editor.
    pub fn select_module(&self, shortid: Option<&str>) {
        let next = shortid.map(str::to_owned);
        if *self.current_module.borrow() == next {
            return;
        }
        *self.current_module.borrow_mut() = next;
        self.changed();
    }

    /// Switch the panel shown in the viewport.
    pub fn set_content(&self, content: PreviewContent) {
        if self.content.replace(content) != content {
            self.changed();
        }
    }

    /// Persist bounds produced by a user drag.
    ///
    /// This is the host's own write; the preview runtime never calls it.
    /// Pair every call with [`crate::PreviewPane::on_manual_reposition`]:
    /// the store does not know about the pane, so a docked pane keeps its
    /// alignment and the next container resize replaces the dragged bounds
    /// with the docked ones.
    pub fn drag_viewport(&self, bounds: Bounds) {
        if self.geometry.replace(bounds) != bounds {
            self.changed();
        }
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every mutation, with no arguments; read the
    /// store for the new state.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> StoreSubscription {
        let strong: CallbackRc = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        StoreSubscription { _guard: strong }
    }

    /// Evaluate `set` after every mutation of this store.
    ///
    /// The subscription only holds the registry, so it becomes inert once
    /// the set is disposed.
    pub fn bind_listeners(&self, set: &ListenerSet) -> StoreSubscription {
        let registry = set.registry().clone();
        self.subscribe(move || {
            registry.evaluate_all();
        })
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn changed(&self) {
        self.revision.set(self.revision.get() + 1);
        let callbacks: Vec<CallbackRc> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb();
        }
    }
}

impl PreviewState for EditorStore {
    fn project(&self) -> Rc<Project> {
        Rc::clone(&self.project.borrow())
    }

    fn settings(&self) -> Settings {
        self.settings.get()
    }

    fn geometry(&self) -> Bounds {
        self.geometry.get()
    }

    fn is_in_project_view(&self) -> bool {
        self.project_view.get()
    }

    fn force_render(&self) -> u64 {
        self.force_render.get()
    }

    fn all_modules_synced(&self) -> bool {
        self.modules_synced.get()
    }

    fn current_module_id(&self) -> Option<String> {
        self.current_module.borrow().clone()
    }

    fn content(&self) -> PreviewContent {
        self.content.get()
    }
}

impl GeometrySink for EditorStore {
    fn set_geometry(&self, command: GeometryCommand) {
        debug!(
            source = command.source.as_str(),
            revision = self.revision.get() + 1,
            "applying geometry command"
        );
        self.geometry.set(command.bounds);
        self.changed();
    }
}

/// RAII guard for a store subscriber.
pub struct StoreSubscription {
    _guard: CallbackRc,
}

impl fmt::Debug for StoreSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSubscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::GeometrySource;
    use livepane_core::Module;

    fn store() -> EditorStore {
        EditorStore::new(
            Project::new("p")
                .with_module(Module::new("a", None, "index.js", "x"))
                .with_module(Module::new("b", None, "package.json", "{}")),
        )
    }

    #[test]
    fn new_selects_first_module() {
        let s = store();
        assert_eq!(s.current_module_id().as_deref(), Some("a"));
        assert!(s.all_modules_synced());
        assert_eq!(s.content(), PreviewContent::Browser);
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn no_op_mutations_do_not_bump_revision() {
        let s = store();
        s.set_project_view(false);
        s.set_all_modules_synced(true);
        s.select_module(Some("a"));
        s.update_project(|_| {});
        s.set_settings(Settings::default());
        s.set_content(PreviewContent::Browser);
        s.drag_viewport(Bounds::default());
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn update_project_keeps_old_snapshots() {
        let s = store();
        let before = s.project();
        s.update_project(|p| p.modules[0].code.push('y'));
        assert_eq!(before.modules[0].code, "x");
        assert_eq!(s.project().modules[0].code, "xy");
        assert_eq!(s.revision(), 1);
    }

    #[test]
    fn forced_render_always_bumps() {
        let s = store();
        s.trigger_forced_render();
        s.trigger_forced_render();
        assert_eq!(s.force_render(), 2);
        assert_eq!(s.revision(), 2);
    }

    #[test]
    fn subscribers_see_every_change_until_dropped() {
        let s = store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = s.subscribe(move || hits_clone.set(hits_clone.get() + 1));

        s.set_project_view(true);
        s.trigger_forced_render();
        assert_eq!(hits.get(), 2);

        drop(sub);
        s.trigger_forced_render();
        assert_eq!(hits.get(), 2);
        assert_eq!(s.subscriber_count(), 0);
    }

    #[test]
    fn geometry_command_updates_bounds() {
        let s = store();
        let bounds = Bounds::new(0.0, 0.0, 500.0, 484.0);
        s.set_geometry(GeometryCommand {
            bounds,
            source: GeometrySource::DockRight,
        });
        assert_eq!(s.geometry(), bounds);
        assert_eq!(s.revision(), 1);
    }

    #[test]
    fn package_json_comes_from_root_module() {
        let s = store();
        assert_eq!(s.package_json_code().as_deref(), Some("{}"));
        s.update_project(|p| p.modules[1].directory_shortid = Some("src".into()));
        assert_eq!(s.package_json_code(), None);
    }

    #[test]
    fn reentrant_subscriber_may_mutate() {
        let s = Rc::new(store());
        let weak = Rc::downgrade(&s);
        let _sub = s.subscribe(move || {
            if let Some(s) = weak.upgrade() {
                if s.force_render() == 1 {
                    s.trigger_forced_render();
                }
            }
        });
        s.trigger_forced_render();
        assert_eq!(s.force_render(), 2);
    }
}
