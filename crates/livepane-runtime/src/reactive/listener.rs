#![forbid(unsafe_code)]

//! Listener registry with explicit evaluation and disposal.
//!
//! # Design
//!
//! A [`Listener<T>`] pairs a selector `Fn() -> T` with a handler `Fn(&T)`.
//! The selector is sampled once at registration to seed the last observed
//! value; after that, each [`ListenerRegistry::evaluate_all`] pass re-runs the
//! selector and calls the handler only when the new value differs from the
//! last one (by `PartialEq`). Listeners are independent: no ordering between
//! handlers is promised beyond "one pass visits every listener once".
//!
//! Evaluation is push-driven by whoever owns the state: call
//! `evaluate_all()` after each mutation (see [`crate::EditorStore::bind_listeners`]).
//!
//! # Invariants
//!
//! 1. A handler fires at most once per pass, and only on an actual change.
//! 2. Registration never fires the handler.
//! 3. After [`ListenerRegistry::dispose`] returns, no handler runs again,
//!    including the remainder of a pass that was in progress.
//! 4. `dispose()` is idempotent.
//!
//! # Failure Modes
//!
//! - **Re-entrant evaluation**: a handler that mutates state may cause
//!   `evaluate_all()` to be called again while a pass is running. The nested
//!   call returns immediately and schedules another pass, which the outer
//!   call runs before returning.
//! - **Feedback loops**: handlers that keep changing each other's inputs are
//!   cut off after `max_passes` passes with a warning.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, info_span, warn};
use web_time::Instant;

/// Default cap on evaluation passes per `evaluate_all()` call.
pub const DEFAULT_MAX_PASSES: u32 = 32;

/// Type-erased view of a listener, as stored by the registry.
trait Watch {
    fn name(&self) -> &'static str;

    /// Re-sample the selector; run the handler if the value changed.
    fn poll(&self) -> bool;
}

/// Watches one derived value and reacts to its changes.
pub struct Listener<T> {
    name: &'static str,
    selector: Box<dyn Fn() -> T>,
    last: RefCell<T>,
    handler: Box<dyn Fn(&T)>,
}

impl<T: PartialEq + 'static> Listener<T> {
    /// Create a listener, sampling `selector` once for the initial value.
    pub fn new(
        name: &'static str,
        selector: impl Fn() -> T + 'static,
        handler: impl Fn(&T) + 'static,
    ) -> Self {
        let initial = selector();
        Self {
            name,
            selector: Box::new(selector),
            last: RefCell::new(initial),
            handler: Box::new(handler),
        }
    }

    /// Name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: PartialEq + 'static> Watch for Listener<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn poll(&self) -> bool {
        let next = (self.selector)();
        {
            let mut last = self.last.borrow_mut();
            if *last == next {
                return false;
            }
            *last = next;
        }
        // Re-entrant evaluation is deferred by the registry, so nothing else
        // borrows `last` mutably while the handler runs.
        let last = self.last.borrow();
        (self.handler)(&last);
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

/// Shared interior for [`ListenerRegistry`].
struct RegistryInner {
    listeners: RefCell<Vec<Rc<dyn Watch>>>,
    disposed: Rc<Cell<bool>>,
    evaluating: Cell<bool>,
    rerun: Cell<bool>,
    max_passes: u32,
}

/// Owns a set of listeners and drives their evaluation.
///
/// Cloning creates another handle to the **same** registry.
#[derive(Clone)]
pub struct ListenerRegistry {
    inner: Rc<RegistryInner>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .field("disposed", &self.is_disposed())
            .field("evaluating", &self.inner.evaluating.get())
            .finish()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

impl ListenerRegistry {
    /// Create an empty registry. `max_passes` is clamped to at least 1.
    #[must_use]
    pub fn new(max_passes: u32) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                listeners: RefCell::new(Vec::new()),
                disposed: Rc::new(Cell::new(false)),
                evaluating: Cell::new(false),
                rerun: Cell::new(false),
                max_passes: max_passes.max(1),
            }),
        }
    }

    /// Add a listener. Ignored (with a warning) once the registry is disposed.
    pub fn register<T: PartialEq + 'static>(&self, listener: Listener<T>) {
        if self.is_disposed() {
            warn!(
                listener = listener.name(),
                "listener registered after disposal; ignoring"
            );
            return;
        }
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// A cheap token that reports whether this registry has been disposed.
    ///
    /// Handlers that schedule deferred work capture this instead of the
    /// registry itself, so they neither keep it alive nor run after it is gone.
    #[must_use]
    pub fn liveness(&self) -> Liveness {
        Liveness {
            disposed: Rc::clone(&self.inner.disposed),
        }
    }

    /// Evaluate every listener, firing handlers whose value changed.
    ///
    /// Returns the number of handler invocations across all passes. A call
    /// made while a pass is running returns 0 and schedules another pass.
    pub fn evaluate_all(&self) -> usize {
        let inner = &self.inner;
        if inner.disposed.get() {
            return 0;
        }
        if inner.evaluating.get() {
            inner.rerun.set(true);
            return 0;
        }

        let _evaluating = EvaluatingGuard::enter(&inner.evaluating);
        let start = Instant::now();
        let span = info_span!(
            "livepane.evaluate",
            listeners = self.len() as u64,
            passes = tracing::field::Empty,
            fired = tracing::field::Empty,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();

        let mut fired = 0usize;
        let mut passes = 0u32;
        loop {
            passes += 1;
            inner.rerun.set(false);
            // Snapshot so handlers may register or dispose without holding the borrow.
            let snapshot: Vec<Rc<dyn Watch>> = inner.listeners.borrow().clone();
            for listener in &snapshot {
                if inner.disposed.get() {
                    break;
                }
                if listener.poll() {
                    fired += 1;
                    debug!(listener = listener.name(), pass = passes, "listener fired");
                }
            }
            if inner.disposed.get() || !inner.rerun.get() {
                break;
            }
            if passes >= inner.max_passes {
                warn!(
                    max_passes = inner.max_passes,
                    "listener evaluation did not settle; remaining changes deferred"
                );
                break;
            }
        }

        span.record("passes", u64::from(passes));
        span.record("fired", fired as u64);
        span.record("duration_us", start.elapsed().as_micros() as u64);
        fired
    }

    /// Unsubscribe every listener.
    ///
    /// Returns `true` if this call performed the disposal, `false` if the
    /// registry was already disposed.
    pub fn dispose(&self) -> bool {
        if self.inner.disposed.replace(true) {
            return false;
        }
        let dropped = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        info!(listeners = dropped.len() as u64, "listener set disposed");
        drop(dropped);
        true
    }
}

/// Clears the `evaluating` flag even if a handler panics.
struct EvaluatingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> EvaluatingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for EvaluatingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Disposal token for a [`ListenerRegistry`]; see [`ListenerRegistry::liveness`].
#[derive(Clone, Debug)]
pub struct Liveness {
    disposed: Rc<Cell<bool>>,
}

impl Liveness {
    /// Whether the owning registry is still active.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.disposed.get()
    }
}

/// Disposer for one mount's listeners.
///
/// Dropping the set disposes it, so no listener outlives the handle that
/// owns its mount. Calling [`dispose`](Self::dispose) more than once is safe.
#[must_use = "dropping a ListenerSet immediately disposes its listeners"]
pub struct ListenerSet {
    registry: ListenerRegistry,
}

impl ListenerSet {
    /// Wrap a registry in an owning disposer.
    pub fn new(registry: ListenerRegistry) -> Self {
        Self { registry }
    }

    /// Unsubscribe every listener. Idempotent.
    pub fn dispose(&self) {
        self.registry.dispose();
    }

    /// Whether the set has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.registry.is_disposed()
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Shorthand for `registry().evaluate_all()`.
    pub fn evaluate(&self) -> usize {
        self.registry.evaluate_all()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.registry.dispose();
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("registry", &self.registry)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
