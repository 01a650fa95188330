#![forbid(unsafe_code)]

//! livepane runtime
//!
//! Keeps an embedded execution surface in step with the editor state and
//! manages the floating viewport that hosts it.
//!
//! # Key Components
//!
//! - [`PreviewPane`] - Mount lifecycle, docking actions, frame props
//! - [`ChangeDetector`] - Registers one listener per watched state facet
//! - [`ListenerRegistry`] / [`ListenerSet`] - Explicit evaluation and disposal
//! - [`dispatch`] / [`run_for_change`] / [`execute_now`] - Re-run dispatch policy
//! - [`AlignmentController`] - Docked/free viewport state machine
//! - [`EditorStore`] - In-memory state tree with change notification
//! - [`PreviewConfig`] - Tunables, loadable from TOML/JSON with `config`
//!
//! # How it fits together
//!
//! ```text
//! state mutation ─▶ ListenerRegistry::evaluate_all ─▶ handler
//!                                                      ├─▶ dispatch ─▶ ExecutionSurface
//!                                                      └─▶ ViewHost refresh ─▶ ExecutionSurface
//! container resize / dock action ─▶ AlignmentController ─▶ GeometrySink::set_geometry
//! ```
//!
//! Everything is single-threaded and synchronous; the surface owns any
//! asynchrony behind its commands.

pub mod alignment;
pub mod config;
pub mod detector;
pub mod dispatch;
pub mod pane;
pub mod reactive;
pub mod state;
pub mod store;
pub mod surface;

pub use alignment::{Alignment, AlignmentController, bottom_bounds, right_bounds, shrink_to_fit};
pub use config::{ConfigError, PreviewConfig};
pub use detector::ChangeDetector;
pub use dispatch::{Dispatch, Trigger, dispatch, execute_now, run_for_change};
pub use pane::{ExtraModule, FrameProps, PreviewPane};
pub use reactive::{Listener, ListenerRegistry, ListenerSet, Liveness};
pub use state::{PACKAGE_JSON_PATH, PreviewState};
pub use store::{EditorStore, StoreSubscription};
pub use surface::{
    ExecutionSurface, GeometryCommand, GeometrySink, GeometrySource, ImmediateViewHost, ViewHost,
};

pub use livepane_core::{
    Bounds, ContainerSize, Directory, Module, PreviewContent, Project, Settings,
    StructuralFingerprint,
};
