#![forbid(unsafe_code)]

//! livepane core
//!
//! Plain data shared by the livepane runtime: the project model read from the
//! editor state tree, pixel geometry for the floating preview viewport, and
//! the structural fingerprint used to tell "a file changed" apart from "the
//! file tree changed".
//!
//! # Key Components
//!
//! - [`Project`], [`Module`], [`Directory`], [`Settings`] - Editor state as seen by the preview
//! - [`Bounds`], [`ContainerSize`] - Viewport geometry in pixels
//! - [`StructuralFingerprint`] - Content-independent topology key
//! - [`content_signature`] - Content key over every module's code
//!
//! Nothing in this crate performs I/O or holds shared state.

pub mod fingerprint;
pub mod geometry;
pub mod project;

pub use fingerprint::{StructuralFingerprint, content_signature};
pub use geometry::{Bounds, ContainerSize};
pub use project::{Directory, Module, PreviewContent, Project, Settings};
