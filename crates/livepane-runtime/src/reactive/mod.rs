#![forbid(unsafe_code)]

//! Change listeners over derived values.
//!
//! - [`Listener`] watches one derived value and runs a handler when it changes.
//! - [`ListenerRegistry`] evaluates a set of listeners and owns their lifetime.
//! - [`ListenerSet`] is the disposer handed out for one mount.

pub mod listener;

pub use listener::{Listener, ListenerRegistry, ListenerSet, Liveness};
