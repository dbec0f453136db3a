//! Application-level orchestration.
//!
//! Owns the bridge between the UI thread and the async backend: requests go in,
//! outcomes come back. UI layers never await the network themselves.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
