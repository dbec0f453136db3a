//! Client state and the view router.
//!
//! `AppState` is a plain value owned by whoever drives the client (the TUI
//! thread or the text-mode runner). The controller mutates it in response to
//! actions and resolved requests; renderers only read it.

mod controller;
pub mod state;

pub use controller::{drive, perform, Action, Controller, Outcome, Request};
pub use state::{AppState, Content, View};
