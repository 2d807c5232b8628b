//! Pure domain logic: the event vocabulary, controller state, and the
//! navigation derivation.  No OS, network, or UI dependencies.

pub mod event;
pub mod navigation;
pub mod state;
