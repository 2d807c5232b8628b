//! Application layer: coordination logic between controllers.
//!
//! - [`message_bus`] — the typed publish/subscribe bus.
//! - [`capture_flow`] — the two-step screen-capture consent state machine.
//! - [`browse_folder`] — folder selection, presentation mode, persistence.
//! - [`ui_controller`] — the foreground controller merging bus events and
//!   UI commands into one task-owned loop.

pub mod browse_folder;
pub mod capture_flow;
pub mod message_bus;
pub mod ui_controller;
