//! Infrastructure layer: adapters between the application core and the
//! platform.
//!
//! Every concern sits behind a trait seam so the application layer can be
//! tested without a real OS:
//!
//! - [`consent`] — the screen-capture consent provider.
//! - [`permissions`] — the shared-storage authority.
//! - [`notify`] — the short user-visible message surface.
//! - [`settings`] — TOML persistence for the two browsing preferences.

pub mod consent;
pub mod notify;
pub mod permissions;
pub mod settings;
