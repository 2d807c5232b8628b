//! aircast-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does aircast-client do? (for beginners)
//!
//! The *client* is the device holding the media: it browses local folders
//! and sends photos, videos, or a live mirror of its screen to a casting
//! *receiver* (an AirPlay-style device such as a TV) on the local network.
//!
//! The pieces of the client live in independently lifecycled controllers —
//! a foreground UI, a background networking service, dialogs — that never
//! reference each other directly.  This crate provides:
//!
//! 1. The [`application::message_bus::MessageBus`] those controllers use to
//!    exchange typed [`aircast_core::CastEvent`]s.
//! 2. The [`application::capture_flow::CaptureAuthorizationFlow`] that turns
//!    a "Mirror Screen" tap into a capture capability token (or nothing, if
//!    the user declines).
//! 3. The [`application::browse_folder::FolderBrowser`] tracking which
//!    folder is shown and how, persisted across restarts.
//! 4. The [`application::ui_controller::UiController`] tying the above to a
//!    presentable snapshot of subtitle + navigation drawer.
//! 5. Infrastructure adapters behind trait seams: TOML settings storage,
//!    the platform consent provider, the storage authority, and the
//!    short-message notification surface.

/// Application layer: the bus, flows, and controllers.
pub mod application;

/// Infrastructure layer: settings persistence, platform capability
/// providers, and the notification surface.
pub mod infrastructure;
