//! # aircast-core
//!
//! Shared domain library for the AirCast client containing the typed event
//! vocabulary, per-controller state, and the navigation-availability
//! derivation.
//!
//! This crate is used by the client application and by any future background
//! service binary.  It has zero dependencies on OS APIs, UI frameworks, or
//! network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! AirCast is a media-casting client: it sends photos, videos, and a live
//! mirror of the local screen to a receiver (an AirPlay-style device such as
//! a TV) on the local network.  The client is built from independently
//! lifecycled *controllers* — a foreground UI, a background networking
//! service, dialogs — that never hold direct references to each other.
//! Instead they exchange typed events over a process-wide message bus.
//!
//! This crate (`aircast-core`) is the shared foundation.  It defines:
//!
//! - **`domain::event`** – The closed set of events controllers exchange
//!   (`CastEvent`), and the opaque `CaptureToken` capability that authorises
//!   one screen-mirroring session.
//!
//! - **`domain::state`** – `ControllerState`: the booleans and enums each
//!   controller derives from received events (connection status, storage
//!   authorization, capture capability, selected folder, layout mode).
//!
//! - **`domain::navigation`** – A pure function from `ControllerState` to
//!   the ordered list of currently valid user actions.

// Declare the top-level module.  Rust will look for it in a subdirectory
// with the same name (src/domain/mod.rs).
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `aircast_core::CastEvent` instead of `aircast_core::domain::event::CastEvent`.
pub use domain::event::{CaptureToken, CastEvent, EventKind};
pub use domain::navigation::{rebuild_navigation, ActionTag, IconRef, NavigationItem};
pub use domain::state::{ContentKind, ControllerState, LayoutMode};
