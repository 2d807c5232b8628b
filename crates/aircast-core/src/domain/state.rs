//! Per-controller state derived from received bus events.
//!
//! Each controller owns exactly one `ControllerState`.  It is created when
//! the controller attaches to the bus, mutated only from that controller's
//! own event handler, and discarded on detach.  No other component ever
//! writes it — the single-writer discipline is enforced by the bus dispatch
//! mechanism, not by locks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::CastEvent;

// ── Presentation enums ────────────────────────────────────────────────────────

/// How folder contents are presented.
///
/// Persisted under the `folder_layout` settings key as `"list"` / `"grid"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Single-column list.  The default when no preference is stored.
    #[default]
    List,
    /// Thumbnail grid.
    Grid,
}

/// Coarse content classification of a browsable entry.
///
/// Classification itself (MIME sniffing, extension heuristics) is an
/// external collaborator's job; the core only dispatches on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Video,
    Audio,
    /// Anything the classifier did not recognise.
    Unknown,
}

// ── Controller state ──────────────────────────────────────────────────────────

/// The state a controller derives from received events.
///
/// Invariant: `connection_label.is_some()` iff `connected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    /// Whether a casting connection to a receiver is currently up.
    pub connected: bool,
    /// The connected receiver's display name; `None` while disconnected.
    pub connection_label: Option<String>,
    /// Whether the platform has granted access to shared storage.
    pub storage_authorized: bool,
    /// Whether this platform can mirror the screen at all.
    pub capture_capable: bool,
    /// The folder whose contents are currently displayed.
    pub selected_folder: PathBuf,
    /// Presentation mode for folder contents.
    pub layout_mode: LayoutMode,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            connected: false,
            connection_label: None,
            storage_authorized: false,
            capture_capable: false,
            selected_folder: PathBuf::new(),
            layout_mode: LayoutMode::List,
        }
    }
}

impl ControllerState {
    /// Applies a bus event, mutating exactly the fields the event implies.
    ///
    /// Idempotent: applying the same event twice in succession yields the
    /// same state as applying it once.  Events that target other concerns
    /// (photo selection, playback, exit) leave this state untouched — the
    /// owning controller reacts to them separately.
    pub fn apply(&mut self, event: &CastEvent) {
        match event {
            CastEvent::ConnectionEstablished { receiver } => {
                self.connected = true;
                self.connection_label = Some(receiver.clone());
                debug!(receiver = %receiver, "connection established");
            }
            CastEvent::ConnectionLost => {
                self.connected = false;
                self.connection_label = None;
                debug!("connection lost");
            }
            CastEvent::LayoutChanged
            | CastEvent::CaptureStartRequested(_)
            | CastEvent::PhotoSelected(_)
            | CastEvent::PlaybackRequested(_)
            | CastEvent::ExitRequested => {}
        }
    }

    /// Subtitle shown under the application title: the receiver name while
    /// connected, a fixed placeholder otherwise.
    pub fn subtitle(&self) -> String {
        match &self.connection_label {
            Some(label) => label.clone(),
            None => "Not connected".to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
