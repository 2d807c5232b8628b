//! The event vocabulary exchanged between controllers over the message bus.
//!
//! Events are the only coupling between controllers: the foreground UI, the
//! background networking service, and dialogs never hold references to each
//! other.  A controller broadcasts a `CastEvent`; every attached controller
//! receives its own copy and mutates its own state in response.
//!
//! # Closed enumeration (for beginners)
//!
//! Earlier casting clients dispatched on free-form integer or string tags,
//! which meant a typo compiled fine and silently delivered nothing.  Here
//! both the event and its payload are a single Rust `enum`, so a `match` on
//! a `CastEvent` is checked for exhaustiveness at compile time: adding a
//! variant breaks every handler that forgot it.

use std::path::PathBuf;

use uuid::Uuid;

// ── Capture capability token ──────────────────────────────────────────────────

/// Opaque capability granting one screen-mirroring session.
///
/// A token is issued by the platform consent provider after the user grants
/// screen-capture permission, travels once through a
/// [`CastEvent::CaptureStartRequested`] broadcast, and is held by the
/// mirroring service for the duration of the session.  It is never
/// serialized or persisted; the session id exists only for log correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureToken {
    session_id: Uuid,
}

impl CaptureToken {
    /// Issues a fresh token for a new capture session.
    ///
    /// Only consent providers should call this, after the platform has
    /// actually granted capture permission.
    pub fn issue() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }

    /// Session identifier, for log correlation only.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// A typed event broadcast on the message bus.
///
/// Immutable once constructed.  `Clone` because the bus fans one broadcast
/// out to every live subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastEvent {
    /// A casting connection to a receiver was established.
    /// Carries the receiver's human-readable name (e.g. `"Living Room"`).
    ConnectionEstablished { receiver: String },
    /// The casting connection was lost or closed.
    ConnectionLost,
    /// The persisted folder-layout preference changed; controllers that
    /// present folder contents re-read it.
    LayoutChanged,
    /// Screen-capture consent was granted; the mirroring service should
    /// start a session using the enclosed capability token.
    CaptureStartRequested(CaptureToken),
    /// The user selected a photo to display on the receiver.
    PhotoSelected(PathBuf),
    /// The user selected an audio or video file to play on the receiver.
    PlaybackRequested(PathBuf),
    /// The user asked the whole application to shut down.
    ExitRequested,
}

/// Fieldless discriminant of a [`CastEvent`], used for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ConnectionEstablished,
    ConnectionLost,
    LayoutChanged,
    CaptureStartRequested,
    PhotoSelected,
    PlaybackRequested,
    ExitRequested,
}

impl CastEvent {
    /// Returns the payload-free discriminant for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            CastEvent::ConnectionEstablished { .. } => EventKind::ConnectionEstablished,
            CastEvent::ConnectionLost => EventKind::ConnectionLost,
            CastEvent::LayoutChanged => EventKind::LayoutChanged,
            CastEvent::CaptureStartRequested(_) => EventKind::CaptureStartRequested,
            CastEvent::PhotoSelected(_) => EventKind::PhotoSelected,
            CastEvent::PlaybackRequested(_) => EventKind::PlaybackRequested,
            CastEvent::ExitRequested => EventKind::ExitRequested,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
