//! Screen-capture consent provider seam.
//!
//! Asking the user for permission to capture the screen is a platform
//! service (a system consent dialog) that answers *later*, on its own
//! schedule.  The seam therefore models consent as two explicit messages:
//! the request (`request_consent`) and an asynchronous response delivered
//! over a `oneshot` channel — never as a synchronous return value.
//!
//! Some platforms cannot capture at all; there `is_available` returns
//! `false` and the capture flow silently treats the feature as absent.

use aircast_core::CaptureToken;
use tokio::sync::oneshot;

pub mod scripted;

pub use scripted::ScriptedConsentProvider;

/// Outcome of one consent request.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsentOutcome {
    /// The user granted capture; the enclosed token authorises one session.
    Granted(CaptureToken),
    /// The user declined.
    Denied,
}

/// Platform service that asks the user for screen-capture permission.
pub trait ConsentProvider: Send + Sync {
    /// Whether this platform supports screen capture at all.
    fn is_available(&self) -> bool;

    /// Issues a consent request and returns the channel the response will
    /// arrive on.  A dropped sender (closed channel) means the provider
    /// became unreachable after the request was issued; callers treat that
    /// the same as unavailability.
    fn request_consent(&self) -> oneshot::Receiver<ConsentOutcome>;
}

/// Provider for platforms without any capture support.
///
/// `is_available` is `false`, so a correctly behaving caller never issues a
/// request; if one does anyway, the returned channel is already closed.
#[derive(Debug, Default)]
pub struct UnavailableConsentProvider;

impl ConsentProvider for UnavailableConsentProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn request_consent(&self) -> oneshot::Receiver<ConsentOutcome> {
        let (_tx, rx) = oneshot::channel();
        rx
    }
}
