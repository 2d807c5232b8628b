//! Two-step state machine turning a "Mirror Screen" gesture into a capture
//! capability token.
//!
//! ```text
//! Idle ──user requests capture──► AwaitingConsent
//!   ▲                                 │
//!   │  provider unavailable / denied /│ timeout      (no broadcast)
//!   ├─────────────────────────────────┤
//!   │  granted: broadcast CaptureStartRequested(token)
//!   └─────────────────────────────────┘
//! ```
//!
//! The consent step is a genuine scheduling boundary: the provider answers
//! later on its own schedule, so the requesting controller receives the
//! outcome as an asynchronous bus event, never as a return value.  The flow
//! re-arms to `Idle` after every outcome, granted or not.
//!
//! An unreachable provider is "capture unavailable on this platform", not a
//! failure: the flow aborts silently, with no broadcast and no user-visible
//! error.  The original client's consent wait was unbounded; here the wait
//! is capped by a configurable timeout treated exactly like a denial.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use aircast_core::CastEvent;
use tracing::{debug, info};

use crate::infrastructure::consent::{ConsentOutcome, ConsentProvider};

use super::message_bus::MessageBus;

/// How long the flow waits for the user to answer the consent dialog
/// before treating the request as denied.
pub const DEFAULT_CONSENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Observable state of the flow.  `Granted`/`Denied` are transient — the
/// flow re-arms to `Idle` as part of dispatching the outcome, so these two
/// are never observable between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingConsent,
}

/// The capture-authorization flow.
///
/// Cloneable so a controller can hand a copy to a spawned task; all clones
/// share one state cell.
#[derive(Clone)]
pub struct CaptureAuthorizationFlow {
    state: Arc<Mutex<FlowState>>,
    provider: Arc<dyn ConsentProvider>,
    bus: MessageBus,
    consent_timeout: Duration,
}

impl CaptureAuthorizationFlow {
    pub fn new(bus: MessageBus, provider: Arc<dyn ConsentProvider>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FlowState::Idle)),
            provider,
            bus,
            consent_timeout: DEFAULT_CONSENT_TIMEOUT,
        }
    }

    /// Overrides the consent timeout (tests use short windows).
    pub fn with_consent_timeout(mut self, timeout: Duration) -> Self {
        self.consent_timeout = timeout;
        self
    }

    /// Current state of the flow.
    pub fn state(&self) -> FlowState {
        *self.state.lock().expect("flow state lock poisoned")
    }

    /// Whether this platform can mirror at all; controllers use this to
    /// gate the Mirror navigation item.
    pub fn capture_capable(&self) -> bool {
        self.provider.is_available()
    }

    /// Fire-and-forget entry point for UI code: runs the whole request on
    /// a spawned task.  Must be called from within a Tokio runtime.
    pub fn request_capture(&self) {
        let flow = self.clone();
        tokio::spawn(async move {
            flow.execute().await;
        });
    }

    /// Runs one complete capture request: consent, outcome, re-arm.
    pub async fn execute(&self) {
        if !self.begin_request() {
            return;
        }

        let rx = self.provider.request_consent();
        let outcome = match tokio::time::timeout(self.consent_timeout, rx).await {
            // Provider answered.
            Ok(Ok(outcome)) => Some(outcome),
            // Sender dropped: provider became unreachable mid-request.
            Ok(Err(_)) => None,
            // No answer within the window; treated as denial.
            Err(_) => {
                debug!("consent request timed out");
                None
            }
        };
        self.finish_request(outcome);
    }

    /// `Idle → AwaitingConsent` transition.  Returns `false` (and does
    /// nothing) if a request is already in flight or the platform has no
    /// capture support.
    fn begin_request(&self) -> bool {
        if !self.provider.is_available() {
            debug!("capture unavailable on this platform");
            return false;
        }
        let mut state = self.state.lock().expect("flow state lock poisoned");
        if *state != FlowState::Idle {
            debug!("capture request ignored, consent already pending");
            return false;
        }
        *state = FlowState::AwaitingConsent;
        true
    }

    /// `AwaitingConsent → Idle` transition, broadcasting on grant.
    ///
    /// `None` covers every silent-abort case: provider unreachable, consent
    /// denied upstream, timeout.
    fn finish_request(&self, outcome: Option<ConsentOutcome>) {
        {
            let mut state = self.state.lock().expect("flow state lock poisoned");
            *state = FlowState::Idle;
        }
        match outcome {
            Some(ConsentOutcome::Granted(token)) => {
                info!(session_id = %token.session_id(), "capture consent granted");
                self.bus.broadcast(CastEvent::CaptureStartRequested(token));
            }
            Some(ConsentOutcome::Denied) => {
                debug!("capture consent denied");
            }
            None => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
