//! Scripted consent provider for tests and headless builds.
//!
//! Lets callers decide up front how the "user" answers, without a real
//! system dialog.  In a shipping build this is replaced by the OS
//! projection/consent adapter.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use aircast_core::CaptureToken;
use tokio::sync::oneshot;

use super::{ConsentOutcome, ConsentProvider};

/// How the scripted "user" answers each consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentScript {
    /// Grant immediately with a freshly issued token.
    Grant,
    /// Deny immediately.
    Deny,
    /// Never answer; the request channel stays open until the provider is
    /// dropped or [`ScriptedConsentProvider::respond_pending`] is called.
    Silent,
}

/// A [`ConsentProvider`] that answers according to a fixed script.
pub struct ScriptedConsentProvider {
    script: ConsentScript,
    request_count: AtomicU32,
    // Held senders for Silent requests, so the channels stay open.
    pending: Mutex<Vec<oneshot::Sender<ConsentOutcome>>>,
}

impl ScriptedConsentProvider {
    pub fn new(script: ConsentScript) -> Self {
        Self {
            script,
            request_count: AtomicU32::new(0),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Provider that grants every request.
    pub fn granting() -> Self {
        Self::new(ConsentScript::Grant)
    }

    /// Provider that denies every request.
    pub fn denying() -> Self {
        Self::new(ConsentScript::Deny)
    }

    /// Provider that never answers.
    pub fn silent() -> Self {
        Self::new(ConsentScript::Silent)
    }

    /// Number of consent requests issued so far.
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Acquire)
    }

    /// Answers every outstanding Silent request with `outcome`.
    pub fn respond_pending(&self, outcome: impl Fn() -> ConsentOutcome) {
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        for tx in pending.drain(..) {
            let _ = tx.send(outcome());
        }
    }
}

impl ConsentProvider for ScriptedConsentProvider {
    fn is_available(&self) -> bool {
        true
    }

    fn request_consent(&self) -> oneshot::Receiver<ConsentOutcome> {
        self.request_count.fetch_add(1, Ordering::AcqRel);
        let (tx, rx) = oneshot::channel();
        match self.script {
            ConsentScript::Grant => {
                let _ = tx.send(ConsentOutcome::Granted(CaptureToken::issue()));
            }
            ConsentScript::Deny => {
                let _ = tx.send(ConsentOutcome::Denied);
            }
            ConsentScript::Silent => {
                self.pending.lock().expect("pending lock poisoned").push(tx);
            }
        }
        rx
    }
}
