//! Short user-visible message surface (the "toast" of the original client).
//!
//! Everything routed through here is non-fatal by definition: an
//! unrecognised file type, a settings write that failed, a denied
//! permission.  The rendering layer decides how the message is shown; the
//! core only hands over the text.

use std::sync::Mutex;

use tracing::info;

/// Sink for short, non-fatal, user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that emits messages to the tracing log.
///
/// Used by the binary when no UI surface is attached; a windowed build
/// replaces this with the platform toast adapter.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!(target: "aircast::notify", "{message}");
    }
}

/// Notifier that records every message, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages notified so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .expect("messages lock poisoned")
            .push(message.to_string());
    }
}
