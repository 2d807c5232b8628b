//! Shared-storage authorization seam.
//!
//! Browsing local folders requires a platform permission the user may not
//! have granted yet.  `has_authorization` answers from current platform
//! state; `request_authorization` raises the system prompt and delivers the
//! user's answer later over a `oneshot` channel.  Denial is silent
//! degradation: the browse actions simply stay out of the navigation
//! drawer.

use tokio::sync::oneshot;

/// Platform service that knows and requests the shared-storage permission.
#[cfg_attr(test, mockall::automock)]
pub trait StorageAuthority: Send + Sync {
    /// Whether shared storage may be read right now.
    fn has_authorization(&self) -> bool;

    /// Raises the system permission prompt; the user's answer arrives on
    /// the returned channel.  A closed channel counts as denial.
    fn request_authorization(&self) -> oneshot::Receiver<bool>;
}

/// Authority with a fixed answer, for platforms (or builds) where the
/// permission state never changes at runtime.
#[derive(Debug)]
pub struct StaticStorageAuthority {
    granted: bool,
}

impl StaticStorageAuthority {
    pub fn granted() -> Self {
        Self { granted: true }
    }

    pub fn denied() -> Self {
        Self { granted: false }
    }
}

impl StorageAuthority for StaticStorageAuthority {
    fn has_authorization(&self) -> bool {
        self.granted
    }

    fn request_authorization(&self) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(self.granted);
        rx
    }
}
