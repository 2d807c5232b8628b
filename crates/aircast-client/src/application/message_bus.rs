//! Typed publish/subscribe message bus connecting the client's controllers.
//!
//! One `MessageBus` instance is constructed at process start and handed (by
//! cheap clone) to every component that publishes or subscribes — there is
//! deliberately no global registry reachable from anywhere.
//!
//! # Delivery model (for beginners)
//!
//! Each registration spawns one dedicated Tokio task draining an unbounded
//! queue; that task *is* the subscriber's execution context, and the handler
//! runs only there.  Because a single task applies all of a controller's
//! events sequentially, no two mutations of the same controller state can
//! ever interleave — a single-writer-per-controller discipline enforced by
//! the dispatch mechanism rather than by locks.
//!
//! ```text
//! broadcast(event)                 subscriber task "ui"
//! ────────────────                 ───────────────────
//! clone event per subscriber  ──►  queue ──► handler(event)   (FIFO)
//! return immediately               queue ──► handler(event)
//! ```
//!
//! Guarantees and non-guarantees:
//!
//! - `broadcast` never blocks on handler execution; it returns once the
//!   event is queued for every live subscriber.
//! - Events reach a single subscriber in broadcast order (FIFO per
//!   subscriber); a subscriber finishes event N before starting N+1, but
//!   several events may be pending at once.
//! - No ordering is promised *across* distinct subscribers.
//! - No backpressure: the queues are unbounded.  Accepted limitation — a
//!   controller that stops draining simply accumulates memory.
//!
//! # Liveness
//!
//! Every registration returns a [`Subscription`] token carrying a liveness
//! flag and a generation number.  Revoking the token (or replacing the
//! binding under the same id) clears the flag; the next broadcast skips the
//! dead entry silently and prunes it from the registry in the same pass.
//! The generation number guards against a stale token tearing down a newer
//! binding registered under the same id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use aircast_core::CastEvent;
use tokio::sync::mpsc;
use tracing::{debug, trace};

// ── Registry internals ────────────────────────────────────────────────────────

struct SubscriberEntry {
    tx: mpsc::UnboundedSender<CastEvent>,
    alive: Arc<AtomicBool>,
    generation: u64,
}

struct BusInner {
    subscribers: RwLock<HashMap<String, SubscriberEntry>>,
    next_generation: AtomicU64,
}

// ── Public bus handle ─────────────────────────────────────────────────────────

/// Handle to the process-wide message bus.  Cloning is cheap; all clones
/// share one subscriber registry.
#[derive(Clone)]
pub struct MessageBus {
    inner: Arc<BusInner>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(HashMap::new()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Binds `handler` to `id`, spawning the subscriber's execution context.
    ///
    /// Overwrites any previous binding for the same `id` without error (last
    /// writer wins); the replaced binding is revoked immediately, so events
    /// still queued for it are dropped and its handler never runs again.
    ///
    /// Must be called from within a Tokio runtime.  The returned
    /// [`Subscription`] is the owner's teardown handle; `unregister` by id
    /// remains available as a safety net.
    pub fn register(
        &self,
        id: impl Into<String>,
        handler: impl FnMut(CastEvent) + Send + 'static,
    ) -> Subscription {
        let id = id.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<CastEvent>();
        let alive = Arc::new(AtomicBool::new(true));
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);

        let task_alive = Arc::clone(&alive);
        let mut handler = handler;
        tokio::spawn(async move {
            // The subscriber's execution context: one event at a time, in
            // broadcast order, until the queue closes or the owner revokes.
            while let Some(event) = rx.recv().await {
                if !task_alive.load(Ordering::Acquire) {
                    break;
                }
                handler(event);
            }
        });

        let replaced = self
            .inner
            .subscribers
            .write()
            .expect("subscriber registry lock poisoned")
            .insert(
                id.clone(),
                SubscriberEntry {
                    tx,
                    alive: Arc::clone(&alive),
                    generation,
                },
            );
        if let Some(old) = replaced {
            old.alive.store(false, Ordering::Release);
            debug!(id = %id, "replaced existing subscription");
        } else {
            debug!(id = %id, "registered subscription");
        }

        Subscription {
            id,
            generation,
            alive,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Removes the binding for `id`.  No-op (not an error) when absent.
    pub fn unregister(&self, id: &str) {
        let removed = self
            .inner
            .subscribers
            .write()
            .expect("subscriber registry lock poisoned")
            .remove(id);
        if let Some(entry) = removed {
            entry.alive.store(false, Ordering::Release);
            debug!(id = %id, "unregistered subscription");
        }
    }

    /// Queues `event` for every live subscriber and returns immediately.
    ///
    /// Dead subscribers (revoked liveness flag or gone task) are skipped
    /// silently and pruned lazily during this pass.  Safe to call
    /// concurrently from any thread or task; requires no runtime.
    pub fn broadcast(&self, event: CastEvent) {
        let mut dead: Vec<(String, u64)> = Vec::new();
        {
            let subs = self
                .inner
                .subscribers
                .read()
                .expect("subscriber registry lock poisoned");
            trace!(kind = ?event.kind(), subscribers = subs.len(), "broadcast");
            for (id, entry) in subs.iter() {
                if !entry.alive.load(Ordering::Acquire) {
                    dead.push((id.clone(), entry.generation));
                    continue;
                }
                if entry.tx.send(event.clone()).is_err() {
                    dead.push((id.clone(), entry.generation));
                }
            }
        }

        if !dead.is_empty() {
            let mut subs = self
                .inner
                .subscribers
                .write()
                .expect("subscriber registry lock poisoned");
            for (id, generation) in dead {
                // Only prune the exact binding observed dead; the id may have
                // been re-registered between the read and write passes.
                if subs.get(&id).is_some_and(|e| e.generation == generation) {
                    subs.remove(&id);
                    debug!(id = %id, "pruned dead subscriber");
                }
            }
        }
    }

    /// Number of bindings currently in the registry (dead-but-unpruned
    /// entries included).  Diagnostics only.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .expect("subscriber registry lock poisoned")
            .len()
    }
}

// ── Subscription token ────────────────────────────────────────────────────────

/// Owner-held handle for one bus registration.
///
/// Dropping the token does *not* detach the subscription — teardown is the
/// owner's explicit responsibility, matching controller lifecycles where
/// the handle may be stored apart from the event loop that uses it.
pub struct Subscription {
    id: String,
    generation: u64,
    alive: Arc<AtomicBool>,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// The id this subscription was registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the handler can still receive events.
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Clears the liveness flag without touching the registry: queued events
    /// are dropped and the handler never runs again.  The registry entry is
    /// pruned lazily by the next broadcast.
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Revokes and removes the registry entry eagerly.
    ///
    /// If the id has since been re-registered, the newer binding is left
    /// untouched (generation check).
    pub fn dispose(self) {
        self.revoke();
        if let Some(inner) = self.bus.upgrade() {
            let mut subs = inner
                .subscribers
                .write()
                .expect("subscriber registry lock poisoned");
            if subs
                .get(&self.id)
                .is_some_and(|e| e.generation == self.generation)
            {
                subs.remove(&self.id);
                debug!(id = %self.id, "disposed subscription");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
