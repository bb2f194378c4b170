//! Transport events and the listener registry.
//!
//! Events are dispatched synchronously to every listener subscribed to
//! their tag at dispatch time. Dispatch iterates a snapshot of the
//! listener list, so a listener unsubscribing itself (or others) mid-
//! dispatch cannot corrupt the iteration; mutations become visible to
//! the next dispatch.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::warn;

use crate::error::{ModalError, Result};

// ============================================================================
// TransportEvent
// ============================================================================

/// A lifecycle or data event emitted by a transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The channel was established.
    Connected,
    /// The channel was torn down.
    Disconnected {
        /// Why the channel went away.
        reason: String,
    },
    /// An inbound payload passed origin gating.
    Message {
        /// The opaque payload.
        data: Value,
    },
    /// A canonical failure was surfaced.
    Error {
        /// The failure.
        error: ModalError,
    },
}

impl TransportEvent {
    /// Returns the tag used as the subscription key.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Disconnected { .. } => EventKind::Disconnected,
            Self::Message { .. } => EventKind::Message,
            Self::Error { .. } => EventKind::Error,
        }
    }
}

// ============================================================================
// EventKind
// ============================================================================

/// Tag-only discriminant of [`TransportEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Channel established.
    Connected,
    /// Channel torn down.
    Disconnected,
    /// Inbound payload.
    Message,
    /// Canonical failure.
    Error,
}

// ============================================================================
// Types
// ============================================================================

/// A subscribed callback.
pub type Listener = Arc<dyn Fn(&TransportEvent) + Send + Sync>;

/// Unsubscribe capability returned by [`Subscriptions::on`].
///
/// Callers keep this instead of the original callback; passing it back to
/// `off` reverses exactly what `on` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ============================================================================
// Subscriptions
// ============================================================================

/// Per-kind ordered listener registry.
///
/// Listeners are invoked in subscription order. Unsubscribing an unknown
/// kind/id is a no-op; kinds with no remaining listeners are pruned.
pub struct Subscriptions {
    inner: Mutex<SubscriptionState>,
}

struct SubscriptionState {
    listeners: FxHashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl Subscriptions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SubscriptionState {
                listeners: FxHashMap::default(),
                next_id: 0,
            }),
        }
    }

    /// Subscribes a listener to one event kind.
    pub fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let mut state = self.inner.lock();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.entry(kind).or_default().push((id, listener));
        id
    }

    /// Removes one listener. Idempotent; unknown kinds/ids are no-ops.
    pub fn off(&self, kind: EventKind, id: ListenerId) {
        let mut state = self.inner.lock();
        if let Some(entries) = state.listeners.get_mut(&kind) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                state.listeners.remove(&kind);
            }
        }
    }

    /// Returns the number of listeners for one kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.inner
            .lock()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Returns the total number of listeners across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.lock().listeners.values().map(Vec::len).sum()
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.inner.lock().listeners.clear();
    }

    /// Dispatches an event synchronously to a snapshot of its listeners.
    ///
    /// Each listener runs isolated: a panicking listener is caught and
    /// logged, and later listeners still run.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError`] with code `cleanup_failed` when one or more
    /// listeners panicked. Most call sites treat emission as best-effort
    /// and only log this; the destroy path surfaces it.
    pub fn emit(&self, event: &TransportEvent) -> Result<()> {
        // Snapshot under the lock, invoke outside it.
        let snapshot: Vec<Listener> = {
            let state = self.inner.lock();
            state
                .listeners
                .get(&event.kind())
                .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };

        let mut panicked = 0usize;
        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                panicked += 1;
                warn!(kind = ?event.kind(), "Event listener panicked during dispatch");
            }
        }

        if panicked > 0 {
            return Err(ModalError::cleanup_failed(format!(
                "{panicked} listener(s) panicked dispatching {:?}",
                event.kind()
            )));
        }

        Ok(())
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
