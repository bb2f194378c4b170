//! Transport lifecycle core.
//!
//! Owns the connection lifecycle (connect/disconnect/send) with bounded
//! fixed-delay retries, the event-subscription registry, origin gating of
//! inbound payloads, and resource teardown. All mechanism-specific work
//! is delegated to the [`TransportHooks`] supplied at construction.
//!
//! # Retry Policy
//!
//! Fixed-count, fixed-delay — not exponential. The dominant failure mode
//! is a timing race with the remote endpoint's readiness (a pop-up still
//! loading, an extension worker still waking), and a fixed schedule keeps
//! UI-facing latency bounded and predictable:
//!
//! | Operation | Attempts | Gap |
//! |-----------|----------|-----|
//! | `connect` | 4 | 1000ms |
//! | `send` | 3 | 500ms |
//! | `disconnect` | 1 | — |

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::TransportConfig;
use crate::error::{ModalError, Result};
use crate::origin::{self, OriginValidationResult};
use crate::transport::hooks::TransportHooks;
use crate::transport::subscription::{
    EventKind, Listener, ListenerId, Subscriptions, TransportEvent,
};

// ============================================================================
// Constants
// ============================================================================

/// Total connect attempts (1 initial + 3 retries).
const CONNECT_ATTEMPTS: u32 = 4;

/// Gap between connect attempts.
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Total send attempts (1 initial + 2 retries).
const SEND_ATTEMPTS: u32 = 3;

/// Gap between send attempts.
const SEND_RETRY_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// Transport
// ============================================================================

/// Mechanism-agnostic channel to a wallet.
///
/// Created once per connection attempt and explicitly destroyed. One
/// wallet connection owns exactly one `Transport`; state on an instance
/// is never shared with another.
///
/// # Example
///
/// ```ignore
/// let transport = Transport::new(hooks, TransportConfig::default(), "https://app.example.com");
/// let id = transport.on(EventKind::Message, Arc::new(|event| { /* ... */ }));
/// transport.connect().await?;
/// transport.send(serde_json::json!({"method": "ping"})).await?;
/// transport.off(EventKind::Message, id);
/// transport.destroy().await?;
/// ```
pub struct Transport {
    /// Mechanism operations.
    hooks: Arc<dyn TransportHooks>,

    /// Tuning configuration.
    config: TransportConfig,

    /// The origin this transport trusts.
    trusted_origin: String,

    /// Whether inbound payloads must carry origin context.
    require_origin_context: bool,

    /// Last-known connection flag; no handshake behind it.
    connected: AtomicBool,

    /// Set once `destroy()` has run.
    destroyed: AtomicBool,

    /// Listener registry.
    subscriptions: Subscriptions,
}

// ============================================================================
// Transport - Constructor
// ============================================================================

impl Transport {
    /// Creates a transport over the given mechanism hooks.
    ///
    /// # Arguments
    ///
    /// * `hooks` - Mechanism-specific connect/disconnect/send operations
    /// * `config` - Tuning configuration
    /// * `trusted_origin` - The origin inbound messages must claim
    #[must_use]
    pub fn new(
        hooks: Arc<dyn TransportHooks>,
        config: TransportConfig,
        trusted_origin: impl Into<String>,
    ) -> Self {
        Self {
            hooks,
            config,
            trusted_origin: trusted_origin.into(),
            require_origin_context: false,
            connected: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            subscriptions: Subscriptions::new(),
        }
    }

    /// Requires inbound payloads to carry origin context.
    ///
    /// Without this, payloads with no embedded origin pass gating.
    #[must_use]
    pub fn require_origin_context(mut self) -> Self {
        self.require_origin_context = true;
        self
    }
}

// ============================================================================
// Transport - Accessors
// ============================================================================

impl Transport {
    /// Returns the mechanism name.
    #[inline]
    #[must_use]
    pub fn transport_type(&self) -> &str {
        self.hooks.transport_type()
    }

    /// Returns the last-known connection flag. Performs no handshake.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Returns the tuning configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Whether the mechanism receives a platform-validated origin.
    #[inline]
    #[must_use]
    pub fn supports_platform_origin(&self) -> bool {
        self.hooks.supports_platform_origin()
    }

    /// The origin this transport trusts.
    ///
    /// For mechanisms without platform origin stamping this is the host
    /// application's declared origin, the fallback trust anchor.
    #[inline]
    #[must_use]
    pub fn trusted_origin(&self) -> &str {
        &self.trusted_origin
    }
}

// ============================================================================
// Transport - Lifecycle
// ============================================================================

impl Transport {
    /// Establishes the channel, retrying on failure.
    ///
    /// Invokes the connect hook up to 4 times with a 1-second gap. On
    /// success sets the connected flag and emits [`TransportEvent::Connected`].
    ///
    /// # Errors
    ///
    /// Returns [`ModalError`] with code `connection_failed` after
    /// exhausting all attempts; an `Error` event is emitted best-effort
    /// first.
    pub async fn connect(&self) -> Result<()> {
        let mut last_failure: Option<ModalError> = None;

        for attempt in 1..=CONNECT_ATTEMPTS {
            match self.hooks.connect().await {
                Ok(()) => {
                    self.connected.store(true, Ordering::SeqCst);
                    debug!(
                        transport = self.transport_type(),
                        attempt, "Transport connected"
                    );
                    self.emit_best_effort(TransportEvent::Connected);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        transport = self.transport_type(),
                        attempt,
                        max_attempts = CONNECT_ATTEMPTS,
                        error = %e,
                        "Connect attempt failed"
                    );
                    last_failure = Some(e);
                    if attempt < CONNECT_ATTEMPTS {
                        sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        }

        let cause = last_failure
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown".to_string());
        let err = ModalError::connection_failed(format!(
            "Failed to connect after {CONNECT_ATTEMPTS} attempts: {cause}"
        ));

        error!(transport = self.transport_type(), error = %err, "Connection failed");
        self.emit_best_effort(TransportEvent::Error { error: err.clone() });
        Err(err)
    }

    /// Tears the channel down. One hook invocation, no retry.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError`] with code `transport_disconnected` if the
    /// hook fails; an `Error` event is emitted best-effort first.
    pub async fn disconnect(&self) -> Result<()> {
        match self.hooks.disconnect().await {
            Ok(()) => {
                self.connected.store(false, Ordering::SeqCst);
                debug!(transport = self.transport_type(), "Transport disconnected");
                self.emit_best_effort(TransportEvent::Disconnected {
                    reason: "Transport closed".to_string(),
                });
                Ok(())
            }
            Err(e) => {
                let err =
                    ModalError::transport_disconnected(format!("Disconnect failed: {}", e.message));
                error!(transport = self.transport_type(), error = %err, "Disconnect failed");
                self.emit_best_effort(TransportEvent::Error { error: err.clone() });
                Err(err)
            }
        }
    }

    /// Delivers one payload, retrying on failure.
    ///
    /// Requires an established channel; fails immediately (without
    /// invoking the send hook) otherwise. Invokes the send hook up to 3
    /// times with a 500ms gap.
    ///
    /// # Errors
    ///
    /// - `connection_failed` if the transport is not connected
    /// - `message_failed` (carrying the payload in `data`) after
    ///   exhausting all attempts
    pub async fn send(&self, data: Value) -> Result<()> {
        if !self.is_connected() {
            let err = ModalError::connection_failed("Cannot send: transport is not connected");
            warn!(transport = self.transport_type(), "Send attempted while disconnected");
            self.emit_best_effort(TransportEvent::Error { error: err.clone() });
            return Err(err);
        }

        let mut last_failure: Option<ModalError> = None;

        for attempt in 1..=SEND_ATTEMPTS {
            match self.hooks.send(data.clone()).await {
                Ok(()) => {
                    debug!(transport = self.transport_type(), attempt, "Payload sent");
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        transport = self.transport_type(),
                        attempt,
                        max_attempts = SEND_ATTEMPTS,
                        error = %e,
                        "Send attempt failed"
                    );
                    last_failure = Some(e);
                    if attempt < SEND_ATTEMPTS {
                        sleep(SEND_RETRY_DELAY).await;
                    }
                }
            }
        }

        let cause = last_failure
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown".to_string());
        let err = ModalError::message_failed(format!(
            "Failed to send after {SEND_ATTEMPTS} attempts: {cause}"
        ))
        .with_data(serde_json::json!({ "data": data }));

        error!(transport = self.transport_type(), error = %err, "Send failed");
        self.emit_best_effort(TransportEvent::Error { error: err.clone() });
        Err(err)
    }

    /// Releases subscriptions and resources. Safe to call more than once.
    ///
    /// If connected, best-effort disconnects (a hook failure here is
    /// logged, not propagated). Emits a final
    /// `Disconnected { reason: "Transport destroyed" }` to the listeners
    /// still registered, then unconditionally clears the registry.
    /// Cleanup is best-effort: the flag is lowered and the registry
    /// cleared even on the error path, and the returned error is
    /// advisory.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError`] with code `cleanup_failed` if a listener
    /// panicked during the final emission.
    pub async fn destroy(&self) -> Result<()> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if self.is_connected() {
            if let Err(e) = self.hooks.disconnect().await {
                warn!(
                    transport = self.transport_type(),
                    error = %e,
                    "Disconnect during destroy failed"
                );
            }
            self.connected.store(false, Ordering::SeqCst);
        }

        let emitted = self.subscriptions.emit(&TransportEvent::Disconnected {
            reason: "Transport destroyed".to_string(),
        });
        self.subscriptions.clear();

        if let Err(e) = emitted {
            let err = ModalError::cleanup_failed(format!("Destroy cleanup failed: {}", e.message));
            error!(transport = self.transport_type(), error = %err, "Destroy failed");
            self.emit_best_effort(TransportEvent::Error { error: err.clone() });
            return Err(err);
        }

        debug!(transport = self.transport_type(), "Transport destroyed");
        Ok(())
    }
}

// ============================================================================
// Transport - Events
// ============================================================================

impl Transport {
    /// Subscribes a listener to one event kind.
    ///
    /// Returns the unsubscribe capability; callers do not need to retain
    /// the callback itself to remove it later.
    pub fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.subscriptions.on(kind, listener)
    }

    /// Removes one listener. Unknown kinds/ids are no-ops.
    pub fn off(&self, kind: EventKind, id: ListenerId) {
        self.subscriptions.off(kind, id);
    }

    /// Returns the number of listeners for one kind.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions.count(kind)
    }

    /// Emits an event, logging (never propagating) dispatch failures.
    fn emit_best_effort(&self, event: TransportEvent) {
        if let Err(e) = self.subscriptions.emit(&event) {
            warn!(
                transport = self.transport_type(),
                error = %e,
                "Event emission failed"
            );
        }
    }
}

// ============================================================================
// Transport - Inbound Messages & Origin
// ============================================================================

impl Transport {
    /// Gates one inbound payload on origin and fans it out.
    ///
    /// Concrete transports call this for every payload they receive. On a
    /// passing check a `Message` event is emitted; on rejection a
    /// non-fatal `Error` event is emitted and the payload is dropped.
    /// The structured result is returned either way so the caller can
    /// choose drop-vs-escalate.
    pub fn handle_message(&self, data: Value) -> OriginValidationResult {
        let result = self.validate_origin(&data);

        if result.valid {
            self.emit_best_effort(TransportEvent::Message { data });
        } else {
            let reason = result
                .error
                .clone()
                .unwrap_or_else(|| "Origin validation failed".to_string());
            warn!(
                transport = self.transport_type(),
                claimed = result.context.as_deref().unwrap_or("<none>"),
                "Inbound message rejected: {reason}"
            );
            self.emit_best_effort(TransportEvent::Error {
                error: ModalError::invalid_payload(reason).with_data(data),
            });
        }

        result
    }

    /// Checks a payload's embedded `_context.origin` against the trusted
    /// origin. Structured, non-throwing.
    #[must_use]
    pub fn validate_origin(&self, payload: &Value) -> OriginValidationResult {
        origin::validate_origin(payload, &self.trusted_origin, self.require_origin_context)
    }

    /// Checks a wrapped payload's top-level `origin` field.
    #[must_use]
    pub fn validate_wrapped_origin(&self, payload: &Value) -> OriginValidationResult {
        origin::validate_wrapped_origin(
            payload,
            &self.trusted_origin,
            self.require_origin_context,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
