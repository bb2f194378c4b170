//! Connector session core.
//!
//! [`Connector`] composes a [`Transport`] and a [`Protocol`] codec into a
//! wallet-session API: connect/resume/disconnect, lazy provider access,
//! and request/response mediation. It owns the 4-state session machine
//! and the current wallet record.
//!
//! # Request Correlation
//!
//! `send_request` registers a oneshot waiter keyed by envelope id, sends
//! the encoded request through the transport, and resolves the waiter
//! from the transport's `Message` events. Replies nobody is waiting for
//! are logged and dropped.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::connector::hooks::{ConnectorHooks, Provider};
use crate::connector::state::ConnectionState;
use crate::connector::wallet::{ConnectedWallet, WalletInfo};
use crate::error::{ModalError, Result};
use crate::protocol::{Message, Protocol};
use crate::transport::{EventKind, ListenerId, Transport, TransportEvent};

// ============================================================================
// Types
// ============================================================================

/// Map of envelope ids to reply channels.
type PendingMap = FxHashMap<String, oneshot::Sender<Message>>;

// ============================================================================
// Connector
// ============================================================================

/// A wallet session over one [`Transport`].
///
/// Created once per connection attempt and explicitly destroyed. The
/// wallet record is owned exclusively by this instance: replaced
/// wholesale on (re)connect, cleared on disconnect or error.
pub struct Connector {
    /// The channel to the wallet.
    transport: Arc<Transport>,

    /// Request/response codec collaborator.
    protocol: Arc<dyn Protocol>,

    /// Mechanism operations.
    hooks: Arc<dyn ConnectorHooks>,

    /// Session state machine.
    state: Mutex<ConnectionState>,

    /// Current session record.
    wallet: Mutex<Option<ConnectedWallet>>,

    /// Provider cache, built at most once per session.
    provider: Mutex<Option<Arc<dyn Provider>>>,

    /// Reply waiters keyed by envelope id (shared with the listener).
    pending: Arc<Mutex<PendingMap>>,

    /// Handle of the `Message` listener installed on the transport.
    message_listener: ListenerId,

    /// Set once `destroy()` has run.
    destroyed: AtomicBool,
}

impl fmt::Debug for Connector {
    // Manual: the collaborator trait objects have no Debug bound.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("connector_type", &self.hooks.connector_type())
            .field("state", &self.state())
            .field("wallet", &*self.wallet.lock())
            .field("pending", &self.pending.lock().len())
            .field("destroyed", &self.destroyed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connector - Constructor
// ============================================================================

impl Connector {
    /// Creates a connector over a transport and codec.
    ///
    /// Installs a `Message` listener on the transport to route reply
    /// envelopes to in-flight requests; [`Connector::destroy`] removes it.
    #[must_use]
    pub fn new(
        transport: Arc<Transport>,
        protocol: Arc<dyn Protocol>,
        hooks: Arc<dyn ConnectorHooks>,
    ) -> Self {
        let pending: Arc<Mutex<PendingMap>> = Arc::new(Mutex::new(FxHashMap::default()));

        let listener_pending = Arc::clone(&pending);
        let message_listener = transport.on(
            EventKind::Message,
            Arc::new(move |event| {
                if let TransportEvent::Message { data } = event {
                    Self::route_reply(&listener_pending, data);
                }
            }),
        );

        Self {
            transport,
            protocol,
            hooks,
            state: Mutex::new(ConnectionState::Disconnected),
            wallet: Mutex::new(None),
            provider: Mutex::new(None),
            pending,
            message_listener,
            destroyed: AtomicBool::new(false),
        }
    }

    /// Completes the waiter for a reply envelope, if one exists.
    fn route_reply(pending: &Arc<Mutex<PendingMap>>, data: &Value) {
        let message = match Message::<Value>::from_value(data.clone()) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "Inbound payload is not an envelope, ignoring");
                return;
            }
        };

        if message.is_request() {
            // Wallet-initiated requests are not this core's concern.
            return;
        }

        let tx = pending.lock().remove(&message.id);
        match tx {
            Some(tx) => {
                let _ = tx.send(message);
            }
            None => {
                debug!(id = %message.id, "Reply for unknown request, dropping");
            }
        }
    }
}

// ============================================================================
// Connector - Accessors
// ============================================================================

impl Connector {
    /// Returns the connector type key.
    #[inline]
    #[must_use]
    pub fn connector_type(&self) -> &str {
        self.hooks.connector_type()
    }

    /// Returns the current session state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Returns a copy of the current wallet record, if a session is live.
    #[must_use]
    pub fn wallet(&self) -> Option<ConnectedWallet> {
        self.wallet.lock().clone()
    }

    /// Returns the underlying transport.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }
}

// ============================================================================
// Connector - Session Lifecycle
// ============================================================================

impl Connector {
    /// Establishes a fresh wallet session.
    ///
    /// Transitions Disconnected/Error → Connecting, runs the mechanism's
    /// connect hook, then Connected with the returned wallet stored, or
    /// Error with the wallet cleared.
    ///
    /// # Errors
    ///
    /// - `connection_failed` when a session is live or a connect is in flight
    /// - the hook's canonical error on failure
    pub async fn connect(&self, wallet_info: &WalletInfo) -> Result<()> {
        self.establish(wallet_info, None).await
    }

    /// Re-establishes a session from persisted state.
    ///
    /// Identical transition rules to [`Connector::connect`], additionally
    /// threading `state` through the connect hook for continuity.
    ///
    /// # Errors
    ///
    /// Same as [`Connector::connect`].
    pub async fn resume(&self, wallet_info: &WalletInfo, state: Value) -> Result<()> {
        self.establish(wallet_info, Some(state)).await
    }

    /// Shared connect/resume path.
    async fn establish(&self, wallet_info: &WalletInfo, resume_state: Option<Value>) -> Result<()> {
        {
            let mut state = self.state.lock();
            if !state.can_connect() {
                let current = *state;
                return Err(ModalError::connection_failed(format!(
                    "Cannot connect from the {current:?} state"
                )));
            }
            *state = ConnectionState::Connecting;
        }

        let resuming = resume_state.is_some();
        match self.hooks.connect(wallet_info, resume_state).await {
            Ok(wallet) => {
                debug!(
                    connector = self.connector_type(),
                    wallet = %wallet_info.name,
                    address = %wallet.address,
                    resuming,
                    "Session established"
                );
                *self.wallet.lock() = Some(wallet);
                *self.state.lock() = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                error!(
                    connector = self.connector_type(),
                    wallet = %wallet_info.name,
                    resuming,
                    error = %e,
                    "Session establishment failed"
                );
                *self.wallet.lock() = None;
                *self.provider.lock() = None;
                *self.state.lock() = ConnectionState::Error;
                Err(e)
            }
        }
    }

    /// Ends the wallet session.
    ///
    /// A no-op when no session is live. The wallet record is cleared
    /// either way; the state lands on Disconnected on hook success and
    /// Error on hook failure.
    ///
    /// # Errors
    ///
    /// Returns the hook's canonical error on failure.
    pub async fn disconnect(&self) -> Result<()> {
        if !self.state().is_connected() {
            return Ok(());
        }

        let outcome = self.hooks.disconnect().await;

        *self.wallet.lock() = None;
        *self.provider.lock() = None;

        match outcome {
            Ok(()) => {
                debug!(connector = self.connector_type(), "Session ended");
                *self.state.lock() = ConnectionState::Disconnected;
                Ok(())
            }
            Err(e) => {
                error!(
                    connector = self.connector_type(),
                    error = %e,
                    "Disconnect hook failed"
                );
                *self.state.lock() = ConnectionState::Error;
                Err(e)
            }
        }
    }

    /// Releases the correlation waiters and session record.
    ///
    /// Safe to call more than once. Does not destroy the transport; the
    /// transport's owner does that.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.transport.off(EventKind::Message, self.message_listener);

        // Dropping the senders fails any in-flight send_request waiters.
        self.pending.lock().clear();

        *self.wallet.lock() = None;
        *self.provider.lock() = None;
        *self.state.lock() = ConnectionState::Disconnected;

        debug!(connector = self.connector_type(), "Connector destroyed");
    }
}

// ============================================================================
// Connector - Provider
// ============================================================================

impl Connector {
    /// Returns the chain-specific provider, building and caching it once.
    ///
    /// # Errors
    ///
    /// - `not_connected` outside the Connected state
    /// - the factory hook's canonical error on failure
    pub fn provider(&self) -> Result<Arc<dyn Provider>> {
        if !self.state().is_connected() {
            return Err(ModalError::not_connected(
                "Provider requires a connected session",
            ));
        }

        if let Some(provider) = self.provider.lock().as_ref() {
            return Ok(Arc::clone(provider));
        }

        let wallet = self.wallet().ok_or_else(|| {
            ModalError::not_connected("Connected session has no wallet record")
        })?;

        let provider = self.hooks.create_provider(&wallet)?;
        *self.provider.lock() = Some(Arc::clone(&provider));
        debug!(
            connector = self.connector_type(),
            namespace = provider.namespace(),
            "Provider built"
        );
        Ok(provider)
    }
}

// ============================================================================
// Connector - Requests
// ============================================================================

impl Connector {
    /// Sends a method call to the wallet and returns the unwrapped result.
    ///
    /// Encodes via the [`Protocol`] collaborator, registers a correlation
    /// waiter, delivers through the transport, and awaits the reply
    /// within the transport's configured timeout.
    ///
    /// # Errors
    ///
    /// - `not_connected` outside the Connected state
    /// - `invalid_payload` on encode/decode failure
    /// - the wallet-reported error for error replies
    /// - `request_timeout` when no reply arrives in time
    /// - the transport's delivery error when sending fails
    pub async fn send_request(&self, method: &str, params: Value) -> Result<Value> {
        if !self.state().is_connected() {
            return Err(ModalError::not_connected(format!(
                "Cannot send {method}: session is not connected"
            )));
        }

        let message = self.protocol.encode_request(method, params)?;
        let request_id = message.id.clone();
        let envelope = message
            .to_value()
            .map_err(|e| ModalError::invalid_payload(format!("Encode failed: {e}")))?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id.clone(), tx);

        if let Err(e) = self.transport.send(envelope).await {
            self.pending.lock().remove(&request_id);
            return Err(e);
        }

        let timeout_ms = self.transport.config().effective_timeout_ms();
        let reply = match timeout(Duration::from_millis(timeout_ms), rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => {
                // Waiter dropped by destroy().
                return Err(ModalError::transport_unavailable(
                    "Connector destroyed while awaiting reply",
                ));
            }
            Err(_) => {
                self.pending.lock().remove(&request_id);
                warn!(
                    connector = self.connector_type(),
                    method,
                    request_id = %request_id,
                    timeout_ms,
                    "Request timed out"
                );
                return Err(ModalError::request_timeout(&request_id, timeout_ms));
            }
        };

        self.protocol.decode_response(&reply)
    }

    /// Returns the number of in-flight requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::config::TransportConfig;
    use crate::error::ErrorCode;
    use crate::protocol::{JsonProtocol, MessageType};
    use crate::transport::TransportHooks;

    // ------------------------------------------------------------------
    // Transport-side mock: replies to each sent envelope per ReplyMode
    // ------------------------------------------------------------------

    #[derive(Clone, Copy, PartialEq)]
    enum ReplyMode {
        Echo,
        ErrorReply,
        Swallow,
    }

    struct ReplyingHooks {
        mode: ReplyMode,
        transport: Mutex<Option<Arc<Transport>>>,
    }

    impl ReplyingHooks {
        fn new(mode: ReplyMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                transport: Mutex::new(None),
            })
        }

        fn attach(&self, transport: Arc<Transport>) {
            *self.transport.lock() = Some(transport);
        }
    }

    #[async_trait]
    impl TransportHooks for ReplyingHooks {
        fn transport_type(&self) -> &str {
            "mock"
        }

        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }

        async fn send(&self, data: Value) -> Result<()> {
            if self.mode == ReplyMode::Swallow {
                return Ok(());
            }

            let request: Message = Message::from_value(data).expect("sent data is an envelope");
            let reply = match self.mode {
                ReplyMode::Echo => Message::reply(
                    request.id,
                    MessageType::Response,
                    json!({"result": {"echo": request.payload.get("params").cloned()}}),
                ),
                ReplyMode::ErrorReply => Message::reply(
                    request.id,
                    MessageType::Error,
                    json!({"code": "not_connected", "message": "wallet locked", "fatal": false}),
                ),
                ReplyMode::Swallow => unreachable!(),
            };

            let transport = self.transport.lock().clone().expect("transport attached");
            transport.handle_message(reply.to_value().expect("serialize reply"));
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Connector-side mock
    // ------------------------------------------------------------------

    struct MockConnectorHooks {
        fail_connect: bool,
        fail_disconnect: bool,
        connect_delay_ms: u64,
        connect_calls: AtomicUsize,
        provider_calls: AtomicUsize,
        seen_resume_state: Mutex<Option<Value>>,
    }

    impl MockConnectorHooks {
        fn new() -> Arc<Self> {
            Arc::new(Self::unwrapped())
        }

        fn failing_connect() -> Arc<Self> {
            Arc::new(Self {
                fail_connect: true,
                ..Self::unwrapped()
            })
        }

        fn failing_disconnect() -> Arc<Self> {
            Arc::new(Self {
                fail_disconnect: true,
                ..Self::unwrapped()
            })
        }

        fn slow_connect(delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                connect_delay_ms: delay_ms,
                ..Self::unwrapped()
            })
        }

        fn unwrapped() -> Self {
            Self {
                fail_connect: false,
                fail_disconnect: false,
                connect_delay_ms: 0,
                connect_calls: AtomicUsize::new(0),
                provider_calls: AtomicUsize::new(0),
                seen_resume_state: Mutex::new(None),
            }
        }
    }

    #[derive(Debug)]
    struct StaticProvider;

    impl Provider for StaticProvider {
        fn namespace(&self) -> &str {
            "eip155"
        }
    }

    #[async_trait]
    impl ConnectorHooks for MockConnectorHooks {
        fn connector_type(&self) -> &str {
            "mock"
        }

        async fn connect(
            &self,
            _wallet: &WalletInfo,
            resume_state: Option<Value>,
        ) -> Result<ConnectedWallet> {
            self.connect_calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_resume_state.lock() = resume_state.clone();

            if self.connect_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.connect_delay_ms)).await;
            }

            if self.fail_connect {
                return Err(ModalError::connection_failed("wallet rejected"));
            }

            Ok(ConnectedWallet {
                address: "0xdead".into(),
                chain_id: "eip155:1".into(),
                public_key: "0xbeef".into(),
                connected: true,
                state: resume_state,
            })
        }

        async fn disconnect(&self) -> Result<()> {
            if self.fail_disconnect {
                return Err(ModalError::transport_disconnected("channel gone"));
            }
            Ok(())
        }

        fn create_provider(&self, _wallet: &ConnectedWallet) -> Result<Arc<dyn Provider>> {
            self.provider_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StaticProvider))
        }
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------

    async fn connected_fixture(
        mode: ReplyMode,
        timeout_ms: u64,
        hooks: Arc<MockConnectorHooks>,
    ) -> (Connector, Arc<Transport>) {
        let transport_hooks = ReplyingHooks::new(mode);
        let transport = Arc::new(Transport::new(
            Arc::clone(&transport_hooks) as Arc<dyn TransportHooks>,
            TransportConfig::new(timeout_ms),
            "https://app.example.com",
        ));
        transport_hooks.attach(Arc::clone(&transport));
        transport.connect().await.expect("transport connect");

        let connector = Connector::new(
            Arc::clone(&transport),
            Arc::new(JsonProtocol::new()),
            hooks,
        );
        (connector, transport)
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_connect_success() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, Arc::clone(&hooks)).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        assert_eq!(connector.state(), ConnectionState::Connected);
        let wallet = connector.wallet().expect("wallet stored");
        assert_eq!(wallet.address, "0xdead");
        assert_eq!(hooks.connect_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure_lands_in_error_state() {
        let hooks = MockConnectorHooks::failing_connect();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        let err = connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConnectionFailed);
        assert_eq!(connector.state(), ConnectionState::Error);
        assert!(connector.wallet().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_connect_rejected() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, Arc::clone(&hooks)).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("first connect");
        let err = connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConnectionFailed);
        assert_eq!(hooks.connect_calls.load(Ordering::SeqCst), 1);
        assert_eq!(connector.state(), ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_while_connecting_rejected() {
        let hooks = MockConnectorHooks::slow_connect(500);
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, Arc::clone(&hooks)).await;
        let connector = Arc::new(connector);

        let background = tokio::spawn({
            let connector = Arc::clone(&connector);
            async move { connector.connect(&WalletInfo::new("Test Wallet")).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(connector.state(), ConnectionState::Connecting);

        let err = connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConnectionFailed);

        background.await.expect("join").expect("first connect");
        assert_eq!(connector.state(), ConnectionState::Connected);
        assert_eq!(hooks.connect_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_leaves_error_state() {
        let hooks = MockConnectorHooks::failing_connect();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        let _ = connector.connect(&WalletInfo::new("Test Wallet")).await;
        assert_eq!(connector.state(), ConnectionState::Error);

        // Error is not auto-recovering, but an explicit connect may leave it.
        // (This hook always fails, so it lands in Error again.)
        let _ = connector.connect(&WalletInfo::new("Test Wallet")).await;
        assert_eq!(connector.state(), ConnectionState::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_threads_state() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, Arc::clone(&hooks)).await;

        connector
            .resume(&WalletInfo::new("Test Wallet"), json!({"session": "s1"}))
            .await
            .expect("resume");

        assert_eq!(connector.state(), ConnectionState::Connected);
        assert_eq!(
            *hooks.seen_resume_state.lock(),
            Some(json!({"session": "s1"}))
        );
        assert_eq!(
            connector.wallet().and_then(|w| w.state),
            Some(json!({"session": "s1"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_noop_when_not_connected() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector.disconnect().await.expect("no-op disconnect");
        assert_eq!(connector.state(), ConnectionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_success() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");
        connector.disconnect().await.expect("disconnect");

        assert_eq!(connector.state(), ConnectionState::Disconnected);
        assert!(connector.wallet().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_failure_lands_in_error_state() {
        let hooks = MockConnectorHooks::failing_disconnect();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");
        let err = connector.disconnect().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::TransportDisconnected);
        assert_eq!(connector.state(), ConnectionState::Error);
        assert!(connector.wallet().is_none());
    }

    // ------------------------------------------------------------------
    // Provider
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_provider_requires_connected() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        let err = connector.provider().unwrap_err();
        assert_eq!(err.code, ErrorCode::NotConnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_cached_once() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, Arc::clone(&hooks)).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        let first = connector.provider().expect("provider");
        let second = connector.provider().expect("provider");
        assert_eq!(first.namespace(), "eip155");
        assert_eq!(second.namespace(), "eip155");
        assert_eq!(hooks.provider_calls.load(Ordering::SeqCst), 1);
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_send_request_round_trip() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        let result = connector
            .send_request("wallet_ping", json!({"x": 1}))
            .await
            .expect("request");

        assert_eq!(result, json!({"echo": {"x": 1}}));
        assert_eq!(connector.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_request_requires_connected() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        let err = connector
            .send_request("wallet_ping", json!(null))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotConnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_request_error_reply() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::ErrorReply, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        let err = connector
            .send_request("wallet_sign", json!({"tx": "0xabc"}))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotConnected);
        assert_eq!(err.message, "wallet locked");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_request_timeout() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Swallow, 200, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        let err = connector
            .send_request("wallet_ping", json!(null))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::RequestTimeout);
        assert_eq!(connector.pending_count(), 0);
    }

    // ------------------------------------------------------------------
    // Destroy
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_debug_snapshot() {
        let hooks = MockConnectorHooks::new();
        let (connector, _t) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        let rendered = format!("{connector:?}");
        assert!(rendered.contains("Connector"));
        assert!(rendered.contains("Connected"));
        assert!(rendered.contains("0xdead"));

        let provider = connector.provider().expect("provider");
        assert!(format!("{provider:?}").contains("StaticProvider"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_twice_is_safe() {
        let hooks = MockConnectorHooks::new();
        let (connector, transport) = connected_fixture(ReplyMode::Echo, 30_000, hooks).await;

        connector
            .connect(&WalletInfo::new("Test Wallet"))
            .await
            .expect("connect");

        connector.destroy();
        assert_eq!(connector.state(), ConnectionState::Disconnected);
        assert!(connector.wallet().is_none());
        assert_eq!(transport.listener_count(EventKind::Message), 0);

        connector.destroy();
        assert_eq!(connector.state(), ConnectionState::Disconnected);
    }
}
