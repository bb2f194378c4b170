//! Wallet Transport - Mechanism-agnostic dapp-to-wallet channel core.
//!
//! This library lets an application establish, use, and tear down a
//! communication channel with an external wallet application, independent
//! of the concrete delivery mechanism (pop-up window messaging,
//! browser-extension runtime messaging, socket channel, cross-window
//! messaging).
//!
//! # Architecture
//!
//! Two layers, each mechanism-agnostic:
//!
//! - **Transport core**: connection lifecycle with bounded fixed-delay
//!   retry, synchronous event fan-out, origin-authenticated message
//!   gating, and teardown. Mechanisms plug in through [`TransportHooks`].
//! - **Connector core**: a wallet-session state machine and
//!   request/response mediation over one transport and a [`Protocol`]
//!   codec. Mechanisms plug in through [`ConnectorHooks`] and are looked
//!   up by type key in a [`ConnectorRegistry`].
//!
//! Everything else — window control, signing, chain RPC method sets, UI,
//! wallet discovery — lives outside this crate behind those seams.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wallet_transport::{
//!     Connector, ConnectorRegistry, ConnectorConfig, JsonProtocol,
//!     Transport, TransportConfig, Result,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = Arc::new(Transport::new(
//!         popup_hooks,
//!         TransportConfig::default(),
//!         "https://app.example.com",
//!     ));
//!     transport.connect().await?;
//!
//!     let connector = Connector::new(transport, Arc::new(JsonProtocol::new()), popup_connector);
//!     connector.connect(&wallet_info).await?;
//!
//!     let accounts = connector.send_request("wallet_getAccounts", serde_json::json!({})).await?;
//!     println!("accounts: {accounts}");
//!
//!     connector.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | [`TransportConfig`] and [`ConnectorConfig`] |
//! | [`connector`] | Session machine, hooks, registry, wallet records |
//! | [`error`] | [`ModalError`] and [`Result`] alias |
//! | [`origin`] | Origin validation helpers |
//! | [`protocol`] | Wire envelope and codec seam |
//! | [`transport`] | Transport lifecycle core and event fan-out |
//!
//! # Concurrency Model
//!
//! Single-writer discipline per instance: mutable state lives behind that
//! instance's locks, operations suspend only at mechanism hooks and retry
//! sleeps, and no lock is held across an await. Event dispatch is
//! synchronous over a snapshot of the listener list. There is no
//! cancellation token: `destroy()` does not cancel in-flight retry loops,
//! so callers needing a guaranteed idle end-state wait for those to
//! settle first.

// ============================================================================
// Modules
// ============================================================================

/// Configuration types.
pub mod config;

/// Connector session layer.
pub mod connector;

/// Error types and result alias.
pub mod error;

/// Origin validation.
pub mod origin;

/// Wire protocol envelope and codec seam.
pub mod protocol;

/// Transport lifecycle layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::{ConnectorConfig, TransportConfig};

// Connector types
pub use connector::{
    ConnectedWallet, ConnectionState, Connector, ConnectorFactory, ConnectorHooks,
    ConnectorRegistry, Provider, WalletInfo,
};

// Error types
pub use error::{ErrorCategory, ErrorCode, ModalError, Result};

// Origin validation
pub use origin::{
    OriginValidationResult, normalize_origin, origins_match, validate_origin,
    validate_wrapped_origin,
};

// Protocol types
pub use protocol::{JsonProtocol, Message, MessageType, Protocol};

// Transport types
pub use transport::{EventKind, Listener, ListenerId, Transport, TransportEvent, TransportHooks};
