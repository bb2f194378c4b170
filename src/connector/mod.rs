//! Connector session layer.
//!
//! A [`Connector`] layers wallet identity and request/response semantics
//! atop a [`Transport`] and a [`Protocol`] codec. Concrete connector
//! implementations plug in through [`ConnectorHooks`] and are looked up
//! by type key in a [`ConnectorRegistry`].
//!
//! [`Transport`]: crate::transport::Transport
//! [`Protocol`]: crate::protocol::Protocol
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`Connector`] session machine and request mediation |
//! | `hooks` | [`ConnectorHooks`] and [`Provider`] seams |
//! | `registry` | [`ConnectorRegistry`] name → factory map |
//! | `state` | [`ConnectionState`] machine |
//! | `wallet` | [`WalletInfo`] and [`ConnectedWallet`] records |

// ============================================================================
// Submodules
// ============================================================================

/// Connector session core.
pub mod core;

/// Mechanism and provider seams.
pub mod hooks;

/// Pluggable connector registry.
pub mod registry;

/// Session state machine.
pub mod state;

/// Wallet identity and session records.
pub mod wallet;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Connector;
pub use hooks::{ConnectorHooks, Provider};
pub use registry::{ConnectorFactory, ConnectorRegistry};
pub use state::ConnectionState;
pub use wallet::{ConnectedWallet, WalletInfo};
