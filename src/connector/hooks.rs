//! Connector mechanism seam.
//!
//! A concrete connector implementation (pop-up, extension, socket)
//! supplies its wallet-facing operations through [`ConnectorHooks`]; the
//! session machine in [`Connector`] stays mechanism-agnostic.
//!
//! [`Connector`]: crate::connector::Connector

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::connector::wallet::{ConnectedWallet, WalletInfo};
use crate::error::Result;

// ============================================================================
// Provider
// ============================================================================

/// Chain-specific request surface handed to the application.
///
/// Multi-chain RPC semantics live behind this trait, outside the session
/// core. The core only builds and caches one per session.
pub trait Provider: fmt::Debug + Send + Sync {
    /// Chain namespace the provider serves (e.g. `"eip155"`, `"solana"`).
    fn namespace(&self) -> &str;
}

// ============================================================================
// ConnectorHooks
// ============================================================================

/// Mechanism operations behind a connector session.
#[async_trait]
pub trait ConnectorHooks: Send + Sync {
    /// Connector type key this mechanism registers under.
    fn connector_type(&self) -> &str;

    /// Establishes a wallet session.
    ///
    /// `resume_state` carries the previously persisted session state on a
    /// [`Connector::resume`] and is `None` on a fresh connect.
    ///
    /// [`Connector::resume`]: crate::connector::Connector::resume
    async fn connect(
        &self,
        wallet: &WalletInfo,
        resume_state: Option<Value>,
    ) -> Result<ConnectedWallet>;

    /// Ends the wallet session.
    async fn disconnect(&self) -> Result<()>;

    /// Builds the chain-specific provider for a live session.
    ///
    /// Invoked at most once per session; the core caches the result.
    fn create_provider(&self, wallet: &ConnectedWallet) -> Result<Arc<dyn Provider>>;
}
