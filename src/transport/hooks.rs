//! Delivery-mechanism seam.
//!
//! The transport core is mechanism-agnostic: pop-up window messaging,
//! extension runtime messaging, socket channels and cross-window messaging
//! all plug in through [`TransportHooks`]. The core owns retries, event
//! fan-out, origin gating and teardown; the hooks own the wire.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// TransportHooks
// ============================================================================

/// The three mechanism operations plus a small capability descriptor.
///
/// Implementations report failures through [`Result`]; the core wraps
/// whatever comes back into canonical errors, so hooks are free to use
/// [`ModalError::wrap`] for underlying platform failures.
///
/// [`ModalError::wrap`]: crate::error::ModalError::wrap
#[async_trait]
pub trait TransportHooks: Send + Sync {
    /// Mechanism name (e.g. `"popup"`, `"extension"`, `"socket"`).
    fn transport_type(&self) -> &str;

    /// Whether this mechanism receives a platform-validated origin.
    ///
    /// True only for message-based transports where the platform itself
    /// stamps the sender origin on each message. Everything else falls
    /// back to the host application's declared origin.
    fn supports_platform_origin(&self) -> bool {
        false
    }

    /// Establishes the underlying channel.
    ///
    /// The core may invoke this again while a previous call is still in
    /// flight (overlapping `connect()` calls are tolerated), so the
    /// implementation must be idempotent.
    async fn connect(&self) -> Result<()>;

    /// Tears the underlying channel down.
    async fn disconnect(&self) -> Result<()>;

    /// Delivers one opaque payload over the channel.
    async fn send(&self, data: Value) -> Result<()>;
}
