//! Wire protocol message types and codec seam.
//!
//! This module defines the envelope format carried between the application
//! and the wallet, and the [`Protocol`] trait the connector core uses to
//! encode/decode it.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `request` | App → Wallet | Method call |
//! | `response` | Wallet → App | Successful reply |
//! | `error` | Wallet → App | Failure reply |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `message` | [`Message`] envelope and [`MessageType`] |
//! | `codec` | [`Protocol`] trait and [`JsonProtocol`] |

// ============================================================================
// Submodules
// ============================================================================

/// Codec trait and bundled JSON implementation.
pub mod codec;

/// Wire envelope types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{JsonProtocol, Protocol};
pub use message::{Message, MessageType};
