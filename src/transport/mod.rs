//! Transport lifecycle layer.
//!
//! This module owns everything mechanism-independent about the channel to
//! a wallet: bounded-retry connect/send, event fan-out, origin gating of
//! inbound payloads, and teardown. Delivery mechanisms plug in through
//! [`TransportHooks`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   TransportHooks   ┌────────────────────┐
//! │  Transport   │───────────────────►│ pop-up / extension │
//! │  (lifecycle, │      3 hooks       │ / socket / window  │
//! │   events,    │◄───────────────────│ mechanism (out of  │
//! │   origin)    │  handle_message()  │ scope)             │
//! └──────────────┘                    └────────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`Transport`] lifecycle core |
//! | `hooks` | [`TransportHooks`] mechanism seam |
//! | `subscription` | Events and the listener registry |

// ============================================================================
// Submodules
// ============================================================================

/// Transport lifecycle core.
pub mod core;

/// Mechanism hook trait.
pub mod hooks;

/// Events and listener registry.
pub mod subscription;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Transport;
pub use hooks::TransportHooks;
pub use subscription::{EventKind, Listener, ListenerId, Subscriptions, TransportEvent};
