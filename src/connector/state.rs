//! Connector session state machine.
//!
//! ```text
//! Disconnected ──connect()──► Connecting ──success──► Connected
//!      ▲                          │                      │
//!      │                       failure               disconnect()
//!      │                          ▼                      │
//!      └──────success─────── [ Error ] ◄────failure──────┘
//! ```
//!
//! `Error` is not auto-recovering; only an explicit `connect()` leaves it.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// ConnectionState
// ============================================================================

/// Closed set of session states. Exactly one is held per Connector and
/// it is mutated only through the defined transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No session; the initial state.
    #[default]
    Disconnected,
    /// A connect is in flight.
    Connecting,
    /// A wallet session is live.
    Connected,
    /// The last transition failed; requires an explicit connect to leave.
    Error,
}

impl ConnectionState {
    /// Returns `true` if a session is live.
    #[inline]
    #[must_use]
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    /// Returns `true` if `connect()` may start from this state.
    #[inline]
    #[must_use]
    pub fn can_connect(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_can_connect() {
        assert!(ConnectionState::Disconnected.can_connect());
        assert!(ConnectionState::Error.can_connect());
        assert!(!ConnectionState::Connecting.can_connect());
        assert!(!ConnectionState::Connected.can_connect());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ConnectionState::Connecting).expect("serialize");
        assert_eq!(json, "\"connecting\"");
    }
}
