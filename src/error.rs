//! Error types for the wallet transport core.
//!
//! This module defines [`ModalError`], the single error shape this crate
//! surfaces to callers. Any failure raised by a delivery mechanism or a
//! protocol collaborator is wrapped into a `ModalError` before it reaches
//! a public boundary.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`ModalError`]:
//!
//! ```ignore
//! use wallet_transport::{Result, Transport};
//!
//! async fn example(transport: &Transport) -> Result<()> {
//!     transport.connect().await?;
//!     transport.send(serde_json::json!({"hello": "wallet"})).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Taxonomy
//!
//! | Code | Category | Trigger |
//! |------|----------|---------|
//! | [`ErrorCode::ConnectionFailed`] | Network | connect-retry exhaustion, send while disconnected |
//! | [`ErrorCode::MessageFailed`] | Network | send-retry exhaustion |
//! | [`ErrorCode::TransportDisconnected`] | Network | disconnect hook failure |
//! | [`ErrorCode::TransportUnavailable`] | Network | non-canonical failure wrapped at a seam |
//! | [`ErrorCode::RequestTimeout`] | Network | no correlated response within the configured timeout |
//! | [`ErrorCode::CleanupFailed`] | General | destroy-path failure |
//! | [`ErrorCode::NotConnected`] | General | provider/request outside the Connected state |
//! | [`ErrorCode::AlreadyRegistered`] | General | duplicate connector type key |
//! | [`ErrorCode::NotRegistered`] | General | unknown connector type on create |
//! | [`ErrorCode::ConnectorCreateFailed`] | General | connector factory returned an error |
//! | [`ErrorCode::InvalidPayload`] | General | protocol decode/validation failure |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using [`ModalError`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, ModalError>;

// ============================================================================
// ErrorCode
// ============================================================================

/// Stable, machine-readable error codes.
///
/// Codes serialize as snake_case strings so they survive a trip through
/// a wire envelope unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Connection could not be established, or an operation required one.
    ConnectionFailed,
    /// A message could not be delivered after exhausting retries.
    MessageFailed,
    /// The disconnect hook failed while tearing the channel down.
    TransportDisconnected,
    /// A collaborator failed in a way that has no dedicated code.
    TransportUnavailable,
    /// Releasing subscriptions/resources during destroy failed.
    CleanupFailed,
    /// The operation requires a Connected session.
    NotConnected,
    /// A connector type key was registered twice.
    AlreadyRegistered,
    /// No factory is registered for the requested connector type.
    NotRegistered,
    /// A connector factory returned an error.
    ConnectorCreateFailed,
    /// A wire payload failed decoding or validation.
    InvalidPayload,
    /// No correlated response arrived within the configured timeout.
    RequestTimeout,
}

impl ErrorCode {
    /// Returns the category this code belongs to.
    #[inline]
    #[must_use]
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::ConnectionFailed
            | Self::MessageFailed
            | Self::TransportDisconnected
            | Self::TransportUnavailable
            | Self::RequestTimeout => ErrorCategory::Network,
            Self::CleanupFailed
            | Self::NotConnected
            | Self::AlreadyRegistered
            | Self::NotRegistered
            | Self::ConnectorCreateFailed
            | Self::InvalidPayload => ErrorCategory::General,
        }
    }

    /// Returns the snake_case wire name of this code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionFailed => "connection_failed",
            Self::MessageFailed => "message_failed",
            Self::TransportDisconnected => "transport_disconnected",
            Self::TransportUnavailable => "transport_unavailable",
            Self::CleanupFailed => "cleanup_failed",
            Self::NotConnected => "not_connected",
            Self::AlreadyRegistered => "already_registered",
            Self::NotRegistered => "not_registered",
            Self::ConnectorCreateFailed => "connector_create_failed",
            Self::InvalidPayload => "invalid_payload",
            Self::RequestTimeout => "request_timeout",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ErrorCategory
// ============================================================================

/// Coarse error category derived from [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Connectivity and delivery failures.
    Network,
    /// Everything else (lifecycle, registry, validation).
    General,
}

// ============================================================================
// ModalError
// ============================================================================

/// The canonical error surfaced by every public entry point.
///
/// Carries a stable [`ErrorCode`], a human-readable message, a `fatal`
/// flag for callers deciding between retry and teardown, and optional
/// structured context in `data`.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ModalError {
    /// Stable machine-readable code.
    pub code: ErrorCode,

    /// Human-readable description.
    pub message: String,

    /// Whether the session is beyond recovery without a fresh connect.
    #[serde(default)]
    pub fatal: bool,

    /// Optional structured context (e.g. the undeliverable payload).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// ModalError - Constructors
// ============================================================================

impl ModalError {
    /// Creates an error with the given code and message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fatal: false,
            data: None,
        }
    }

    /// Attaches structured context to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Marks the error fatal.
    #[must_use]
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Creates a connection failure error.
    #[inline]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConnectionFailed, message)
    }

    /// Creates a message delivery failure error.
    #[inline]
    pub fn message_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MessageFailed, message)
    }

    /// Creates a disconnect failure error.
    #[inline]
    pub fn transport_disconnected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportDisconnected, message)
    }

    /// Creates a generic transport failure error.
    #[inline]
    pub fn transport_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportUnavailable, message)
    }

    /// Creates a destroy-path failure error.
    #[inline]
    pub fn cleanup_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CleanupFailed, message)
    }

    /// Creates a not-connected error.
    #[inline]
    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotConnected, message)
    }

    /// Creates a duplicate-registration error.
    #[inline]
    pub fn already_registered(connector_type: &str) -> Self {
        Self::new(
            ErrorCode::AlreadyRegistered,
            format!("Connector type already registered: {connector_type}"),
        )
    }

    /// Creates an unknown-type registry error.
    #[inline]
    pub fn not_registered(connector_type: &str) -> Self {
        Self::new(
            ErrorCode::NotRegistered,
            format!("No connector registered for type: {connector_type}"),
        )
    }

    /// Creates a factory failure error.
    #[inline]
    pub fn connector_create_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConnectorCreateFailed, message)
    }

    /// Creates a payload validation error.
    #[inline]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPayload, message)
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: &str, timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::RequestTimeout,
            format!("Request {request_id} timed out after {timeout_ms}ms"),
        )
    }

    /// Wraps an arbitrary failure into a canonical error.
    ///
    /// Anything without a dedicated code becomes
    /// [`ErrorCode::TransportUnavailable`] carrying its display text.
    #[must_use]
    pub fn wrap(err: impl fmt::Display) -> Self {
        Self::transport_unavailable(err.to_string())
    }
}

// ============================================================================
// ModalError - Predicates
// ============================================================================

impl ModalError {
    /// Returns the category derived from the code.
    #[inline]
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Returns `true` if this is a connectivity/delivery failure.
    #[inline]
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    /// Returns `true` if this error may succeed on a fresh attempt.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.fatal
            && matches!(
                self.code,
                ErrorCode::ConnectionFailed
                    | ErrorCode::MessageFailed
                    | ErrorCode::RequestTimeout
            )
    }
}

// ============================================================================
// Tests
// ============================================================================
