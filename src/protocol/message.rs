//! Wire envelope types.
//!
//! Defines the [`Message`] envelope carried between application and wallet.
//! The transport core treats the payload as opaque; only the protocol
//! collaborator interprets it.

// ============================================================================
// Imports
// ============================================================================

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// MessageType
// ============================================================================

/// Envelope discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Application → wallet command.
    Request,
    /// Wallet → application reply.
    Response,
    /// Wallet → application failure reply.
    Error,
}

// ============================================================================
// Message
// ============================================================================

/// The wire envelope.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "type": "request",
///   "payload": { ... },
///   "timestamp": 1735689600000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message<T = Value> {
    /// Unique identifier for request/response correlation.
    pub id: String,

    /// Envelope type.
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Opaque payload interpreted by the protocol collaborator.
    pub payload: T,

    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> Message<T> {
    /// Creates an envelope with a generated id and current timestamp.
    #[must_use]
    pub fn new(message_type: MessageType, payload: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type,
            payload,
            timestamp: now_ms(),
        }
    }

    /// Creates a reply envelope correlated to an existing id.
    #[must_use]
    pub fn reply(id: impl Into<String>, message_type: MessageType, payload: T) -> Self {
        Self {
            id: id.into(),
            message_type,
            payload,
            timestamp: now_ms(),
        }
    }

    /// Returns `true` if this is a request envelope.
    #[inline]
    #[must_use]
    pub fn is_request(&self) -> bool {
        self.message_type == MessageType::Request
    }

    /// Returns `true` if this is an error envelope.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.message_type == MessageType::Error
    }
}

impl<T: Serialize> Message<T> {
    /// Serializes the envelope to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error if the payload is not
    /// representable as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl<T: DeserializeOwned> Message<T> {
    /// Parses an envelope from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error if the value is not a valid
    /// envelope.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Current Unix time in milliseconds.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let message = Message::new(MessageType::Request, json!({"method": "eth_accounts"}));
        let value = message.to_value().expect("serialize");

        assert_eq!(value.get("type"), Some(&json!("request")));
        assert!(value.get("id").and_then(Value::as_str).is_some());
        assert!(value.get("timestamp").and_then(Value::as_u64).is_some());
        assert_eq!(
            value.pointer("/payload/method"),
            Some(&json!("eth_accounts"))
        );
    }

    #[test]
    fn test_envelope_parse() {
        let value = json!({
            "id": "abc-123",
            "type": "response",
            "payload": {"result": 7},
            "timestamp": 1735689600000u64
        });

        let message: Message = Message::from_value(value).expect("parse");
        assert_eq!(message.id, "abc-123");
        assert_eq!(message.message_type, MessageType::Response);
        assert!(!message.is_request());
    }

    #[test]
    fn test_reply_keeps_id() {
        let request = Message::new(MessageType::Request, json!({}));
        let reply = Message::reply(request.id.clone(), MessageType::Response, json!({"ok": true}));
        assert_eq!(reply.id, request.id);
        assert!(!reply.is_error());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let value = json!({
            "id": "x",
            "type": "notify",
            "payload": null,
            "timestamp": 0
        });
        assert!(Message::<Value>::from_value(value).is_err());
    }

    #[test]
    fn test_generated_ids_unique() {
        let a = Message::new(MessageType::Request, json!(null));
        let b = Message::new(MessageType::Request, json!(null));
        assert_ne!(a.id, b.id);
    }
}
