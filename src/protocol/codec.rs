//! Protocol collaborator seam.
//!
//! The connector core never interprets payload bytes itself. Encoding a
//! method call into a wire envelope and validating/unwrapping the reply
//! is delegated to a [`Protocol`] implementation. [`JsonProtocol`] is the
//! bundled JSON-RPC-flavoured implementation.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

use crate::error::{ModalError, Result};
use crate::protocol::{Message, MessageType};

// ============================================================================
// Protocol
// ============================================================================

/// Encodes requests and decodes responses for a connector session.
///
/// Implementations must be pure with respect to connector state: the same
/// inputs produce equivalent envelopes regardless of session history.
pub trait Protocol: Send + Sync {
    /// Encodes a method call into a request envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError`] with code `invalid_payload` if the call
    /// cannot be represented on the wire.
    fn encode_request(&self, method: &str, params: Value) -> Result<Message>;

    /// Validates a reply envelope and unwraps its result.
    ///
    /// # Errors
    ///
    /// Returns the wallet-reported error for `error` envelopes, or
    /// `invalid_payload` for malformed replies.
    fn decode_response(&self, message: &Message) -> Result<Value>;
}

// ============================================================================
// JsonProtocol
// ============================================================================

/// JSON codec: requests carry `{method, params}`, responses carry
/// `{result}`, error payloads carry `{code?, message?}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProtocol;

impl JsonProtocol {
    /// Creates the codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Protocol for JsonProtocol {
    fn encode_request(&self, method: &str, params: Value) -> Result<Message> {
        if method.is_empty() {
            return Err(ModalError::invalid_payload("Request method is empty"));
        }

        Ok(Message::new(
            MessageType::Request,
            json!({
                "method": method,
                "params": params,
            }),
        ))
    }

    fn decode_response(&self, message: &Message) -> Result<Value> {
        match message.message_type {
            MessageType::Response => Ok(message
                .payload
                .get("result")
                .cloned()
                .unwrap_or(Value::Null)),

            MessageType::Error => {
                // Prefer a canonical error embedded in the payload.
                if let Ok(err) = serde_json::from_value::<ModalError>(message.payload.clone()) {
                    return Err(err);
                }

                let text = message
                    .payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Wallet returned an error");
                Err(ModalError::invalid_payload(text)
                    .with_data(message.payload.clone()))
            }

            MessageType::Request => Err(ModalError::invalid_payload(
                "Expected a response envelope, got a request",
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
