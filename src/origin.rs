//! Origin validation.
//!
//! Pure, non-panicking checks that a message's claimed origin matches the
//! trusted origin the transport was configured with. Validation never
//! rejects by throwing: callers get a structured
//! [`OriginValidationResult`] and decide between dropping the message and
//! escalating.
//!
//! # Origin-Context Convention
//!
//! A payload may carry its origin in a nested `_context` record:
//!
//! ```json
//! { "method": "wallet_sign", "_context": { "origin": "https://app.example.com" } }
//! ```
//!
//! "Wrapped" transports carry it as a top-level `origin` field instead.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use url::Url;

// ============================================================================
// OriginValidationResult
// ============================================================================

/// Outcome of an origin check.
///
/// Never constructed with `valid: true` and an error at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginValidationResult {
    /// Whether the message may be dispatched.
    pub valid: bool,
    /// Rejection reason, present only when invalid.
    pub error: Option<String>,
    /// The origin the message claimed, when one was present.
    pub context: Option<String>,
}

impl OriginValidationResult {
    /// A passing result.
    #[must_use]
    pub fn ok(context: Option<String>) -> Self {
        Self {
            valid: true,
            error: None,
            context,
        }
    }

    /// A rejection with the given reason.
    #[must_use]
    pub fn rejected(error: impl Into<String>, context: Option<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            context,
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes an origin to `scheme://host[:port]` form.
///
/// Default ports are elided and trailing path noise is dropped, so
/// `https://app.example.com/` and `https://app.example.com:443` normalize
/// to the same string. An unparseable origin falls back to its trimmed
/// text with any trailing slash removed.
#[must_use]
pub fn normalize_origin(origin: &str) -> String {
    let trimmed = origin.trim();

    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => {
            let host = url.host_str().unwrap_or_default();
            match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                None => format!("{}://{}", url.scheme(), host),
            }
        }
        _ => trimmed.trim_end_matches('/').to_string(),
    }
}

/// Compares two origins after normalization.
#[must_use]
pub fn origins_match(claimed: &str, trusted: &str) -> bool {
    normalize_origin(claimed) == normalize_origin(trusted)
}

// ============================================================================
// Validation
// ============================================================================

/// Validates a payload's embedded `_context.origin` against the trusted
/// origin.
///
/// A payload without origin context passes unless `require_context` is
/// set. The check is independent of payload shape: non-object payloads
/// simply carry no context.
#[must_use]
pub fn validate_origin(
    payload: &Value,
    trusted_origin: &str,
    require_context: bool,
) -> OriginValidationResult {
    let claimed = payload
        .pointer("/_context/origin")
        .and_then(Value::as_str)
        .map(str::to_string);

    check_claimed_origin(claimed, trusted_origin, require_context)
}

/// Validates a wrapped payload's top-level `origin` field.
///
/// Wrapped transports (extension runtime messaging) surface the origin
/// beside the payload rather than inside it.
#[must_use]
pub fn validate_wrapped_origin(
    payload: &Value,
    trusted_origin: &str,
    require_origin: bool,
) -> OriginValidationResult {
    let claimed = payload
        .get("origin")
        .and_then(Value::as_str)
        .map(str::to_string);

    check_claimed_origin(claimed, trusted_origin, require_origin)
}

/// Shared comparison for both conventions.
fn check_claimed_origin(
    claimed: Option<String>,
    trusted_origin: &str,
    required: bool,
) -> OriginValidationResult {
    match claimed {
        Some(origin) => {
            if origins_match(&origin, trusted_origin) {
                OriginValidationResult::ok(Some(origin))
            } else {
                OriginValidationResult::rejected(
                    format!("Origin mismatch: expected {trusted_origin}, got {origin}"),
                    Some(origin),
                )
            }
        }
        None if required => {
            OriginValidationResult::rejected("Message carries no origin context", None)
        }
        None => OriginValidationResult::ok(None),
    }
}

// ============================================================================
// Tests
// ============================================================================
