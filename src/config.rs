//! Configuration types.
//!
//! [`TransportConfig`] is the only tuning knob the transport core exposes.
//! Unknown fields are preserved in a pass-through map so application-level
//! settings can ride along without this crate knowing about them.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Constants
// ============================================================================

/// Default request timeout (30s).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// TransportConfig
// ============================================================================

/// Transport tuning configuration.
///
/// An absent, zero, or otherwise invalid `timeoutMs` (negative, string,
/// fractional) falls back to 30000 rather than failing the whole config.
/// Fields this crate does not recognize are kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Request timeout in milliseconds.
    #[serde(
        rename = "timeoutMs",
        default = "default_timeout_ms",
        deserialize_with = "lenient_timeout_ms"
    )]
    pub timeout_ms: u64,

    /// Unrecognized fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransportConfig {
    /// Creates a config with the given timeout.
    ///
    /// A zero timeout is replaced with the 30000ms default.
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: if timeout_ms == 0 {
                DEFAULT_TIMEOUT_MS
            } else {
                timeout_ms
            },
            extra: Map::new(),
        }
    }

    /// Returns the effective timeout, normalizing an invalid stored value.
    #[inline]
    #[must_use]
    pub fn effective_timeout_ms(&self) -> u64 {
        if self.timeout_ms == 0 {
            DEFAULT_TIMEOUT_MS
        } else {
            self.timeout_ms
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Accepts any JSON value for `timeoutMs`, keeping only positive integers.
fn lenient_timeout_ms<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_u64() {
        Some(ms) if ms > 0 => ms,
        _ => DEFAULT_TIMEOUT_MS,
    })
}

// ============================================================================
// ConnectorConfig
// ============================================================================

/// The record handed to [`ConnectorRegistry::create`].
///
/// [`ConnectorRegistry::create`]: crate::connector::ConnectorRegistry::create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Registered connector type key (e.g. `"popup"`, `"extension"`).
    #[serde(rename = "type")]
    pub connector_type: String,

    /// Unrecognized fields, passed through to the factory unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectorConfig {
    /// Creates a config for the given connector type.
    #[must_use]
    pub fn new(connector_type: impl Into<String>) -> Self {
        Self {
            connector_type: connector_type.into(),
            extra: Map::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
