//! Wallet identity and session records.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// WalletInfo
// ============================================================================

/// Externally supplied wallet identity descriptor.
///
/// Produced by wallet discovery (out of scope) and handed to
/// [`Connector::connect`].
///
/// [`Connector::connect`]: crate::connector::Connector::connect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Display name of the wallet.
    pub name: String,

    /// Icon URL or data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Wallet home/deeplink URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Discovery-specific fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WalletInfo {
    /// Creates a descriptor with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            url: None,
            extra: Map::new(),
        }
    }
}

// ============================================================================
// ConnectedWallet
// ============================================================================

/// The session record produced by a successful connect.
///
/// Owned exclusively by one Connector: replaced wholesale on (re)connect,
/// cleared on disconnect or error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedWallet {
    /// Account address for the active chain.
    pub address: String,

    /// Chain identifier (e.g. `"eip155:1"`).
    #[serde(rename = "chainId")]
    pub chain_id: String,

    /// Account public key, when the mechanism exposes one.
    #[serde(rename = "publicKey")]
    pub public_key: String,

    /// Whether the session is live.
    pub connected: bool,

    /// Opaque mechanism state for later [`Connector::resume`].
    ///
    /// [`Connector::resume`]: crate::connector::Connector::resume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_wallet_info_extra_pass_through() {
        let json = r#"{"name": "Phantom", "icon": "data:image/svg", "rdns": "app.phantom"}"#;
        let info: WalletInfo = serde_json::from_str(json).expect("parse");
        assert_eq!(info.name, "Phantom");
        assert_eq!(info.extra.get("rdns"), Some(&"app.phantom".into()));

        let back = serde_json::to_value(&info).expect("serialize");
        assert_eq!(back.get("rdns"), Some(&"app.phantom".into()));
    }

    #[test]
    fn test_connected_wallet_field_names() {
        let wallet = ConnectedWallet {
            address: "0xdead".into(),
            chain_id: "eip155:1".into(),
            public_key: "0xbeef".into(),
            connected: true,
            state: Some(json!({"session": "s1"})),
        };

        let value = serde_json::to_value(&wallet).expect("serialize");
        assert_eq!(value.get("chainId"), Some(&json!("eip155:1")));
        assert_eq!(value.get("publicKey"), Some(&json!("0xbeef")));
    }
}
