//! Pluggable connector registry.
//!
//! Maps connector type keys to factories. The registry is an explicit,
//! constructible value passed by handle — default registrations happen
//! once at application startup, not through a global singleton.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::ConnectorConfig;
use crate::connector::core::Connector;
use crate::error::{ModalError, Result};

// ============================================================================
// Types
// ============================================================================

/// Builds a [`Connector`] from a configuration record.
pub type ConnectorFactory = Box<dyn Fn(&ConnectorConfig) -> Result<Connector> + Send + Sync>;

// ============================================================================
// ConnectorRegistry
// ============================================================================

/// Name → factory map for pluggable connector implementations.
///
/// Query operations (`has_type`, `types`, `unregister`, `clear`) are
/// total and never fail on unknown input.
pub struct ConnectorRegistry {
    factories: Mutex<FxHashMap<String, ConnectorFactory>>,
}

impl ConnectorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Mutex::new(FxHashMap::default()),
        }
    }

    /// Registers a factory under a unique, non-empty type key.
    ///
    /// # Errors
    ///
    /// - `connector_create_failed` for an empty key
    /// - `already_registered` for a duplicate key
    pub fn register(
        &self,
        connector_type: impl Into<String>,
        factory: ConnectorFactory,
    ) -> Result<()> {
        let connector_type = connector_type.into();
        if connector_type.is_empty() {
            return Err(ModalError::connector_create_failed(
                "Connector type key must not be empty",
            ));
        }

        let mut factories = self.factories.lock();
        if factories.contains_key(&connector_type) {
            return Err(ModalError::already_registered(&connector_type));
        }

        debug!(connector_type = %connector_type, "Connector factory registered");
        factories.insert(connector_type, factory);
        Ok(())
    }

    /// Builds a connector for `config.connector_type`.
    ///
    /// Invokes the matching factory exactly once per call.
    ///
    /// # Errors
    ///
    /// - `not_registered` for an unknown type
    /// - `connector_create_failed` wrapping any factory error
    pub fn create(&self, config: &ConnectorConfig) -> Result<Connector> {
        let factories = self.factories.lock();
        let factory = factories
            .get(&config.connector_type)
            .ok_or_else(|| ModalError::not_registered(&config.connector_type))?;

        factory(config).map_err(|e| {
            ModalError::connector_create_failed(format!(
                "Factory for {} failed: {}",
                config.connector_type, e.message
            ))
        })
    }

    /// Removes a factory. Returns whether one was present.
    pub fn unregister(&self, connector_type: &str) -> bool {
        self.factories.lock().remove(connector_type).is_some()
    }

    /// Removes every factory.
    pub fn clear(&self) {
        self.factories.lock().clear();
    }

    /// Returns whether a factory exists for the type.
    #[must_use]
    pub fn has_type(&self, connector_type: &str) -> bool {
        self.factories.lock().contains_key(connector_type)
    }

    /// Returns the registered type keys, sorted for determinism.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.lock().keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::config::TransportConfig;
    use crate::connector::hooks::{ConnectorHooks, Provider};
    use crate::connector::wallet::{ConnectedWallet, WalletInfo};
    use crate::error::ErrorCode;
    use crate::protocol::JsonProtocol;
    use crate::transport::{Transport, TransportHooks};

    struct NullTransportHooks;

    #[async_trait]
    impl TransportHooks for NullTransportHooks {
        fn transport_type(&self) -> &str {
            "null"
        }

        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }

        async fn send(&self, _data: Value) -> Result<()> {
            Ok(())
        }
    }

    struct NullConnectorHooks;

    #[async_trait]
    impl ConnectorHooks for NullConnectorHooks {
        fn connector_type(&self) -> &str {
            "null"
        }

        async fn connect(
            &self,
            _wallet: &WalletInfo,
            _resume_state: Option<Value>,
        ) -> Result<ConnectedWallet> {
            Err(ModalError::connection_failed("null connector"))
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }

        fn create_provider(&self, _wallet: &ConnectedWallet) -> Result<Arc<dyn Provider>> {
            Err(ModalError::not_connected("null connector"))
        }
    }

    fn null_connector() -> Connector {
        let transport = Arc::new(Transport::new(
            Arc::new(NullTransportHooks),
            TransportConfig::default(),
            "https://app.example.com",
        ));
        Connector::new(transport, Arc::new(JsonProtocol::new()), Arc::new(NullConnectorHooks))
    }

    fn counting_factory(calls: Arc<AtomicUsize>) -> ConnectorFactory {
        Box::new(move |_config| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(null_connector())
        })
    }

    #[test]
    fn test_create_unknown_type_fails() {
        let registry = ConnectorRegistry::new();
        let err = registry
            .create(&ConnectorConfig::new("unknown"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotRegistered);
    }

    #[test]
    fn test_double_register_fails_second() {
        let registry = ConnectorRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        registry
            .register("popup", counting_factory(Arc::clone(&calls)))
            .expect("first register");
        let err = registry
            .register("popup", counting_factory(calls))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRegistered);
    }

    #[test]
    fn test_empty_key_rejected() {
        let registry = ConnectorRegistry::new();
        let err = registry
            .register("", counting_factory(Arc::new(AtomicUsize::new(0))))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConnectorCreateFailed);
    }

    #[test]
    fn test_create_invokes_factory_once_per_call() {
        let registry = ConnectorRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry
            .register("popup", counting_factory(Arc::clone(&calls)))
            .expect("register");

        let config = ConnectorConfig::new("popup");
        registry.create(&config).expect("create");
        registry.create(&config).expect("create");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_error_wrapped() {
        let registry = ConnectorRegistry::new();
        registry
            .register(
                "broken",
                Box::new(|_config| Err(ModalError::invalid_payload("bad config"))),
            )
            .expect("register");

        let err = registry
            .create(&ConnectorConfig::new("broken"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConnectorCreateFailed);
        assert!(err.message.contains("bad config"));
    }

    #[test]
    fn test_query_operations_are_total() {
        let registry = ConnectorRegistry::new();
        assert!(!registry.has_type("popup"));
        assert!(!registry.unregister("popup"));
        registry.clear();
        assert!(registry.types().is_empty());

        registry
            .register("socket", counting_factory(Arc::new(AtomicUsize::new(0))))
            .expect("register");
        registry
            .register("popup", counting_factory(Arc::new(AtomicUsize::new(0))))
            .expect("register");

        assert!(registry.has_type("popup"));
        assert_eq!(registry.types(), vec!["popup", "socket"]);

        assert!(registry.unregister("popup"));
        assert!(!registry.has_type("popup"));

        registry.clear();
        assert!(registry.types().is_empty());
    }
}
