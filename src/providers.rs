//! External connection providers.
//!
//! Accounts can be linked to third-party identity providers. The hand-off
//! flow itself never talks to a provider network; it only needs display
//! data for linked connections and a hook for exercising a provider in
//! tests. Providers register under a name in an explicit registry passed
//! to the orchestrator, so there is no global mutable provider table.

use crate::error::{GangwayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Display data for a linked provider connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionData {
    /// Human-readable name of the connected identity.
    pub display_name: String,
    /// Profile link at the provider, if one exists.
    pub link: Option<String>,
}

/// A registered identity provider.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Resolve display data for a connection by its provider-side id.
    async fn resolve_connection_data(&self, provider_id: &str) -> Result<ConnectionData>;

    /// Switch the provider into mock mode for tests.
    ///
    /// Providers without a mock mode keep the default no-op.
    async fn handle_mock_action(&self) -> Result<()> {
        Ok(())
    }
}

/// Registry of connection providers, keyed by provider name.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ConnectionProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn ConnectionProvider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Look up a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConnectionProvider>> {
        self.providers.get(name)
    }

    /// Names of all registered providers.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Resolve connection display data through a named provider.
    pub async fn resolve_connection_data(
        &self,
        provider_name: &str,
        provider_id: &str,
    ) -> Result<ConnectionData> {
        let provider = self
            .get(provider_name)
            .ok_or_else(|| GangwayError::not_found(format!("provider {}", provider_name)))?;
        provider.resolve_connection_data(provider_id).await
    }

    /// Put a named provider into mock mode.
    pub async fn handle_mock_action(&self, provider_name: &str) -> Result<()> {
        let provider = self
            .get(provider_name)
            .ok_or_else(|| GangwayError::not_found(format!("provider {}", provider_name)))?;
        provider.handle_mock_action().await
    }
}
