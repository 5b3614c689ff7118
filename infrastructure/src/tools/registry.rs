//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates tool providers and implements
//! [`ToolExecutorPort`]. It owns the deduplicated catalogue offered to the
//! model and routes each invocation to the provider that registered the tool.
//!
//! # Usage
//!
//! ```ignore
//! use colloquy_infrastructure::tools::{BuiltinProvider, ToolRegistry};
//!
//! let registry = ToolRegistry::new();
//! registry.add_provider(Arc::new(BuiltinProvider::new())).await?;
//!
//! assert!(registry.has_tool("current_time"));
//! ```
//!
//! # Conflict Resolution
//!
//! Providers are consulted in registration order. When two providers offer a
//! tool with the same name, the first registration wins and the later
//! definition is dropped, not merged.
//!
//! Providers may be added while sessions are running. Registration is
//! serialized, and readers see either the old or the new catalogue.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use colloquy_application::ports::tool_executor::ToolExecutorPort;
use colloquy_domain::{ProviderError, ToolCatalogue, ToolDefinition, ToolError, ToolProvider};
use serde_json::{Map, Value};

#[derive(Default)]
struct RegistryState {
    providers: Vec<Arc<dyn ToolProvider>>,
    catalogue: ToolCatalogue,
    /// Tool name -> index into `providers`
    routes: HashMap<String, usize>,
}

impl RegistryState {
    /// Insert a provider's tools, returning how many were new.
    fn absorb(&mut self, provider_index: usize, tools: Vec<ToolDefinition>) -> usize {
        let provider_id = self.providers[provider_index].id().to_string();
        let mut added = 0;

        for tool in tools {
            let name = tool.name.clone();
            if self.catalogue.insert(tool) {
                tracing::debug!(tool = %name, provider = %provider_id, "Registered tool");
                self.routes.insert(name, provider_index);
                added += 1;
            } else {
                tracing::trace!(
                    tool = %name,
                    provider = %provider_id,
                    "Tool already registered by an earlier provider"
                );
            }
        }
        added
    }
}

/// Tool registry that aggregates multiple providers
pub struct ToolRegistry {
    state: RwLock<RegistryState>,
    /// Serializes `add_provider` and `reload`
    registration: tokio::sync::Mutex<()>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            registration: tokio::sync::Mutex::new(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Discover a provider's tools and add them to the catalogue.
    ///
    /// Returns the number of tools that were new. A provider that is not
    /// available or fails discovery is not registered.
    pub async fn add_provider(&self, provider: Arc<dyn ToolProvider>) -> Result<usize, ProviderError> {
        let _registration = self.registration.lock().await;

        if !provider.is_available().await {
            tracing::debug!(provider = provider.id(), "Provider not available, skipping");
            return Err(ProviderError::NotAvailable(provider.id().to_string()));
        }
        let tools = provider.discover_tools().await?;

        let mut state = self.write();
        let index = state.providers.len();
        state.providers.push(Arc::clone(&provider));
        let added = state.absorb(index, tools);

        tracing::info!(
            provider = provider.id(),
            added,
            total = state.catalogue.len(),
            "Tool provider registered"
        );
        Ok(added)
    }

    /// Rebuild the catalogue by rediscovering every registered provider.
    ///
    /// Providers that are unavailable or fail discovery contribute no tools
    /// but stay registered.
    pub async fn reload(&self) -> usize {
        let _registration = self.registration.lock().await;
        let providers: Vec<_> = self.read().providers.clone();

        let mut discovered = Vec::with_capacity(providers.len());
        for provider in &providers {
            if !provider.is_available().await {
                tracing::debug!(provider = provider.id(), "Provider not available, skipping");
                discovered.push(Vec::new());
                continue;
            }
            match provider.discover_tools().await {
                Ok(tools) => discovered.push(tools),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.id(),
                        error = %e,
                        "Failed to discover tools from provider"
                    );
                    discovered.push(Vec::new());
                }
            }
        }

        let mut state = RegistryState {
            providers,
            ..RegistryState::default()
        };
        for (index, tools) in discovered.into_iter().enumerate() {
            state.absorb(index, tools);
        }

        let total = state.catalogue.len();
        *self.write() = state;
        total
    }

    fn provider_for(&self, tool_name: &str) -> Option<Arc<dyn ToolProvider>> {
        let state = self.read();
        let index = *state.routes.get(tool_name)?;
        state.providers.get(index).cloned()
    }

    /// Get a list of registered provider IDs
    pub fn provider_ids(&self) -> Vec<String> {
        self.read()
            .providers
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let state = self.read();
        let mut tools_per_provider = HashMap::new();
        for &index in state.routes.values() {
            let id = state.providers[index].id().to_string();
            *tools_per_provider.entry(id).or_insert(0) += 1;
        }

        RegistryStats {
            total_providers: state.providers.len(),
            total_tools: state.catalogue.len(),
            tools_per_provider,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_providers: usize,
    pub total_tools: usize,
    pub tools_per_provider: HashMap<String, usize>,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn catalogue(&self) -> ToolCatalogue {
        self.read().catalogue.clone()
    }

    fn tool_count(&self) -> usize {
        self.read().catalogue.len()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.read().catalogue.contains(name)
    }

    async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        timeout: Duration,
    ) -> Result<String, ToolError> {
        let provider = self
            .provider_for(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        match tokio::time::timeout(timeout, provider.execute(name, &arguments)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::timeout(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::BuiltinProvider;

    /// Provider with canned tools, used to exercise conflicts and routing.
    struct FakeProvider {
        id: &'static str,
        tools: Vec<&'static str>,
        available: bool,
        delay: Duration,
    }

    impl FakeProvider {
        fn new(id: &'static str, tools: Vec<&'static str>) -> Self {
            Self {
                id,
                tools,
                available: true,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl ToolProvider for FakeProvider {
        fn id(&self) -> &str {
            self.id
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
            Ok(self
                .tools
                .iter()
                .map(|name| ToolDefinition::new(*name, format!("{} from {}", name, self.id)))
                .collect())
        }

        async fn execute(&self, name: &str, _arguments: &Map<String, Value>) -> Result<String, ToolError> {
            tokio::time::sleep(self.delay).await;
            Ok(format!("{}:{}", self.id, name))
        }
    }

    #[tokio::test]
    async fn test_registry_with_builtin() {
        let registry = ToolRegistry::new();
        let added = registry
            .add_provider(Arc::new(BuiltinProvider::new()))
            .await
            .unwrap();

        assert_eq!(added, 2);
        assert!(registry.has_tool("current_time"));
        assert!(registry.has_tool("echo"));
        assert_eq!(registry.tool_count(), 2);
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let registry = ToolRegistry::new();
        registry
            .add_provider(Arc::new(FakeProvider::new("first", vec!["search", "fetch"])))
            .await
            .unwrap();
        let added = registry
            .add_provider(Arc::new(FakeProvider::new("second", vec!["search", "summarize"])))
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(registry.tool_count(), 3);
        let catalogue = registry.catalogue();
        assert_eq!(catalogue.get("search").unwrap().description, "search from first");

        let output = registry
            .invoke("search", Map::new(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(output, "first:search");
        let output = registry
            .invoke("summarize", Map::new(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(output, "second:summarize");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .invoke("missing", Map::new(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(err.code, ToolError::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_rejected() {
        let registry = ToolRegistry::new();
        let mut provider = FakeProvider::new("offline", vec!["search"]);
        provider.available = false;

        let err = registry.add_provider(Arc::new(provider)).await.unwrap_err();

        assert!(matches!(err, ProviderError::NotAvailable(_)));
        assert!(registry.provider_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_honours_timeout() {
        let registry = ToolRegistry::new();
        let mut provider = FakeProvider::new("slow", vec!["crawl"]);
        provider.delay = Duration::from_secs(30);
        registry.add_provider(Arc::new(provider)).await.unwrap();

        let err = registry
            .invoke("crawl", Map::new(), Duration::from_secs(2))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_reload_and_stats() {
        let registry = ToolRegistry::new();
        registry
            .add_provider(Arc::new(FakeProvider::new("a", vec!["one", "two"])))
            .await
            .unwrap();
        registry
            .add_provider(Arc::new(FakeProvider::new("b", vec!["two", "three"])))
            .await
            .unwrap();

        assert_eq!(registry.reload().await, 3);

        let stats = registry.stats();
        assert_eq!(stats.total_providers, 2);
        assert_eq!(stats.total_tools, 3);
        assert_eq!(stats.tools_per_provider.get("a"), Some(&2));
        assert_eq!(stats.tools_per_provider.get("b"), Some(&1));
        assert_eq!(registry.provider_ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
