//! Provider router: picks the backend for a request by family name.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use vedaguru_core::provider::{Provider, ProviderFamily};

use crate::openai_compat::OpenAiCompatProvider;

/// Why a request could not be routed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A known family with no API key
    #[error("{0} is not configured")]
    Unconfigured(ProviderFamily),

    #[error("unknown provider '{0}'")]
    Unknown(String),
}

/// Routes requests to the registered provider for a family.
pub struct ProviderRouter {
    providers: HashMap<ProviderFamily, Arc<dyn Provider>>,
    default_family: ProviderFamily,
}

impl ProviderRouter {
    pub fn new(default_family: ProviderFamily) -> Self {
        Self {
            providers: HashMap::new(),
            default_family,
        }
    }

    /// Register a provider under its own family, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.family(), provider);
    }

    pub fn default_family(&self) -> ProviderFamily {
        self.default_family
    }

    pub fn get(&self, family: ProviderFamily) -> Option<Arc<dyn Provider>> {
        self.providers.get(&family).cloned()
    }

    /// Resolve a requested provider name, or the default when none is given.
    pub fn resolve(&self, requested: Option<&str>) -> Result<Arc<dyn Provider>, RouteError> {
        let family = match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => {
                ProviderFamily::from_name(name).ok_or_else(|| RouteError::Unknown(name.to_string()))?
            }
            None => self.default_family,
        };
        self.get(family).ok_or(RouteError::Unconfigured(family))
    }

    /// Families that have a provider registered.
    pub fn configured(&self) -> Vec<ProviderFamily> {
        ProviderFamily::ALL
            .into_iter()
            .filter(|f| self.providers.contains_key(f))
            .collect()
    }
}

/// Build a router from configuration. Families without an API key stay unregistered.
pub fn build_from_config(config: &vedaguru_config::AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(config.default_family());

    for family in ProviderFamily::ALL {
        match config.api_key(family) {
            Some(key) => {
                let base_url = config.base_url(family);
                debug!(provider = %family, %base_url, "Registering provider");
                router.register(Arc::new(OpenAiCompatProvider::new(family, base_url, key)));
            }
            None => debug!(provider = %family, "No API key, provider left unconfigured"),
        }
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use vedaguru_config::{AppConfig, ProviderConfig};

    fn config_with_keys(mistral: Option<&str>, perplexity: Option<&str>) -> AppConfig {
        let mut config = AppConfig::default();
        for (family, key) in [(ProviderFamily::Mistral, mistral), (ProviderFamily::Perplexity, perplexity)] {
            config.providers.insert(
                family.as_str().to_string(),
                ProviderConfig { api_key: key.map(String::from), api_url: None },
            );
        }
        config
    }

    #[test]
    fn register_and_lookup() {
        let mut router = ProviderRouter::new(ProviderFamily::Mistral);
        router.register(Arc::new(OpenAiCompatProvider::mistral("sk-test")));

        assert!(router.get(ProviderFamily::Mistral).is_some());
        assert!(router.get(ProviderFamily::Perplexity).is_none());
        assert_eq!(router.configured(), vec![ProviderFamily::Mistral]);
    }

    #[test]
    fn resolve_defaults_and_names() {
        let router = build_from_config(&config_with_keys(Some("m-key"), Some("p-key")));

        assert_eq!(router.resolve(None).unwrap().family(), ProviderFamily::Mistral);
        assert_eq!(router.resolve(Some("  ")).unwrap().family(), ProviderFamily::Mistral);
        assert_eq!(router.resolve(Some("Perplexity")).unwrap().family(), ProviderFamily::Perplexity);
    }

    #[test]
    fn missing_key_is_unconfigured() {
        let router = build_from_config(&config_with_keys(None, Some("   ")));
        assert_eq!(
            router.resolve(None).err(),
            Some(RouteError::Unconfigured(ProviderFamily::Mistral))
        );
        assert_eq!(
            router.resolve(Some("perplexity")).err(),
            Some(RouteError::Unconfigured(ProviderFamily::Perplexity))
        );
        assert!(router.configured().is_empty());
    }

    #[test]
    fn unknown_name_is_rejected() {
        let router = build_from_config(&config_with_keys(Some("m-key"), None));
        assert_eq!(
            router.resolve(Some("openai")).err(),
            Some(RouteError::Unknown("openai".into()))
        );
    }
}
