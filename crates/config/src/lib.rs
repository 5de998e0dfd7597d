//! Configuration loading, validation, and management for Vedaguru.
//!
//! Loads configuration from `~/.vedaguru/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use vedaguru_core::{ProviderFamily, TopicMatching};

/// The root configuration structure.
///
/// Maps directly to `~/.vedaguru/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider used when a request does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Provider-specific configurations, keyed by family name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Prompt construction settings
    #[serde(default)]
    pub prompts: PromptsConfig,
}

fn default_provider() -> String {
    ProviderFamily::Mistral.as_str().into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the family's public endpoint (e.g. a proxy or a test server)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lifetime of a cached reply
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}
fn default_ttl_secs() -> u64 {
    3600
}
fn default_max_entries() -> usize {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    #[serde(default)]
    pub topic_matching: TopicMatching,
}

impl AppConfig {
    /// Load configuration from the default path (~/.vedaguru/config.toml).
    ///
    /// Environment variables override the file:
    /// - `MISTRAL_API_KEY`, `PERPLEXITY_API_KEY`
    /// - `VEDAGURU_PROVIDER` (default provider)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path, |key| std::env::var(key).ok())
    }

    /// Load from `path`, then apply overrides from `env`.
    pub fn load_with_env(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        for family in ProviderFamily::ALL {
            if let Some(key) = env(family.api_key_env()).filter(|k| !k.trim().is_empty()) {
                self.providers
                    .entry(family.as_str().to_string())
                    .or_default()
                    .api_key = Some(key);
            }
        }

        if let Some(provider) = env("VEDAGURU_PROVIDER").filter(|p| !p.trim().is_empty()) {
            self.default_provider = provider.trim().to_lowercase();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".vedaguru")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if ProviderFamily::from_name(&self.default_provider).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown default_provider '{}' (expected mistral or perplexity)",
                self.default_provider
            )));
        }

        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be > 0".into(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::ValidationError("cache.ttl_secs must be > 0".into()));
        }

        Ok(())
    }

    /// The validated default provider family.
    pub fn default_family(&self) -> ProviderFamily {
        ProviderFamily::from_name(&self.default_provider).unwrap_or(ProviderFamily::Mistral)
    }

    /// Non-empty API key for `family`, if one is configured.
    pub fn api_key(&self, family: ProviderFamily) -> Option<&str> {
        self.providers
            .get(family.as_str())
            .and_then(|p| p.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Configured endpoint for `family`, or its public default.
    pub fn base_url(&self, family: ProviderFamily) -> String {
        self.providers
            .get(family.as_str())
            .and_then(|p| p.api_url.clone())
            .unwrap_or_else(|| family.default_base_url().to_string())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            cache: CacheConfig::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for vedaguru_core::Error {
    fn from(e: ConfigError) -> Self {
        vedaguru_core::Error::Config { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "mistral");
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 1000);
        assert!(config.cache.enabled);
        assert_eq!(config.prompts.topic_matching, TopicMatching::Fuzzy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.cache.max_entries, config.cache.max_entries);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "mistral");
        assert!(config.providers.is_empty());
    }

    #[test]
    fn parses_file_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_provider = "perplexity"

[providers.perplexity]
api_key = "pplx-file"
api_url = "http://localhost:9999"

[cache]
ttl_secs = 60
max_entries = 5

[prompts]
topic_matching = "strict"
"#
        )
        .unwrap();

        let config = AppConfig::load_with_env(file.path(), no_env).unwrap();
        assert_eq!(config.default_family(), ProviderFamily::Perplexity);
        assert_eq!(config.api_key(ProviderFamily::Perplexity), Some("pplx-file"));
        assert_eq!(config.base_url(ProviderFamily::Perplexity), "http://localhost:9999");
        assert_eq!(config.base_url(ProviderFamily::Mistral), "https://api.mistral.ai/v1");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 5);
        assert!(config.cache.enabled);
        assert_eq!(config.prompts.topic_matching, TopicMatching::Strict);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[providers.mistral]\napi_key = \"from-file\"\n").unwrap();

        let env = |key: &str| match key {
            "MISTRAL_API_KEY" => Some("from-env".to_string()),
            "PERPLEXITY_API_KEY" => Some("   ".to_string()),
            "VEDAGURU_PROVIDER" => Some("Perplexity".to_string()),
            _ => None,
        };
        let config = AppConfig::load_with_env(&path, env).unwrap();
        assert_eq!(config.api_key(ProviderFamily::Mistral), Some("from-env"));
        assert_eq!(config.api_key(ProviderFamily::Perplexity), None);
        assert_eq!(config.default_provider, "perplexity");
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "mistral".into(),
            ProviderConfig { api_key: Some(String::new()), api_url: None },
        );
        assert_eq!(config.api_key(ProviderFamily::Mistral), None);
    }

    #[test]
    fn unknown_default_provider_rejected() {
        let config = AppConfig { default_provider: "openai".into(), ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn config_errors_lift_into_error() {
        let err: vedaguru_core::Error = ConfigError::ValidationError("cache.ttl_secs must be > 0".into()).into();
        assert!(matches!(err, vedaguru_core::Error::Config { .. }));
        assert!(err.to_string().contains("cache.ttl_secs must be > 0"));
    }

    #[test]
    fn zero_cache_size_rejected() {
        let mut config = AppConfig::default();
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_provider = [").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let provider = ProviderConfig { api_key: Some("sk-secret".into()), api_url: None };
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("mistral"));
        assert!(toml_str.contains("3600"));
        assert!(toml_str.contains("fuzzy"));
    }
}
