//! Application configuration loaded from TOML with environment overrides.
//!
//! Every section uses `#[serde(default)]`, so a partial file (or none at
//! all) yields working defaults. Secrets are normally supplied through the
//! environment rather than written to disk.

use std::path::{Path, PathBuf};

use mawrid_search::{SearchConfig, SearchProvider};
use serde::{Deserialize, Serialize};

use crate::error::{MawridError, Result};

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "MAWRID_CONFIG_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MawridConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Web-search providers and ranking.
    pub search: SearchConfig,
    /// LLM summaries, answers and suggestion augmentation.
    pub llm: LlmConfig,
    /// Autocomplete limits and cache size.
    pub suggestions: SuggestionsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port. `0` picks a free port.
    pub port: u16,
    /// Name reported by `/health`.
    pub app_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            app_name: "Mawrid Search Engine".to_owned(),
        }
    }
}

/// OpenAI-compatible chat completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Master switch. When off, summaries and answers use fallbacks.
    pub enabled: bool,
    /// API root without the `/v1/...` path.
    pub base_url: String,
    /// Bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name sent with every request.
    pub model: String,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Mix LLM suggestions into `/api/search` responses.
    pub augment_suggestions: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".to_owned(),
            api_key: None,
            model: "gpt-3.5-turbo".to_owned(),
            max_tokens: 1000,
            timeout_seconds: 30,
            augment_suggestions: false,
        }
    }
}

/// Autocomplete settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Number of memoised queries kept.
    pub cache_capacity: usize,
    /// Suggestions returned when the request gives no limit.
    pub default_limit: usize,
    /// Upper bound on a requested limit.
    pub max_limit: usize,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            cache_capacity: mawrid_search::suggest::DEFAULT_CAPACITY,
            default_limit: 8,
            max_limit: 20,
        }
    }
}

impl MawridConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MawridError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MawridError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    ///
    /// Resolves to `$MAWRID_CONFIG_DIR/config.toml` when set, otherwise
    /// `dirs::config_dir()/mawrid/config.toml`, falling back to
    /// `/tmp/mawrid-config/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognised keys: `SERPER_API_KEY`, `BRAVE_API_KEY`, `TAVILY_API_KEY`,
    /// `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `MAWRID_HOST`, `MAWRID_PORT`.
    /// Empty values are ignored, as is a `MAWRID_PORT` that is not a port
    /// number.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        for (provider, key) in [
            (SearchProvider::Serper, "SERPER_API_KEY"),
            (SearchProvider::Brave, "BRAVE_API_KEY"),
            (SearchProvider::Tavily, "TAVILY_API_KEY"),
        ] {
            if let Some(value) = get(key) {
                self.search.endpoint_mut(provider).api_key = Some(value);
            }
        }
        if let Some(value) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(value);
        }
        if let Some(value) = get("OPENAI_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = get("MAWRID_HOST") {
            self.server.host = value;
        }
        if let Some(value) = get("MAWRID_PORT") {
            match value.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %value, "ignoring invalid MAWRID_PORT"),
            }
        }
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`MawridError::Config`] naming the first invalid field, or
    /// [`MawridError::Search`] for an invalid `[search]` section.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(MawridError::Config("server.host must not be empty".into()));
        }
        self.search.validate()?;
        if self.llm.enabled {
            url::Url::parse(&self.llm.base_url)
                .map_err(|e| MawridError::Config(format!("llm.base_url is invalid: {e}")))?;
            if self.llm.max_tokens == 0 {
                return Err(MawridError::Config(
                    "llm.max_tokens must be greater than 0".into(),
                ));
            }
            if self.llm.timeout_seconds == 0 {
                return Err(MawridError::Config(
                    "llm.timeout_seconds must be greater than 0".into(),
                ));
            }
        }
        if self.suggestions.max_limit == 0 {
            return Err(MawridError::Config(
                "suggestions.max_limit must be greater than 0".into(),
            ));
        }
        if self.suggestions.default_limit > self.suggestions.max_limit {
            return Err(MawridError::Config(
                "suggestions.default_limit must not exceed suggestions.max_limit".into(),
            ));
        }
        Ok(())
    }
}

/// Application config directory.
///
/// Override with the `MAWRID_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("mawrid"))
        .unwrap_or_else(|| PathBuf::from("/tmp/mawrid-config"))
}
