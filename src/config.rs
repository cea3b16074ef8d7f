use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KotobaError, Result};
use crate::i18n::Locale;

/// Environment variable that overrides `api_key` from the config file
pub const API_KEY_ENV: &str = "KOTOBA_API_KEY";

fn default_provider() -> String {
    "deepseek".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider name, see [`ProviderConfig::lookup`]
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bearer token for the provider
    #[serde(default)]
    pub api_key: String,
    /// Model override; the provider's default model when empty
    #[serde(default)]
    pub model: Option<String>,
    /// Locale for labels, help and error messages
    #[serde(default)]
    pub lang: Locale,
    /// Chat-completions URL override, e.g. for a self-hosted proxy
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Timeout applied by the HTTP transport (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: None,
            lang: Locale::default(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KotobaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| KotobaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KotobaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| KotobaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Take the API key from the environment when it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }
        self
    }

    /// Model to request: the configured one, or `default_model` when unset or blank
    pub fn model_or<'a>(&'a self, default_model: &'a str) -> &'a str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(default_model)
    }
}

/// Static description of a chat-completions provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Key used in configuration files
    pub name: &'static str,
    /// Name shown in messages
    pub display_name: &'static str,
    pub url: String,
    pub default_model: &'static str,
    /// Whether the provider accepts `response_format: {"type": "json_object"}`
    pub json_mode: bool,
}

impl ProviderConfig {
    pub const NAMES: [&'static str; 2] = ["deepseek", "siliconflow"];

    pub fn lookup(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "deepseek" => Some(Self {
                name: "deepseek",
                display_name: "DeepSeek",
                url: "https://api.deepseek.com/chat/completions".to_string(),
                default_model: "deepseek-chat",
                json_mode: false,
            }),
            "siliconflow" => Some(Self {
                name: "siliconflow",
                display_name: "SiliconFlow",
                url: "https://api.siliconflow.cn/v1/chat/completions".to_string(),
                default_model: "deepseek-ai/DeepSeek-V3.1",
                json_mode: true,
            }),
            _ => None,
        }
    }

    /// Replace the URL when `endpoint` is set and non-blank
    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            self.url = endpoint.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotoba.toml");
        let config = Config {
            provider: "siliconflow".to_string(),
            api_key: "sk-test".to_string(),
            model: Some("Qwen/Qwen2.5-7B-Instruct".to_string()),
            lang: Locale::En,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.provider, "siliconflow");
        assert_eq!(loaded.api_key, "sk-test");
        assert_eq!(loaded.model.as_deref(), Some("Qwen/Qwen2.5-7B-Instruct"));
        assert_eq!(loaded.lang, Locale::En);
        assert_eq!(loaded.timeout_secs, 120);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("api_key = \"sk-1\"").unwrap();
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.lang, Locale::Zh);
        assert!(config.model.is_none());

        let config: Config = toml::from_str("lang = \"en_US\"").unwrap();
        assert_eq!(config.lang, Locale::En);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file("/nonexistent/kotoba.toml").unwrap_err();
        assert!(matches!(err, KotobaError::Config(_)));
    }

    #[test]
    fn test_model_falls_back_to_provider_default() {
        let mut config = Config::default();
        assert_eq!(config.model_or("deepseek-chat"), "deepseek-chat");
        config.model = Some("  ".to_string());
        assert_eq!(config.model_or("deepseek-chat"), "deepseek-chat");
        config.model = Some(" deepseek-reasoner ".to_string());
        assert_eq!(config.model_or("deepseek-chat"), "deepseek-reasoner");
    }

    #[test]
    fn test_provider_lookup() {
        let deepseek = ProviderConfig::lookup("DeepSeek").unwrap();
        assert!(!deepseek.json_mode);
        let silicon = ProviderConfig::lookup("siliconflow").unwrap();
        assert!(silicon.json_mode);
        assert!(ProviderConfig::lookup("openrouter").is_none());

        let proxied = silicon.with_endpoint(Some("http://localhost:8080/v1/chat/completions"));
        assert_eq!(proxied.url, "http://localhost:8080/v1/chat/completions");
    }
}
