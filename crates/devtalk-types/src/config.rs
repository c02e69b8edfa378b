//! Global configuration types for DevTalk.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! responder settings and exchange behavior.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the DevTalk backend.
///
/// Loaded from `~/.devtalk/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Responder (assistant content generation) settings.
    #[serde(default)]
    pub responder: ResponderConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            responder: ResponderConfig::default(),
        }
    }
}

/// Settings for the responder backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Provider base URL. Overridable for proxies and tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum output tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single responder invocation, in seconds. A call
    /// exceeding this is recorded as a failed exchange, never left pending.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.responder.model, "claude-sonnet-4-20250514");
        assert_eq!(config.responder.base_url, "https://api.anthropic.com");
        assert_eq!(config.responder.timeout_secs, 60);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let toml_str = "";
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.responder.timeout_secs, 60);
        assert_eq!(config.responder.max_tokens, 1024);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[responder]
model = "claude-haiku-3-5-20250514"
timeout_secs = 15
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.responder.model, "claude-haiku-3-5-20250514");
        assert_eq!(config.responder.timeout_secs, 15);
        // Unspecified fields keep their defaults
        assert_eq!(config.responder.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let config = GlobalConfig {
            responder: ResponderConfig {
                model: "claude-opus-4-20250514".to_string(),
                base_url: "http://localhost:8080".to_string(),
                max_tokens: 2048,
                timeout_secs: 30,
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.responder.model, "claude-opus-4-20250514");
        assert_eq!(parsed.responder.timeout_secs, 30);
    }
}
