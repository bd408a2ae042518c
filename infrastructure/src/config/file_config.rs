//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use council_domain::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("rounds must be at least 1")]
    InvalidRounds,

    #[error("max_rounds must be at least 1")]
    InvalidMaxRounds,

    #[error("timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("max_tokens cannot be 0")]
    InvalidMaxTokens,

    #[error("model name for '{0}' cannot be empty")]
    EmptyModelName(ProviderId),

    #[error("unknown provider '{name}' in {field}")]
    UnknownProvider { field: &'static str, name: String },
}

/// Raw debate defaults from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDefaultsConfig {
    /// Debate rounds when the CLI does not override
    pub rounds: u32,
    /// Upper bound applied to any rounds request
    pub max_rounds: u32,
    /// Synthesizer identity name
    pub synthesizer: String,
    /// Default panel identity names
    pub panel: Vec<String>,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Completion token cap passed to every provider
    pub max_tokens: u32,
    /// Retry a timed-out call once with a stretched bound
    pub retry_on_timeout: bool,
    /// Directory for markdown reports
    pub output_dir: PathBuf,
}

impl Default for FileDefaultsConfig {
    fn default() -> Self {
        Self {
            rounds: 2,
            max_rounds: 5,
            synthesizer: "openai".to_string(),
            panel: vec![
                "claude".to_string(),
                "gemini".to_string(),
                "deepseek".to_string(),
            ],
            timeout_secs: 120,
            max_tokens: 2048,
            retry_on_timeout: true,
            output_dir: PathBuf::from("debates"),
        }
    }
}

/// Raw per-provider settings from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Model name sent on the wire
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Endpoint override; adapters have built-in defaults
    pub base_url: Option<String>,
    /// Per-provider timeout override in seconds
    pub timeout_secs: Option<u64>,
    /// Per-provider token cap override
    pub max_tokens: Option<u32>,
}

impl FileProviderConfig {
    fn preset(model: &str, api_key_env: &str) -> Self {
        Self {
            model: model.to_string(),
            api_key_env: api_key_env.to_string(),
            base_url: None,
            timeout_secs: None,
            max_tokens: None,
        }
    }
}

/// Raw provider table from TOML, one entry per identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub gemini: FileProviderConfig,
    pub openai: FileProviderConfig,
    pub claude: FileProviderConfig,
    pub grok: FileProviderConfig,
    pub deepseek: FileProviderConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: FileProviderConfig::preset("gemini-2.5-pro", "GEMINI_API_KEY"),
            openai: FileProviderConfig::preset("gpt-4o", "OPENAI_API_KEY"),
            claude: FileProviderConfig::preset("claude-sonnet-4-5", "ANTHROPIC_API_KEY"),
            grok: FileProviderConfig::preset("grok-3", "XAI_API_KEY"),
            deepseek: FileProviderConfig::preset("deepseek-chat", "DEEPSEEK_API_KEY"),
        }
    }
}

impl FileProvidersConfig {
    /// Settings for one identity
    pub fn get(&self, id: ProviderId) -> &FileProviderConfig {
        match id {
            ProviderId::Gemini => &self.gemini,
            ProviderId::OpenAi => &self.openai,
            ProviderId::Claude => &self.claude,
            ProviderId::Grok => &self.grok,
            ProviderId::DeepSeek => &self.deepseek,
        }
    }
}

/// Raw inbox settings from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInboxConfig {
    /// Directory scanned for question files
    pub dir: PathBuf,
    /// Directory processed files move into
    pub archive_dir: PathBuf,
}

impl Default for FileInboxConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("inbox"),
            archive_dir: PathBuf::from("inbox/archive"),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Debate defaults
    pub defaults: FileDefaultsConfig,
    /// Provider connection settings
    pub providers: FileProvidersConfig,
    /// Persona overrides keyed by identity name; an empty string
    /// disables the built-in persona for that identity
    pub personas: BTreeMap<String, String>,
    /// Inbox settings
    pub inbox: FileInboxConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.defaults.rounds == 0 {
            return Err(ConfigValidationError::InvalidRounds);
        }
        if self.defaults.max_rounds == 0 {
            return Err(ConfigValidationError::InvalidMaxRounds);
        }
        if self.defaults.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.defaults.max_tokens == 0 {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }

        self.defaults
            .synthesizer
            .parse::<ProviderId>()
            .map_err(|e| ConfigValidationError::UnknownProvider {
                field: "defaults.synthesizer",
                name: e.0,
            })?;

        for name in &self.defaults.panel {
            name.parse::<ProviderId>()
                .map_err(|e| ConfigValidationError::UnknownProvider {
                    field: "defaults.panel",
                    name: e.0,
                })?;
        }

        for name in self.personas.keys() {
            name.parse::<ProviderId>()
                .map_err(|e| ConfigValidationError::UnknownProvider {
                    field: "personas",
                    name: e.0,
                })?;
        }

        for id in ProviderId::ALL {
            let provider = self.providers.get(id);
            if provider.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName(id));
            }
            if let Some(0) = provider.timeout_secs {
                return Err(ConfigValidationError::InvalidTimeout);
            }
            if let Some(0) = provider.max_tokens {
                return Err(ConfigValidationError::InvalidMaxTokens);
            }
        }

        Ok(())
    }

    /// Default panel as parsed identities, order preserved
    ///
    /// Call after [`validate`](Self::validate); unknown names are skipped here.
    pub fn default_panel(&self) -> Vec<ProviderId> {
        self.defaults
            .panel
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Configured synthesizer, falling back to the built-in default
    /// when the name does not parse
    pub fn synthesizer(&self) -> ProviderId {
        self.defaults
            .synthesizer
            .parse()
            .unwrap_or(ProviderId::OpenAi)
    }

    /// Per-call timeout as a [`Duration`]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.timeout_secs)
    }

    /// Persona for one identity: config override first, built-in second
    pub fn persona_for(&self, id: ProviderId) -> String {
        self.personas
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| id.default_persona().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[defaults]
rounds = 3
max_rounds = 4
synthesizer = "claude"
panel = ["claude", "grok"]
timeout_secs = 90
max_tokens = 1024
retry_on_timeout = false
output_dir = "out/debates"

[providers.claude]
model = "claude-opus-4"
api_key_env = "MY_ANTHROPIC_KEY"
timeout_secs = 300

[providers.grok]
base_url = "https://proxy.example.com/v1"

[personas]
claude = "the archivist"
grok = ""

[inbox]
dir = "queue"
archive_dir = "queue/done"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.defaults.rounds, 3);
        assert_eq!(config.defaults.max_rounds, 4);
        assert_eq!(config.synthesizer(), ProviderId::Claude);
        assert_eq!(
            config.default_panel(),
            vec![ProviderId::Claude, ProviderId::Grok]
        );
        assert!(!config.defaults.retry_on_timeout);
        assert_eq!(config.providers.claude.model, "claude-opus-4");
        assert_eq!(config.providers.claude.api_key_env, "MY_ANTHROPIC_KEY");
        assert_eq!(config.providers.claude.timeout_secs, Some(300));
        // Unset fields on a partially specified provider keep defaults
        assert_eq!(config.providers.grok.model, "grok-3");
        assert_eq!(
            config.providers.grok.base_url.as_deref(),
            Some("https://proxy.example.com/v1")
        );
        assert_eq!(config.persona_for(ProviderId::Claude), "the archivist");
        assert_eq!(config.persona_for(ProviderId::Grok), "");
        assert_eq!(config.inbox.dir, PathBuf::from("queue"));
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.defaults.rounds, 2);
        assert_eq!(config.defaults.max_rounds, 5);
        assert_eq!(config.synthesizer(), ProviderId::OpenAi);
        assert_eq!(
            config.default_panel(),
            vec![ProviderId::Claude, ProviderId::Gemini, ProviderId::DeepSeek]
        );
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
        assert!(config.defaults.retry_on_timeout);
        assert_eq!(config.providers.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.providers.deepseek.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.inbox.dir, PathBuf::from("inbox"));
        config.validate().unwrap();
    }

    #[test]
    fn test_persona_falls_back_to_builtin() {
        let config = FileConfig::default();
        assert_eq!(
            config.persona_for(ProviderId::Gemini),
            ProviderId::Gemini.default_persona()
        );
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let config: FileConfig = toml::from_str("[defaults]\nrounds = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidRounds)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config: FileConfig = toml::from_str("[providers.grok]\ntimeout_secs = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_panel_name() {
        let config: FileConfig =
            toml::from_str("[defaults]\npanel = [\"claude\", \"skynet\"]").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown provider 'skynet' in defaults.panel"
        );
    }

    #[test]
    fn test_validate_rejects_unknown_persona_key() {
        let config: FileConfig = toml::from_str("[personas]\nhal = \"the pod bay guard\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownProvider { field: "personas", .. })
        ));
    }
}
