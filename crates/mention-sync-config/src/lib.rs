use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Participant count at which hosts stop sending live mention/typing updates.
pub const LARGE_GROUP_THRESHOLD: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config: {reason}")]
    Invalid { reason: String },
}

/// Engine settings shared by the parser, patcher and editor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Characters shown before a mention's display name in plain text.
    pub trigger: String,
    /// Element name that marks a mention in the HTML.
    pub mention_tag: String,
    /// Display text used when a mention is inserted without a name.
    pub empty_mention_placeholder: String,
    /// Deepest tag nesting the parser accepts.
    pub max_nesting_depth: usize,
    pub large_group_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger: "@".to_string(),
            mention_tag: "mention".to_string(),
            empty_mention_placeholder: "Unknown".to_string(),
            max_nesting_depth: 64,
            large_group_threshold: LARGE_GROUP_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mention-sync");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Rejects settings the parser cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "trigger must not be empty".to_string(),
            });
        }
        if self.trigger.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
            return Err(ConfigError::Invalid {
                reason: format!("trigger {:?} contains whitespace or angle brackets", self.trigger),
            });
        }
        let mut chars = self.mention_tag.chars();
        let valid_name = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
        if !valid_name {
            return Err(ConfigError::Invalid {
                reason: format!("mention_tag {:?} is not a valid tag name", self.mention_tag),
            });
        }
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_nesting_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a conversation is big enough that live updates are suppressed.
    pub fn is_large_group(&self, participant_count: usize) -> bool {
        participant_count >= self.large_group_threshold
    }
}
