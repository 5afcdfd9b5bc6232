//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook configuration section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Message defaults section
    #[serde(default)]
    pub message: MessageSection,
}

/// Webhook configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Webhook URL
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Defaults applied to every message unless overridden.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSection {
    /// Display name override
    pub username: Option<String>,

    /// Avatar URL override
    pub avatar_url: Option<String>,

    /// Text-to-speech
    #[serde(default)]
    pub tts: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# discord-hook Configuration File

[webhook]
# Webhook URL (required, can be overridden by --url)
# The URL contains the webhook token; keep this file private.
# url = "https://discord.com/api/webhooks/<id>/<token>"

# Request timeout in seconds (default: 30)
# timeout = 30

[message]
# Display name override (CLI --username and --message-file take precedence)
# username = "discord-hook"

# Avatar URL override
# avatar_url = "https://example.com/avatar.png"

# Read messages aloud (text-to-speech)
# tts = false
"#
    .to_string()
}
