//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::message::{Embed, Message};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Largest value a 24-bit RGB color can take.
const MAX_COLOR: u32 = 0x00FF_FFFF;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Webhook URL (required)
    pub url: Url,

    /// Request timeout
    pub timeout: Duration,

    /// The message to send
    pub message: Message,

    /// Dry-run mode (log the payload without sending it)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The path carries the webhook token
        write!(
            f,
            "Config {{ host: {}, timeout: {}s, embeds: {}, tts: {}, dry_run: {} }}",
            self.url.host_str().unwrap_or("none"),
            self.timeout.as_secs(),
            self.message.embeds.len(),
            self.message.tts,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. If
    /// `cli.message_file` is set, that file is read as the base message.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing or invalid
    /// - The timeout is zero
    /// - The message file cannot be read or parsed
    /// - The embed color is invalid
    /// - The resulting message has neither content nor embeds
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let message = Self::resolve_message(cli, toml)?;

        Ok(Self {
            url,
            timeout,
            message,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // CLI takes precedence
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set webhook.url in config file")
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{scheme}', expected http or https"),
            }),
        }
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        match cli.timeout.or_else(|| toml.and_then(|t| t.webhook.timeout)) {
            None => Ok(defaults::timeout()),
            Some(0) => Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            }),
            Some(seconds) => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Builds the message.
    ///
    /// Priority per field: CLI flag > message file > TOML `[message]` section.
    /// `tts` uses OR semantics across all three sources.
    fn resolve_message(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Message, ConfigError> {
        let mut message = match cli.message_file {
            Some(ref path) => load_message_file(path)?,
            None => Message::default(),
        };

        if let Some(ref content) = cli.content {
            message.content = Some(content.clone());
        }

        let section = toml.map(|t| &t.message);

        message.username = cli
            .username
            .clone()
            .or(message.username)
            .or_else(|| section.and_then(|d| d.username.clone()));

        message.avatar_url = cli
            .avatar_url
            .clone()
            .or(message.avatar_url)
            .or_else(|| section.and_then(|d| d.avatar_url.clone()));

        message.tts = cli.tts || message.tts || section.is_some_and(|d| d.tts);

        if cli.has_embed() {
            message.embeds.push(Self::build_embed(cli)?);
        }

        if message.is_empty() {
            return Err(ConfigError::missing(
                field::CONTENT,
                "Use --content, --embed-title/--embed-description, or --message-file",
            ));
        }

        Ok(message)
    }

    fn build_embed(cli: &Cli) -> Result<Embed, ConfigError> {
        let mut embed = Embed::new();

        if let Some(ref title) = cli.embed_title {
            embed = embed.with_title(title.clone());
        }

        if let Some(ref description) = cli.embed_description {
            embed = embed.with_description(description.clone());
        }

        if let Some(ref color) = cli.embed_color {
            embed = embed.with_color(parse_color(color)?);
        }

        Ok(embed)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn load_message_file(path: &Path) -> Result<Message, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MessageRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::MessageParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_color(s: &str) -> Result<u32, ConfigError> {
    let trimmed = s.trim();

    let parsed = if let Some(hex) = trimmed.strip_prefix('#') {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<u32>().ok()
    };

    parsed
        .filter(|c| *c <= MAX_COLOR)
        .ok_or_else(|| ConfigError::InvalidColor {
            value: s.to_string(),
        })
}
