//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// discord-hook: post a chat message to a webhook
///
/// Sends one message per invocation and reports the endpoint's answer,
/// including how long to wait when rate limited.
#[derive(Debug, Parser)]
#[command(name = "discord-hook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Webhook URL (required for send mode)
    #[arg(long)]
    pub url: Option<String>,

    /// Message text
    #[arg(long)]
    pub content: Option<String>,

    /// Display name override
    #[arg(long)]
    pub username: Option<String>,

    /// Avatar URL override
    #[arg(long = "avatar-url")]
    pub avatar_url: Option<String>,

    /// Read the message aloud (text-to-speech)
    #[arg(long)]
    pub tts: bool,

    /// Title of an embed appended to the message
    #[arg(long = "embed-title")]
    pub embed_title: Option<String>,

    /// Description of an embed appended to the message
    #[arg(long = "embed-description")]
    pub embed_description: Option<String>,

    /// Sidebar color of the embed (#RRGGBB, 0xRRGGBB, or decimal)
    #[arg(long = "embed-color", value_name = "COLOR")]
    pub embed_color: Option<String>,

    /// JSON file holding a complete message; other message flags override it
    #[arg(long = "message-file", value_name = "PATH")]
    pub message_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Test mode - log the payload without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for discord-hook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if any embed option was given.
    #[must_use]
    pub const fn has_embed(&self) -> bool {
        self.embed_title.is_some() || self.embed_description.is_some() || self.embed_color.is_some()
    }
}
