//! Configuration layer for discord-hook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **Message file** - Fields of the JSON message given by `--message-file`
//! 3. **TOML config file** - Values from the configuration file
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! The message file only supplies message fields; `url` and `timeout` come
//! from the CLI or TOML.
//!
//! # Boolean Flag Semantics
//!
//! `tts` uses OR semantics: if set `true` in any source, the result is `true`.
//!
//! # Embeds
//!
//! `--embed-title`, `--embed-description`, and `--embed-color` build one embed
//! that is appended after any embeds from the message file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{MessageSection, TomlConfig, WebhookSection, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
