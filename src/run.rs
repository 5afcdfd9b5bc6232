//! Application execution logic.
//!
//! This module builds the webhook sender from the validated config and
//! delivers the configured message exactly once.

use std::time::Duration;

use thiserror::Error;

use discord_hook::config::ValidatedConfig;
use discord_hook::message::Message;
use discord_hook::webhook::{DiscordWebhook, MessageSender, ReqwestClient, SendError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The message could not be delivered.
    #[error("Failed to send message: {0}")]
    Send(#[from] SendError),
}

impl RunError {
    /// Returns the requested delay if the endpoint rate limited the send.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Send(e) => e.retry_after(),
            Self::ClientBuild(_) => None,
        }
    }
}

/// Executes a single send.
///
/// In dry-run mode the JSON payload is logged and nothing is sent.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - The message cannot be serialized or delivered
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    if config.dry_run {
        let payload = serde_json::to_string(&config.message).map_err(SendError::from)?;
        tracing::info!(%payload, "Dry-run mode enabled - message not sent");
        return Ok(());
    }

    let webhook = create_webhook(&config)?;
    deliver(&webhook, &config.message).await
}

/// Creates the webhook sender with the configured timeout.
fn create_webhook(config: &ValidatedConfig) -> Result<DiscordWebhook<ReqwestClient>, RunError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(RunError::ClientBuild)?;

    Ok(DiscordWebhook::new(
        ReqwestClient::from_client(client),
        config.url.clone(),
    ))
}

/// Sends the message once and logs the outcome.
async fn deliver<S: MessageSender>(sender: &S, message: &Message) -> Result<(), RunError> {
    sender.send(message).await?;
    tracing::info!(embeds = message.embeds.len(), "Message delivered");
    Ok(())
}
