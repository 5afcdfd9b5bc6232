//! Message sender trait and webhook implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::message::Message;

use super::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestClient, SendError, WebhookError,
};

/// Trait for delivering chat messages to an external service.
///
/// This abstraction allows the binary to be tested with a mock sender
/// and leaves room for other delivery mechanisms.
///
/// Implementations perform exactly one delivery attempt per call and
/// never retry internally.
pub trait MessageSender: Send + Sync {
    /// Sends a message.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if the message could not be delivered.
    fn send(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), SendError>> + Send;
}

/// Webhook sender that POSTs JSON messages to a fixed URL.
///
/// Holds no mutable state, so one instance can be shared across tasks
/// and used concurrently.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
///
/// # Example
///
/// ```
/// use discord_hook::webhook::{DiscordWebhook, ReqwestClient};
/// use url::Url;
///
/// let webhook = DiscordWebhook::new(
///     ReqwestClient::new(),
///     Url::parse("https://discord.com/api/webhooks/1/token").unwrap(),
/// );
/// assert_eq!(webhook.url().host_str(), Some("discord.com"));
/// ```
#[derive(Debug, Clone)]
pub struct DiscordWebhook<H> {
    client: H,
    url: url::Url,
}

impl<H> DiscordWebhook<H> {
    /// Creates a webhook sender for the given URL.
    ///
    /// The URL usually embeds the webhook token, so it is never logged.
    #[must_use]
    pub const fn new(client: H, url: url::Url) -> Self {
        Self { client, url }
    }

    /// Returns the configured URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }
}

impl<H: HttpClient> DiscordWebhook<H> {
    /// Sends any serializable payload as the JSON request body.
    ///
    /// Useful for payloads carrying fields [`Message`] does not model.
    ///
    /// # Errors
    ///
    /// - [`SendError::Serialize`] if the payload cannot be encoded (no request is made)
    /// - [`SendError::Http`] if the request fails before a response arrives
    /// - [`SendError::Webhook`] if the endpoint responds with a non-success status
    pub async fn send_payload<M>(&self, payload: &M) -> Result<(), SendError>
    where
        M: Serialize + ?Sized + Sync,
    {
        let body = serde_json::to_vec(payload)?;
        let request = HttpRequest::post_json(self.url.clone(), body);

        tracing::debug!(
            host = self.url.host_str().unwrap_or_default(),
            bytes = request.body.as_ref().map_or(0, Vec::len),
            "Posting webhook message"
        );

        let response = self.client.request(request).await?;
        classify_response(&response)?;
        Ok(())
    }
}

impl<H: HttpClient> MessageSender for DiscordWebhook<H> {
    async fn send(&self, message: &Message) -> Result<(), SendError> {
        self.send_payload(message).await
    }
}

/// Rate-limit body returned with a 429 status.
#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

/// Maps a webhook response to success or a [`WebhookError`].
///
/// Only 200 and 204 count as success; their body is not inspected.
/// A 429 takes its delay from the JSON `retry_after` field (seconds),
/// defaulting to zero when the body cannot be parsed.
///
/// # Errors
///
/// Returns [`WebhookError`] for every other status, carrying the raw body.
pub fn classify_response(response: &HttpResponse) -> Result<(), WebhookError> {
    match response.status {
        http::StatusCode::OK | http::StatusCode::NO_CONTENT => Ok(()),
        http::StatusCode::TOO_MANY_REQUESTS => Err(WebhookError::rate_limited(
            parse_retry_after(&response.body),
            response.body_text(),
        )),
        status => Err(WebhookError::status(status, response.body_text())),
    }
}

/// Extracts `retry_after` from a rate-limit body.
///
/// Negative, non-finite, and out-of-range values count as zero.
fn parse_retry_after(body: &[u8]) -> Duration {
    serde_json::from_slice::<RateLimitBody>(body)
        .ok()
        .and_then(|b| Duration::try_from_secs_f64(b.retry_after).ok())
        .unwrap_or(Duration::ZERO)
}

/// Sends a single message to `url` using a default [`ReqwestClient`].
///
/// The URL is the caller's responsibility; a string that does not parse is
/// reported as a transport failure, the same as an unreachable host.
///
/// # Errors
///
/// See [`DiscordWebhook::send_payload`].
pub async fn send_message(url: &str, message: &Message) -> Result<(), SendError> {
    let url = url::Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
    DiscordWebhook::new(ReqwestClient::new(), url)
        .send(message)
        .await
}

/// Blocking variant of [`send_message`].
///
/// Runs the request on a private single-threaded runtime and blocks the
/// calling thread until the response has been classified.
///
/// # Panics
///
/// Panics if called from within an asynchronous runtime.
///
/// # Errors
///
/// Returns [`SendError::Runtime`] if the runtime cannot be created, otherwise
/// see [`DiscordWebhook::send_payload`].
pub fn send_message_blocking(url: &str, message: &Message) -> Result<(), SendError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SendError::Runtime)?;

    runtime.block_on(send_message(url, message))
}
