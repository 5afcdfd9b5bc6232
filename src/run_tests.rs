//! Tests for the run module.

use std::sync::Mutex;

use discord_hook::config::Cli;
use discord_hook::webhook::{HttpError, WebhookError};

use super::*;

/// Sender that records messages and returns a preset outcome.
struct MockSender {
    outcome: Mutex<Option<Result<(), SendError>>>,
    sent: Mutex<Vec<Message>>,
}

impl MockSender {
    fn new(outcome: Result<(), SendError>) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MessageSender for MockSender {
    async fn send(&self, message: &Message) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(message.clone());
        self.outcome.lock().unwrap().take().unwrap()
    }
}

fn make_config(extra: &[&str]) -> ValidatedConfig {
    let mut args = vec![
        "discord-hook",
        "--url",
        "http://127.0.0.1:9/api/webhooks/1/token",
        "--content",
        "hello",
    ];
    args.extend(extra);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(args), None).unwrap()
}

mod run_error {
    use super::*;

    #[test]
    fn send_error_displays_source() {
        let error = RunError::from(SendError::from(HttpError::Timeout));
        assert_eq!(error.to_string(), "Failed to send message: Request timed out");
    }

    #[test]
    fn retry_after_for_rate_limit() {
        let error = RunError::from(SendError::from(WebhookError::rate_limited(
            Duration::from_secs(4),
            "",
        )));

        assert_eq!(error.retry_after(), Some(Duration::from_secs(4)));
    }

    #[test]
    fn no_retry_after_for_other_statuses() {
        let error = RunError::from(SendError::from(WebhookError::status(
            http::StatusCode::NOT_FOUND,
            "Unknown Webhook",
        )));

        assert_eq!(error.retry_after(), None);
    }
}

mod deliver {
    use super::*;

    #[tokio::test]
    async fn sends_message_once() {
        let sender = MockSender::new(Ok(()));
        let message = Message::new("hello");

        deliver(&sender, &message).await.unwrap();

        assert_eq!(*sender.sent.lock().unwrap(), vec![message]);
    }

    #[tokio::test]
    async fn propagates_rate_limit() {
        let sender = MockSender::new(Err(SendError::from(WebhookError::rate_limited(
            Duration::from_millis(1500),
            r#"{"retry_after": 1.5}"#,
        ))));

        let error = deliver(&sender, &Message::new("x")).await.unwrap_err();

        assert_eq!(error.retry_after(), Some(Duration::from_millis(1500)));
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn propagates_transport_failure() {
        let sender = MockSender::new(Err(SendError::from(HttpError::Timeout)));

        let error = deliver(&sender, &Message::new("x")).await.unwrap_err();

        assert!(matches!(error, RunError::Send(SendError::Http(HttpError::Timeout))));
    }
}

mod execute {
    use super::*;

    #[tokio::test]
    async fn dry_run_does_not_send() {
        // Port 9 is never contacted in dry-run mode
        let config = make_config(&["--dry-run"]);

        assert!(execute(config).await.is_ok());
    }

    #[test]
    fn create_webhook_uses_configured_url() {
        let config = make_config(&["--timeout", "5"]);

        let webhook = create_webhook(&config).unwrap();

        assert_eq!(webhook.url(), &config.url);
    }
}
