//! Tests for `MessageSender`, `DiscordWebhook`, and response classification.

use super::sender::{DiscordWebhook, MessageSender, classify_response};
use super::{HttpClient, HttpError, HttpRequest, HttpResponse, SendError, WebhookError};
use crate::message::{Embed, Message};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: std::sync::Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: std::sync::Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn responding(status: http::StatusCode, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::with_status(status, body))])
    }

    fn failing(error: HttpError) -> Self {
        Self::new(vec![Err(error)])
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

fn test_url() -> url::Url {
    url::Url::parse("https://discord.example.com/api/webhooks/1/secret").unwrap()
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::with_status(http::StatusCode::from_u16(status).unwrap(), body)
}

mod classify {
    use super::*;

    #[test]
    fn ok_is_success() {
        assert!(classify_response(&response(200, "{\"id\":\"1\"}")).is_ok());
    }

    #[test]
    fn no_content_with_empty_body_is_success() {
        assert!(classify_response(&response(204, "")).is_ok());
    }

    #[test]
    fn other_2xx_statuses_are_errors() {
        for status in [201, 202] {
            let err = classify_response(&response(status, "")).unwrap_err();
            assert_eq!(err.status.as_u16(), status);
        }
    }

    #[test]
    fn rate_limit_with_fractional_retry_after() {
        let body = r#"{"retry_after": 2.5}"#;

        let err = classify_response(&response(429, body)).unwrap_err();

        assert_eq!(
            err,
            WebhookError {
                status: http::StatusCode::TOO_MANY_REQUESTS,
                retry_after: Duration::from_millis(2500),
                body: body.to_string(),
            }
        );
    }

    #[test]
    fn rate_limit_with_integer_retry_after() {
        let err =
            classify_response(&response(429, r#"{"retry_after": 3, "global": false}"#)).unwrap_err();

        assert_eq!(err.retry_after, Duration::from_secs(3));
    }

    #[test]
    fn rate_limit_with_sub_second_retry_after() {
        let err = classify_response(&response(429, r#"{"retry_after": 0.25}"#)).unwrap_err();

        assert_eq!(err.retry_after, Duration::from_millis(250));
    }

    #[test]
    fn rate_limit_with_non_json_body_has_zero_delay() {
        let err = classify_response(&response(429, "not json")).unwrap_err();

        assert_eq!(err.status, http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.retry_after, Duration::ZERO);
        assert_eq!(err.body, "not json");
    }

    #[test]
    fn rate_limit_without_retry_after_field_has_zero_delay() {
        let err = classify_response(&response(429, r#"{"message": "slow down"}"#)).unwrap_err();
        assert_eq!(err.retry_after, Duration::ZERO);
    }

    #[test]
    fn rate_limit_with_string_retry_after_has_zero_delay() {
        let err = classify_response(&response(429, r#"{"retry_after": "soon"}"#)).unwrap_err();
        assert_eq!(err.retry_after, Duration::ZERO);
    }

    #[test]
    fn rate_limit_with_negative_retry_after_has_zero_delay() {
        let err = classify_response(&response(429, r#"{"retry_after": -1.0}"#)).unwrap_err();
        assert_eq!(err.retry_after, Duration::ZERO);
    }

    #[test]
    fn rate_limit_with_empty_body_has_zero_delay() {
        let err = classify_response(&response(429, "")).unwrap_err();

        assert_eq!(err.retry_after, Duration::ZERO);
        assert_eq!(err.body, "");
    }

    #[test]
    fn server_error_keeps_raw_body() {
        let err = classify_response(&response(500, "Internal Server Error")).unwrap_err();

        assert_eq!(
            err,
            WebhookError {
                status: http::StatusCode::INTERNAL_SERVER_ERROR,
                retry_after: Duration::ZERO,
                body: "Internal Server Error".to_string(),
            }
        );
    }

    #[test]
    fn non_rate_limit_status_ignores_retry_after_in_body() {
        for status in [400, 401, 404, 503] {
            let body = r#"{"retry_after": 10}"#;

            let err = classify_response(&response(status, body)).unwrap_err();

            assert_eq!(err.retry_after, Duration::ZERO, "status {status}");
            assert_eq!(err.body, body, "status {status}");
        }
    }

    #[test]
    fn invalid_utf8_body_is_converted_lossily() {
        let resp = HttpResponse::with_status(http::StatusCode::BAD_REQUEST, vec![b'o', b'k', 0xFF]);

        let err = classify_response(&resp).unwrap_err();

        assert_eq!(err.body, "ok\u{FFFD}");
    }
}

mod webhook_error {
    use super::*;

    #[test]
    fn rate_limit_display_states_delay() {
        let err = WebhookError::rate_limited(Duration::from_millis(2500), "{}");
        assert_eq!(err.to_string(), "rate limited: retry after 2.5s");
    }

    #[test]
    fn display_zero_delay_as_seconds() {
        let err = WebhookError::rate_limited(Duration::ZERO, "");
        assert_eq!(err.to_string(), "rate limited: retry after 0s");
    }

    #[test]
    fn other_status_display_includes_code_and_body() {
        let err = WebhookError::status(http::StatusCode::BAD_REQUEST, "Cannot send an empty message");
        assert_eq!(
            err.to_string(),
            "webhook error 400: Cannot send an empty message"
        );
    }

    #[test]
    fn status_constructor_has_zero_delay() {
        let err = WebhookError::status(http::StatusCode::NOT_FOUND, "");

        assert_eq!(err.retry_after, Duration::ZERO);
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn rate_limited_constructor_sets_429() {
        let err = WebhookError::rate_limited(Duration::from_secs(1), "");

        assert_eq!(err.status, http::StatusCode::TOO_MANY_REQUESTS);
        assert!(err.is_rate_limited());
    }
}

mod send_error {
    use super::*;

    #[test]
    fn retry_after_only_for_rate_limits() {
        let limited = SendError::from(WebhookError::rate_limited(Duration::from_secs(2), ""));
        let failed = SendError::from(WebhookError::status(http::StatusCode::BAD_GATEWAY, ""));
        let transport = SendError::from(HttpError::Timeout);

        assert_eq!(limited.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(failed.retry_after(), None);
        assert_eq!(transport.retry_after(), None);
    }

    #[test]
    fn webhook_display_is_transparent() {
        let err = SendError::from(WebhookError::status(http::StatusCode::FORBIDDEN, "nope"));
        assert_eq!(err.to_string(), "webhook error 403: nope");
    }

    #[test]
    fn as_webhook_is_none_for_transport_errors() {
        let err = SendError::from(HttpError::InvalidUrl("bad".to_string()));
        assert!(err.as_webhook().is_none());
    }
}

mod discord_webhook_send {
    use super::*;

    #[tokio::test]
    async fn posts_json_to_configured_url() {
        let client = Arc::new(MockClient::responding(http::StatusCode::NO_CONTENT, ""));
        let webhook = DiscordWebhook::new(client.clone(), test_url());

        webhook.send(&Message::new("hello")).await.unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].url, test_url());
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn body_is_serialized_message() {
        let client = Arc::new(MockClient::responding(http::StatusCode::OK, ""));
        let webhook = DiscordWebhook::new(client.clone(), test_url());
        let message = Message::new("deploy done")
            .with_username("ci")
            .with_embed(Embed::new().with_title("v1.2.3"));

        webhook.send(&message).await.unwrap();

        let body = client.captured_requests()[0].body.clone().unwrap();
        let sent: Message = serde_json::from_slice(&body).unwrap();
        assert_eq!(sent, message);
    }

    #[tokio::test]
    async fn rate_limit_is_returned_without_retrying() {
        let client = Arc::new(MockClient::responding(
            http::StatusCode::TOO_MANY_REQUESTS,
            r#"{"retry_after": 1.5}"#,
        ));
        let webhook = DiscordWebhook::new(client.clone(), test_url());

        let err = webhook.send(&Message::new("x")).await.unwrap_err();

        assert_eq!(client.calls(), 1);
        assert_eq!(err.retry_after(), Some(Duration::from_millis(1500)));
    }

    #[tokio::test]
    async fn server_error_is_webhook_error() {
        let client = MockClient::responding(http::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let webhook = DiscordWebhook::new(client, test_url());

        let err = webhook.send(&Message::new("x")).await.unwrap_err();

        match err {
            SendError::Webhook(e) => {
                assert_eq!(e.status, http::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(e.body, "boom");
            }
            other => panic!("Expected Webhook error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error_is_not_webhook_error() {
        let client = MockClient::failing(HttpError::Connection("connection refused".into()));
        let webhook = DiscordWebhook::new(client, test_url());

        let err = webhook.send(&Message::new("x")).await.unwrap_err();

        assert!(matches!(err, SendError::Http(HttpError::Connection(_))));
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let client = MockClient::failing(HttpError::Timeout);
        let webhook = DiscordWebhook::new(client, test_url());

        let err = webhook.send(&Message::new("x")).await.unwrap_err();

        assert!(matches!(err, SendError::Http(HttpError::Timeout)));
    }

    #[tokio::test]
    async fn serialization_failure_makes_no_request() {
        let client = Arc::new(MockClient::responding(http::StatusCode::OK, ""));
        let webhook = DiscordWebhook::new(client.clone(), test_url());
        // JSON object keys must be strings
        let payload: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);

        let err = webhook.send_payload(&payload).await.unwrap_err();

        assert!(matches!(err, SendError::Serialize(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn send_payload_accepts_extra_fields() {
        let client = Arc::new(MockClient::responding(http::StatusCode::NO_CONTENT, ""));
        let webhook = DiscordWebhook::new(client.clone(), test_url());
        let payload = serde_json::json!({"content": "hi", "flags": 4096});

        webhook.send_payload(&payload).await.unwrap();

        let body = client.captured_requests()[0].body.clone().unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(sent, payload);
    }

    #[tokio::test]
    async fn concurrent_sends_share_one_webhook() {
        let client = Arc::new(MockClient::new(vec![
            Ok(response(204, "")),
            Ok(response(204, "")),
        ]));
        let webhook = DiscordWebhook::new(client.clone(), test_url());

        let (first, second) = (Message::new("a"), Message::new("b"));

        let (a, b) = tokio::join!(webhook.send(&first), webhook.send(&second));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn webhook_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiscordWebhook<crate::webhook::ReqwestClient>>();
    }
}
