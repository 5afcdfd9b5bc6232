//! Webhook layer for posting chat messages to external services.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Sending messages and classifying responses ([`MessageSender`], [`DiscordWebhook`])
//! - One-shot helpers ([`send_message`], [`send_message_blocking`])
//!
//! # Response Classification
//!
//! | Status | Outcome |
//! |---|---|
//! | 200, 204 | `Ok(())` |
//! | 429 | [`WebhookError`] with `retry_after` from the JSON body |
//! | other | [`WebhookError`] with zero `retry_after` |
//!
//! Failures before a response exists are reported as [`SendError::Serialize`]
//! or [`SendError::Http`], never as a [`WebhookError`].

mod client;
mod error;
mod http;
mod sender;

#[cfg(test)]
mod sender_tests;

pub use client::ReqwestClient;
pub use error::{HttpError, SendError, WebhookError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use sender::{
    DiscordWebhook, MessageSender, classify_response, send_message, send_message_blocking,
};
