//! discord-hook: post chat messages to webhooks
//!
//! A library for delivering a single JSON chat message to a
//! Discord-compatible webhook and classifying the response, including
//! rate-limit detection.

pub mod config;
pub mod message;
pub mod webhook;
