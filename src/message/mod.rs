//! Chat message payloads.
//!
//! This module provides the value types posted to a webhook:
//! - The top-level message ([`Message`])
//! - Rich content blocks ([`Embed`] and its parts)
//! - Mention controls ([`AllowedMentions`])
//!
//! All types serialize to the JSON shape Discord-compatible webhooks accept.
//! Optional fields that are unset are omitted from the document entirely.

mod embed;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};

pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia};

/// A chat message to deliver through a webhook.
///
/// Constructed by the caller before each send and never modified by the
/// sender. At least one of `content` or `embeds` should be set for the
/// receiving service to accept it.
///
/// # Example
///
/// ```
/// use discord_hook::message::{Embed, Message};
///
/// let message = Message::new("Deploy finished")
///     .with_username("ci-bot")
///     .with_embed(Embed::new().with_title("build #42").with_color(0x57_F2_87));
///
/// let json = serde_json::to_value(&message).unwrap();
/// assert_eq!(json["content"], "Deploy finished");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Plain text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Overrides the webhook's default display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Overrides the webhook's default avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Text-to-speech flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,

    /// Rich content blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,

    /// Which mentions in `content` may ping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,

    /// Creates a forum thread with this name (forum channels only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
}

impl Message {
    /// Creates a message with the given text content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the display name override.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the avatar URL override.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Enables or disables text-to-speech.
    #[must_use]
    pub const fn with_tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    /// Appends an embed.
    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Sets the allowed mentions.
    #[must_use]
    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Sets the forum thread name.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// Returns true if the message has neither text content nor embeds.
    ///
    /// Receiving services reject such messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.embeds.is_empty()
    }
}

/// Mention types that may be parsed out of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    /// Role mentions
    Roles,
    /// User mentions
    Users,
    /// `@everyone` and `@here`
    Everyone,
}

/// Controls which mentions in a message actually notify.
///
/// The default value (empty `parse`) suppresses all pings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    /// Mention kinds parsed from content
    #[serde(default)]
    pub parse: Vec<MentionKind>,

    /// Specific role IDs allowed to be mentioned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Specific user IDs allowed to be mentioned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,

    /// Whether to mention the author of a replied-to message
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replied_user: bool,
}

impl AllowedMentions {
    /// Suppresses every mention.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Allows the given mention kinds.
    #[must_use]
    pub fn parse(kinds: impl IntoIterator<Item = MentionKind>) -> Self {
        Self {
            parse: kinds.into_iter().collect(),
            ..Self::default()
        }
    }
}
