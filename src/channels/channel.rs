//! Channel trait and the message types that cross it.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// A message (or button press) received from a user.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel the message arrived on ("telegram", "cli").
    pub channel: String,
    /// Stable identity of the sender. Used as the reminder owner id.
    pub user_id: String,
    pub user_name: Option<String>,
    /// Message text. Empty for button presses.
    pub content: String,
    /// Payload of a pressed inline button, if this is a button press.
    pub callback_data: Option<String>,
    /// Channel-specific routing data (e.g. Telegram `chat_id`).
    pub metadata: serde_json::Value,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: &str, content: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            user_name: None,
            content: content.to_string(),
            callback_data: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// A button press carrying `data`.
    pub fn callback(channel: &str, user_id: &str, data: &str) -> Self {
        Self {
            callback_data: Some(data.to_string()),
            ..Self::new(channel, user_id, "")
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_user_name(mut self, name: &str) -> Self {
        self.user_name = Some(name.to_string());
        self
    }
}

/// An inline button attached to a response. Pressing it sends `data` back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Reply text plus optional inline buttons, one per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub content: String,
    pub buttons: Vec<InlineButton>,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<InlineButton>) -> Self {
        self.buttons = buttons;
        self
    }
}

pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A chat transport.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Begin receiving. The returned stream ends when the transport closes.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Reply to a received message.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Send an unsolicited message to a user, addressed by owner id.
    async fn send_to(&self, user_id: &str, response: OutgoingResponse)
    -> Result<(), ChannelError>;

    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
