//! Telegram channel: long-polls the Bot API for updates.
//!
//! Handles plain messages and inline-button presses (`callback_query`). Replies
//! go to the chat the message came from; reminders go to the owner's private
//! chat, whose id equals the Telegram user id.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::channels::{Channel, IncomingMessage, InlineButton, MessageStream, OutgoingResponse};
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Long-poll timeout passed to getUpdates, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram channel: connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: SecretString,
    allowed_users: Vec<String>,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: SecretString, allowed_users: Vec<String>) -> Self {
        Self {
            bot_token,
            allowed_users,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{method}",
            self.bot_token.expose_secret()
        )
    }

    /// Send a text message, splitting at Telegram's 4096 char limit.
    /// Buttons are attached to the last chunk.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        buttons: &[InlineButton],
    ) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let markup = if i == last && !buttons.is_empty() {
                Some(inline_keyboard(buttons))
            } else {
                None
            };
            self.send_message_chunk(chat_id, chunk, markup.as_ref())
                .await?;
        }
        Ok(())
    }

    /// Send a single message chunk (≤4096 chars), Markdown-first with fallback.
    async fn send_message_chunk(
        &self,
        chat_id: &str,
        text: &str,
        reply_markup: Option<&Value>,
    ) -> Result<(), ChannelError> {
        let mut markdown_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown"
        });
        if let Some(markup) = reply_markup {
            markdown_body["reply_markup"] = markup.clone();
        }

        let markdown_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&markdown_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.without_url().to_string(),
            })?;

        if markdown_resp.status().is_success() {
            return Ok(());
        }

        let markdown_status = markdown_resp.status();
        tracing::warn!(
            status = ?markdown_status,
            "Telegram sendMessage with Markdown failed; retrying without parse_mode"
        );

        // User text may contain unbalanced `*` or `_`.
        let mut plain_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            plain_body["reply_markup"] = markup.clone();
        }
        let plain_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&plain_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.without_url().to_string(),
            })?;

        if !plain_resp.status().is_success() {
            let plain_err = plain_resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!(
                    "sendMessage failed (markdown: {}, plain: {})",
                    markdown_status, plain_err
                ),
            });
        }

        Ok(())
    }
}

// ── Channel trait implementation ────────────────────────────────────

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let updates_url = self.api_url("getUpdates");
        let answer_url = self.api_url("answerCallbackQuery");
        let allowed_users = self.allowed_users.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for messages...");

            loop {
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message", "callback_query"]
                });

                let resp = match client.post(&updates_url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {}", e.without_url());
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                };

                let data: Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {}", e.without_url());
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                };

                let Some(results) = data.get("result").and_then(Value::as_array) else {
                    tracing::warn!(
                        "Telegram getUpdates returned no result: {}",
                        data.get("description").and_then(serde_json::Value::as_str).unwrap_or("unknown error")
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                };

                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(parsed) = parse_update(update) else {
                        continue;
                    };

                    // A pressed button spins until answered, allowed or not.
                    if let Some(query_id) = &parsed.callback_query_id {
                        let answer = serde_json::json!({ "callback_query_id": query_id });
                        if let Err(e) = client.post(&answer_url).json(&answer).send().await {
                            tracing::warn!("Telegram answerCallbackQuery failed: {}", e.without_url());
                        }
                    }

                    if !check_user_allowed(
                        &allowed_users,
                        parsed.identities.iter().map(String::as_str),
                    ) {
                        tracing::warn!(
                            "Telegram: ignoring update from unauthorized user: {}",
                            parsed.identities.join("/")
                        );
                        continue;
                    }

                    if tx.send(parsed.message).is_err() {
                        tracing::info!("Telegram listener channel closed");
                        return;
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let chat_id = msg
            .metadata
            .get("chat_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: "No chat_id in message metadata".into(),
            })?;

        self.send_message(chat_id, &response.content, &response.buttons)
            .await
    }

    async fn send_to(
        &self,
        user_id: &str,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        self.send_message(user_id, &response.content, &response.buttons)
            .await
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.without_url().to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::info!("Telegram channel shutting down");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// One update reduced to what the bot needs.
#[derive(Debug)]
struct ParsedUpdate {
    message: IncomingMessage,
    /// Username (if any) and numeric id, checked against the allowlist.
    identities: Vec<String>,
    callback_query_id: Option<String>,
}

/// Turn a `message` or `callback_query` update into an [`IncomingMessage`].
/// Other update kinds and non-text messages yield `None`.
fn parse_update(update: &Value) -> Option<ParsedUpdate> {
    if let Some(message) = update.get("message") {
        let text = message.get("text").and_then(Value::as_str)?;
        let from = message.get("from")?;
        let chat_id = chat_id_of(message)?;
        let (incoming, identities) = incoming_from(from, text, None, &chat_id)?;
        return Some(ParsedUpdate {
            message: incoming,
            identities,
            callback_query_id: None,
        });
    }

    let query = update.get("callback_query")?;
    let query_id = query.get("id").and_then(Value::as_str)?;
    let data = query.get("data").and_then(Value::as_str)?;
    let from = query.get("from")?;
    let chat_id = query.get("message").and_then(chat_id_of).or_else(|| {
        from.get("id")
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
    })?;
    let (incoming, identities) = incoming_from(from, "", Some(data), &chat_id)?;
    Some(ParsedUpdate {
        message: incoming,
        identities,
        callback_query_id: Some(query_id.to_string()),
    })
}

fn chat_id_of(message: &Value) -> Option<String> {
    message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .map(|id| id.to_string())
}

fn incoming_from(
    from: &Value,
    text: &str,
    callback_data: Option<&str>,
    chat_id: &str,
) -> Option<(IncomingMessage, Vec<String>)> {
    let user_id = from.get("id").and_then(Value::as_i64)?.to_string();
    let username = from.get("username").and_then(Value::as_str);
    let first_name = from.get("first_name").and_then(Value::as_str);

    let mut incoming = match callback_data {
        Some(data) => IncomingMessage::callback("telegram", &user_id, data),
        None => IncomingMessage::new("telegram", &user_id, text),
    }
    .with_metadata(serde_json::json!({
        "chat_id": chat_id,
        "username": username,
    }));
    if let Some(name) = first_name.or(username) {
        incoming = incoming.with_user_name(name);
    }

    let mut identities = Vec::new();
    if let Some(name) = username {
        identities.push(name.to_string());
    }
    identities.push(user_id);
    Some((incoming, identities))
}

/// One button per row.
fn inline_keyboard(buttons: &[InlineButton]) -> Value {
    let rows: Vec<Value> = buttons
        .iter()
        .map(|b| serde_json::json!([{ "text": b.label, "callback_data": b.data }]))
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// Check if any identity in the iterator matches the allowed users list.
fn check_user_allowed<'a>(
    allowed_users: &[String],
    identities: impl IntoIterator<Item = &'a str>,
) -> bool {
    let ids: Vec<&str> = identities.into_iter().collect();
    allowed_users
        .iter()
        .any(|u| u == "*" || ids.contains(&u.as_str()))
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts on a char boundary.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut cut = max_len;
        while !remaining.is_char_boundary(cut) {
            cut -= 1;
        }
        let chunk = &remaining[..cut];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .unwrap_or(cut);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { cut } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

// ── Tests ───────────────────────────────────────────────────────────
