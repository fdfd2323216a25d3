//! Telegram Bot API channel — long-polls for updates, sends replies.

use std::pin::Pin;

use futures::Stream;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ChannelError;
use crate::event::{Incoming, Keyboard, Payload, Reply};

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Async stream of inbound events.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Incoming> + Send>>;

/// Telegram Bot API client.
pub struct TelegramClient {
    bot_token: SecretString,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{method}",
            self.bot_token.expose_secret()
        )
    }

    /// Verify the token against `getMe`.
    pub async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    /// Send a plain text message.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChannelError> {
        self.send_reply(chat_id, &Reply::text(text)).await
    }

    /// Send a reply, splitting text over Telegram's 4096-char limit. The
    /// inline keyboard, if any, goes on the last chunk.
    pub async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), ChannelError> {
        let chunks = split_message(&reply.text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len() - 1;
        for (i, chunk) in chunks.iter().enumerate() {
            let keyboard = (i == last).then_some(reply.keyboard.as_ref()).flatten();
            self.send_chunk(chat_id, chunk, keyboard).await?;
        }
        Ok(())
    }

    /// Send a single chunk, Markdown-first with a plain-text fallback.
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChannelError> {
        let mut markdown_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(kb) = keyboard {
            markdown_body["reply_markup"] = keyboard_json(kb);
        }

        let markdown_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&markdown_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                chat_id,
                reason: e.to_string(),
            })?;

        if markdown_resp.status().is_success() {
            return Ok(());
        }

        let markdown_status = markdown_resp.status();
        tracing::warn!(
            status = ?markdown_status,
            "sendMessage with Markdown failed; retrying without parse_mode"
        );

        let mut plain_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(kb) = keyboard {
            plain_body["reply_markup"] = keyboard_json(kb);
        }
        let plain_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&plain_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                chat_id,
                reason: e.to_string(),
            })?;

        if !plain_resp.status().is_success() {
            let plain_err = plain_resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                chat_id,
                reason: format!(
                    "sendMessage failed (markdown: {markdown_status}, plain: {plain_err})"
                ),
            });
        }

        Ok(())
    }

    /// Acknowledge a callback query so the button stops spinning.
    pub async fn answer_callback(&self, callback_id: &str) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url("answerCallbackQuery"))
            .json(&serde_json::json!({ "callback_query_id": callback_id }))
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ChannelError::Http(format!(
                "answerCallbackQuery returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Long-poll `getUpdates` on a background task, yielding inbound events.
    pub fn start(&self) -> UpdateStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let url = self.api_url("getUpdates");
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for updates...");

            loop {
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": 30,
                    "allowed_updates": ["message", "callback_query"],
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: serde_json::Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                    for update in results {
                        if let Some(uid) =
                            update.get("update_id").and_then(serde_json::Value::as_i64)
                        {
                            offset = uid + 1;
                        }

                        let Some(incoming) = parse_update(update) else {
                            continue;
                        };

                        if tx.send(incoming).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Box::pin(stream)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse one `getUpdates` entry into an [`Incoming`] event. Updates
/// without text (stickers, joins, edits) are skipped.
fn parse_update(update: &serde_json::Value) -> Option<Incoming> {
    if let Some(cb) = update.get("callback_query") {
        let id = cb.get("id")?.as_str()?.to_string();
        let tag = cb.get("data")?.as_str()?.to_string();
        let from = cb.get("from")?;
        let user_id = from.get("id")?.as_i64()?;
        let chat_id = cb
            .get("message")
            .and_then(|m| m.get("chat"))
            .and_then(|c| c.get("id"))
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(user_id);
        let username = from
            .get("username")
            .and_then(|u| u.as_str())
            .map(String::from);
        return Some(Incoming {
            user_id,
            chat_id,
            username,
            payload: Payload::Callback { id, tag },
        });
    }

    let message = update.get("message")?;
    let text = message.get("text")?.as_str()?;
    let from = message.get("from")?;
    let user_id = from.get("id")?.as_i64()?;
    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(user_id);
    let username = from
        .get("username")
        .and_then(|u| u.as_str())
        .map(String::from);

    let payload = match command_token(text) {
        Some(cmd) => Payload::Command(cmd),
        None => Payload::Text(text.to_string()),
    };

    Some(Incoming {
        user_id,
        chat_id,
        username,
        payload,
    })
}

/// Extract a slash-command token: `/quiz@SmartStartBot extra` → `quiz`.
fn command_token(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix('/')?;
    let token = rest.split_whitespace().next()?;
    let token = token.split('@').next().unwrap_or(token);
    (!token.is_empty()).then(|| token.to_lowercase())
}

fn keyboard_json(kb: &Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = kb
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(label, tag)| {
                    serde_json::json!({ "text": label, "callback_data": tag })
                })
                .collect()
        })
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts.
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

        // Back the cut up to a char boundary before slicing.
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
