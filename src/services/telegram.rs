// src/services/telegram.rs

//! Telegram Bot API delivery.

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;

/// Outbound channel to the single recipient chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text`, optionally rendered with a Bot API parse mode.
    async fn send(&self, text: &str, parse_mode: Option<&str>) -> Result<()>;
}

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram client bound to one bot token and one chat.
pub struct TelegramClient {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramClient {
    /// Create a new client.
    pub fn new(
        client: Client,
        config: &TelegramConfig,
        bot_token: &str,
        chat_id: impl Into<String>,
    ) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            config.api_base.trim_end_matches('/'),
            bot_token
        );
        Self {
            client,
            send_url,
            chat_id: chat_id.into(),
        }
    }

    /// Build the `sendMessage` request for `text`.
    pub fn request(&self, text: &str, parse_mode: Option<&str>) -> Result<Request> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode,
        };

        // The request URL carries the bot token, keep it out of error text.
        self.client
            .post(&self.send_url)
            .json(&body)
            .build()
            .map_err(|e| AppError::messenger(e.without_url()))
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send(&self, text: &str, parse_mode: Option<&str>) -> Result<()> {
        log::info!("Send message to {}: {}", self.chat_id, text);

        let request = self.request(text, parse_mode)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::messenger(e.without_url()))?;

        let status = response.status().as_u16();
        let reply = response
            .text()
            .await
            .map_err(|e| AppError::messenger(e.without_url()))?;

        interpret_reply(status, &reply)?;
        log::info!("Message sent");
        Ok(())
    }
}

/// Decide whether a `sendMessage` answer means the message was delivered.
pub fn interpret_reply(status: u16, body: &str) -> Result<()> {
    let reply: Option<BotReply> = serde_json::from_str(body).ok();

    match reply {
        Some(BotReply { ok: true, .. }) if (200..300).contains(&status) => Ok(()),
        Some(BotReply { description, .. }) => Err(AppError::messenger(format!(
            "status {}: {}",
            status,
            description.unwrap_or_else(|| "no description".to_string())
        ))),
        None => Err(AppError::messenger(format!(
            "status {status}: unexpected reply body"
        ))),
    }
}
