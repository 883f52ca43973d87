//! Telegram Bot channel — message sending via Bot API.

use async_trait::async_trait;
use homewatch_core::error::{HomewatchError, Result};
use homewatch_core::traits::Messenger;
use serde::Deserialize;

/// Telegram Bot API channel. Outbound only: the watcher never reads chat
/// input.
pub struct TelegramChannel {
    token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(token: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HomewatchError::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            token: token.to_string(),
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.token, method)
    }

    /// Send a plain-text message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| HomewatchError::Channel(format!("sendMessage failed: {e}")))?;

        let result: TelegramApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| HomewatchError::Channel(format!("invalid send response: {e}")))?;

        if !result.ok {
            return Err(HomewatchError::Channel(format!(
                "send rejected: {}",
                result.description.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Get bot info. Used once at startup to confirm the token is live.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        let response = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| HomewatchError::Channel(format!("getMe failed: {e}")))?;
        let body: TelegramApiResponse<TelegramUser> = response
            .json()
            .await
            .map_err(|e| HomewatchError::Channel(format!("invalid getMe response: {e}")))?;
        body.result
            .ok_or_else(|| HomewatchError::Channel("no bot info".into()))
    }
}

#[async_trait]
impl Messenger for TelegramChannel {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        self.send_message(chat_id, text).await
    }
}

// --- Telegram API Types ---

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}
