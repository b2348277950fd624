//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Hosted Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client.
///
/// The bot token is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output. All messages are sent with HTML
/// parse mode.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl TelegramClient {
    /// Create a new Bot API client.
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: SecretString::new(token.into()),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    /// Call a Bot API method and unwrap its response envelope.
    async fn call<P, R>(&self, method: &str, payload: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;

        let envelope: ApiResponse<R> = response.json().await?;

        if !envelope.ok {
            let code = envelope.error_code.unwrap_or_default();
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            warn!(method, code, description = %description, "Bot API call failed");
            return Err(TelegramError::Api { code, description });
        }

        envelope.result.ok_or(TelegramError::EmptyResponse)
    }

    /// Check whether the Bot API is reachable with this token.
    pub async fn health_check(&self) -> bool {
        self.get_me().await.is_ok()
    }

    /// Fetch the bot's own identity.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let me: User = self.call("getMe", &serde_json::json!({})).await?;
        debug!(bot_id = me.id, username = ?me.username, "Fetched bot identity");
        Ok(me)
    }

    /// Send an HTML-formatted message to a chat.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: Some("HTML"),
        };

        let message: Message = self.call("sendMessage", &request).await?;
        debug!(chat_id, message_id = message.message_id, "Message sent");
        Ok(message)
    }

    /// Point the bot's webhook at the given URL.
    #[instrument(skip(self))]
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        let request = SetWebhookRequest { url };
        let accepted: bool = self.call("setWebhook", &request).await?;
        debug!(url, accepted, "Webhook registered");
        Ok(())
    }

    /// Remove the bot's webhook registration.
    #[instrument(skip(self))]
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let accepted: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
        debug!(accepted, "Webhook removed");
        Ok(())
    }
}
