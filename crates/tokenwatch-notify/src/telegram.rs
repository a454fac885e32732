//! Telegram Bot API notifier.
//!
//! ```text
//!   POST {api_base}/bot{token}/sendMessage
//!   { "chat_id": …, "text": …, "parse_mode": "Markdown",
//!     "disable_web_page_preview": true }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use tokenwatch_core::error::NotifyError;

use crate::notifier::Notifier;

/// Public Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
/// Chat notified by default.
pub const DEFAULT_CHAT_ID: &str = "-4250910125";

/// Telegram notification configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Overridable for tests and self-hosted Bot API servers.
    pub api_base: String,
    pub request_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Sends messages through the Bot API `sendMessage` method.
#[derive(Debug)]
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&json!({
                "chat_id": self.config.chat_id,
                "text": text,
                "parse_mode": "Markdown",
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            // The request URL carries the bot token.
            .map_err(|e| NotifyError::Http(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
