//! Telegram Bot API notification adapter.
//!
//! Posts Markdown messages to `sendMessage` with a blocking client. Any
//! transport or API failure is logged and reported as `false`.

use crate::domain::config_validation::is_configured_value;
use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;
use crate::ports::notify_port::NotifyPort;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramAdapter {
    bot_token: Option<String>,
    chat_id: Option<String>,
    api_base: String,
    client: Option<reqwest::blocking::Client>,
}

impl TelegramAdapter {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>, timeout: Duration) -> Self {
        let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("failed to build Telegram HTTP client: {}", e);
                None
            }
        };
        Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    /// Reads `[telegram] bot_token, chat_id, timeout_secs`.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let timeout_secs = config.get_int("telegram", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        let timeout = Duration::from_secs(u64::try_from(timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS));
        Self::new(
            config.get_string("telegram", "bot_token"),
            config.get_string("telegram", "chat_id"),
            timeout,
        )
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn send(&self, token: &str, chat_id: &str, text: &str) -> Result<(), ScanError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ScanError::Notify {
                reason: "HTTP client unavailable".to_string(),
            })?;
        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| ScanError::Notify {
                reason: format!("request failed: {}", e),
            })?;
        let status = response.status();
        let parsed: ApiResponse = response
            .json()
            .map_err(|e| ScanError::Notify {
                reason: format!("invalid response (HTTP {}): {}", status, e),
            })?;

        if parsed.ok {
            Ok(())
        } else {
            Err(ScanError::Notify {
                reason: parsed
                    .description
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            })
        }
    }
}

impl NotifyPort for TelegramAdapter {
    fn notify(&self, message: &str) -> bool {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            return false;
        };
        if !self.is_configured() {
            return false;
        }

        match self.send(token.trim(), chat_id.trim(), message) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Telegram {}", e);
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        is_configured_value(self.bot_token.as_deref()) && is_configured_value(self.chat_id.as_deref())
    }
}
