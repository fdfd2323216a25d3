//! Configuration, read from the environment at startup.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub bot_token: SecretString,
    /// Chat id that receives completed-form notifications.
    pub operator_chat_id: i64,
    /// Optional idle timeout for abandoned conversations. `None` keeps
    /// state until the process restarts.
    pub session_ttl: Option<Duration>,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `TELEGRAM_BOT_TOKEN`, `OPERATOR_CHAT_ID`.
    /// Optional: `SESSION_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".into()))?;

        let operator_raw = std::env::var("OPERATOR_CHAT_ID")
            .map_err(|_| ConfigError::MissingEnvVar("OPERATOR_CHAT_ID".into()))?;
        let operator_chat_id: i64 =
            operator_raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "OPERATOR_CHAT_ID".into(),
                    message: format!("expected a numeric chat id, got {operator_raw:?}"),
                })?;

        let session_ttl = match std::env::var("SESSION_TTL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "SESSION_TTL_SECS".into(),
                    message: format!("expected seconds, got {raw:?}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            operator_chat_id,
            session_ttl,
        })
    }
}
