//! Homewatch configuration.
//!
//! Loaded once at startup from `~/.homewatch/config.toml` (every field has a
//! default), then the three secrets are overridden from the environment when
//! set. The resulting value is immutable for the process lifetime.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HomewatchError, Result};

/// Environment variable per secret, in reporting order.
const SECRET_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomewatchConfig {
    /// OAuth token for the homework status API.
    #[serde(default)]
    pub practicum_token: String,
    /// Telegram bot token.
    #[serde(default)]
    pub telegram_token: String,
    /// Destination chat for notifications.
    #[serde(default)]
    pub telegram_chat_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".into()
}
fn default_poll_interval() -> u64 {
    600
}
fn default_http_timeout() -> u64 {
    10
}

impl Default for HomewatchConfig {
    fn default() -> Self {
        Self {
            practicum_token: String::new(),
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
            endpoint: default_endpoint(),
            poll_interval_secs: default_poll_interval(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl HomewatchConfig {
    /// Load from the default path, falling back to defaults when the file is
    /// absent, then apply environment overrides for the secrets.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HomewatchError::Config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| HomewatchError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Environment variables take precedence over file values for secrets.
    pub fn apply_env(&mut self) {
        let slots = [
            &mut self.practicum_token,
            &mut self.telegram_token,
            &mut self.telegram_chat_id,
        ];
        for (slot, var) in slots.into_iter().zip(SECRET_VARS) {
            if let Ok(value) = std::env::var(var)
                && !value.is_empty()
            {
                *slot = value;
            }
        }
    }

    /// The credential gate. Logs every missing secret at the highest
    /// severity and fails with the full list; the caller exits without
    /// starting the loop.
    pub fn check_credentials(&self) -> Result<()> {
        let values = [
            &self.practicum_token,
            &self.telegram_token,
            &self.telegram_chat_id,
        ];
        let missing: Vec<String> = values
            .into_iter()
            .zip(SECRET_VARS)
            .filter(|(value, _)| value.is_empty())
            .map(|(_, name)| name.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        for name in &missing {
            tracing::error!("required setting is not set: {name}");
        }
        Err(HomewatchError::MissingCredentials { names: missing })
    }

    /// Default config path (~/.homewatch/config.toml).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".homewatch")
            .join("config.toml")
    }
}
