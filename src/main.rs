//! # Homewatch — homework review status watcher
//!
//! Polls the Practicum homework status API on a fixed interval and pushes a
//! verdict message to a Telegram chat whenever the tracked submission's
//! review status changes. Runs until stopped; transient failures are
//! reported to the same chat, deduplicated.
//!
//! Usage:
//!   homewatch        # reads ~/.homewatch/config.toml, secrets from env

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use homewatch_api::StatusClient;
use homewatch_channels::TelegramChannel;
use homewatch_core::HomewatchConfig;
use homewatch_poller::{Notifier, PollEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("homewatch=info")),
        )
        .with_target(false)
        .init();

    let config = HomewatchConfig::load()?;
    // Fatal before the loop: the channel may itself be unreachable without
    // proper configuration, so nothing is sent — the process just exits.
    config.check_credentials()?;

    let http_timeout = Duration::from_secs(config.http_timeout_secs);
    let client = StatusClient::new(&config.endpoint, &config.practicum_token, http_timeout)?;
    let channel = TelegramChannel::new(&config.telegram_token, http_timeout)?;

    match channel.get_me().await {
        Ok(me) => tracing::info!(
            "🤖 Telegram bot: @{} ({})",
            me.username.as_deref().unwrap_or("unknown"),
            me.first_name
        ),
        Err(e) => tracing::warn!("Telegram bot check failed, continuing anyway: {e}"),
    }

    let notifier = Notifier::new(Arc::new(channel), config.telegram_chat_id.clone());
    let engine = PollEngine::new(
        Box::new(client),
        notifier,
        chrono::Utc::now().timestamp(),
    );

    engine
        .run(Duration::from_secs(config.poll_interval_secs))
        .await;
    Ok(())
}
