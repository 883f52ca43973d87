//! Notification delivery.
//!
//! A failed send must not crash the poll loop or be mistaken for a
//! status-detection failure, so channel errors stop here: logged, mapped to
//! [`Delivery::Failed`], never propagated.

use std::sync::Arc;

use homewatch_core::traits::Messenger;
use homewatch_core::types::Delivery;

/// Delivers formatted messages to the configured chat.
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
    chat_id: String,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn Messenger>, chat_id: String) -> Self {
        Self { messenger, chat_id }
    }

    /// Attempt one delivery. Callers use the result to decide whether to
    /// commit state.
    pub async fn deliver(&self, text: &str) -> Delivery {
        match self.messenger.send(&self.chat_id, text).await {
            Ok(()) => {
                tracing::debug!("message sent: \"{text}\"");
                Delivery::Delivered
            }
            Err(e) => {
                tracing::error!("failed to send \"{text}\": {e}");
                Delivery::Failed
            }
        }
    }
}
