//! Capability traits — the seams between the poll engine and the outside
//! world. The engine and its tests only ever see these.

use async_trait::async_trait;

use crate::error::Result;

/// Sends plain-text messages to a chat. Implemented by the Telegram channel;
/// tests substitute a scripted recorder.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Fetches one page of homework statuses at or after `from_date`. Returns
/// the decoded JSON body; shape validation happens downstream.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value>;
}
