//! # Homewatch Channels
//! Messaging channel implementations. Telegram is the only channel this
//! watcher ships; everything behind the [`homewatch_core::Messenger`] seam.

pub mod telegram;

pub use telegram::TelegramChannel;
