//! tokenwatch-notify — turns decoded events into paced Telegram messages.
//!
//! [`NotificationDispatcher`] implements [`tokenwatch_core::EventSink`], so
//! the poll loop hands it events without waiting on the network.

pub mod dedup;
pub mod dispatcher;
pub mod message;
pub mod notifier;
pub mod pacer;
pub mod telegram;

pub use dedup::SeenEvents;
pub use dispatcher::{DispatchStats, DispatcherConfig, NotificationDispatcher};
pub use message::{escape_markdown, format_message, DEFAULT_EXPLORER_URL};
pub use notifier::{LogNotifier, Notifier};
pub use pacer::SendPacer;
pub use telegram::{TelegramConfig, TelegramNotifier, DEFAULT_CHAT_ID, TELEGRAM_API_BASE};
