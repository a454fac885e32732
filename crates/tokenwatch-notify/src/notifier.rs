//! The `Notifier` capability and the dry-run implementation.

use async_trait::async_trait;

use tokenwatch_core::error::NotifyError;

/// Delivers one rendered message to a channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;

    /// Short channel name for logs.
    fn name(&self) -> &str;
}

/// Logs messages instead of sending them. Used when no bot token is set.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        tracing::info!(message = %text, "dry run: notification not sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
