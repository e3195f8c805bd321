//! In-process notification channel.

use tokio::sync::broadcast;
use tracing::debug;

use tansan_models::{JobId, Notification};

/// Fan-out of user-facing notifications to every subscriber.
///
/// Publishing never blocks. A subscriber that falls more than the channel
/// capacity behind skips the oldest messages.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publish a notification. Returns how many subscribers received it.
    pub fn publish(&self, notification: Notification) -> usize {
        debug!(
            level = notification.level.as_str(),
            message = %notification.message,
            "Publishing notification"
        );
        // No subscribers is not an error
        self.sender.send(notification).unwrap_or(0)
    }

    pub fn loading(&self, job_id: &JobId, message: impl Into<String>) -> usize {
        self.publish(Notification::loading(job_id, message))
    }

    pub fn success(&self, job_id: Option<&JobId>, message: impl Into<String>) -> usize {
        self.publish(Notification::success(job_id, message))
    }

    pub fn error(&self, job_id: Option<&JobId>, message: impl Into<String>) -> usize {
        self.publish(Notification::error(job_id, message))
    }

    pub fn info(&self, job_id: Option<&JobId>, message: impl Into<String>) -> usize {
        self.publish(Notification::info(job_id, message))
    }
}
