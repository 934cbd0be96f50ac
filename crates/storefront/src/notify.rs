//! Notification sinks for shopper-facing notices.
//!
//! Cart operations report their failures through a [`Notifier`] and never to
//! the caller. The web storefront queues notices and shows them on the next
//! rendered page; the CLI logs them.

use std::collections::VecDeque;
use std::sync::Mutex;

use rocketshoes_core::Notice;

/// Maximum number of undisplayed notices kept by a [`NoticeQueue`].
const MAX_QUEUED_NOTICES: usize = 16;

/// Fire-and-forget sink for notices.
pub trait Notifier: Send + Sync {
    /// Deliver a notice. Must not fail or block.
    fn notify(&self, notice: Notice);
}

/// Bounded in-memory queue of notices waiting to be displayed.
///
/// When full, the oldest notice is dropped.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<VecDeque<Notice>>,
}

impl NoticeQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| notices.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of queued notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.lock().map(|notices| notices.len()).unwrap_or(0)
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        let Ok(mut notices) = self.notices.lock() else {
            tracing::warn!(notice = %notice, "Notice queue poisoned, dropping notice");
            return;
        };

        if notices.len() >= MAX_QUEUED_NOTICES {
            notices.pop_front();
        }
        notices.push_back(notice);
    }
}

/// Notifier that writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_rejection() {
            tracing::warn!(notice = %notice, "Cart request rejected");
        } else {
            tracing::error!(notice = %notice, "Cart operation failed");
        }
    }
}
