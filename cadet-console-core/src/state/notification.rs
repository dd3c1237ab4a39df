//! Transient operator notifications
//!
//! One slot, last writer wins. Expiry is computed against
//! [`tokio::time::Instant`] so paused-clock tests can drive it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.duration
    }
}

/// Holds at most one visible notification.
#[derive(Debug)]
pub struct Notifier {
    slot: RwLock<Option<Notification>>,
    next_id: AtomicU64,
    duration: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            next_id: AtomicU64::new(1),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Show `message`, replacing whatever is visible. Returns its id.
    pub async fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            duration: self.duration,
        };
        log::debug!("[notify] {} {}", kind.as_str(), notification.message);
        *self.slot.write().await = Some(notification);
        id
    }

    pub async fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Error).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Warning).await
    }

    pub async fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Info).await
    }

    /// The visible notification, if it has not timed out.
    pub async fn current(&self) -> Option<Notification> {
        self.current_at(Instant::now()).await
    }

    pub async fn current_at(&self, now: Instant) -> Option<Notification> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|n| !n.is_expired_at(now))
            .cloned()
    }

    /// Last notification shown, expired or not.
    pub async fn last(&self) -> Option<Notification> {
        self.slot.read().await.clone()
    }

    /// Hide the notification with `id`. A newer one stays visible.
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut slot = self.slot.write().await;
        if slot.as_ref().is_some_and(|n| n.id == id) {
            *slot = None;
            return true;
        }
        false
    }
}
