//! User-facing notifications.
//!
//! Store operations report their outcome through a [`NotificationSink`].
//! Delivery is fire-and-forget: a sink cannot fail an operation.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.  Default sink when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            NotificationKind::Error => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}

/// Buffers notifications until a UI layer drains them.
#[derive(Debug, Default)]
pub struct QueuedSink {
    pending: Mutex<Vec<Notification>>,
}

impl QueuedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every notification queued so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(e) => {
                tracing::error!(error = %e, "Notification queue poisoned");
                Vec::new()
            }
        }
    }
}

impl NotificationSink for QueuedSink {
    fn notify(&self, notification: Notification) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(e) => tracing::error!(error = %e, "Failed to queue notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_sink_drains_in_order() {
        let sink = QueuedSink::new();
        sink.notify(Notification::success("Club created!", "Chess Club"));
        sink.notify(Notification::error("Failed to join club", "Club not found"));

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert_eq!(drained[1].title, "Failed to join club");
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn notification_json_shape() {
        let json = serde_json::to_value(Notification::error("Login failed", "Invalid credentials"))
            .unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["description"], "Invalid credentials");
    }
}
