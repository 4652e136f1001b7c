// src/notify.rs

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Fire-and-forget channel for user-facing toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }
}

/// Pending toasts, handed to the client with the next response.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<VecDeque<Notification>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.pending.lock().drain(..).collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => tracing::warn!("toast: {}", message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::debug!("toast: {}", message)
            }
        }
        self.pending.lock().push_back(Notification {
            kind,
            message: message.to_string(),
        });
    }
}
