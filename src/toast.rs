//! Transient notifications shown over the current screen
//!
//! Toasts expire on their own after a few seconds and can be dismissed early.

use chrono::{DateTime, Duration, Local};

/// How long a toast stays on screen
pub const TOAST_LIFETIME_SECS: i64 = 5;

/// Severity of a notification, which decides its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: DateTime<Local>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        now - self.shown_at >= Duration::seconds(TOAST_LIFETIME_SECS)
    }
}

/// Queue of active toasts, oldest first
#[derive(Debug, Default)]
pub struct Toasts {
    active: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.push_at(message, kind, Local::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: DateTime<Local>) {
        self.active.push(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Error);
    }

    /// Removes the most recent toast
    pub fn dismiss_latest(&mut self) -> Option<Toast> {
        self.active.pop()
    }

    /// Drops every toast older than its lifetime
    pub fn prune(&mut self, now: DateTime<Local>) {
        self.active.retain(|toast| !toast.is_expired(now));
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
