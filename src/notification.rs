//! Transient user-facing messages.
//!
//! A notification carries its own expiry timestamp. The renderer decides
//! whether to show it by comparing against the current time; nothing in the
//! core runs a timer.

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};

/// Severity level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message shown to the user, optionally with an expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NoticeLevel,
    /// `None` means the message stays until replaced
    pub expires_at: Option<Timestamp>,
}

impl Notification {
    /// Create a notification that expires `ttl` after `now`
    pub fn ephemeral(
        message: impl Into<String>,
        level: NoticeLevel,
        ttl: Duration,
        now: Timestamp,
    ) -> Self {
        let ttl = SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX);
        Self {
            message: message.into(),
            level,
            expires_at: Some(now.checked_add(ttl).unwrap_or(Timestamp::MAX)),
        }
    }

    /// Create a success notification with a TTL
    pub fn success(message: impl Into<String>, ttl: Duration, now: Timestamp) -> Self {
        Self::ephemeral(message, NoticeLevel::Success, ttl, now)
    }

    /// Create an error notification that persists until replaced
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// The notification if it is still live at `now`
    pub fn live(notification: &Option<Self>, now: Timestamp) -> Option<&Self> {
        notification.as_ref().filter(|n| !n.is_expired(now))
    }
}
