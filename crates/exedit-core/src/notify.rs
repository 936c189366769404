//! Short-lived user notifications.

use std::fmt;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Success => write!(f, "success"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A message raised by an operation, dismissed after [`DISMISS_AFTER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: Level,
    pub raised_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::raise(message.into(), Level::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::raise(message.into(), Level::Error)
    }

    fn raise(message: String, level: Level) -> Self {
        match level {
            Level::Success => tracing::info!("{message}"),
            Level::Error => tracing::warn!("{message}"),
        }
        Self {
            message,
            level,
            raised_at: Instant::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= DISMISS_AFTER
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
