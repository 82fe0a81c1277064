//! Transient success messages.

use std::time::{Duration, Instant};

/// How long a success notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// A message shown for `NOTICE_DURATION` after it was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(message, Instant::now())
    }

    pub fn at(message: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTICE_DURATION
    }
}
