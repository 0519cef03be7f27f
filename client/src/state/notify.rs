//! Transient user-facing notices.
//!
//! One notice is visible at a time; a newer notice replaces the current one
//! and every notice expires on its own after the configured TTL.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Severity of a notice; drives presentation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.message)
    }
}

#[derive(Debug)]
struct Shown {
    notice: Notice,
    at: Instant,
}

/// Single-slot notice holder shared by every page.
#[derive(Clone, Debug)]
pub struct Notifier {
    slot: Arc<Mutex<Option<Shown>>>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl Notifier {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { slot: Arc::new(Mutex::new(None)), ttl }
    }

    pub fn show(&self, message: impl Into<String>, kind: NoticeKind) {
        let notice = Notice { message: message.into(), kind };
        tracing::debug!(kind = kind.label(), message = %notice.message, "notice shown");
        *self.lock() = Some(Shown { notice, at: Instant::now() });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NoticeKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NoticeKind::Error);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, NoticeKind::Warning);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, NoticeKind::Info);
    }

    /// The visible notice, if one was shown and has not expired.
    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        self.current_at(Instant::now())
    }

    /// Remove and return the visible notice.
    pub fn take(&self) -> Option<Notice> {
        let notice = self.current();
        self.dismiss();
        notice
    }

    pub fn dismiss(&self) {
        *self.lock() = None;
    }

    fn current_at(&self, now: Instant) -> Option<Notice> {
        let mut slot = self.lock();
        let expired = slot.as_ref().is_some_and(|shown| now.saturating_duration_since(shown.at) >= self.ttl);
        if expired {
            *slot = None;
        }
        slot.as_ref().map(|shown| shown.notice.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Shown>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
