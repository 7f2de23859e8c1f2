//! Notifications: transient success/error messages for the user.
//!
//! Inject an [`Arc<dyn NotificationSink>`] via
//! [`crate::config::AnalyzerConfigBuilder::notification_sink`] to receive
//! every notification a session emits, plus its phase changes (which is what
//! drives a spinner while the analysis call is in flight).
//!
//! The library never renders anything itself. A terminal front end prints the
//! messages, a GUI stacks them as toasts, and [`NotificationCenter`] keeps an
//! in-memory stack that expires entries after their TTL.
//!
//! # Example
//!
//! ```rust
//! use docanalyzer::{AnalyzerConfig, Notification, NotificationSink};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct ErrorCounter(AtomicUsize);
//!
//! impl NotificationSink for ErrorCounter {
//!     fn notify(&self, notification: &Notification) {
//!         if notification.is_error() {
//!             self.0.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let config = AnalyzerConfig::builder()
//!     .notification_sink(Arc::new(ErrorCounter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::state::AnalysisPhase;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single transient message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub ttl: Duration,
    pub issued_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NotificationKind::Success, message, ttl)
    }

    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NotificationKind::Error, message, ttl)
    }

    fn new(kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            ttl,
            issued_at: Instant::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    /// Whether the notification should have been dismissed by `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.issued_at) >= self.ttl
    }
}

/// Receives notifications and phase changes from a session.
///
/// Both methods have no-op defaults so implementations only override what
/// they care about. Implementations must be `Send + Sync`; a session may be
/// driven from any tokio worker thread.
pub trait NotificationSink: Send + Sync {
    /// Called for every success or error message.
    fn notify(&self, notification: &Notification) {
        let _ = notification;
    }

    /// Called after each state transition that changes the phase.
    fn on_phase_change(&self, from: AnalysisPhase, to: AnalysisPhase) {
        let _ = (from, to);
    }
}

/// A no-op sink, used when no sink is configured.
pub struct NoopSink;

impl NotificationSink for NoopSink {}

/// Convenience alias matching the type stored in [`crate::config::AnalyzerConfig`].
pub type SharedSink = Arc<dyn NotificationSink>;

/// In-memory notification stack with per-entry expiry.
///
/// Entries are kept in arrival order and are never deduplicated; several
/// notifications can be visible at once.
#[derive(Default)]
pub struct NotificationCenter {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications still visible now, oldest first. Expired ones are dropped.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Notifications still visible at `now`, oldest first. Expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|n| !n.is_expired_at(now));
        entries.clone()
    }

    /// Dismiss everything.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, notification: &Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_millis(3000);

    #[test]
    fn noop_sink_does_not_panic() {
        let sink = NoopSink;
        sink.notify(&Notification::success("ok", TTL));
        sink.on_phase_change(AnalysisPhase::Idle, AnalysisPhase::Uploading);
    }

    #[test]
    fn expiry_is_ttl_from_issue() {
        let n = Notification::error("Upload failed: disk full", TTL);
        assert!(!n.is_expired_at(n.issued_at));
        assert!(!n.is_expired_at(n.issued_at + Duration::from_millis(2999)));
        assert!(n.is_expired_at(n.issued_at + TTL));
    }

    #[test]
    fn center_stacks_without_dedup() {
        let center = NotificationCenter::new();
        center.notify(&Notification::success("File Uploaded Successfully!", TTL));
        center.notify(&Notification::success("File Uploaded Successfully!", TTL));
        center.notify(&Notification::error("Analysis failed: quota", TTL));

        let active = center.active();
        assert_eq!(active.len(), 3);
        assert!(active[2].is_error());
    }

    #[test]
    fn center_drops_expired_entries_independently() {
        let center = NotificationCenter::new();
        let short = Notification::success("short", Duration::from_millis(100));
        let long = Notification::success("long", Duration::from_millis(5000));
        let t0 = short.issued_at.max(long.issued_at);
        center.notify(&short);
        center.notify(&long);

        let later = center.active_at(t0 + Duration::from_millis(1000));
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].message, "long");

        assert!(center.active_at(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn center_clear() {
        let center = NotificationCenter::new();
        center.notify(&Notification::success("x", TTL));
        center.clear();
        assert!(center.active().is_empty());
    }

    struct PhaseCounter(AtomicUsize);

    impl NotificationSink for PhaseCounter {
        fn on_phase_change(&self, _from: AnalysisPhase, _to: AnalysisPhase) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn arc_dyn_sink_works() {
        let counter = Arc::new(PhaseCounter(AtomicUsize::new(0)));
        let sink: SharedSink = counter.clone();
        sink.notify(&Notification::success("ignored", TTL));
        sink.on_phase_change(AnalysisPhase::Uploading, AnalysisPhase::Analyzing);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
