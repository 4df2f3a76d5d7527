// ── User-facing notifications ──
//
// Every store operation ends in at most one notification: success text,
// or the backend's failure message (a generic one when it sent none).
// Stores hold an injected `Arc<dyn Notifier>`; the front end decides how
// to render them.

use strum::Display;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    /// Collection that raised it ("announcements", "book requests").
    pub source: &'static str,
}

impl Notification {
    pub fn new(level: Level, source: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source,
        }
    }

    pub fn success(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Success, source, message)
    }

    pub fn warning(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, source, message)
    }

    pub fn error(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Error, source, message)
    }
}

/// Sink for store notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Fan notifications out to any number of subscribers.
///
/// Sending never blocks; with no live receiver the notification is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<Notification>,
}

impl ChannelNotifier {
    /// A subscriber that falls more than `capacity` notifications behind
    /// loses the oldest ones. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

/// Route notifications into the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            Level::Success => info!(source = n.source, "{}", n.message),
            Level::Warning => warn!(source = n.source, "{}", n.message),
            Level::Error => error!(source = n.source, "{}", n.message),
        }
    }
}
