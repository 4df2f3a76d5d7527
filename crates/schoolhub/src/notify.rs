//! Store notifications rendered on stderr.

use owo_colors::OwoColorize;
use schoolhub_core::{Level, Notification, Notifier};

/// Prints success and warning notifications to stderr.
///
/// Error notifications are only traced: the failing call also returns a
/// `CoreError` carrying the same message, which `main` reports through
/// miette, so printing both would show the failure twice.
pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    fn render(&self, n: &Notification) -> String {
        let marker = match n.level {
            Level::Success => "✓",
            Level::Warning => "!",
            Level::Error => "✗",
        };
        if !self.color {
            return format!("{marker} {}", n.message);
        }
        match n.level {
            Level::Success => format!("{} {}", marker.green(), n.message),
            Level::Warning => format!("{} {}", marker.yellow(), n.message.yellow()),
            Level::Error => format!("{} {}", marker.red(), n.message.red()),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            level = %notification.level,
            source = notification.source,
            message = %notification.message,
            "notification"
        );
        let suppressed = match notification.level {
            Level::Error => true,
            Level::Warning => false,
            Level::Success => self.quiet,
        };
        if !suppressed {
            eprintln!("{}", self.render(&notification));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_has_marker_and_message() {
        let notifier = TerminalNotifier::new(false, false);
        let n = Notification::success("events", "Event deleted");
        assert_eq!(notifier.render(&n), "✓ Event deleted");
    }
}
