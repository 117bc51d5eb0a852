//! Notification sink for build outcomes.
//!
//! The host hands the export service a sink and decides how messages
//! surface (toast, status bar, nothing). The default routes through the
//! log so non-interactive callers get outcomes for free.

/// Receives the single success or failure message of one build.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Default sink: success at info, failure at error.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn failure(&self, message: &str) {
        tracing::error!("{message}");
    }
}
