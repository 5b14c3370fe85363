//! User-visible notifications (toasts)
//!
//! Calls are fire-and-forget: nothing is returned and a sink must not fail
//! the operation that triggered it.

/// Sink for success and error notifications
pub trait Notifier: Send + Sync {
    /// Report a completed action
    fn success(&self, message: &str);

    /// Report a failed action
    fn error(&self, message: &str);
}

/// No-op notifier for tests or headless use
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn success(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// Notifier that writes toasts to the log
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(toast = "error", "{}", message);
    }
}
