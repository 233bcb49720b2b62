//! Notifier that writes alerts to the log instead of sending them.

use crate::domain::error::StockSageError;
use crate::ports::notify_port::NotifyPort;

#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifyPort for LogNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), StockSageError> {
        log::info!("[dry-run] alert for {}: {}\n{}", recipient, subject, body);
        Ok(())
    }
}
