//! Notification port trait.

use crate::domain::error::StockSageError;

pub trait NotifyPort {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), StockSageError>;
}
