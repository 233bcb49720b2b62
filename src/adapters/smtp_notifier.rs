//! SMTP email notifier.
//!
//! Port 465 uses implicit TLS; any other port upgrades with STARTTLS.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::domain::credentials::EmailCredentials;
use crate::domain::error::StockSageError;
use crate::ports::notify_port::NotifyPort;

pub const IMPLICIT_TLS_PORT: u16 = 465;

fn notification_error(reason: impl std::fmt::Display) -> StockSageError {
    StockSageError::Notification {
        reason: reason.to_string(),
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, StockSageError> {
    address
        .parse()
        .map_err(|e| notification_error(format!("invalid address '{}': {}", address, e)))
}

/// Plain-text message from `from` to `to`.
pub fn build_message(
    from: &Mailbox,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, StockSageError> {
    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(notification_error)
}

pub struct SmtpNotifier {
    transport: SmtpTransport,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn new(
        host: &str,
        port: u16,
        credentials: &EmailCredentials,
        timeout: Duration,
    ) -> Result<Self, StockSageError> {
        let sender = parse_mailbox(&credentials.sender)?;
        let builder = if port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(host)
        } else {
            SmtpTransport::starttls_relay(host)
        }
        .map_err(notification_error)?;

        let transport = builder
            .port(port)
            .credentials(SmtpCredentials::new(
                credentials.sender.clone(),
                credentials.password.expose_secret().to_string(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, sender })
    }
}

impl NotifyPort for SmtpNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), StockSageError> {
        let email = build_message(&self.sender, recipient, subject, body)?;
        self.transport.send(&email).map_err(notification_error)?;
        Ok(())
    }
}
