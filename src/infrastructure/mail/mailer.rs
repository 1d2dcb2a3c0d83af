use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use derive_more::Display;

use crate::{mail::smtp::SmtpMailer, settings::MailSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailPayload {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Invalid mail address: {_0}")]
    InvalidAddress(String),

    #[display("Failed to build message: {_0}")]
    Build(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),

    #[display("Mail send timed out after {_0:?}")]
    Timeout(Duration),

    #[display("Mail transport not configured")]
    NotConfigured,
}

impl std::error::Error for MailError {}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &MailPayload) -> Result<(), MailError>;
}

/// Stand-in used when no SMTP host is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _mail: &MailPayload) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

pub fn mailer_from_settings(settings: &MailSettings) -> Arc<dyn Mailer> {
    if !settings.transport_configured() {
        tracing::info!("SMTP host not configured, contact notifications are disabled");
        return Arc::new(DisabledMailer);
    }

    match SmtpMailer::new(settings) {
        Ok(mailer) => {
            tracing::info!(
                host = %settings.smtp_host,
                port = settings.smtp_port,
                "SMTP mailer ready"
            );
            Arc::new(mailer)
        }
        Err(e) => {
            tracing::error!("SMTP mailer setup failed, notifications disabled: {}", e);
            Arc::new(DisabledMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(host: &str) -> MailSettings {
        MailSettings {
            smtp_host: host.into(),
            smtp_port: 2525,
            smtp_username: String::new(),
            smtp_password: String::new(),
            starttls: false,
            sender: "portfolio@example.com".into(),
            recipient: "owner@example.com".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[actix_rt::test]
    async fn disabled_mailer_reports_not_configured() {
        let mailer = mailer_from_settings(&settings(""));
        let payload = MailPayload {
            from: "portfolio@example.com".into(),
            to: "owner@example.com".into(),
            subject: "s".into(),
            body: "b".into(),
        };

        assert!(matches!(mailer.send(&payload).await, Err(MailError::NotConfigured)));
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            MailError::Timeout(Duration::from_secs(10)).to_string(),
            "Mail send timed out after 10s"
        );
        assert_eq!(
            MailError::Transport("connection refused".into()).to_string(),
            "SMTP transport error: connection refused"
        );
    }
}
