use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    mail::mailer::{MailError, MailPayload, Mailer},
    settings::MailSettings,
};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        let mut builder = builder
            .port(settings.smtp_port)
            .timeout(Some(settings.timeout));

        if !settings.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.smtp_username.clone(),
                settings.smtp_password.clone(),
            ));
        }

        Ok(SmtpMailer {
            transport: builder.build(),
            timeout: settings.timeout,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &MailPayload) -> Result<(), MailError> {
        let message = build_message(mail)?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(MailError::Transport(e.to_string())),
            Err(_) => Err(MailError::Timeout(self.timeout)),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress(format!("{address}: {e}")))
}

pub fn build_message(mail: &MailPayload) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> MailPayload {
        MailPayload {
            from: "portfolio@example.com".into(),
            to: "owner@example.com".into(),
            subject: "New contact from portfolio: Juan Pérez".into(),
            body: "Hola | Contact email: juan.perez@example.com".into(),
        }
    }

    #[test]
    fn builds_plain_text_message() {
        let message = build_message(&payload()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: portfolio@example.com"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let mut mail = payload();
        mail.to = "not an address".into();

        assert!(matches!(build_message(&mail), Err(MailError::InvalidAddress(_))));
    }

    #[actix_rt::test]
    async fn unreachable_server_fails_without_panicking() {
        let settings = MailSettings {
            smtp_host: "127.0.0.1".into(),
            smtp_port: 1,
            smtp_username: String::new(),
            smtp_password: String::new(),
            starttls: false,
            sender: "portfolio@example.com".into(),
            recipient: "owner@example.com".into(),
            timeout: Duration::from_secs(2),
        };

        let result = match SmtpMailer::new(&settings) {
            Ok(mailer) => mailer.send(&payload()).await,
            Err(e) => Err(e),
        };
        assert!(result.is_err());
    }
}
