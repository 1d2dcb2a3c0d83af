pub mod mailer;
pub mod smtp;

pub use mailer::{mailer_from_settings, DisabledMailer, MailError, MailPayload, Mailer};
pub use smtp::SmtpMailer;
