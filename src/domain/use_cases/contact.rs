use std::sync::Arc;

use crate::{
    constants::CONTACT_SUCCESS_MESSAGE,
    entities::contact::{Contact, ContactCreatedResponse, NewContactForm},
    errors::AppError,
    mail::mailer::{MailError, MailPayload, Mailer},
    repositories::contact::ContactRepository,
    settings::MailSettings,
};

pub struct ContactHandler<R, M>
where
    R: ContactRepository + ?Sized,
    M: Mailer + ?Sized,
{
    pub contact_repo: Arc<R>,
    pub mailer: Arc<M>,
    pub sender: String,
    pub recipient: String,
}

impl<R, M> ContactHandler<R, M>
where
    R: ContactRepository + ?Sized,
    M: Mailer + ?Sized,
{
    pub fn new(contact_repo: Arc<R>, mailer: Arc<M>, settings: &MailSettings) -> Self {
        ContactHandler {
            contact_repo,
            mailer,
            sender: settings.sender.clone(),
            recipient: settings.recipient.clone(),
        }
    }

    /// Stores the submission, then tries to notify the site owner.
    /// A failed notification never fails the submission.
    pub async fn create_contact_message(
        &self,
        form: NewContactForm,
    ) -> Result<ContactCreatedResponse, AppError> {
        let form = form.normalized();
        form.check()?;

        let contact = self.contact_repo.create_contact(&form.prepare_for_insert()).await?;
        tracing::info!(contact_id = contact.id, "Contact message stored");

        self.notify_owner(&contact).await;

        Ok(ContactCreatedResponse {
            message: CONTACT_SUCCESS_MESSAGE.to_string(),
        })
    }

    async fn notify_owner(&self, contact: &Contact) {
        if self.recipient.is_empty() {
            tracing::debug!(contact_id = contact.id, "No notification recipient configured");
            return;
        }

        let mail = MailPayload {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: contact.notification_subject(),
            body: contact.notification_body(),
        };

        match self.mailer.send(&mail).await {
            Ok(()) => tracing::info!(contact_id = contact.id, "Contact notification sent"),
            Err(MailError::NotConfigured) => {
                tracing::debug!(contact_id = contact.id, "Mail transport disabled, notification skipped")
            }
            Err(e) => tracing::warn!(
                contact_id = contact.id,
                error = %e,
                "Contact notification failed"
            ),
        }
    }
}
