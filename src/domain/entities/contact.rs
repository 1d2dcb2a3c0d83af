use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    constants::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH},
    entities::validators::{email_address, merge_rejected, not_blank, present, read_text, trimmed},
    errors::{AppError, FieldError},
};

// ───── Input & Validation ───────────────────────────────────────────

/// Body as sent. Each field keeps its raw JSON so a wrong type becomes a
/// field error instead of a rejected body.
#[derive(Debug, Default, Deserialize)]
struct ContactPayload {
    #[serde(default, deserialize_with = "present")]
    name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    message: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(from = "ContactPayload")]
pub struct NewContactForm {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "email_address"),
        length(max = MAX_EMAIL_LENGTH, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub message: Option<String>,

    /// Fields whose JSON value could not be read as text.
    pub rejected: Vec<FieldError>,
}

impl From<ContactPayload> for NewContactForm {
    fn from(payload: ContactPayload) -> Self {
        let mut rejected = Vec::new();
        let name = read_text("name", payload.name, &mut rejected);
        let email = read_text("email", payload.email, &mut rejected);
        let message = read_text("message", payload.message, &mut rejected);

        NewContactForm { name, email, message, rejected }
    }
}

impl NewContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
            rejected: Vec::new(),
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            email: trimmed(self.email),
            message: trimmed(self.message),
            rejected: self.rejected,
        }
    }

    /// Runs the field rules and reports them together with any field
    /// rejected while reading the body.
    pub fn check(&self) -> Result<(), AppError> {
        merge_rejected(self.validate(), &self.rejected)
    }

    /// Call only after `check()` succeeded.
    pub fn prepare_for_insert(self) -> ContactInsert {
        ContactInsert {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInsert {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn notification_subject(&self) -> String {
        format!("New contact from portfolio: {}", self.name)
    }

    pub fn notification_body(&self) -> String {
        format!("{} | Contact email: {}", self.message, self.email)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub message: String,
}
