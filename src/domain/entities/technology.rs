use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    constants::MAX_NAME_LENGTH,
    entities::validators::{not_blank, trimmed},
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Technology {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnologyInsert {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewTechnologyRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,
}

impl NewTechnologyRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }

    pub fn normalized(self) -> Self {
        Self { name: trimmed(self.name) }
    }

    /// Call only after `validate()` succeeded.
    pub fn prepare_for_insert(self) -> TechnologyInsert {
        TechnologyInsert {
            name: self.name.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}
