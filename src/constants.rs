use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const MAX_NAME_LENGTH: u64 = 255;
pub const MAX_EMAIL_LENGTH: u64 = 254;
pub const MAX_URL_LENGTH: u64 = 200;
pub const MAX_IMAGE_PATH_LENGTH: u64 = 100;

pub const CONTACT_SUCCESS_MESSAGE: &str = "success";
