use std::borrow::Cow;
use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::{Host, Url};
use validator::{ValidationError, ValidationErrors};

use crate::errors::{AppError, FieldError};

pub const NULL_MESSAGE: &str = "This field may not be null.";
pub const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const INVALID_URL_MESSAGE: &str = "Enter a valid URL.";

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

// Dot-atom, or a quoted string with escapes.
static EMAIL_USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*$",
        r#"|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*"$"#,
    ))
    .expect("email user pattern is valid")
});

// At least one label followed by a TLD of two or more characters.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}$")
        .expect("domain pattern is valid")
});

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Keeps an explicit JSON `null` apart from a missing key. Use together
/// with `#[serde(default)]`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reads a wire value as text: strings as sent, numbers in decimal form.
/// `null` and any other JSON type are recorded in `rejected` for `field`.
pub fn read_text(field: &str, value: Option<Value>, rejected: &mut Vec<FieldError>) -> Option<String> {
    let message = match value {
        None => return None,
        Some(Value::String(text)) => return Some(text),
        Some(Value::Number(number)) => return Some(number.to_string()),
        Some(Value::Null) => NULL_MESSAGE,
        Some(_) => NOT_A_STRING_MESSAGE,
    };

    rejected.push(FieldError {
        field: field.to_string(),
        message: message.to_string(),
    });
    None
}

/// Combines rule failures with fields rejected while reading the body. A
/// rejected field reports only its rejection.
pub fn merge_rejected(
    result: Result<(), ValidationErrors>,
    rejected: &[FieldError],
) -> Result<(), AppError> {
    let mut errors = match result.map_err(AppError::from) {
        Ok(()) => Vec::new(),
        Err(AppError::ValidationError(errors)) => errors,
        Err(other) => return Err(other),
    };

    errors.retain(|e| !rejected.iter().any(|r| r.field == e.field));
    errors.extend(rejected.iter().cloned());
    errors.sort_by(|a, b| a.field.cmp(&b.field));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

/// Strips surrounding whitespace from an optional text input.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", BLANK_MESSAGE));
    }
    Ok(())
}

/// Email grammar check: dot-atom local part and a dotted domain with a TLD
/// (or a bracketed IP literal). Internationalized domains are checked in
/// their punycode form.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    let invalid = || error("email", INVALID_EMAIL_MESSAGE);

    if value.trim().is_empty() {
        return Err(error("blank", BLANK_MESSAGE));
    }

    let (user, domain) = value.rsplit_once('@').ok_or_else(invalid)?;

    if !EMAIL_USER_RE.is_match(user) {
        return Err(invalid());
    }

    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        let literal = literal.strip_prefix("IPv6:").unwrap_or(literal);
        return literal.parse::<IpAddr>().map(|_| ()).map_err(|_| invalid());
    }

    if domain == "localhost" || is_dotted_domain(domain) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Absolute URL with a web/ftp scheme whose host is `localhost`, an IP
/// address, or a dotted domain with a TLD.
pub fn web_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || error("url", INVALID_URL_MESSAGE);

    if value.trim().is_empty() {
        return Err(error("blank", BLANK_MESSAGE));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let url = Url::parse(value).map_err(|_| invalid())?;

    if !URL_SCHEMES.contains(&url.scheme()) {
        return Err(invalid());
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(domain)) if domain == "localhost" || is_dotted_domain(domain) => Ok(()),
        _ => Err(invalid()),
    }
}

fn is_dotted_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    let ascii = match Host::parse(domain) {
        Ok(Host::Domain(ascii)) => ascii,
        _ => return false,
    };

    DOMAIN_RE.is_match(&ascii) && !ascii.ends_with('-') && !ascii.contains("-.")
}
