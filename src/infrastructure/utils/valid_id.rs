use crate::errors::AppError;

/// Parses a path id. Anything that is not a plain positive integer is
/// treated as an unknown resource.
pub fn valid_id(id: &str, resource: &str) -> Result<i64, AppError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(resource.to_string()));
    }

    id.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(resource.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_integers() {
        assert_eq!(valid_id("42", "Project").unwrap(), 42);
    }

    #[test]
    fn rejects_anything_else_as_not_found() {
        for id in ["", "abc", "-1", "0", "+3", "1.5", " 7", "99999999999999999999"] {
            assert!(
                matches!(valid_id(id, "Project"), Err(AppError::NotFound(ref r)) if r == "Project"),
                "{id:?} should be not found"
            );
        }
    }
}
