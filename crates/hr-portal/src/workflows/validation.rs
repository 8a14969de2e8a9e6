//! Form-level validation run before any store call.

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            reason: "is required".to_string(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Returns the trimmed value, rejecting blanks.
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn require_email(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let email = require(field, value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::invalid(field, "must be an email address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("title", "  Engineer ").expect("valid"), "Engineer");
        assert_eq!(require("title", "   "), Err(ValidationError::required("title")));
    }

    #[test]
    fn require_email_checks_shape() {
        assert!(require_email("email", "ana@example.test").is_ok());
        assert!(require_email("email", "ana@").is_err());
        assert!(require_email("email", "ana.example.test").is_err());
    }
}
