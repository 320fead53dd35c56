//! Validation error types

use std::fmt;

/// Validation error for entity input.
///
/// Every variant names exactly one offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing, or empty after trimming
    Empty { field: &'static str },

    /// String doesn't match required format (date, time, email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value is not one of the allowed variants
    InvalidVariant { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim a required string field, rejecting missing or blank values.
pub(crate) fn required_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::Empty { field })?;
    non_empty_text(field, &value)
}

/// Trim a string field that is present, rejecting blank values.
pub(crate) fn non_empty_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

/// Reject an empty list. Items are kept as given.
pub(crate) fn non_empty_list(
    field: &'static str,
    value: Vec<String>,
) -> Result<Vec<String>, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidFormat {
            field: "time",
            reason: "must be in HH:MM format",
        };
        assert_eq!(err.to_string(), "time: must be in HH:MM format");

        let err = ValidationError::InvalidVariant {
            field: "mode",
            value: "remote".into(),
        };
        assert_eq!(err.to_string(), "invalid mode value: 'remote'");
    }

    #[test]
    fn field_is_reported() {
        assert_eq!(ValidationError::Empty { field: "venue" }.field(), "venue");
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(
            required_text("title", Some("  Rust Meetup ".into())).unwrap(),
            "Rust Meetup"
        );
    }

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert_eq!(
            required_text("title", None).unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
        assert_eq!(
            required_text("title", Some("   ".into())).unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
    }

    #[test]
    fn empty_list_rejected() {
        assert!(non_empty_list("tags", vec![]).is_err());
        assert_eq!(non_empty_list("tags", vec!["rust".into()]).unwrap().len(), 1);
    }
}
