//! Booking records and email validation

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::required_text;
use super::ValidationError;

/// local-part `@` domain, with at least one dot in the domain
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Persisted booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    /// Event this booking points at. Checked when written, not on read.
    pub event_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw input for creating a booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub event_id: Option<Uuid>,
    pub email: Option<String>,
}

/// Validated booking ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub event_id: Uuid,
    pub email: String,
}

impl NewBooking {
    pub fn validate(self) -> Result<BookingDraft, ValidationError> {
        let event_id = self.event_id.ok_or(ValidationError::Empty { field: "eventId" })?;
        let email = normalize_email(&required_text("email", self.email)?)?;
        Ok(BookingDraft { event_id, email })
    }
}

/// Partial update for a booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    pub event_id: Option<Uuid>,
    pub email: Option<String>,
}

/// Validated subset of booking columns to overwrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub event_id: Option<Uuid>,
    pub email: Option<String>,
}

impl BookingChanges {
    pub fn is_empty(&self) -> bool {
        self.event_id.is_none() && self.email.is_none()
    }

    pub fn apply_to(self, booking: &mut Booking) {
        if let Some(event_id) = self.event_id {
            booking.event_id = event_id;
        }
        if let Some(email) = self.email {
            booking.email = email;
        }
    }
}

impl BookingPatch {
    pub fn validate(self) -> Result<BookingChanges, ValidationError> {
        let email = self
            .email
            .map(|e| normalize_email(&e))
            .transpose()?;
        Ok(BookingChanges {
            event_id: self.event_id,
            email,
        })
    }
}

/// Trim and lowercase an email address, then check its shape.
///
/// # Example
/// ```
/// use evently_store::models::normalize_email;
///
/// assert_eq!(normalize_email("  USER@Example.COM ").unwrap(), "user@example.com");
/// assert!(normalize_email("user@localhost").is_err());
/// ```
pub fn normalize_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "invalid email format",
        });
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  USER@Example.COM ").unwrap(),
            "user@example.com"
        );
    }

    #[test]
    fn malformed_emails_rejected() {
        for bad in ["user", "user@", "@example.com", "user@example", "us er@example.com", "a@b@c.d"] {
            assert!(
                matches!(
                    normalize_email(bad).unwrap_err(),
                    ValidationError::InvalidFormat { field: "email", .. }
                ),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn missing_fields_are_named() {
        let err = NewBooking {
            event_id: None,
            email: Some("a@b.co".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "eventId");

        let err = NewBooking {
            event_id: Some(Uuid::new_v4()),
            email: Some("  ".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "email" });
    }

    #[test]
    fn patch_without_email_keeps_none() {
        let id = Uuid::new_v4();
        let changes = BookingPatch {
            event_id: Some(id),
            email: None,
        }
        .validate()
        .unwrap();
        assert_eq!(changes.event_id, Some(id));
        assert!(changes.email.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let booking = Booking {
            id: Uuid::nil(),
            event_id: Uuid::nil(),
            email: "ada@example.org".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert!(json.get("eventId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("event_id").is_none());
    }

    #[test]
    fn new_booking_accepts_camel_case_input() {
        let input: NewBooking =
            serde_json::from_str(r#"{"eventId": "00000000-0000-0000-0000-000000000000", "email": "a@b.io"}"#)
                .unwrap();
        assert_eq!(input.event_id, Some(Uuid::nil()));
    }
}
