//! Booking repository
//!
//! A booking's event reference is checked when the booking is created and
//! whenever `event_id` is reassigned. It is not re-checked on read, so a
//! booking can outlive its event.

use uuid::Uuid;

use super::EventRepo;
use crate::db::{BookingStore, EventStore};
use crate::error::{DataError, Result};
use crate::models::{normalize_email, Booking, BookingPatch, NewBooking};

/// Booking operations; depends on [`EventRepo::exists`] for references.
#[derive(Debug, Clone)]
pub struct BookingRepo<S> {
    store: S,
    events: EventRepo<S>,
}

impl<S> BookingRepo<S>
where
    S: EventStore + BookingStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            events: EventRepo::new(store.clone()),
            store,
        }
    }

    /// Create a booking.
    ///
    /// # Errors
    /// - `Validation` for a missing event id or malformed email
    /// - `Reference` when the event does not exist
    /// - `Dependency` when the existence check itself failed
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, input: NewBooking) -> Result<Booking> {
        let draft = input.validate()?;
        self.check_event(draft.event_id).await?;

        let booking = self.store.insert_booking(draft).await?;
        tracing::debug!(id = %booking.id, event_id = %booking.event_id, "booking created");
        Ok(booking)
    }

    /// Apply a partial update.
    ///
    /// The event reference is re-checked only when `patch.event_id` is set.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: BookingPatch) -> Result<Booking> {
        let changes = patch.validate()?;
        if let Some(event_id) = changes.event_id {
            self.check_event(event_id).await?;
        }

        let updated = if changes.is_empty() {
            self.store.get_booking(id).await?
        } else {
            self.store.update_booking(id, changes).await?
        };

        updated.ok_or_else(|| DataError::not_found("booking", id))
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking> {
        self.store
            .get_booking(id)
            .await?
            .ok_or_else(|| DataError::not_found("booking", id))
    }

    /// Bookings for an event, oldest first. The event itself is not looked up.
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>> {
        self.store.list_bookings_for_event(event_id).await
    }

    /// Bookings made with an email address, matched after normalization.
    pub async fn list_for_email(&self, email: &str) -> Result<Vec<Booking>> {
        let email = normalize_email(email)?;
        self.store.list_bookings_for_email(&email).await
    }

    async fn check_event(&self, event_id: Uuid) -> Result<()> {
        match self.events.exists(event_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DataError::Reference {
                resource: "event",
                id: event_id.to_string(),
            }),
            Err(e) => {
                tracing::warn!(%event_id, "event reference check failed: {}", e);
                Err(DataError::dependency("event reference", e))
            }
        }
    }
}
