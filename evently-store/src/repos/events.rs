//! Event repository
//!
//! - create: validate every field, derive slug, insert
//! - update: validate only the fields in the patch
//! - exists: used by bookings to check their reference

use uuid::Uuid;

use crate::db::EventStore;
use crate::error::{DataError, Result};
use crate::models::{Event, EventPatch, NewEvent};

/// Event operations over any [`EventStore`]
#[derive(Debug, Clone)]
pub struct EventRepo<S> {
    store: S,
}

impl<S: EventStore> EventRepo<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an event.
    ///
    /// Fails with `Validation` on bad input and `Duplicate` when another
    /// event already has the derived slug.
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, input: NewEvent) -> Result<Event> {
        let draft = input.validate()?;
        let event = self.store.insert_event(draft).await?;
        tracing::debug!(id = %event.id, slug = %event.slug, "event created");
        Ok(event)
    }

    /// Apply a partial update.
    ///
    /// Only fields present in `patch` are validated and written; a new
    /// title re-derives the slug.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event> {
        let changes = patch.validate()?;

        let updated = if changes.is_empty() {
            self.store.get_event(id).await?
        } else {
            self.store.update_event(id, changes).await?
        };

        let event = updated.ok_or_else(|| DataError::not_found("event", id))?;
        tracing::debug!(slug = %event.slug, "event updated");
        Ok(event)
    }

    /// Whether an event with this id exists.
    ///
    /// An unknown id is `Ok(false)`; only store failures are errors.
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        self.store.event_exists(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| DataError::not_found("event", id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Event> {
        self.store
            .find_event_by_slug(slug)
            .await?
            .ok_or_else(|| DataError::not_found("event", slug))
    }

    /// All events, newest first.
    pub async fn list(&self) -> Result<Vec<Event>> {
        self.store.list_events().await
    }
}
