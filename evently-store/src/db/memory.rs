//! In-memory store
//!
//! Same contract as `PgStore`, including the slug unique constraint.
//! Records are kept in insertion order. Used by tests and by callers that
//! want the entity rules without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingStore, EventStore};
use crate::error::{DataError, Result};
use crate::models::{Booking, BookingChanges, BookingDraft, Event, EventChanges, EventDraft};

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    bookings: Vec<Booking>,
}

/// Cloneable handle; clones share the same tables.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Arc::default(),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while unavailable every call fails with a
    /// database error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn event_count(&self) -> usize {
        self.tables.read().await.events.len()
    }

    pub async fn booking_count(&self) -> usize {
        self.tables.read().await.bookings.len()
    }

    /// Remove an event without touching bookings that point at it.
    pub async fn remove_event(&self, id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        tables.events.len() != before
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}

fn slug_taken(events: &[Event], slug: &str, except: Option<Uuid>) -> bool {
    events
        .iter()
        .any(|e| e.slug == slug && Some(e.id) != except)
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, draft: EventDraft) -> Result<Event> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if slug_taken(&tables.events, &draft.slug, None) {
            return Err(DataError::Duplicate {
                field: "slug",
                value: draft.slug,
            });
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            description: draft.description,
            overview: draft.overview,
            image: draft.image,
            venue: draft.venue,
            location: draft.location,
            date: draft.date,
            time: draft.time,
            mode: draft.mode,
            audience: draft.audience,
            agenda: draft.agenda,
            organizer: draft.organizer,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if let Some(slug) = &changes.slug {
            if slug_taken(&tables.events, slug, Some(id)) {
                return Err(DataError::Duplicate {
                    field: "slug",
                    value: slug.clone(),
                });
            }
        }

        let Some(event) = tables.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        changes.apply_to(event);
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool> {
        self.check_available()?;
        Ok(self.tables.read().await.events.iter().any(|e| e.id == id))
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.events.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking> {
        self.check_available()?;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            event_id: draft.event_id,
            email: draft.email,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Option<Booking>> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let Some(booking) = tables.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        changes.apply_to(booking);
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_bookings_for_email(&self, email: &str) -> Result<Vec<Booking>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.email == email)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEvent;

    fn draft(title: &str) -> EventDraft {
        NewEvent {
            title: Some(title.into()),
            description: Some("d".into()),
            overview: Some("o".into()),
            image: Some("i".into()),
            venue: Some("v".into()),
            location: Some("l".into()),
            date: Some("2025-01-01".into()),
            time: Some("10:00".into()),
            mode: Some("online".into()),
            audience: Some("a".into()),
            agenda: Some(vec!["x".into()]),
            organizer: Some("o".into()),
            tags: Some(vec!["t".into()]),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn clones_share_tables() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.insert_event(draft("Shared")).await.unwrap();
        assert_eq!(other.event_count().await, 1);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        store.insert_event(draft("First")).await.unwrap();
        store.insert_event(draft("Second")).await.unwrap();

        let titles: Vec<_> = store
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn update_to_taken_slug_is_rejected() {
        let store = MemoryStore::new();
        store.insert_event(draft("Taken")).await.unwrap();
        let other = store.insert_event(draft("Other")).await.unwrap();

        let changes = EventChanges {
            slug: Some("taken".into()),
            ..Default::default()
        };
        let err = store.update_event(other.id, changes).await.unwrap_err();
        assert!(matches!(err, DataError::Duplicate { field: "slug", .. }));
    }

    #[tokio::test]
    async fn unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(
            store.event_exists(Uuid::new_v4()).await,
            Err(DataError::Database(_))
        ));
        store.set_available(true);
        assert!(!store.event_exists(Uuid::new_v4()).await.unwrap());
    }
}
