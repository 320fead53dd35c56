//! Database layer - connection pool, schema, and storage backends
//!
//! # Design Principles
//!
//! - One pool per process, obtained through `connection::get_connection`
//! - Validation happens before a store is called; stores only persist
//! - Rely on DB constraints for slug uniqueness - no check-then-insert
//! - Absent patch fields are never written

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, BookingChanges, BookingDraft, Event, EventChanges, EventDraft};

pub use memory::MemoryStore;
pub use pool::create_pool;
pub use postgres::PgStore;

/// Persistence for events (the `events` collection)
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a validated event. A taken slug is `DataError::Duplicate`.
    async fn insert_event(&self, draft: EventDraft) -> Result<Event>;

    /// Overwrite the given columns. `None` when no event has this id.
    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>>;

    async fn event_exists(&self, id: Uuid) -> Result<bool>;

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// All events, newest first.
    async fn list_events(&self) -> Result<Vec<Event>>;
}

/// Persistence for bookings (the `bookings` collection)
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking>;

    /// Overwrite the given columns. `None` when no booking has this id.
    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Option<Booking>>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>>;

    /// Bookings for one event, oldest first.
    async fn list_bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>>;

    /// Bookings made with one (normalized) email, oldest first.
    async fn list_bookings_for_email(&self, email: &str) -> Result<Vec<Booking>>;
}
