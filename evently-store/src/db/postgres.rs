//! PostgreSQL store
//!
//! - insert: single INSERT ... RETURNING, slug conflicts come back from
//!   the `events_slug_key` constraint
//! - update: COALESCE per column so absent fields keep their value

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{BookingStore, EventStore};
use crate::error::{DataError, Result};
use crate::models::{
    Booking, BookingChanges, BookingDraft, Event, EventChanges, EventDraft, EventMode,
};

/// Name of the unique constraint on `events.slug`
pub const SLUG_CONSTRAINT: &str = "events_slug_key";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn event_from_row(row: &PgRow) -> Result<Event> {
    let mode: String = row.try_get("mode")?;
    let mode = mode
        .parse::<EventMode>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Event {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        overview: row.try_get("overview")?,
        image: row.try_get("image")?,
        venue: row.try_get("venue")?,
        location: row.try_get("location")?,
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        mode,
        audience: row.try_get("audience")?,
        agenda: row.try_get("agenda")?,
        organizer: row.try_get("organizer")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking> {
    Ok(Booking {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Turn a slug unique violation into `Duplicate`; anything else stays a
/// database error.
fn slug_conflict(err: sqlx::Error, slug: Option<&str>) -> DataError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() && db.constraint() == Some(SLUG_CONSTRAINT) {
            return DataError::Duplicate {
                field: "slug",
                value: slug.unwrap_or_default().to_owned(),
            };
        }
    }
    DataError::Database(err)
}

#[async_trait]
impl EventStore for PgStore {
    async fn insert_event(&self, draft: EventDraft) -> Result<Event> {
        let row = sqlx::query(
            r#"
            INSERT INTO events (
                title, slug, description, overview, image, venue, location,
                "date", "time", mode, audience, agenda, organizer, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, title, slug, description, overview, image, venue, location,
                      "date", "time", mode, audience, agenda, organizer, tags,
                      created_at, updated_at
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(&draft.overview)
        .bind(&draft.image)
        .bind(&draft.venue)
        .bind(&draft.location)
        .bind(&draft.date)
        .bind(&draft.time)
        .bind(draft.mode.as_str())
        .bind(&draft.audience)
        .bind(&draft.agenda)
        .bind(&draft.organizer)
        .bind(&draft.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, Some(&draft.slug)))?;

        event_from_row(&row)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                overview = COALESCE($5, overview),
                image = COALESCE($6, image),
                venue = COALESCE($7, venue),
                location = COALESCE($8, location),
                "date" = COALESCE($9, "date"),
                "time" = COALESCE($10, "time"),
                mode = COALESCE($11, mode),
                audience = COALESCE($12, audience),
                agenda = COALESCE($13, agenda),
                organizer = COALESCE($14, organizer),
                tags = COALESCE($15, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, slug, description, overview, image, venue, location,
                      "date", "time", mode, audience, agenda, organizer, tags,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.description)
        .bind(&changes.overview)
        .bind(&changes.image)
        .bind(&changes.venue)
        .bind(&changes.location)
        .bind(&changes.date)
        .bind(&changes.time)
        .bind(changes.mode.map(|m| m.as_str()))
        .bind(&changes.audience)
        .bind(&changes.agenda)
        .bind(&changes.organizer)
        .bind(&changes.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, changes.slug.as_deref()))?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, slug, description, overview, image, venue, location,
                   "date", "time", mode, audience, agenda, organizer, tags,
                   created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, slug, description, overview, image, venue, location,
                   "date", "time", mode, audience, agenda, organizer, tags,
                   created_at, updated_at
            FROM events
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, slug, description, overview, image, venue, location,
                   "date", "time", mode, audience, agenda, organizer, tags,
                   created_at, updated_at
            FROM events
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(event_from_row).collect()
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking> {
        let row = sqlx::query(
            r#"
            INSERT INTO bookings (event_id, email)
            VALUES ($1, $2)
            RETURNING id, event_id, email, created_at, updated_at
            "#,
        )
        .bind(draft.event_id)
        .bind(&draft.email)
        .fetch_one(&self.pool)
        .await?;

        booking_from_row(&row)
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            UPDATE bookings SET
                event_id = COALESCE($2, event_id),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, event_id, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.event_id)
        .bind(&changes.email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query(
            "SELECT id, event_id, email, created_at, updated_at FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn list_bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE event_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn list_bookings_for_email(&self, email: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE email = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::db::{create_pool, migrations};
    use crate::models::NewEvent;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p evently-store -- --ignored

    async fn store() -> PgStore {
        let config = DbConfig::from_env().expect("DATABASE_URL required");
        let pool = create_pool(&config).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgStore::new(pool)
    }

    fn draft(title: &str) -> EventDraft {
        NewEvent {
            title: Some(title.into()),
            description: Some("description".into()),
            overview: Some("overview".into()),
            image: Some("/img.png".into()),
            venue: Some("Hall A".into()),
            location: Some("Berlin".into()),
            date: Some("2025-06-01".into()),
            time: Some("18:00".into()),
            mode: Some("offline".into()),
            audience: Some("everyone".into()),
            agenda: Some(vec!["talks".into()]),
            organizer: Some("evently".into()),
            tags: Some(vec!["meetup".into()]),
        }
        .validate()
        .expect("valid draft")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_and_read_back() {
        let store = store().await;
        let title = format!("Pg Roundtrip {}", Uuid::new_v4());

        let event = store.insert_event(draft(&title)).await.unwrap();
        assert!(store.event_exists(event.id).await.unwrap());

        let by_slug = store.find_event_by_slug(&event.slug).await.unwrap();
        assert_eq!(by_slug.map(|e| e.id), Some(event.id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_slug_is_reported() {
        let store = store().await;
        let title = format!("Pg Duplicate {}", Uuid::new_v4());

        store.insert_event(draft(&title)).await.unwrap();
        let err = store
            .insert_event(draft(&format!("{}!", title)))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Duplicate { field: "slug", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_unknown_id_returns_none() {
        let store = store().await;
        let result = store
            .update_event(Uuid::new_v4(), EventChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
