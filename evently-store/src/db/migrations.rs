//! Schema for the events and bookings tables

use sqlx::PgPool;

use crate::error::Result;

/// Run all migrations. Safe to call on every startup.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running evently migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL,
            overview TEXT NOT NULL,
            image TEXT NOT NULL,
            venue TEXT NOT NULL,
            location TEXT NOT NULL,
            "date" TEXT NOT NULL,
            "time" TEXT NOT NULL,
            mode TEXT NOT NULL CHECK (mode IN ('online', 'offline', 'hybrid')),
            audience TEXT NOT NULL,
            agenda TEXT[] NOT NULL,
            organizer TEXT NOT NULL,
            tags TEXT[] NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT events_slug_key UNIQUE (slug)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // No foreign key on event_id; the reference is only checked on write.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL,
            email TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS bookings_event_id_idx ON bookings (event_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS bookings_email_idx ON bookings (email)")
        .execute(pool)
        .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
