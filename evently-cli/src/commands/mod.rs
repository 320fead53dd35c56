//! Command implementations for the evently CLI

pub mod booking;
pub mod event;

use anyhow::{Context, Result};
use evently_store::{get_connection, PgStore};
use serde::Serialize;

pub use booking::run_booking;
pub use event::run_event;

/// Store over the process-wide pool.
pub(crate) async fn store() -> Result<PgStore> {
    let pool = get_connection()
        .await
        .context("Could not connect to the database")?;
    Ok(PgStore::new(pool))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
