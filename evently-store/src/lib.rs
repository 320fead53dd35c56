//! evently-store: data-access layer for evently
//!
//! Defines the two persisted entities, Event and Booking, enforces their
//! validation and normalization rules, checks the Booking -> Event
//! reference, and owns the one database connection a process shares.
//!
//! ```ignore
//! use evently_store::{get_connection, BookingRepo, EventRepo, PgStore};
//!
//! let store = PgStore::new(get_connection().await?);
//! let event = EventRepo::new(store.clone()).create(input).await?;
//! let booking = BookingRepo::new(store).create(booking_input).await?;
//! ```

pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod models;
pub mod repos;

pub use config::DbConfig;
pub use connection::{get_connection, ConnectError, ConnectionManager, ConnectionState};
pub use db::{BookingStore, EventStore, MemoryStore, PgStore};
pub use error::{DataError, ErrorKind, Result};
pub use repos::{BookingRepo, EventRepo};
