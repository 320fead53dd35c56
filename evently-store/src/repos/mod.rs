//! Entity operations
//!
//! Each repository validates and normalizes input, then hands the result
//! to a store. Validation runs inside `create`/`update` themselves, so the
//! rules hold for every backend.

pub mod bookings;
pub mod events;

pub use bookings::BookingRepo;
pub use events::EventRepo;
