//! Entity models with validation before write
//!
//! Raw input (`NewEvent`, `EventPatch`, `NewBooking`, `BookingPatch`) is
//! validated into drafts and change sets. Invalid input returns
//! ValidationError, not panic, and nothing is written.

pub mod validation;
pub mod slug;
pub mod event;
pub mod booking;

pub use validation::ValidationError;
pub use slug::slugify;
pub use event::{
    normalize_date, validate_time, Event, EventChanges, EventDraft, EventMode, EventPatch,
    NewEvent,
};
pub use booking::{
    normalize_email, Booking, BookingChanges, BookingDraft, BookingPatch, NewBooking,
};
