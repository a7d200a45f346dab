// Declare modules
pub mod event;
pub mod habit;
pub mod profile;

// Re-export so callers can `use crate::models::Habit`.
pub use event::{CalendarEvent, EventDetails, EventStatus};
pub use habit::{CompletionEntry, Habit};
pub use profile::{PasswordChange, Profile};
