// Calendar module
// Turns fetched habits into calendar events and lays them out for display

use chrono::{Local, NaiveDateTime};

pub mod derive;
pub mod grid;
pub mod view;

pub use derive::{classify, derive_event, derive_events};
pub use grid::{events_on, time_label, CalendarGrid, GridView};
pub use view::{
    fetch_error_message, CalendarView, FetchResult, FetchTicket, ViewState, GENERIC_FETCH_ERROR,
    LOGIN_PROMPT,
};

/// Local wall-clock time, the `now` every derivation in the app uses.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
