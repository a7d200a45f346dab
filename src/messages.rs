use crate::auth::AuthStatus;
use crate::calendar::{FetchResult, GridView};
use crate::models::Profile;
use crate::navigation::Route;
use chrono::NaiveDate;

/// Unified application message type
///
/// Messages are organized by domain for better maintainability.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Navigation Messages =====
    /// Switch view, from a button or from the API client's navigator
    Navigate(Route),

    // ===== Auth Messages =====
    /// Stored credential has been read on startup
    AuthResolved(AuthStatus),
    /// Update the pasted token input field
    TokenChanged(String),
    /// Store the pasted token
    SubmitLogin,
    /// Drop the stored token
    Logout,

    // ===== Calendar Messages =====
    /// Re-fetch habits
    RefreshCalendar,
    /// Habit fetch finished; carries the fetch generation
    HabitsLoaded(u64, FetchResult),
    /// Switch between month, week and day grids
    GridViewSelected(GridView),
    GridPrevious,
    GridNext,
    GridToday,
    /// Open a day from the month or week grid
    DaySelected(NaiveDate),
    /// Show details for an event
    EventClicked(String),
    /// Close the event details panel
    CloseEventDetails,
    /// Periodic clock tick
    Tick,

    // ===== Profile Messages =====
    ProfileLoaded(Result<Profile, String>),
    NameChanged(String),
    SaveProfile,
    ProfileSaved(Result<Profile, String>),
    CurrentPasswordChanged(String),
    NewPasswordChanged(String),
    ConfirmPasswordChanged(String),
    SubmitPasswordChange,
    PasswordChanged(Result<(), String>),
}
