//! UI state management module
//!
//! Holds presentation-only state (current route, form inputs, status line)
//! apart from the calendar and auth state machines.

use crate::navigation::Route;

/// Application UI state
///
/// Fields are public; the shell mutates them directly from `update`.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Current active view
    pub current_route: Route,

    /// Login form: pasted bearer token
    pub token_input: String,
    pub login_error: Option<String>,

    /// Profile form inputs
    pub name_input: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,

    /// Profile view status line
    pub profile_status: Option<String>,

    /// Whether a profile request is in progress
    pub profile_loading: bool,

    /// Event whose details panel is open
    pub selected_event: Option<String>,

    /// Timestamp of last successful habit fetch
    pub last_fetch_time: Option<chrono::NaiveDateTime>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    /// Create new UI state with default values
    pub fn new() -> Self {
        Self {
            current_route: Route::Calendar,
            token_input: String::new(),
            login_error: None,
            name_input: String::new(),
            current_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            profile_status: None,
            profile_loading: false,
            selected_event: None,
            last_fetch_time: None,
        }
    }

    pub fn clear_password_form(&mut self) {
        self.current_password.clear();
        self.new_password.clear();
        self.confirm_password.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = UiState::new();
        assert_eq!(state.current_route, Route::Calendar);
        assert!(state.token_input.is_empty());
        assert!(!state.profile_loading);
    }

    #[test]
    fn test_clear_password_form() {
        let mut state = UiState::new();
        state.current_password = "a".into();
        state.new_password = "b".into();
        state.confirm_password = "b".into();
        state.name_input = "Sam".into();

        state.clear_password_form();
        assert!(state.current_password.is_empty());
        assert!(state.new_password.is_empty());
        assert!(state.confirm_password.is_empty());
        assert_eq!(state.name_input, "Sam");
    }
}
