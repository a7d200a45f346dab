// HabitCal Library
// Exposes the API client, calendar derivation and view state for testing and reuse

pub mod api;
pub mod auth;
pub mod calendar;
pub mod command_handlers;
pub mod config;
pub mod error;
pub mod http_config;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod session;
pub mod ui;
pub mod ui_state;
pub mod utils;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AuthContext, AuthStatus};
pub use calendar::{derive_events, CalendarView, ViewState};
pub use config::ClientConfig;
pub use error::{ApiError, AppError, AppResult};
pub use models::*;
pub use navigation::{Navigator, Route};
pub use session::CredentialStore;
