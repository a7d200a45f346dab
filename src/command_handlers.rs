//! Command handlers module
//!
//! Async operations the UI shell dispatches through `Command::perform`.
//! Kept out of main.rs so they can be exercised without a window.

use crate::api::ApiClient;
use crate::calendar::derive_events;
use crate::error::{AppError, AppResult};
use crate::models::{CalendarEvent, PasswordChange, Profile};
use chrono::NaiveDateTime;
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// API operation handlers
#[derive(Clone)]
pub struct ApiHandlers {
    client: Arc<ApiClient>,
}

impl ApiHandlers {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch habits and derive calendar events against `now`.
    ///
    /// Resolves to `AppError::Cancelled` if `cancel` fires first; the
    /// in-flight request is dropped.
    pub async fn load_calendar_events(
        &self,
        now: NaiveDateTime,
        cancel: CancellationToken,
    ) -> AppResult<Vec<CalendarEvent>> {
        let habits = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Habit fetch cancelled");
                return Err(AppError::Cancelled);
            }
            result = self.client.get_habits() => result?,
        };

        let events = derive_events(&habits, now);
        info!("Derived {} calendar events", events.len());
        Ok(events)
    }

    pub async fn load_profile(&self) -> AppResult<Profile> {
        info!("Loading profile");
        Ok(self.client.get_profile().await?)
    }

    pub async fn update_profile(&self, changes: &[(&str, &str)]) -> AppResult<Profile> {
        if changes.is_empty() {
            return Err(AppError::invalid_input("Nothing to update"));
        }
        info!("Updating {} profile field(s)", changes.len());
        Ok(self.client.update_profile(&Profile::update_body(changes)).await?)
    }

    pub async fn change_password(
        &self,
        change: PasswordChange,
        confirmation: &str,
    ) -> AppResult<()> {
        change.validate(confirmation)?;
        self.client.change_password(&change).await?;
        info!("Password changed");
        Ok(())
    }
}
