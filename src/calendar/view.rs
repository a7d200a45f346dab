//! Calendar view state machine
//!
//! `AuthLoading -> {Unauthenticated | Loading -> {Error | Ready}}`
//!
//! The view hands out a [`FetchTicket`] whenever a fetch should start and
//! only accepts a result carrying the ticket it is currently waiting on.
//! Unmounting or starting a newer fetch cancels the outstanding ticket.

use crate::auth::AuthStatus;
use crate::error::AppError;
use crate::models::CalendarEvent;
use log::{debug, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch habits";
pub const LOGIN_PROMPT: &str = "Please login to view your calendar";

/// Outcome of one habit fetch. The error is shared so it can ride in
/// cloneable UI messages.
pub type FetchResult = Result<Vec<CalendarEvent>, Arc<AppError>>;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    AuthLoading,
    Unauthenticated,
    Loading,
    Error(String),
    Ready(Vec<CalendarEvent>),
}

impl ViewState {
    /// Spinner states
    pub fn is_busy(&self) -> bool {
        matches!(self, ViewState::AuthLoading | ViewState::Loading)
    }
}

/// Identifies one habit fetch.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct CalendarView {
    state: ViewState,
    auth: AuthStatus,
    generation: u64,
    in_flight: Option<FetchTicket>,
    mounted: bool,
}

impl Default for CalendarView {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarView {
    pub fn new() -> Self {
        Self {
            state: ViewState::AuthLoading,
            auth: AuthStatus::Loading,
            generation: 0,
            in_flight: None,
            mounted: true,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        match &self.state {
            ViewState::Ready(events) => events,
            _ => &[],
        }
    }

    /// Re-attaches the view. State restarts from the auth status it last saw,
    /// so an authenticated remount fetches again.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        self.mounted = true;
        let auth = self.auth;
        self.auth = AuthStatus::Loading;
        self.state = ViewState::AuthLoading;
        self.on_auth_changed(auth)
    }

    pub fn unmount(&mut self) {
        self.cancel_in_flight();
        self.mounted = false;
        debug!("Calendar view unmounted");
    }

    /// Feeds the auth collaborator's flags. Returns a ticket when a fetch
    /// must start; repeated identical statuses are ignored.
    pub fn on_auth_changed(&mut self, auth: AuthStatus) -> Option<FetchTicket> {
        if auth == self.auth || !self.mounted {
            self.auth = auth;
            return None;
        }
        self.auth = auth;

        match auth {
            AuthStatus::Loading => {
                self.cancel_in_flight();
                self.state = ViewState::AuthLoading;
                None
            }
            AuthStatus::Unauthenticated => {
                self.cancel_in_flight();
                self.state = ViewState::Unauthenticated;
                None
            }
            AuthStatus::Authenticated => Some(self.begin_fetch()),
        }
    }

    /// Explicit reload while authenticated and mounted. Ignored while a
    /// fetch is already in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        if !self.mounted || !self.auth.is_authenticated() || self.in_flight.is_some() {
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Applies a fetch outcome. Results for stale or cancelled tickets, or
    /// arriving after unmount, are dropped. Returns whether it was applied.
    pub fn on_fetch_result(&mut self, generation: u64, result: FetchResult) -> bool {
        let current = match &self.in_flight {
            Some(ticket) if ticket.generation == generation && !ticket.is_cancelled() => true,
            _ => false,
        };
        if !self.mounted || !current {
            debug!("Discarding result of fetch #{}", generation);
            return false;
        }
        self.in_flight = None;

        self.state = match result {
            Ok(events) => {
                info!("Calendar ready with {} events", events.len());
                ViewState::Ready(events)
            }
            Err(e) => {
                log::error!("Error fetching habits: {}", e);
                ViewState::Error(fetch_error_message(&e))
            }
        };
        true
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.cancel_in_flight();
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            token: CancellationToken::new(),
        };
        self.in_flight = Some(ticket.clone());
        self.state = ViewState::Loading;
        debug!("Starting fetch #{}", ticket.generation);
        ticket
    }

    fn cancel_in_flight(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            debug!("Cancelling fetch #{}", ticket.generation);
            ticket.token.cancel();
        }
    }
}

/// Server-supplied `message` if the response had one, else the generic text.
pub fn fetch_error_message(error: &AppError) -> String {
    error
        .api()
        .and_then(|api| api.server_message())
        .unwrap_or_else(|| GENERIC_FETCH_ERROR.to_string())
}
