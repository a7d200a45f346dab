//! Routes and the navigation seam between the API client and the shell.
//!
//! The client never switches views itself. It asks a [`Navigator`], and the
//! shell decides what a route change means on screen.

use log::{debug, warn};
use std::sync::RwLock;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Calendar,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Calendar => "/calendar",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/calendar" | "" => Some(Route::Calendar),
            "/profile" => Some(Route::Profile),
            _ => None,
        }
    }

    /// Login and registration are reachable without a credential; a 401
    /// seen from one of them must not redirect again.
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn current_route(&self) -> Route;

    fn navigate(&self, route: Route);
}

/// Sends the login redirect after an authorization failure, unless the user
/// is already on an auth page. Returns whether a redirect was issued.
pub fn redirect_to_login(navigator: &dyn Navigator) -> bool {
    let current = navigator.current_route();
    if current.is_auth_page() {
        debug!("Already on {}, not redirecting", current.path());
        return false;
    }
    navigator.navigate(Route::Login);
    true
}

/// Navigator backed by a channel drained by the UI shell.
///
/// `navigate` updates the recorded route and queues the request; the shell
/// calls [`ChannelNavigator::set_current`] when it changes view on its own.
#[derive(Debug)]
pub struct ChannelNavigator {
    current: RwLock<Route>,
    sender: UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new(initial: Route) -> (Self, UnboundedReceiver<Route>) {
        let (sender, receiver) = unbounded_channel();
        (
            Self {
                current: RwLock::new(initial),
                sender,
            },
            receiver,
        )
    }

    pub fn set_current(&self, route: Route) {
        if let Ok(mut current) = self.current.write() {
            *current = route;
        }
    }
}

impl Navigator for ChannelNavigator {
    fn current_route(&self) -> Route {
        self.current.read().map(|r| *r).unwrap_or(Route::Calendar)
    }

    fn navigate(&self, route: Route) {
        self.set_current(route);
        if self.sender.send(route).is_err() {
            warn!("Navigation to {} dropped: shell is gone", route.path());
        }
    }
}
