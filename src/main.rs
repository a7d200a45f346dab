// HabitCal - habit tracking calendar client
// Main entry point for iced application

use std::sync::{Arc, Mutex};
use std::time::Duration;

use iced::futures::SinkExt;
use iced::widget::{button, column, container, row, text};
use iced::{Application, Command, Element, Length, Settings as IcedSettings, Subscription, Theme};
use anyhow::Context;
use log::{error, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use habitcal::api::ApiClient;
use habitcal::auth::{AuthContext, AuthStatus};
use habitcal::calendar::{local_now, CalendarGrid, CalendarView, FetchTicket, ViewState};
use habitcal::command_handlers::ApiHandlers;
use habitcal::config::ClientConfig;
use habitcal::messages::Message;
use habitcal::models::{PasswordChange, Profile};
use habitcal::navigation::{ChannelNavigator, Navigator, Route};
use habitcal::session::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use habitcal::ui::calendar::CalendarScreen;
use habitcal::ui::styles::{
    ActiveNavStyle, BackgroundStyle, CardStyle, NavStyle, SidebarStyle, ACCENT, SUBTEXT, TEXT,
};
use habitcal::ui::{login, profile};
use habitcal::ui_state::UiState;

type RouteReceiver = Arc<Mutex<Option<UnboundedReceiver<Route>>>>;

pub struct Flags {
    handlers: ApiHandlers,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<ChannelNavigator>,
    routes: RouteReceiver,
}

pub struct HabitCalApp {
    // Async operations against the habit API
    handlers: ApiHandlers,
    navigator: Arc<ChannelNavigator>,
    // Drained once by the navigation subscription
    routes: RouteReceiver,

    auth: AuthContext,
    calendar: CalendarView,
    grid: CalendarGrid,
    profile: Option<Profile>,

    // UI state management
    ui_state: UiState,
}

impl Application for HabitCalApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let store = flags.credentials.clone();

        let app = HabitCalApp {
            handlers: flags.handlers,
            navigator: flags.navigator,
            routes: flags.routes,
            auth: AuthContext::new(flags.credentials),
            calendar: CalendarView::new(),
            grid: CalendarGrid::new(local_now().date()),
            profile: None,
            ui_state: UiState::new(),
        };

        // Read the stored credential before the calendar decides whether to fetch
        let startup_command = Command::perform(AuthContext::resolve(store), Message::AuthResolved);

        (app, startup_command)
    }

    fn title(&self) -> String {
        "HabitCal".to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Navigate(route) => self.switch_route(route),

            Message::AuthResolved(status) => {
                info!("Auth resolved: {:?}", status);
                self.auth.apply(status);
                let ticket = self.calendar.on_auth_changed(status);
                self.start_fetch(ticket)
            }
            Message::TokenChanged(value) => {
                self.ui_state.token_input = value;
                Command::none()
            }
            Message::SubmitLogin => match self.auth.login(&self.ui_state.token_input) {
                Ok(_) => {
                    self.ui_state.token_input.clear();
                    self.ui_state.login_error = None;
                    self.switch_route(Route::Calendar)
                }
                Err(e) => {
                    warn!("Login rejected: {}", e);
                    self.ui_state.login_error = Some(e.to_safe_string());
                    Command::none()
                }
            },
            Message::Logout => {
                if let Err(e) = self.auth.logout() {
                    error!("Failed to clear credential: {}", e);
                    self.ui_state.profile_status = Some(e.to_safe_string());
                    return Command::none();
                }
                self.profile = None;
                self.ui_state.clear_password_form();
                self.ui_state.profile_status = None;
                self.switch_route(Route::Login)
            }

            Message::RefreshCalendar => {
                let ticket = self.calendar.refresh();
                self.start_fetch(ticket)
            }
            Message::HabitsLoaded(generation, result) => {
                if self.calendar.on_fetch_result(generation, result)
                    && matches!(self.calendar.state(), ViewState::Ready(_))
                {
                    self.ui_state.last_fetch_time = Some(local_now());
                }
                Command::none()
            }
            Message::GridViewSelected(view) => {
                self.grid.set_view(view);
                Command::none()
            }
            Message::GridPrevious => {
                self.grid.previous();
                Command::none()
            }
            Message::GridNext => {
                self.grid.next();
                Command::none()
            }
            Message::GridToday => {
                self.grid.today();
                Command::none()
            }
            Message::DaySelected(day) => {
                self.grid.open_day(day);
                Command::none()
            }
            Message::EventClicked(id) => {
                self.ui_state.selected_event = Some(id);
                Command::none()
            }
            Message::CloseEventDetails => {
                self.ui_state.selected_event = None;
                Command::none()
            }
            Message::Tick => {
                self.grid.set_today(local_now().date());
                Command::none()
            }

            Message::ProfileLoaded(result) => {
                self.apply_profile(result, None);
                Command::none()
            }
            Message::ProfileSaved(result) => {
                self.apply_profile(result, Some("Profile updated"));
                Command::none()
            }
            Message::NameChanged(value) => {
                self.ui_state.name_input = value;
                Command::none()
            }
            Message::SaveProfile => {
                self.ui_state.profile_loading = true;
                self.ui_state.profile_status = None;
                let handlers = self.handlers.clone();
                let name = self.ui_state.name_input.trim().to_string();
                Command::perform(
                    async move {
                        handlers
                            .update_profile(&[("name", name.as_str())])
                            .await
                            .map_err(|e| e.to_safe_string())
                    },
                    Message::ProfileSaved,
                )
            }
            Message::CurrentPasswordChanged(value) => {
                self.ui_state.current_password = value;
                Command::none()
            }
            Message::NewPasswordChanged(value) => {
                self.ui_state.new_password = value;
                Command::none()
            }
            Message::ConfirmPasswordChanged(value) => {
                self.ui_state.confirm_password = value;
                Command::none()
            }
            Message::SubmitPasswordChange => {
                self.ui_state.profile_loading = true;
                self.ui_state.profile_status = None;
                let handlers = self.handlers.clone();
                let change = PasswordChange::new(
                    self.ui_state.current_password.clone(),
                    self.ui_state.new_password.clone(),
                );
                let confirmation = self.ui_state.confirm_password.clone();
                Command::perform(
                    async move {
                        handlers
                            .change_password(change, &confirmation)
                            .await
                            .map_err(|e| e.to_safe_string())
                    },
                    Message::PasswordChanged,
                )
            }
            Message::PasswordChanged(result) => {
                self.ui_state.profile_loading = false;
                match result {
                    Ok(()) => {
                        self.ui_state.clear_password_form();
                        self.ui_state.profile_status = Some("Password changed".to_string());
                    }
                    Err(e) => self.ui_state.profile_status = Some(e),
                }
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        struct RouteRequests;

        let routes = self.routes.clone();

        // Forward navigation requests raised by the API client (401 redirect)
        let navigation = iced::subscription::channel(
            std::any::TypeId::of::<RouteRequests>(),
            16,
            move |mut output| async move {
                let mut receiver = routes.lock().ok().and_then(|mut slot| slot.take());
                loop {
                    let route = match receiver.as_mut() {
                        Some(receiver) => receiver.recv().await,
                        None => None,
                    };
                    match route {
                        Some(route) => {
                            let _ = output.send(Message::Navigate(route)).await;
                        }
                        None => {
                            receiver = None;
                            iced::futures::future::pending::<()>().await;
                        }
                    }
                }
            },
        );

        let clock = iced::time::every(Duration::from_secs(60)).map(|_| Message::Tick);

        Subscription::batch([navigation, clock])
    }

    fn view(&self) -> Element<'_, Message> {
        let current = self.ui_state.current_route;
        let nav_button = |label: &'static str, route: Route| {
            button(
                text(label)
                    .size(14)
                    .horizontal_alignment(iced::alignment::Horizontal::Left),
            )
            .width(Length::Fill)
            .padding(10)
            .style(if route == current {
                iced::theme::Button::Custom(Box::new(ActiveNavStyle))
            } else {
                iced::theme::Button::Custom(Box::new(NavStyle))
            })
            .on_press(Message::Navigate(route))
        };

        let links = if self.auth.status().is_authenticated() {
            column![
                nav_button("Calendar", Route::Calendar),
                nav_button("Profile", Route::Profile),
            ]
        } else {
            column![
                nav_button("Calendar", Route::Calendar),
                nav_button("Log In", Route::Login),
            ]
        };

        let sidebar = container(
            column![
                text("HabitCal").size(24).style(iced::theme::Text::Color(ACCENT)),
                links.spacing(5),
                iced::widget::vertical_space(),
                container(
                    column![
                        text("Status").size(12).style(iced::theme::Text::Color(SUBTEXT)),
                        text(self.status_line()).size(11).style(iced::theme::Text::Color(TEXT)),
                        text(match self.ui_state.last_fetch_time {
                            Some(last) => format!("Fetched: {}", last.format("%H:%M")),
                            None => "Not fetched".to_string(),
                        })
                        .size(11)
                        .style(iced::theme::Text::Color(SUBTEXT)),
                    ]
                    .spacing(4),
                )
                .padding(10)
                .style(iced::theme::Container::Custom(Box::new(CardStyle))),
            ]
            .spacing(40)
            .padding(20),
        )
        .width(200)
        .height(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(SidebarStyle)));

        let content: Element<'_, Message> = match current {
            Route::Calendar => CalendarScreen {
                view: &self.calendar,
                grid: &self.grid,
                today: local_now().date(),
                selected: self.selected_event(),
            }
            .view(),
            Route::Login | Route::Register => login::view(&self.ui_state),
            Route::Profile => profile::view(self.profile.as_ref(), &self.ui_state),
        };

        container(row![
            sidebar,
            container(content).width(Length::Fill).height(Length::Fill).padding(30),
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(BackgroundStyle)))
        .into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

impl HabitCalApp {
    /// Changes view. The calendar is unmounted while another view is shown
    /// and fetches again when it comes back.
    fn switch_route(&mut self, route: Route) -> Command<Message> {
        let previous = self.ui_state.current_route;
        self.ui_state.current_route = route;
        self.ui_state.selected_event = None;
        self.navigator.set_current(route);

        // The API client may have purged the credential before redirecting
        let status = if self.auth.status().is_loading() {
            AuthStatus::Loading
        } else {
            self.auth.refresh_from_store()
        };

        if previous == Route::Calendar && route != Route::Calendar {
            self.calendar.unmount();
        }
        let mut ticket = self.calendar.on_auth_changed(status);
        if route == Route::Calendar && previous != Route::Calendar {
            ticket = self.calendar.mount();
        }
        let fetch = self.start_fetch(ticket);

        if route == Route::Profile && status.is_authenticated() {
            Command::batch([fetch, self.load_profile()])
        } else {
            fetch
        }
    }

    fn start_fetch(&self, ticket: Option<FetchTicket>) -> Command<Message> {
        let Some(ticket) = ticket else {
            return Command::none();
        };
        let handlers = self.handlers.clone();
        let generation = ticket.generation();
        let cancel = ticket.token();
        Command::perform(
            async move {
                handlers
                    .load_calendar_events(local_now(), cancel)
                    .await
                    .map_err(Arc::new)
            },
            move |result| Message::HabitsLoaded(generation, result),
        )
    }

    fn load_profile(&mut self) -> Command<Message> {
        self.ui_state.profile_loading = true;
        self.ui_state.profile_status = None;
        let handlers = self.handlers.clone();
        Command::perform(
            async move { handlers.load_profile().await.map_err(|e| e.to_safe_string()) },
            Message::ProfileLoaded,
        )
    }

    fn apply_profile(&mut self, result: Result<Profile, String>, on_success: Option<&str>) {
        self.ui_state.profile_loading = false;
        match result {
            Ok(profile) => {
                self.ui_state.name_input = profile.get_str("name").unwrap_or_default().to_string();
                self.ui_state.profile_status = on_success.map(str::to_string);
                self.profile = Some(profile);
            }
            Err(e) => self.ui_state.profile_status = Some(e),
        }
    }

    fn selected_event(&self) -> Option<&habitcal::models::CalendarEvent> {
        let id = self.ui_state.selected_event.as_deref()?;
        self.calendar.events().iter().find(|event| event.id == id)
    }

    fn status_line(&self) -> String {
        match self.auth.status() {
            AuthStatus::Loading => "Checking login...".to_string(),
            AuthStatus::Unauthenticated => "Logged out".to_string(),
            AuthStatus::Authenticated => match self.calendar.state() {
                ViewState::Ready(events) => format!("{} habit event(s)", events.len()),
                ViewState::Error(_) => "Fetch failed".to_string(),
                ViewState::Loading => "Fetching habits...".to_string(),
                _ => "Logged in".to_string(),
            },
        }
    }
}

fn credential_store() -> Arc<dyn CredentialStore> {
    match FileCredentialStore::default_path() {
        Some(path) => {
            info!("Using credential file {}", path.display());
            Arc::new(FileCredentialStore::new(path))
        }
        None => {
            warn!("No config directory available; credentials will not persist");
            Arc::new(MemoryCredentialStore::new())
        }
    }
}

/// Wires configuration, credential storage, navigation and the API client.
fn build_flags() -> anyhow::Result<Flags> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;

    let credentials = credential_store();
    let (navigator, routes) = ChannelNavigator::new(Route::Calendar);
    let navigator = Arc::new(navigator);
    let client_navigator: Arc<dyn Navigator> = navigator.clone();

    let client = ApiClient::new(config, credentials.clone(), client_navigator)
        .context("Failed to build HTTP client")?;

    Ok(Flags {
        handlers: ApiHandlers::new(Arc::new(client)),
        credentials,
        navigator,
        routes: Arc::new(Mutex::new(Some(routes))),
    })
}

fn main() -> iced::Result {
    habitcal::utils::logging::init_logging();

    info!("Starting HabitCal with iced UI");

    let flags = match build_flags() {
        Ok(flags) => flags,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            eprintln!("Startup failed: {:#}", e);
            eprintln!("Please check HABITCAL_API_URL and try again.");
            std::process::exit(1);
        }
    };

    HabitCalApp::run(IcedSettings {
        window: iced::window::Settings {
            size: iced::Size::new(1100.0, 760.0),
            resizable: true,
            ..Default::default()
        },
        ..IcedSettings::with_flags(flags)
    })
}
