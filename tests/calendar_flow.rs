use std::sync::Arc;

use chrono::NaiveDate;
use habitcal::api::{ApiClient, HABITS_PATH};
use habitcal::auth::{AuthContext, AuthStatus};
use habitcal::calendar::{CalendarView, ViewState, GENERIC_FETCH_ERROR};
use habitcal::command_handlers::ApiHandlers;
use habitcal::config::ClientConfig;
use habitcal::navigation::{ChannelNavigator, Route};
use habitcal::session::{CredentialStore, FileCredentialStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct App {
    handlers: ApiHandlers,
    store: Arc<FileCredentialStore>,
    routes: tokio::sync::mpsc::UnboundedReceiver<Route>,
    _dir: TempDir,
}

fn app(base_url: &str, token: &str) -> App {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileCredentialStore::new(dir.path().join("token")));
    store.set_token(token).unwrap();

    let (navigator, routes) = ChannelNavigator::new(Route::Calendar);
    let client = ApiClient::new(ClientConfig::new(base_url), store.clone(), Arc::new(navigator)).unwrap();

    App {
        handlers: ApiHandlers::new(Arc::new(client)),
        store,
        routes,
        _dir: dir,
    }
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_authenticated_mount_reaches_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HABITS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "h1", "title": "Walk", "startDate": "2024-01-10", "startTime": "08:00" }
        ])))
        .mount(&server)
        .await;

    let app = app(&server.uri(), "valid");
    let mut auth = AuthContext::new(app.store.clone());
    let mut view = CalendarView::new();

    let status = AuthContext::resolve(auth.store()).await;
    auth.apply(status);
    let ticket = view.on_auth_changed(status).expect("fetch starts");

    let result = app
        .handlers
        .load_calendar_events(noon(), ticket.token())
        .await
        .map_err(Arc::new);
    assert!(view.on_fetch_result(ticket.generation(), result));

    match view.state() {
        ViewState::Ready(events) => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].title, "Walk");
        }
        other => panic!("expected Ready, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_token_logs_out_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HABITS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let mut app = app(&server.uri(), "expired");
    let mut auth = AuthContext::new(app.store.clone());
    let mut view = CalendarView::new();
    assert_eq!(auth.refresh_from_store(), AuthStatus::Authenticated);

    let ticket = view.on_auth_changed(AuthStatus::Authenticated).unwrap();
    let result = app
        .handlers
        .load_calendar_events(noon(), ticket.token())
        .await
        .map_err(Arc::new);
    view.on_fetch_result(ticket.generation(), result);

    assert_eq!(view.state(), &ViewState::Error("jwt expired".to_string()));
    assert_eq!(app.routes.try_recv().unwrap(), Route::Login);
    assert!(!app.store.path().exists());

    // The shell reacts to the redirect by re-reading the store
    let status = auth.refresh_from_store();
    assert_eq!(status, AuthStatus::Unauthenticated);
    assert!(view.on_auth_changed(status).is_none());
    assert_eq!(view.state(), &ViewState::Unauthenticated);
}

#[tokio::test]
async fn test_server_down_shows_generic_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut app = app(&format!("http://127.0.0.1:{}", port), "valid");
    let mut view = CalendarView::new();
    let ticket = view.on_auth_changed(AuthStatus::Authenticated).unwrap();

    let result = app
        .handlers
        .load_calendar_events(noon(), ticket.token())
        .await
        .map_err(Arc::new);
    view.on_fetch_result(ticket.generation(), result);

    assert_eq!(view.state(), &ViewState::Error(GENERIC_FETCH_ERROR.to_string()));
    assert!(app.routes.try_recv().is_err());
    assert_eq!(app.store.token().as_deref(), Some("valid"));
}
