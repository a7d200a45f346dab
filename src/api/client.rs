//! API client for the habit server
//!
//! Attaches the stored bearer credential to each request and classifies
//! failures into [`ApiError`]. A 401 purges the credential and asks the
//! injected navigator for the login view. Nothing is retried.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http_config::HttpConfig;
use crate::models::{Habit, PasswordChange, Profile};
use crate::navigation::{redirect_to_login, Navigator};
use crate::session::CredentialStore;
use crate::utils::logging;

pub const HABITS_PATH: &str = "/api/habits";
pub const PROFILE_PATH: &str = "/profile";
pub const CHANGE_PASSWORD_PATH: &str = "/change-password";

pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestSetup` if the HTTP client cannot be built
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = HttpConfig::from_client_config(&config).build_client()?;
        Ok(Self {
            http,
            config,
            credentials,
            navigator,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// `GET /api/habits`
    pub async fn get_habits(&self) -> Result<Vec<Habit>, ApiError> {
        let started = Instant::now();
        let habits: Vec<Habit> = self.get(HABITS_PATH).await?;
        logging::log_habit_fetch(habits.len(), started.elapsed().as_millis() as u64);
        Ok(habits)
    }

    /// `GET /profile`
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.get(PROFILE_PATH).await
    }

    /// `PUT /profile`
    pub async fn update_profile(&self, changes: &Value) -> Result<Profile, ApiError> {
        self.put(PROFILE_PATH, changes).await
    }

    /// `POST /change-password`
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Value, ApiError> {
        self.post(CHANGE_PASSWORD_PATH, change).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.stored_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(Self::classify_transport_error(e)),
        };

        let result = self.handle_response(response).await;
        if result.is_ok() {
            info!("{} {} succeeded", method, path);
        }
        result
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(Self::classify_transport_error)?;
            let parsed = if bytes.is_empty() {
                serde_json::from_value(Value::Null)
            } else {
                serde_json::from_slice(&bytes)
            };
            return parsed.map_err(|e| {
                error!("Failed to decode response body: {}", e);
                ApiError::Decode(e.to_string())
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        logging::log_api_error(status, &body, &headers);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized().await;
            return Err(ApiError::Unauthorized { body });
        }

        Err(ApiError::Http {
            status,
            body,
            headers,
        })
    }

    /// Drops the credential and redirects to login unless already on an
    /// auth page.
    async fn handle_unauthorized(&self) {
        let store = self.credentials.clone();
        match tokio::task::spawn_blocking(move || store.clear()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to clear stored credential: {}", e),
            Err(e) => error!("Credential clear task failed: {}", e),
        }
        logging::log_auth_event("Credential cleared after 401");
        if redirect_to_login(self.navigator.as_ref()) {
            info!("Redirecting to login");
        }
    }

    /// Reads the store off the async executor; file-backed stores block.
    async fn stored_token(&self) -> Option<String> {
        let store = self.credentials.clone();
        tokio::task::spawn_blocking(move || store.token())
            .await
            .unwrap_or_else(|e| {
                error!("Credential lookup task failed: {}", e);
                None
            })
    }

    fn classify_transport_error(err: reqwest::Error) -> ApiError {
        if err.is_builder() {
            error!("Error: {}", err);
            ApiError::RequestSetup(err.to_string())
        } else if is_connection_refused(&err) {
            error!("Server is not running or not accessible: {}", err);
            ApiError::server_unavailable()
        } else if err.is_decode() {
            error!("Failed to decode response body: {}", err);
            ApiError::Decode(err.to_string())
        } else {
            logging::log_network_error("request", &err);
            ApiError::NoResponse(err.to_string())
        }
    }
}

/// Only a refused connection means the server is not running. DNS failures
/// and connect timeouts are treated as "no response".
fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use crate::navigation::{MockNavigator, Route};
    use crate::session::MemoryCredentialStore;
    use std::fmt;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records which thread each store call ran on.
    #[derive(Default)]
    struct ThreadRecordingStore {
        inner: MemoryCredentialStore,
        calls: Mutex<Vec<(&'static str, ThreadId)>>,
    }

    impl ThreadRecordingStore {
        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap().push((op, thread::current().id()));
        }
    }

    impl CredentialStore for ThreadRecordingStore {
        fn token(&self) -> Option<String> {
            self.record("token");
            self.inner.token()
        }

        fn set_token(&self, token: &str) -> AppResult<()> {
            self.inner.set_token(token)
        }

        fn clear(&self) -> AppResult<()> {
            self.record("clear");
            self.inner.clear()
        }
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connect failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn client_with(base_url: &str, navigator: MockNavigator) -> ApiClient {
        ApiClient::new(
            ClientConfig::new(base_url),
            Arc::new(MemoryCredentialStore::with_token("t0k3n")),
            Arc::new(navigator),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_is_request_setup_error() {
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();
        let client = client_with("http://bad host", navigator);

        let err = client.get::<Value>("/api/habits").await.unwrap_err();
        assert!(matches!(err, ApiError::RequestSetup(_)), "got {:?}", err);
        // No side effects on setup failures
        assert!(client.credentials().has_token());
    }

    #[test]
    fn test_only_refused_connections_count_as_server_down() {
        let refused = Wrapped(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(is_connection_refused(&refused));

        let timed_out = Wrapped(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert!(!is_connection_refused(&timed_out));

        let dns = Wrapped(io::Error::new(io::ErrorKind::Other, "failed to lookup address"));
        assert!(!is_connection_refused(&dns));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_credential_store_is_used_off_the_executor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(ThreadRecordingStore::default());
        store.set_token("t0k3n").unwrap();
        let mut navigator = MockNavigator::new();
        navigator.expect_current_route().return_const(Route::Login);
        navigator.expect_navigate().never();

        let client = ApiClient::new(
            ClientConfig::new(server.uri()),
            store.clone(),
            Arc::new(navigator),
        )
        .unwrap();

        let err = client.get::<Value>(HABITS_PATH).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }), "got {:?}", err);
        assert!(store.inner.token().is_none());

        let runtime_thread = thread::current().id();
        let calls = store.calls.lock().unwrap();
        let ops: Vec<&str> = calls.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec!["token", "clear"]);
        assert!(calls.iter().all(|(_, id)| *id != runtime_thread));
    }

    #[test]
    fn test_endpoints() {
        let navigator = MockNavigator::new();
        let client = client_with("http://localhost:5000", navigator);
        assert_eq!(client.config().endpoint(HABITS_PATH), "http://localhost:5000/api/habits");
        assert_eq!(client.config().endpoint(CHANGE_PASSWORD_PATH), "http://localhost:5000/change-password");
    }
}
