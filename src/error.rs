use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the API server cannot be reached at all.
pub const SERVER_UNAVAILABLE_MESSAGE: &str =
    "Server is not running. Please start the server and try again.";

/// Failures produced by the API client.
///
/// Every variant is propagated to the caller; the client never swallows one.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    ServerUnavailable(String),

    #[error("Unauthorized (401)")]
    Unauthorized { body: String },

    #[error("HTTP {status}: {body}")]
    Http {
        status: StatusCode,
        body: String,
        headers: HeaderMap,
    },

    #[error("No response from server: {0}")]
    NoResponse(String),

    #[error("Request could not be built: {0}")]
    RequestSetup(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server_unavailable() -> Self {
        Self::ServerUnavailable(SERVER_UNAVAILABLE_MESSAGE.to_string())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Response body, for the variants where the server actually replied.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { body } | Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let body = self.body()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Api(ApiError::Http { .. })
            | Self::Api(ApiError::Unauthorized { .. })
            | Self::Anyhow(_) => false,
            Self::Api(_)
            | Self::Config(_)
            | Self::Storage(_)
            | Self::InvalidInput(_)
            | Self::Cancelled => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            return self.to_string();
        }
        match self {
            Self::Api(api) => match api.server_message() {
                Some(message) => message,
                None => match api.status() {
                    Some(status) => format!("Request failed with status {}", status.as_u16()),
                    None => "Network request failed".to_string(),
                },
            },
            Self::Anyhow(_) => "Operation failed".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: u16, body: &str) -> ApiError {
        ApiError::Http {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            headers: HeaderMap::new(),
        }
    }

    #[test]
    fn test_server_message_extracted_from_json_body() {
        let err = http_error(500, r#"{"message":"Database is down"}"#);
        assert_eq!(err.server_message().as_deref(), Some("Database is down"));
    }

    #[test]
    fn test_server_message_absent_for_plain_body() {
        assert!(http_error(502, "Bad Gateway").server_message().is_none());
        assert!(http_error(500, r#"{"error":"nope"}"#).server_message().is_none());
    }

    #[test]
    fn test_server_message_absent_without_response() {
        assert!(ApiError::server_unavailable().server_message().is_none());
        assert!(ApiError::NoResponse("timeout".into()).server_message().is_none());
    }

    #[test]
    fn test_status_mapping() {
        let unauthorized = ApiError::Unauthorized { body: String::new() };
        assert_eq!(unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(unauthorized.is_unauthorized());
        assert_eq!(http_error(404, "").status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(ApiError::RequestSetup("bad url".into()).status(), None);
    }

    #[test]
    fn test_safe_string_prefers_server_message() {
        let err = AppError::from(http_error(400, r#"{"message":"Title is required"}"#));
        assert_eq!(err.to_safe_string(), "Title is required");

        let err = AppError::from(http_error(503, "<html>"));
        assert_eq!(err.to_safe_string(), "Request failed with status 503");
    }

    #[test]
    fn test_server_unavailable_message_is_user_facing() {
        let err = AppError::from(ApiError::server_unavailable());
        assert!(err.is_pii_safe());
        assert!(err.to_safe_string().contains("Server is not running"));
    }

    #[test]
    fn test_anyhow_details_hidden() {
        let err = AppError::from(anyhow::anyhow!("failed reading /home/sam/.config/habitcal/token"));
        assert!(!err.is_pii_safe());
        assert_eq!(err.to_safe_string(), "Operation failed");
    }
}
