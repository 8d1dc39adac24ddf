//! Client error type and its user-facing classification.

use reqwest::StatusCode;

/// Errors from the REST client layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request DTO failed client-side validation; nothing was sent.
    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// An operation needing a logged-in user was called on an anonymous
    /// session.
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Coarse classification used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SessionExpired,
    PermissionDenied,
    Network,
    NotFound,
    Conflict,
    Validation,
    Server,
    Other,
}

impl ApiError {
    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated => ErrorKind::SessionExpired,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Other,
            Self::Request(e) if e.is_decode() => ErrorKind::Other,
            Self::Request(e) if e.status().is_none() => ErrorKind::Network,
            _ => match self.status().map(StatusCode::from_u16) {
                Some(Ok(StatusCode::UNAUTHORIZED)) => ErrorKind::SessionExpired,
                Some(Ok(StatusCode::FORBIDDEN)) => ErrorKind::PermissionDenied,
                Some(Ok(StatusCode::NOT_FOUND)) => ErrorKind::NotFound,
                Some(Ok(StatusCode::CONFLICT)) => ErrorKind::Conflict,
                Some(Ok(StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY)) => {
                    ErrorKind::Validation
                }
                Some(Ok(s)) if s.is_server_error() => ErrorKind::Server,
                _ => ErrorKind::Other,
            },
        }
    }

    /// The backend's `detail` message, when the error body carries one.
    pub fn detail(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
        parsed
            .get("detail")
            .and_then(|d| d.as_str())
            .map(str::to_string)
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            ErrorKind::PermissionDenied => {
                "You do not have permission to perform this action.".to_string()
            }
            ErrorKind::Network => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ErrorKind::NotFound => "The requested item no longer exists.".to_string(),
            ErrorKind::Validation => match self {
                Self::Validation(errors) => format!("Invalid input: {errors}"),
                _ => self
                    .detail()
                    .unwrap_or_else(|| "The request was rejected as invalid.".to_string()),
            },
            ErrorKind::Conflict | ErrorKind::Server | ErrorKind::Other => self
                .detail()
                .unwrap_or_else(|| "Something went wrong. Please try again.".to_string()),
        }
    }
}
