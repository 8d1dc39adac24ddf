/// Default backend base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the API prefix, without a trailing slash.
    pub api_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                        |
    /// |--------------------------------|--------------------------------|
    /// | `WIZPLAT_API_URL`              | `http://localhost:8000/api/v1` |
    /// | `WIZPLAT_REQUEST_TIMEOUT_SECS` | `30`                           |
    ///
    /// An unparseable timeout falls back to the default with a warning.
    pub fn from_env() -> Self {
        let api_url = std::env::var("WIZPLAT_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout_secs = match std::env::var("WIZPLAT_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "WIZPLAT_REQUEST_TIMEOUT_SECS is not a number, using default",
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self {
            api_url,
            request_timeout_secs,
        }
    }

    /// Configuration pointing at an explicit base URL.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}
