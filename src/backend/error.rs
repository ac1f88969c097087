use http::StatusCode;

/// Errors from talking to the REST backend.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// The configured backend URL could not be used as a base URL.
    #[error("invalid backend url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The backend rejected our key or token.
    #[error("not authorized for {url} ({status}). Check WILLWIN_ANON_KEY / WILLWIN_ACCESS_TOKEN")]
    Unauthorized { url: String, status: StatusCode },

    /// Server returned another non-success status code.
    #[error("unexpected status {status} for {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Response body was not the JSON we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Http { .. } => true,
            BackendError::UnexpectedStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, BackendError::Unauthorized { .. })
    }
}
