//! Unified error handling for the browser app.
//!
//! Every fallible operation returns `Result<T, AppError>`. Components map the
//! error to inline text with [`AppError::user_message`] and log the full value.

use thiserror::Error;
use validator::ValidationErrors;

/// Application-level error type.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// The request never produced a response (offline, CORS, DNS...).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    ///
    /// `detail` is the backend's own message, passed through verbatim.
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A locally computed validation rule failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// `localStorage` is unavailable or rejected the write.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Text shown inline to the user.
    ///
    /// Server errors surface the backend `detail` unchanged, including any
    /// internals it leaks. Other errors fall back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Network(_) => "Network error. Please try again.".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_is_shown_verbatim() {
        let err = AppError::Server {
            status: 500,
            detail: Some("psycopg2.OperationalError: connection refused".into()),
        };
        assert_eq!(
            err.user_message("Login failed"),
            "psycopg2.OperationalError: connection refused"
        );
    }

    #[test]
    fn server_without_detail_uses_fallback() {
        let err = AppError::Server {
            status: 401,
            detail: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn network_errors_have_fixed_text() {
        let err = AppError::Network("TypeError: Failed to fetch".into());
        assert!(err.is_network());
        assert_eq!(err.user_message("Payment failed"), "Network error. Please try again.");
    }

    #[test]
    fn display_includes_status() {
        let err = AppError::Server {
            status: 402,
            detail: Some("Card declined".into()),
        };
        assert_eq!(err.to_string(), "Server error (402): Card declined");
    }
}
