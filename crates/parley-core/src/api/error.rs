use thiserror::Error;

/// Error returned by every backend call.
///
/// `Validation` is raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A required input was empty.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// The request never produced a response (connect failure, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an `error` field, a non-success status,
    /// or a body that does not match the endpoint's schema.
    #[error("{message}")]
    Server {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn validation(field: &'static str) -> Self {
        ApiError::Validation { field }
    }

    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("request timed out".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
