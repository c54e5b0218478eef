use reqwest::StatusCode;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Transport failure: connect, I/O, or reading the response body
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not the JSON shape we expected
    #[error("Failed to decode response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL could not be joined with an endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration failed validation
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    /// HTTP status of the failed response, if the failure came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            Error::Json(_) | Error::InvalidUrl(_) | Error::Config { .. } => None,
        }
    }
}

/// Type alias for client operation results
pub type Result<T> = std::result::Result<T, Error>;
