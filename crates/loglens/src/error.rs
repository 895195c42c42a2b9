use thiserror::Error;

/// Why a request to the backend did not produce a usable payload.
///
/// No distinction is made between transient and permanent failures: every
/// variant is shown to the user and nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The backend answered with a non-2xx status, whatever the body says.
    #[error("HTTP error! Status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("Empty response body")]
    EmptyPayload,
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for FetchError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Decode(error.to_string())
    }
}
