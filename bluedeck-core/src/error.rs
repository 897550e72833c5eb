use thiserror::Error;

/// Errors raised by backend calls. Parsing never produces one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with an error message.
    #[error("Backend error: {0}")]
    Remote(String),

    #[error("Invalid device address: {0}")]
    InvalidAddress(String),

    #[error("Command timed out: {0}")]
    Timeout(String),

    #[error("Backend closed the connection without a response")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
