use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    /// Missing or invalid harness configuration. Never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP layer failed before the server produced an answer.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but reported that the command failed.
    #[error("Driver error (status {status}): {message}")]
    Driver { status: i64, message: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A response the client could not make sense of.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl AutomationError {
    /// Configuration errors fail the bootstrap before any connection attempt;
    /// everything else is worth retrying while the server is still coming up.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AutomationError::Config(_))
    }
}
