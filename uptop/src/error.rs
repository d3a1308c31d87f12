//! Error types for the console core.

/// Everything an operation can fail with. Handlers turn these into a status line.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Bad local input; never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-success status.
    #[error("{status} {status_text}: {body}")]
    Transport {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never completed (connection refused, DNS, reset...).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsoleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ConsoleError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Decode(e.to_string())
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
