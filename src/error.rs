use thiserror::Error;

pub type Result<T> = std::result::Result<T, GiveawayError>;

#[derive(Debug, Error)]
pub enum GiveawayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid post reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Account not found: {handle}")]
    NotFound { handle: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Too many requests have been made. Please wait 15 minutes and run again.")]
    RateLimit,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Inconsistent API response: {0}")]
    DataIntegrity(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for GiveawayError {
    fn from(err: reqwest::Error) -> Self {
        GiveawayError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GiveawayError {
    fn from(err: serde_json::Error) -> Self {
        GiveawayError::Decode(err.to_string())
    }
}
