//! Error types for the signal relay.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Non-2xx response from the exchange. `body` keeps the raw response text
    /// so callers can pull out the exchange's own message.
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    #[error("Authentication error: {message}")]
    Auth { message: String },
}

impl Error {
    /// The raw exchange response body, if this error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
