//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that stop a command.
///
/// An unreachable feed is not one of them: commands still render, with no
/// bookings.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// The apartment id is not in the catalog.
    UnknownApartment(String),
    /// The feed retriever could not be set up.
    Retriever(String),
    /// Invalid combination of arguments.
    Usage(String),
    /// Output could not be produced.
    Output(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::UnknownApartment(id) => write!(
                f,
                "unknown apartment {:?} (run 'lakecal apartments' to list the catalog)",
                id
            ),
            Self::Retriever(msg) => write!(f, "feed retriever error: {}", msg),
            Self::Usage(msg) => write!(f, "usage error: {}", msg),
            Self::Output(msg) => write!(f, "output error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<lakecal_feeds::FeedError> for ClientError {
    fn from(err: lakecal_feeds::FeedError) -> Self {
        Self::Retriever(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(format!("failed to serialize JSON: {}", err))
    }
}
