//! Error types for feed retrieval.
//!
//! Individual retrieval attempts fail with a [`FeedError`]. The retriever
//! collects them for diagnostics but never hands them to its caller as an
//! `Err`: an exhausted attempt chain becomes
//! [`FeedFetch::Unavailable`](crate::retriever::FeedFetch::Unavailable).

use std::fmt;
use thiserror::Error;

/// The category of a feed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedErrorCode {
    /// Connection failed, DNS resolution, TLS, reset.
    NetworkError,
    /// The attempt exceeded its timeout.
    Timeout,
    /// The server answered with a non-success status.
    HttpStatus,
    /// A forwarding service answered with something that is not a JSON object.
    InvalidEnvelope,
    /// The envelope lacks the payload field, or it is empty.
    MissingPayload,
    /// The payload is too short to be a calendar document.
    DocumentTooShort,
    /// The feed URL or a proxy template produced an unusable URL.
    InvalidUrl,
    /// The retriever could not be set up.
    ConfigurationError,
}

impl FeedErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::InvalidEnvelope => "invalid_envelope",
            Self::MissingPayload => "missing_payload",
            Self::DocumentTooShort => "document_too_short",
            Self::InvalidUrl => "invalid_url",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for FeedErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from a single feed retrieval attempt.
#[derive(Debug, Error)]
pub struct FeedError {
    code: FeedErrorCode,
    message: String,
    /// Route that produced the error (proxy name or "direct").
    route: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FeedError {
    pub fn new(code: FeedErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            route: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::Timeout, message)
    }

    pub fn http_status(status: u16) -> Self {
        Self::new(
            FeedErrorCode::HttpStatus,
            format!("unexpected HTTP status {}", status),
        )
    }

    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::InvalidEnvelope, message)
    }

    pub fn missing_payload(field: &str) -> Self {
        Self::new(
            FeedErrorCode::MissingPayload,
            format!("envelope has no usable {:?} field", field),
        )
    }

    pub fn document_too_short(len: usize, min: usize) -> Self {
        Self::new(
            FeedErrorCode::DocumentTooShort,
            format!("document is {} bytes, need at least {}", len, min),
        )
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::InvalidUrl, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::ConfigurationError, message)
    }

    /// Classifies a transport error from the HTTP client.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let base = if err.is_timeout() {
            Self::timeout("request timed out")
        } else if let Some(status) = err.status() {
            Self::http_status(status.as_u16())
        } else {
            Self::network(format!("request failed: {}", err))
        };
        base.with_source(err)
    }

    /// Sets the route that produced this error.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> FeedErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref route) = self.route {
            write!(f, "[{}] ", route)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
