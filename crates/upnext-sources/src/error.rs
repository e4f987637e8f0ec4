//! Error types for calendar source operations.
//!
//! A source failure is never fatal to a cycle: the fan-out layer logs it and
//! carries on with the remaining sources. The code on [`SourceError`] exists
//! so those logs say which kind of trouble it was.

use std::fmt;
use thiserror::Error;

/// The category of a source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// Connection, DNS, TLS, or an unreadable response body.
    Network,
    /// The credential was rejected or lacks access.
    Auth,
    /// The server answered, but with something unusable.
    InvalidResponse,
    /// A document fetched fine but could not be parsed.
    Parse,
    /// The fetch did not finish within the per-source budget.
    Timeout,
    /// The source itself is misconfigured.
    Config,
}

impl SourceErrorCode {
    /// Returns a stable name for this code, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::InvalidResponse => "invalid_response",
            Self::Parse => "parse",
            Self::Timeout => "timeout",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while fetching candidates from one calendar source.
#[derive(Debug, Error)]
pub struct SourceError {
    /// The category of the failure.
    code: SourceErrorCode,
    /// A human-readable message describing it.
    message: String,
    /// The source that raised it ("google:home", "ics:example.org").
    source_name: Option<String>,
    /// The underlying cause, if any.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Network, message)
    }

    /// Creates an authentication/authorization error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Auth, message)
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Parse, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Config, message)
    }

    /// Sets the name of the source that raised this error.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source name, if set.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// True when the failure was the per-source fetch budget running out.
    pub fn is_timeout(&self) -> bool {
        self.code == SourceErrorCode::Timeout
    }

    /// True when the failure was a rejected or insufficient credential.
    pub fn is_auth(&self) -> bool {
        self.code == SourceErrorCode::Auth
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "[{}] ", name)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        let detail = error.to_string();
        let mapped = if error.is_timeout() {
            Self::timeout(format!("request timed out: {detail}"))
        } else if error.is_connect() {
            Self::network(format!("connection failed: {detail}"))
        } else {
            Self::network(format!("request failed: {detail}"))
        };
        mapped.with_cause(error)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
