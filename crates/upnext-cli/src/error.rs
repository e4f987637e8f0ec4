//! Application error types.

use std::io;

use thiserror::Error;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that abort a command.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (state file, output file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The configured look-ahead duration is unusable.
    #[error(transparent)]
    Lookahead(#[from] upnext_core::MalformedDurationSpec),

    /// Building or driving the output sink failed.
    #[error(transparent)]
    Render(#[from] upnext_render::RenderError),
}

impl AppError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
