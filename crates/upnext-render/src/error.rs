//! Render-side error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from building or driving an output sink.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The configured sink name is not registered.
    #[error("unknown renderer {name:?} (known renderers: {known})")]
    UnknownSink {
        /// The name that was asked for.
        name: String,
        /// Comma-separated list of registered names.
        known: String,
    },

    /// The sink needs an output path and none was configured.
    #[error("renderer {name:?} requires an output path")]
    MissingOutputPath {
        /// The sink that was being built.
        name: String,
    },

    /// Writing the rendition failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
