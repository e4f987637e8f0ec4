//! File sink: writes the text rendition to a path, atomically.
//!
//! Stands where an e-paper image pipeline would plug in. The write goes
//! to a sibling temp file first and is renamed into place, so a reader
//! polling the path never sees a half-written rendition.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::payload::RenderPayload;
use crate::renderer::{Renderer, FILE_SINK};

/// Writes each payload's text rendition to a fixed path.
#[derive(Debug, Clone)]
pub struct FileRenderer {
    output_path: PathBuf,
}

impl FileRenderer {
    /// Creates a sink writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// The path this sink writes to.
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }
}

impl Renderer for FileRenderer {
    fn name(&self) -> &str {
        FILE_SINK
    }

    fn render(&self, payload: &RenderPayload) -> RenderResult<()> {
        let write_err = |source| RenderError::Write {
            path: self.output_path.clone(),
            source,
        };

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let mut text = payload.display_text();
        text.push('\n');

        let temp_path = self.output_path.with_extension("tmp");
        fs::write(&temp_path, &text).map_err(write_err)?;
        fs::rename(&temp_path, &self.output_path).map_err(write_err)?;

        debug!(path = %self.output_path.display(), "wrote rendition");
        Ok(())
    }
}
