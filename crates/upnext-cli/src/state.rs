//! Persisted decision state.
//!
//! One flag survives between invocations: whether the previous cycle had an
//! event to show. It is what lets an all-quiet cycle skip repainting a
//! display that is already showing the standby notice.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedState {
    had_event_last_cycle: bool,
}

/// Reads and writes the one-flag state file.
#[derive(Debug, Clone)]
pub struct DecisionStateStore {
    path: PathBuf,
}

impl DecisionStateStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the flag from the previous cycle.
    ///
    /// A missing or unreadable file reads as `true`: when in doubt, assume
    /// the display holds stale content, so the next empty cycle repaints
    /// the standby notice instead of suppressing it.
    pub fn read(&self) -> bool {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(
                    path = %self.path.display(),
                    "no state file; assuming the display needs a repaint"
                );
                return true;
            }
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "failed to read state file; assuming the display needs a repaint"
                );
                return true;
            }
        };

        match serde_json::from_str::<PersistedState>(&content) {
            Ok(state) => state.had_event_last_cycle,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "corrupt state file; assuming the display needs a repaint"
                );
                true
            }
        }
    }

    /// Writes the flag for the next cycle, via temp-file-then-rename.
    pub fn write(&self, had_event: bool) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = PersistedState {
            had_event_last_cycle: had_event,
        };
        let json = serde_json::to_string_pretty(&state).map_err(io::Error::other)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), had_event, "wrote decision state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_reads_true() {
        let dir = tempdir().unwrap();
        let store = DecisionStateStore::new(dir.path().join("state.json"));
        assert!(store.read());
    }

    #[test]
    fn corrupt_file_reads_true() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = DecisionStateStore::new(&path);
        assert!(store.read());
    }

    #[test]
    fn roundtrips_both_values() {
        let dir = tempdir().unwrap();
        let store = DecisionStateStore::new(dir.path().join("state.json"));

        store.write(false).unwrap();
        assert!(!store.read());

        store.write(true).unwrap();
        assert!(store.read());
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = DecisionStateStore::new(&path);

        store.write(true).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = DecisionStateStore::new(&path);

        store.write(false).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn state_file_is_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = DecisionStateStore::new(&path);

        store.write(true).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["had_event_last_cycle"], true);
    }
}
