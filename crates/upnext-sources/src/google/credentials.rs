//! Stored OAuth credentials, looked up by identity reference.
//!
//! Credentials live one file per identity under a common root:
//! `<root>/<identity>-credentials.json`, in the authorized-user JSON shape
//! Google tooling produces. This module reads them, and writes them back
//! when a token refresh produced a newer access token.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SourceError, SourceResult};

/// An authorized-user credential as stored on disk.
///
/// The long-lived part is the refresh token; the access token and its expiry
/// are a cache of the last refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// OAuth client id the credential was issued for.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Long-lived token used to mint access tokens.
    pub refresh_token: String,
    /// Last access token, if one was cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// When the cached access token stops working.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredCredential {
    /// Returns the cached access token while it is still comfortably valid.
    ///
    /// Treats the token as stale within sixty seconds of its recorded
    /// expiry, and a token without a recorded expiry as already stale.
    pub fn fresh_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let expiry = self.expiry?;
        if now + Duration::seconds(60) < expiry {
            self.access_token.as_deref()
        } else {
            None
        }
    }

    /// Replaces the cached access token after a refresh.
    pub fn update_access_token(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
        now: DateTime<Utc>,
    ) {
        self.access_token = Some(access_token.into());
        self.expiry = expires_in_secs.map(|secs| now + Duration::seconds(secs));
    }
}

/// File-backed credential store keyed by identity reference.
///
/// Absence is not an error: a calendar can be configured before its
/// credential has been provisioned, and its source then simply has nothing
/// to say. An existing file that cannot be read or parsed is an error.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root: PathBuf,
}

impl CredentialStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path a given identity reference maps to.
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.root.join(format!("{identity}-credentials.json"))
    }

    /// Loads the credential for `identity`, or `None` when none was stored.
    pub fn load(&self, identity: &str) -> SourceResult<Option<StoredCredential>> {
        let path = self.path_for(identity);
        if !path.exists() {
            debug!(identity, path = %path.display(), "no stored credential");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            SourceError::config(format!(
                "failed to read credential file {}: {e}",
                path.display()
            ))
        })?;

        let credential: StoredCredential = serde_json::from_str(&content).map_err(|e| {
            SourceError::config(format!(
                "failed to parse credential file {}: {e}",
                path.display()
            ))
        })?;

        debug!(identity, path = %path.display(), "loaded stored credential");
        Ok(Some(credential))
    }

    /// Writes the credential for `identity` back to disk.
    ///
    /// Goes through a temp file and a rename so a crash mid-write cannot
    /// leave a truncated credential behind.
    pub fn save(&self, identity: &str, credential: &StoredCredential) -> SourceResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            SourceError::config(format!(
                "failed to create credential directory {}: {e}",
                self.root.display()
            ))
        })?;

        let path = self.path_for(identity);
        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(credential)
            .map_err(|e| SourceError::config(format!("failed to serialize credential: {e}")))?;

        fs::write(&temp_path, &content).map_err(|e| {
            SourceError::config(format!(
                "failed to write credential file {}: {e}",
                temp_path.display()
            ))
        })?;

        fs::rename(&temp_path, &path).map_err(|e| {
            SourceError::config(format!(
                "failed to rename credential file {}: {e}",
                path.display()
            ))
        })?;

        // Credentials are secrets; keep them owner-only on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&path, perms);
        }

        debug!(identity, path = %path.display(), "saved credential");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_credential() -> StoredCredential {
        StoredCredential {
            client_id: "client-id.apps.googleusercontent.com".to_string(),
            client_secret: "shhh".to_string(),
            refresh_token: "refresh-token".to_string(),
            access_token: Some("access-token".to_string()),
            expiry: Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()),
        }
    }

    #[test]
    fn fresh_token_before_expiry() {
        let credential = sample_credential();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        assert_eq!(credential.fresh_access_token(now), Some("access-token"));
    }

    #[test]
    fn token_is_stale_near_and_past_expiry() {
        let credential = sample_credential();
        // Within the sixty second slack.
        let near = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 30).unwrap();
        assert_eq!(credential.fresh_access_token(near), None);
        // Fully past.
        let past = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
        assert_eq!(credential.fresh_access_token(past), None);
    }

    #[test]
    fn token_without_expiry_is_stale() {
        let credential = StoredCredential {
            expiry: None,
            ..sample_credential()
        };
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        assert_eq!(credential.fresh_access_token(now), None);
    }

    #[test]
    fn update_access_token_sets_expiry_from_now() {
        let mut credential = sample_credential();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        credential.update_access_token("new-token", Some(3600), now);
        assert_eq!(credential.access_token.as_deref(), Some("new-token"));
        assert_eq!(
            credential.expiry,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap())
        );
    }

    #[test]
    fn store_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(store.load("nobody").unwrap().is_none());
    }

    #[test]
    fn store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("home", &sample_credential()).unwrap();
        assert!(store.path_for("home").exists());

        let loaded = store.load("home").unwrap().unwrap();
        assert_eq!(loaded.refresh_token, "refresh-token");
        assert_eq!(loaded.access_token.as_deref(), Some("access-token"));
    }

    #[test]
    fn store_load_corrupt_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        fs::write(store.path_for("home"), "{not json").unwrap();

        let err = store.load("home").unwrap_err();
        assert_eq!(err.code(), crate::error::SourceErrorCode::Config);
    }

    #[test]
    fn serialization_skips_absent_cache_fields() {
        let credential = StoredCredential {
            access_token: None,
            expiry: None,
            ..sample_credential()
        };
        let json = serde_json::to_string(&credential).unwrap();
        assert!(!json.contains("access_token"));
        assert!(!json.contains("expiry"));
    }
}
