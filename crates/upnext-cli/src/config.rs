//! Application configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/upnext/config.toml` by default. A missing file is not an
//! error: the defaults (no calendars, console renderer) are enough to run
//! `upnext preview` out of the box.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use upnext_core::parse_lookahead;
use upnext_render::{RendererRegistry, SinkOptions};
use upnext_sources::{
    CalendarSource, CredentialStore, FeedFetcher, FloatingTimePolicy, GoogleCalendarClient,
    GoogleCalendarSource, IcsFeedSource,
};

/// Default look-ahead: one day.
pub const DEFAULT_LOOK_AHEAD: &str = "1.00:00:00";

/// Configuration for the upnext application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Look-ahead duration as `D.HH:MM:SS`.
    pub look_ahead: String,

    /// Configured calendars, in resolution priority order.
    #[serde(rename = "calendar")]
    pub calendars: Vec<CalendarEntry>,

    /// Source-side settings shared by all calendars.
    pub sources: SourceSettings,

    /// Render-side settings.
    pub render: RenderSettings,

    /// Decision state settings.
    pub state: StateSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            look_ahead: DEFAULT_LOOK_AHEAD.to_string(),
            calendars: Vec::new(),
            sources: SourceSettings::default(),
            render: RenderSettings::default(),
            state: StateSettings::default(),
        }
    }
}

/// One configured calendar.
///
/// The `kind` field selects the backend; the remaining fields are
/// backend-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CalendarEntry {
    /// Google calendar read with provisioned OAuth credentials.
    GoogleOauth {
        /// Which stored credential to use.
        identity: String,
        /// Calendar to read; "primary" is the account's default.
        #[serde(default = "default_calendar_id")]
        calendar_id: String,
    },
    /// Published ICS feed.
    IcsUrl {
        /// Feed URL.
        url: String,
    },
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

/// Settings shared by all calendar sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Directory holding `<identity>-credentials.json` files.
    pub credentials_dir: Option<PathBuf>,

    /// Per-source fetch budget in seconds.
    pub fetch_timeout_secs: u64,

    /// IANA zone applied to zone-less event times ("UTC" when unset).
    pub floating_time_zone: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            credentials_dir: None,
            fetch_timeout_secs: 30,
            floating_time_zone: None,
        }
    }
}

impl SourceSettings {
    /// The credential directory, defaulting to the platform data dir.
    pub fn credentials_dir(&self) -> PathBuf {
        self.credentials_dir
            .clone()
            .unwrap_or_else(AppConfig::default_data_dir)
    }

    /// The per-source fetch budget.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// The policy applied to zone-less event times.
    pub fn floating_policy(&self) -> Result<FloatingTimePolicy, String> {
        FloatingTimePolicy::from_zone_name(self.floating_time_zone.as_deref())
    }
}

/// Render-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Which sink to render with.
    pub renderer: String,

    /// Where the file sink writes, defaulting to the platform cache dir.
    pub output_path: Option<PathBuf>,

    /// Standby text shown when nothing is upcoming.
    pub no_events_message: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            renderer: upnext_render::CONSOLE_SINK.to_string(),
            output_path: None,
            no_events_message: "No upcoming events".to_string(),
        }
    }
}

impl RenderSettings {
    /// The file sink's output path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("upnext")
                .join("frame.txt")
        })
    }

    /// Options handed to the sink builder.
    pub fn sink_options(&self) -> SinkOptions {
        SinkOptions {
            output_path: Some(self.output_path()),
        }
    }
}

/// Decision state settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Where the one-flag state file lives.
    pub path: Option<PathBuf>,
}

impl StateSettings {
    /// The state file path, defaulting to the platform state dir.
    pub fn path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("upnext")
                .join("state.json")
        })
    }
}

impl AppConfig {
    /// Loads configuration from the default path, or defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            warn!(path = %path.display(), "no configuration file; using defaults");
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {e}"))
    }

    /// Loads from an explicit path when given, otherwise from the default
    /// location.
    pub fn load_or_default(override_path: Option<&Path>) -> Result<Self, String> {
        match override_path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("upnext")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("upnext")
    }

    /// Checks everything that can be checked without network access.
    pub fn validate(&self) -> Result<(), String> {
        parse_lookahead(&self.look_ahead).map_err(|e| e.to_string())?;

        for entry in &self.calendars {
            match entry {
                CalendarEntry::GoogleOauth { identity, .. } => {
                    if identity.trim().is_empty() {
                        return Err(
                            "google-oauth calendar entry has an empty identity".to_string()
                        );
                    }
                }
                CalendarEntry::IcsUrl { url } => {
                    Url::parse(url).map_err(|e| format!("invalid ICS feed URL {url:?}: {e}"))?;
                }
            }
        }

        let registry = RendererRegistry::with_builtins();
        if !registry
            .known_sinks()
            .contains(&self.render.renderer.as_str())
        {
            return Err(format!(
                "unknown renderer {:?} (known renderers: {})",
                self.render.renderer,
                registry.known_sinks().join(", ")
            ));
        }

        self.sources.floating_policy()?;

        Ok(())
    }

    /// Builds one source per calendar entry, in configuration order.
    pub fn build_sources(&self) -> Result<Vec<Box<dyn CalendarSource>>, String> {
        let floating_policy = self.sources.floating_policy()?;
        let timeout = self.sources.fetch_timeout();

        let mut sources: Vec<Box<dyn CalendarSource>> = Vec::with_capacity(self.calendars.len());
        for entry in &self.calendars {
            match entry {
                CalendarEntry::GoogleOauth {
                    identity,
                    calendar_id,
                } => {
                    if identity.trim().is_empty() {
                        return Err(
                            "google-oauth calendar entry has an empty identity".to_string()
                        );
                    }
                    let store = CredentialStore::new(self.sources.credentials_dir());
                    let client =
                        GoogleCalendarClient::new(timeout).map_err(|e| e.to_string())?;
                    sources.push(Box::new(GoogleCalendarSource::new(
                        identity.clone(),
                        calendar_id.clone(),
                        store,
                        client,
                        floating_policy,
                    )));
                }
                CalendarEntry::IcsUrl { url } => {
                    let url = Url::parse(url)
                        .map_err(|e| format!("invalid ICS feed URL {url:?}: {e}"))?;
                    let fetcher = FeedFetcher::new(timeout).map_err(|e| e.to_string())?;
                    sources.push(Box::new(IcsFeedSource::new(url, fetcher, floating_policy)));
                }
            }
        }
        Ok(sources)
    }
}
