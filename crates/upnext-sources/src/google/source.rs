//! Calendar source backed by the Google Calendar API.

use tracing::{debug, warn};
use upnext_core::{Event, LookaheadWindow};

use super::client::{ApiEvent, GoogleCalendarClient};
use super::credentials::CredentialStore;
use crate::error::SourceResult;
use crate::normalize::{normalize_start, FloatingTimePolicy, RawStartTime};
use crate::source::{BoxFuture, CalendarSource};

/// A calendar source that reads one Google calendar via OAuth credentials
/// provisioned on disk.
pub struct GoogleCalendarSource {
    name: String,
    identity: String,
    calendar_id: String,
    store: CredentialStore,
    client: GoogleCalendarClient,
    floating_policy: FloatingTimePolicy,
}

impl GoogleCalendarSource {
    /// Creates a source for `identity`, reading `calendar_id` ("primary"
    /// for the account's default calendar).
    pub fn new(
        identity: impl Into<String>,
        calendar_id: impl Into<String>,
        store: CredentialStore,
        client: GoogleCalendarClient,
        floating_policy: FloatingTimePolicy,
    ) -> Self {
        let identity = identity.into();
        Self {
            name: format!("google:{identity}"),
            identity,
            calendar_id: calendar_id.into(),
            store,
            client,
            floating_policy,
        }
    }

    async fn fetch_window(&self, window: &LookaheadWindow) -> SourceResult<Vec<Event>> {
        let Some(mut credential) = self.store.load(&self.identity)? else {
            // Not provisioned yet. The render side treats this the same as
            // a calendar with nothing scheduled.
            warn!(
                identity = %self.identity,
                path = %self.store.path_for(&self.identity).display(),
                "no stored credential; treating calendar as empty"
            );
            return Ok(Vec::new());
        };

        let access_token = match credential.fresh_access_token(window.now) {
            Some(token) => token.to_string(),
            None => {
                let refreshed = self.client.refresh_access_token(&credential).await?;
                credential.update_access_token(
                    &refreshed.access_token,
                    refreshed.expires_in_secs,
                    window.now,
                );
                if let Err(error) = self.store.save(&self.identity, &credential) {
                    warn!(
                        identity = %self.identity,
                        error = %error,
                        "failed to persist refreshed access token"
                    );
                }
                refreshed.access_token
            }
        };

        let items = self
            .client
            .list_events(&access_token, &self.calendar_id, window.now, window.until)
            .await?;

        let events: Vec<Event> = items
            .into_iter()
            .filter_map(|item| self.convert_item(item))
            .filter(|event| window.contains(event.start_time_utc))
            .collect();

        debug!(identity = %self.identity, count = events.len(), "converted events");
        Ok(events)
    }

    /// Converts one API item into a candidate event.
    ///
    /// Returns `None` for anything that is not a confirmed, timed event:
    /// cancelled and tentative entries, all-day entries, and entries whose
    /// start this code cannot read.
    fn convert_item(&self, item: ApiEvent) -> Option<Event> {
        if item.status.as_deref() != Some("confirmed") {
            return None;
        }

        let start = item.start?;
        let date_time = start.date_time?;

        let raw = if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(&date_time) {
            RawStartTime::Utc(parsed.with_timezone(&chrono::Utc))
        } else if let Ok(local) =
            chrono::NaiveDateTime::parse_from_str(&date_time, "%Y-%m-%dT%H:%M:%S")
        {
            match start.time_zone {
                Some(zone) => RawStartTime::Zoned { local, zone },
                None => RawStartTime::Floating(local),
            }
        } else {
            warn!(value = %date_time, "skipping event with unreadable start time");
            return None;
        };

        let start_time_utc = normalize_start(&raw, self.floating_policy);
        Some(Event::new(item.summary.unwrap_or_default(), start_time_utc))
    }
}

impl CalendarSource for GoogleCalendarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        window: &'a LookaheadWindow,
    ) -> BoxFuture<'a, SourceResult<Vec<Event>>> {
        Box::pin(async move {
            self.fetch_window(window)
                .await
                .map_err(|error| error.with_source_name(&self.name))
        })
    }
}
