//! Google Calendar API client.
//!
//! Low-level HTTP only: refreshing an access token and listing events.
//! Deciding which of the listed events count as candidates is the source's
//! job, not the client's.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::credentials::StoredCredential;
use crate::error::{SourceError, SourceResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Endpoint that exchanges a refresh token for an access token.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
}

/// An access token freshly minted from a refresh token.
#[derive(Debug, Clone)]
pub struct RefreshedToken {
    /// The bearer token to use against the API.
    pub access_token: String,
    /// Seconds until it expires, when the endpoint said.
    pub expires_in_secs: Option<i64>,
}

impl GoogleCalendarClient {
    /// Creates a client whose individual requests time out after `timeout`.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("upnext/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Exchanges the stored refresh token for a fresh access token.
    pub async fn refresh_access_token(
        &self,
        credential: &StoredCredential,
    ) -> SourceResult<RefreshedToken> {
        let response = self
            .http_client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
                ("refresh_token", credential.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();

        // invalid_grant (revoked or expired refresh token) comes back as 400.
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
        {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::auth(format!(
                "token refresh rejected ({status}): {body}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::invalid_response(format!(
                "token endpoint error ({status}): {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::network(format!("failed to read token response: {e}")))?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse token response: {e}"))
        })?;

        debug!("refreshed access token");
        Ok(RefreshedToken {
            access_token: token.access_token,
            expires_in_secs: token.expires_in,
        })
    }

    /// Lists events starting inside `[time_min, time_max]`.
    ///
    /// Asks the API to expand recurring events into instances ordered by
    /// start time, and follows `nextPageToken` to the end.
    pub async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> SourceResult<Vec<ApiEvent>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_events_page(
                    access_token,
                    calendar_id,
                    time_min,
                    time_max,
                    page_token.as_deref(),
                )
                .await?;

            all_items.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(calendar_id, count = all_items.len(), "fetched events");
        Ok(all_items)
    }

    /// Fetches a single page of events.
    async fn list_events_page(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> SourceResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SourceError::auth("access token expired or invalid"));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::auth("access denied to calendar"));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::config(format!(
                "calendar {calendar_id:?} not found"
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::network("rate limit exceeded"));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::invalid_response(format!(
                "API error ({status}): {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::network(format!("failed to read response: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| SourceError::invalid_response(format!("failed to parse response: {e}")))
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventListResponse {
    #[serde(default)]
    pub(crate) items: Vec<ApiEvent>,
    pub(crate) next_page_token: Option<String>,
}

/// A single event from the Google Calendar API.
///
/// Only the fields this system reads are declared; everything else in the
/// payload is ignored. `start` and `status` stay optional so one malformed
/// item skips quietly instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    /// Event title.
    pub summary: Option<String>,
    /// Lifecycle status ("confirmed", "tentative", "cancelled").
    pub status: Option<String>,
    /// Start of the event.
    pub start: Option<ApiEventTime>,
}

/// Event start from the API: a timed `dateTime` or an all-day `date`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    /// All-day form, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Timed form, RFC 3339 (usually with an offset).
    pub date_time: Option<String>,
    /// IANA zone qualifying a zone-less `dateTime`.
    pub time_zone: Option<String>,
}
