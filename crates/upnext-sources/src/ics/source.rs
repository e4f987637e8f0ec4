//! Calendar source backed by a published ICS feed.

use tracing::debug;
use upnext_core::{Event, LookaheadWindow};
use url::Url;

use super::fetch::FeedFetcher;
use super::parse::parse_feed;
use crate::error::SourceResult;
use crate::normalize::FloatingTimePolicy;
use crate::source::{BoxFuture, CalendarSource};

/// A calendar source that reads one published ICS feed URL.
pub struct IcsFeedSource {
    name: String,
    url: Url,
    fetcher: FeedFetcher,
    floating_policy: FloatingTimePolicy,
}

impl IcsFeedSource {
    /// Creates a source for the feed at `url`.
    pub fn new(url: Url, fetcher: FeedFetcher, floating_policy: FloatingTimePolicy) -> Self {
        let name = format!("ics:{}", url.host_str().unwrap_or("feed"));
        Self {
            name,
            url,
            fetcher,
            floating_policy,
        }
    }

    async fn fetch_window(&self, window: &LookaheadWindow) -> SourceResult<Vec<Event>> {
        let body = self.fetcher.fetch(&self.url).await?;
        let events: Vec<Event> = parse_feed(&body, self.floating_policy)?
            .into_iter()
            .filter(|event| window.contains(event.start_time_utc))
            .collect();

        debug!(url = %self.url, count = events.len(), "events inside window");
        Ok(events)
    }
}

impl CalendarSource for IcsFeedSource {
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
