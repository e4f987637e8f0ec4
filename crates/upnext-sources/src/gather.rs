//! Concurrent fan-out across configured sources.

use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};
use upnext_core::{Event, LookaheadWindow};

use crate::error::SourceError;
use crate::source::CalendarSource;

/// Queries every source concurrently and concatenates what succeeded.
///
/// Each fetch is bounded by `fetch_timeout`; running out of budget is an
/// ordinary source failure. A failing source is logged at warn level and
/// contributes nothing, and it never prevents the remaining sources'
/// candidates from being considered.
///
/// Candidates keep the configured source order, so downstream tie-breaks
/// stay stable from cycle to cycle.
pub async fn gather_candidates(
    sources: &[Box<dyn CalendarSource>],
    window: &LookaheadWindow,
    fetch_timeout: Duration,
) -> Vec<Event> {
    let fetches = sources.iter().map(|source| async move {
        let result = match tokio::time::timeout(fetch_timeout, source.fetch_events(window)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(SourceError::timeout(format!(
                "no response within {fetch_timeout:?}"
            ))
            .with_source_name(source.name())),
        };
        (source.name().to_string(), result)
    });

    let mut candidates = Vec::new();
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(events) => {
                debug!(source = %name, count = events.len(), "source yielded candidates");
                candidates.extend(events);
            }
            Err(error) => {
                warn!(source = %name, error = %error, "source failed; continuing without it");
            }
        }
    }
    candidates
}
