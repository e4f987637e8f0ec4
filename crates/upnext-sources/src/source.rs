//! CalendarSource trait definition.
//!
//! One [`CalendarSource`] value exists per configured calendar entry. The
//! trait is deliberately narrow: a name for logs and one fetch operation.
//! Everything a backend needs beyond that (credentials, HTTP clients,
//! normalization policy) lives inside the implementation.

use std::future::Future;
use std::pin::Pin;

use upnext_core::{Event, LookaheadWindow};

use crate::error::{SourceError, SourceErrorCode, SourceResult};

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe, which is what lets the orchestrator
/// hold a heterogeneous `Vec<Box<dyn CalendarSource>>` built from
/// configuration.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The capability every configured calendar implements.
///
/// # Contract
///
/// - `fetch_events` yields zero or more normalized candidates whose
///   `start_time_utc` lies inside the closed `window`; ordering within one
///   source is unspecified.
/// - Trouble comes back as a [`SourceError`] value, never as a panic; the
///   fan-out layer logs it and keeps going with the other sources.
/// - "Nothing to say" (an empty calendar, a not-yet-provisioned credential)
///   is an empty `Ok`, not an error.
pub trait CalendarSource: Send + Sync {
    /// Stable identifier for logs ("google:home", "ics:example.org").
    fn name(&self) -> &str;

    /// Fetches candidates with a start inside `window`.
    fn fetch_events<'a>(
        &'a self,
        window: &'a LookaheadWindow,
    ) -> BoxFuture<'a, SourceResult<Vec<Event>>>;
}

/// A source that yields a fixed candidate list, filtered to the window.
///
/// Useful in tests and as a stand-in while wiring a new backend.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    events: Vec<Event>,
}

impl StaticSource {
    /// Creates a static source with the given candidates.
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

impl CalendarSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        window: &'a LookaheadWindow,
    ) -> BoxFuture<'a, SourceResult<Vec<Event>>> {
        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| window.contains(event.start_time_utc))
            .cloned()
            .collect();
        Box::pin(async move { Ok(events) })
    }
}

/// A source that always fails with the same error.
///
/// Used to exercise failure isolation without a real backend misbehaving.
#[derive(Debug, Clone)]
pub struct FailingSource {
    name: String,
    code: SourceErrorCode,
    message: String,
}

impl FailingSource {
    /// Creates a failing source raising the given error on every fetch.
    pub fn new(
        name: impl Into<String>,
        code: SourceErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            message: message.into(),
        }
    }
}

impl CalendarSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        _window: &'a LookaheadWindow,
    ) -> BoxFuture<'a, SourceResult<Vec<Event>>> {
        let error = SourceError::new(self.code, self.message.clone()).with_source_name(&self.name);
        Box::pin(async move { Err(error) })
    }
}
