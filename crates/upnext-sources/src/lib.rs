//! CalendarSource trait and implementations.
//!
//! This crate provides the abstraction layer for calendar backends:
//!
//! - [`CalendarSource`] - The capability every configured calendar implements
//! - [`GoogleCalendarSource`] - Google Calendar via a stored OAuth credential
//! - [`IcsFeedSource`] - A plain ICS document fetched over HTTP
//! - [`normalize_start`] - Start-time normalization shared by all sources
//! - [`gather_candidates`] - Concurrent fan-out with per-source failure isolation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  Google API     │    │  ICS feed URL   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌──────────────────────┐  ┌───────────────┐
//! │ GoogleCalendarSource │  │ IcsFeedSource │
//! └──────────┬───────────┘  └───────┬───────┘
//!            │    CalendarSource    │
//!            └──────────┬───────────┘
//!                       │ gather_candidates()
//!                       ▼
//!            Vec<Event> (normalized, in-window)
//! ```
//!
//! Every source yields zero or more normalized [`upnext_core::Event`]
//! candidates inside the cycle's closed look-ahead window. A failing source
//! is logged and contributes nothing; it never hides the other sources'
//! candidates.

pub mod error;
pub mod gather;
pub mod google;
pub mod ics;
pub mod normalize;
pub mod source;

// Re-export main types at crate root
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use gather::gather_candidates;
pub use google::{CredentialStore, GoogleCalendarClient, GoogleCalendarSource, StoredCredential};
pub use ics::{FeedFetcher, IcsFeedSource};
pub use normalize::{FloatingTimePolicy, RawStartTime, normalize_start};
pub use source::{BoxFuture, CalendarSource, FailingSource, StaticSource};
