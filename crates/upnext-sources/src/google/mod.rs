//! Google Calendar source implementation.
//!
//! This module provides a [`GoogleCalendarSource`] that fetches events from
//! the Google Calendar API using a previously stored OAuth credential.
//!
//! # What this module does NOT do
//!
//! The interactive authorization flow. A credential file is expected to have
//! been provisioned out of band (any tool that produces a Google
//! authorized-user JSON document will do); this module only reads it,
//! refreshes the short-lived access token when needed, and queries the
//! events API with it.
//!
//! # Behavior
//!
//! - A missing credential file is absence, not an error: the source logs it
//!   and yields no candidates, so a calendar can be configured before its
//!   credential exists.
//! - Only `confirmed` events with a timed start count for this source kind;
//!   all-day entries are background noise on a "what's next" display.
//!
//! # Example
//!
//! ```ignore
//! use upnext_sources::google::{CredentialStore, GoogleCalendarClient, GoogleCalendarSource};
//!
//! let store = CredentialStore::new("/var/lib/upnext");
//! let client = GoogleCalendarClient::new(Duration::from_secs(30))?;
//! let source = GoogleCalendarSource::new("home", "primary", store, client, policy);
//! let events = source.fetch_events(&window).await?;
//! ```

mod client;
mod credentials;
mod source;

pub use client::{GoogleCalendarClient, RefreshedToken};
pub use credentials::{CredentialStore, StoredCredential};
pub use source::GoogleCalendarSource;
