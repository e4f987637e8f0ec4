//! Published ICS feed source.
//!
//! Fetches an iCalendar document over HTTP and parses its VEVENTs into
//! candidate events. Unlike the Google source there is no account or
//! credential involved, and no status filtering: whatever the feed
//! publishes is taken at face value. All-day entries count as starting
//! at midnight UTC on their date.

mod fetch;
mod parse;
mod source;

pub use fetch::FeedFetcher;
pub use parse::parse_feed;
pub use source::IcsFeedSource;
