//! Start-time normalization shared by all sources.
//!
//! Calendar backends report event starts in four shapes; everything
//! downstream wants exactly one: an instant in UTC. [`normalize_start`] is
//! the single place that mapping happens, so no source can invent its own
//! timezone arithmetic.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// An event start as a source observed it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStartTime {
    /// A date with no time of day (an all-day event).
    Date(NaiveDate),
    /// A wall-clock datetime with no zone attached at all.
    Floating(NaiveDateTime),
    /// A wall-clock datetime qualified with an IANA zone name.
    Zoned {
        /// The local wall-clock reading.
        local: NaiveDateTime,
        /// The IANA zone name it was reported in ("Europe/Paris").
        zone: String,
    },
    /// Already an instant (UTC or offset-carrying, converted on construction).
    Utc(DateTime<Utc>),
}

/// How to interpret floating (zone-less) wall-clock datetimes.
///
/// Feeds that emit floating times leave the interpretation to the consumer.
/// The historical behavior of this kind of display is "assume UTC"; that
/// stays the default, but it is a policy here rather than a hard-coded
/// assumption, so an operator whose feeds are known to be local time can say
/// so in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatingTimePolicy {
    /// Read floating wall-clock times as UTC (default).
    #[default]
    AssumeUtc,
    /// Read floating wall-clock times in the given zone.
    AssumeZone(Tz),
}

impl FloatingTimePolicy {
    /// Builds a policy from an optional configured zone name.
    ///
    /// `None` and `"UTC"` both mean [`FloatingTimePolicy::AssumeUtc`].
    pub fn from_zone_name(name: Option<&str>) -> Result<Self, String> {
        match name {
            None => Ok(Self::AssumeUtc),
            Some(name) if name.eq_ignore_ascii_case("utc") => Ok(Self::AssumeUtc),
            Some(name) => Tz::from_str(name)
                .map(Self::AssumeZone)
                .map_err(|e| format!("unknown time zone {name:?}: {e}")),
        }
    }
}

/// Normalizes a raw start to an instant in UTC.
///
/// Total for well-formed input, and idempotent: feeding an already-UTC
/// instant back through is the identity.
///
/// - Date-only becomes midnight UTC of that date.
/// - Floating datetimes follow `policy`.
/// - Zone-qualified datetimes are interpreted in their zone, then converted;
///   an unknown zone name degrades to the floating policy with a warning.
/// - A wall-clock reading made ambiguous by a DST fold resolves to the
///   earlier instant; one inside a DST gap resolves as if UTC.
pub fn normalize_start(raw: &RawStartTime, policy: FloatingTimePolicy) -> DateTime<Utc> {
    match raw {
        RawStartTime::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        RawStartTime::Floating(local) => apply_policy(local, policy),
        RawStartTime::Zoned { local, zone } => match Tz::from_str(zone) {
            Ok(tz) => resolve_local(local, tz),
            Err(_) => {
                warn!(zone = %zone, "unknown time zone on event start; treating as floating");
                apply_policy(local, policy)
            }
        },
        RawStartTime::Utc(instant) => *instant,
    }
}

fn apply_policy(local: &NaiveDateTime, policy: FloatingTimePolicy) -> DateTime<Utc> {
    match policy {
        FloatingTimePolicy::AssumeUtc => local.and_utc(),
        FloatingTimePolicy::AssumeZone(tz) => resolve_local(local, tz),
    }
}

fn resolve_local(local: &NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(mapped) => mapped.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _later) => earlier.with_timezone(&Utc),
        // The wall clock skipped this reading (DST gap); no instant in the
        // zone corresponds to it.
        LocalResult::None => local.and_utc(),
    }
}
