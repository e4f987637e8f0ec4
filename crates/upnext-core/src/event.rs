//! Normalized calendar events.
//!
//! [`Event`] is what every calendar source hands to the resolver once
//! source-specific start representations have been normalized to UTC.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder name for events whose source reports no usable title.
pub const UNTITLED_EVENT: &str = "(untitled)";

/// A calendar event after normalization.
///
/// Carries a display name and the start instant in UTC, nothing else. In
/// particular no relative time ("starts in 12 minutes") is stored here:
/// that is derived at decision time from the cycle's single clock reading,
/// so it can never disagree with the window the event was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Display name of the event.
    pub name: String,
    /// Start instant, always UTC.
    pub start_time_utc: DateTime<Utc>,
}

impl Event {
    /// Creates an event from a name and a UTC start.
    ///
    /// A blank name is replaced with [`UNTITLED_EVENT`] so downstream
    /// consumers always have something to show.
    pub fn new(name: impl Into<String>, start_time_utc: DateTime<Utc>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNTITLED_EVENT.to_string()
        } else {
            name
        };
        Self {
            name,
            start_time_utc,
        }
    }

    /// Time remaining until the event starts, relative to `now`.
    ///
    /// Negative when the start is already behind `now`; callers that built
    /// their query window from the same `now` never observe that.
    pub fn time_until(&self, now: DateTime<Utc>) -> Duration {
        self.start_time_utc - now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn keeps_given_name() {
        let event = Event::new("Standup", utc(2025, 6, 1, 9, 0, 0));
        assert_eq!(event.name, "Standup");
    }

    #[test]
    fn blank_name_becomes_placeholder() {
        let event = Event::new("", utc(2025, 6, 1, 9, 0, 0));
        assert_eq!(event.name, UNTITLED_EVENT);

        let event = Event::new("   ", utc(2025, 6, 1, 9, 0, 0));
        assert_eq!(event.name, UNTITLED_EVENT);
    }

    #[test]
    fn time_until_uses_passed_clock() {
        let event = Event::new("Lunch", utc(2025, 6, 1, 12, 0, 0));
        let now = utc(2025, 6, 1, 11, 15, 0);
        assert_eq!(event.time_until(now), Duration::minutes(45));
    }

    #[test]
    fn time_until_is_negative_for_past_starts() {
        let event = Event::new("Gone", utc(2025, 6, 1, 8, 0, 0));
        let now = utc(2025, 6, 1, 9, 0, 0);
        assert_eq!(event.time_until(now), Duration::hours(-1));
    }

    #[test]
    fn serde_roundtrip() {
        let event = Event::new("Standup", utc(2025, 6, 1, 9, 0, 0));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
