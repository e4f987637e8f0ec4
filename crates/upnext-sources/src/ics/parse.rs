//! iCalendar (RFC 5545) parsing.

use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event as VEvent,
};
use tracing::warn;
use upnext_core::Event;

use crate::error::{SourceError, SourceResult};
use crate::normalize::{normalize_start, FloatingTimePolicy, RawStartTime};

/// Parses an ICS document into candidate events.
///
/// A document that is not iCalendar at all is an error; a single VEVENT
/// that cannot be read is skipped with a warning so the rest of the feed
/// still counts.
pub fn parse_feed(ics: &str, policy: FloatingTimePolicy) -> SourceResult<Vec<Event>> {
    let calendar = ics
        .parse::<Calendar>()
        .map_err(|e: String| SourceError::parse(format!("invalid iCalendar data: {e}")))?;

    let events = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(vevent) => convert_vevent(vevent, policy),
            _ => None,
        })
        .collect();

    Ok(events)
}

/// Converts one VEVENT into a candidate event.
fn convert_vevent(vevent: &VEvent, policy: FloatingTimePolicy) -> Option<Event> {
    let Some(start) = vevent.get_start() else {
        warn!(
            summary = ?vevent.get_summary(),
            "skipping VEVENT without a readable DTSTART"
        );
        return None;
    };

    let raw = match start {
        DatePerhapsTime::Date(date) => RawStartTime::Date(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(instant)) => RawStartTime::Utc(instant),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(local)) => {
            RawStartTime::Floating(local)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            RawStartTime::Zoned {
                local: date_time,
                zone: tzid,
            }
        }
    };

    let start_time_utc = normalize_start(&raw, policy);
    Some(Event::new(
        vevent.get_summary().unwrap_or_default(),
        start_time_utc,
    ))
}
