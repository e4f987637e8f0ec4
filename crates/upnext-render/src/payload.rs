//! The data handed to a sink.

use chrono::Duration;
use serde::{Serialize, Serializer};

/// What the display should show after a resolution cycle.
///
/// Carries everything a sink needs; sinks never reach back into calendar
/// data. `time_until` is measured from the cycle's single reference
/// instant, so every sink fed from the same cycle agrees on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPayload {
    /// One event was resolved as the next upcoming one.
    UpcomingEvent {
        /// Event title.
        name: String,
        /// Time from the cycle's reference instant to the event start.
        #[serde(serialize_with = "duration_as_seconds")]
        time_until: Duration,
    },
    /// Nothing inside the look-ahead window.
    NoEvents {
        /// Configured standby text.
        message: String,
    },
}

impl RenderPayload {
    /// Plain-text rendition of the payload, as the built-in sinks emit it.
    pub fn display_text(&self) -> String {
        match self {
            Self::UpcomingEvent { name, time_until } => {
                format!("{name}\n{}", format_time_until(*time_until))
            }
            Self::NoEvents { message } => message.clone(),
        }
    }
}

fn duration_as_seconds<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_seconds())
}

/// Formats a duration-until as display text, e.g. "In 1 hour and 5 minutes".
///
/// Partial minutes round up, so an event 61 seconds away reads "In 2
/// minutes" rather than flipping to "In 1 minute" the moment it is no
/// longer exactly two. Zero or negative durations read "Now".
pub fn format_time_until(time_until: Duration) -> String {
    let secs = time_until.num_seconds();
    let total_minutes = if secs > 0 { (secs + 59) / 60 } else { 0 };

    if total_minutes <= 0 {
        return "Now".to_string();
    }

    let days = total_minutes.div_euclid(24 * 60);
    let hours = total_minutes.rem_euclid(24 * 60).div_euclid(60);
    let minutes = total_minutes.rem_euclid(60);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, if days != 1 { "s" } else { "" }));
    }
    if hours > 0 {
        parts.push(format!(
            "{} hour{}",
            hours,
            if hours != 1 { "s" } else { "" }
        ));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!(
            "{} minute{}",
            minutes,
            if minutes != 1 { "s" } else { "" }
        ));
    }

    if parts.len() == 1 {
        format!("In {}", parts[0])
    } else {
        let last = parts.pop().expect("parts contains at least two entries");
        format!("In {} and {}", parts.join(", "), last)
    }
}
