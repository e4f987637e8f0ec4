//! Parsing the look-ahead duration spec.
//!
//! The look-ahead is configured as `"D.HH:MM:SS"`: a day count, a dot, then
//! an hours/minutes/seconds triple. `"1.02:03:04"` is one day, two hours,
//! three minutes and four seconds. Fields are plain non-negative integers
//! with no range cap, so `"0.30:00:00"` is a perfectly good thirty hours.

use chrono::Duration;
use thiserror::Error;

/// A look-ahead spec that cannot be understood.
///
/// The only error in the system that aborts a whole cycle: the window the
/// spec would have defined is the basis of everything downstream, and
/// guessing would show the wrong event with full confidence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed look-ahead duration {spec:?}: {reason}")]
pub struct MalformedDurationSpec {
    /// The input as given.
    pub spec: String,
    /// What was wrong with it.
    pub reason: String,
}

impl MalformedDurationSpec {
    fn new(spec: &str, reason: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parses a `"D.HH:MM:SS"` look-ahead spec into a duration.
pub fn parse_lookahead(spec: &str) -> Result<Duration, MalformedDurationSpec> {
    let Some((days_part, time_part)) = spec.split_once('.') else {
        return Err(MalformedDurationSpec::new(
            spec,
            "expected '.' between days and time of day",
        ));
    };

    let time_fields: Vec<&str> = time_part.split(':').collect();
    if time_fields.len() != 3 {
        return Err(MalformedDurationSpec::new(
            spec,
            format!(
                "expected three ':'-separated time fields, got {}",
                time_fields.len()
            ),
        ));
    }

    let days = parse_field(spec, days_part, "days")?;
    let hours = parse_field(spec, time_fields[0], "hours")?;
    let minutes = parse_field(spec, time_fields[1], "minutes")?;
    let seconds = parse_field(spec, time_fields[2], "seconds")?;

    let total_seconds = days
        .checked_mul(86_400)
        .and_then(|t| t.checked_add(hours.checked_mul(3_600)?))
        .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
        .and_then(|t| t.checked_add(seconds))
        .ok_or_else(|| {
            MalformedDurationSpec::new(spec, "duration exceeds the representable range")
        })?;

    Duration::try_seconds(total_seconds).ok_or_else(|| {
        MalformedDurationSpec::new(spec, "duration exceeds the representable range")
    })
}

fn parse_field(spec: &str, field: &str, name: &str) -> Result<i64, MalformedDurationSpec> {
    field
        .parse::<i64>()
        .ok()
        .filter(|value| *value >= 0)
        .ok_or_else(|| {
            MalformedDurationSpec::new(
                spec,
                format!("{name} field {field:?} is not a non-negative integer"),
            )
        })
}
