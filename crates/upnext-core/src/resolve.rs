//! Reducing gathered candidates to the one event worth displaying.

use crate::event::Event;

/// Picks the candidate with the earliest start.
///
/// Pure reduction: no deduplication, no filtering (window membership was the
/// sources' job). Returns `None` for an empty input. Ties on the start
/// instant keep the candidate seen first, so the result is deterministic for
/// any fixed input order.
pub fn earliest_event<I>(candidates: I) -> Option<Event>
where
    I: IntoIterator<Item = Event>,
{
    let mut best: Option<Event> = None;
    for candidate in candidates {
        match best {
            Some(ref current) if candidate.start_time_utc < current.start_time_utc => {
                best = Some(candidate);
            }
            Some(_) => {}
            None => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn empty_input_resolves_to_none() {
        assert_eq!(earliest_event(Vec::new()), None);
    }

    #[test]
    fn single_candidate_wins() {
        let event = Event::new("Only", utc(2025, 6, 1, 9, 0, 0));
        assert_eq!(earliest_event(vec![event.clone()]), Some(event));
    }

    #[test]
    fn earliest_start_wins_across_sources() {
        let candidates = vec![
            Event::new("Late", utc(2025, 6, 1, 15, 0, 0)),
            Event::new("Soonest", utc(2025, 6, 1, 9, 30, 0)),
            Event::new("Middle", utc(2025, 6, 1, 12, 0, 0)),
        ];
        let resolved = earliest_event(candidates).unwrap();
        assert_eq!(resolved.name, "Soonest");
    }

    #[test]
    fn ties_keep_the_first_seen() {
        let start = utc(2025, 6, 1, 9, 0, 0);
        let candidates = vec![
            Event::new("First", start),
            Event::new("Second", start),
            Event::new("Third", start),
        ];
        let resolved = earliest_event(candidates).unwrap();
        assert_eq!(resolved.name, "First");
    }

    #[test]
    fn tie_after_an_earlier_candidate_does_not_displace_it() {
        let candidates = vec![
            Event::new("Later", utc(2025, 6, 1, 10, 0, 0)),
            Event::new("Winner", utc(2025, 6, 1, 9, 0, 0)),
            Event::new("SameStart", utc(2025, 6, 1, 9, 0, 0)),
        ];
        let resolved = earliest_event(candidates).unwrap();
        assert_eq!(resolved.name, "Winner");
    }
}
