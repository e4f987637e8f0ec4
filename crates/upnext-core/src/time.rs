//! The look-ahead query window.
//!
//! A cycle captures the clock exactly once and builds a [`LookaheadWindow`]
//! from it; every later step that needs "now" reads it from the window, so a
//! single cycle can never see two different clocks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The closed interval `[now, until]` a cycle searches for candidates.
///
/// Membership includes both endpoints: an event starting exactly at `until`
/// is still a candidate, one second later it is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadWindow {
    /// The cycle's single clock reading, also the inclusive lower bound.
    pub now: DateTime<Utc>,
    /// Inclusive upper bound of the search.
    pub until: DateTime<Utc>,
}

impl LookaheadWindow {
    /// Creates a window from the cycle clock and a look-ahead duration.
    ///
    /// A zero look-ahead yields `[now, now]`, which nothing a real feed
    /// produces can match; a negative one yields `until < now`, which
    /// nothing at all can match. Neither is an error, both are just empty
    /// in practice.
    pub fn starting_at(now: DateTime<Utc>, lookahead: Duration) -> Self {
        Self {
            now,
            until: now + lookahead,
        }
    }

    /// Length of the window.
    pub fn lookahead(&self) -> Duration {
        self.until - self.now
    }

    /// Closed-interval membership: `now <= t && t <= until`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.now <= t && t <= self.until
    }
}
