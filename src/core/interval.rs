use std::fmt::{Debug, Formatter};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

/// Wall-clock billing interval.
#[derive(Copy, Clone, Eq, PartialEq, Serialize)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: NaiveDateTime,

    /// Exclusive.
    pub end: NaiveDateTime,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    /// [`None`] when the end is out of the representable range.
    #[must_use]
    pub fn starting_at(start: NaiveDateTime, duration: TimeDelta) -> Option<Self> {
        Some(Self { start, end: start.checked_add_signed(duration)? })
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }
}
