use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate, NaiveDateTime, ParseError};

/// Calendar month a bill is aggregated over.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[must_use]
pub struct YearMonth {
    pub year: i32,

    /// `1..=12`.
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn contains(self, timestamp: NaiveDateTime) -> bool {
        Self::from(timestamp) == self
    }
}

impl From<NaiveDateTime> for YearMonth {
    fn from(timestamp: NaiveDateTime) -> Self {
        Self { year: timestamp.year(), month: timestamp.month() }
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first_day = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")?;
        Ok(Self { year: first_day.year(), month: first_day.month() })
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Debug for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
