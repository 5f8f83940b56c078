use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

use crate::core::tariff::calendar::{ClockTime, DayOfWeek, MonthOfYear};

/// Tariff periods do not partition the day.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("the tariff has no rate periods")]
    Empty,

    #[error("no rate period covers {day} in {month} from {from} until {until}")]
    Gap { month: MonthOfYear, day: DayOfWeek, from: ClockTime, until: ClockTime },

    #[error("rate periods `{first}` and `{second}` overlap on {day} in {month} at {at}")]
    Overlap { month: MonthOfYear, day: DayOfWeek, first: String, second: String, at: ClockTime },
}

/// Series joined with the battery dispatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeriesKind {
    MarketPrices,
    BaselineLoad,
}

impl Display for SeriesKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarketPrices => write!(f, "market prices"),
            Self::BaselineLoad => write!(f, "baseline load"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SavingsError {
    /// The series cannot be joined by exact timestamps.
    ///
    /// [`None`] means the respective series has already ended.
    #[error(
        "{series} are misaligned with the battery dispatch at #{index}: expected {expected:?}, found {found:?}"
    )]
    MisalignedSeries {
        series: SeriesKind,
        index: usize,
        expected: Option<NaiveDateTime>,
        found: Option<NaiveDateTime>,
    },

    #[error("no tariff period covers the interval starting at {0}")]
    UncoveredInterval(NaiveDateTime),
}
