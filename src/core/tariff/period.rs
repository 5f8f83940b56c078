use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

use chrono::{NaiveTime, Timelike};
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::tariff::calendar::{CalendarSlot, DayOfWeek, MonthOfYear},
    quantity::rate::KilowattHourRate,
};

pub const SECONDS_PER_DAY: u32 = 86_400;

/// How exported energy is compensated within a rate period.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportCompensation {
    /// Exported energy earns nothing.
    #[default]
    None,

    /// Fixed feed-in rate.
    Fixed(KilowattHourRate),

    /// Wholesale market price of the interval.
    Market,
}

impl ExportCompensation {
    pub const fn rate(self, market_price: KilowattHourRate) -> KilowattHourRate {
        match self {
            Self::None => KilowattHourRate::ZERO,
            Self::Fixed(rate) => rate,
            Self::Market => market_price,
        }
    }
}

impl Display for ExportCompensation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fixed(rate) => write!(f, "{rate}"),
            Self::Market => write!(f, "market"),
        }
    }
}

/// Time-of-use rate period.
///
/// The window is wall-clock `start..end`. An `end` before the `start` wraps past midnight,
/// and `start == end` covers the whole day. Day and month filters apply to the calendar
/// day of the timestamp being resolved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatePeriod {
    pub name: String,

    #[serde(default = "EnumSet::all")]
    pub months: EnumSet<MonthOfYear>,

    #[serde(default = "EnumSet::all")]
    pub days: EnumSet<DayOfWeek>,

    #[serde(default)]
    pub start: NaiveTime,

    #[serde(default)]
    pub end: NaiveTime,

    pub import_rate: KilowattHourRate,

    #[serde(default)]
    pub export: ExportCompensation,
}

impl RatePeriod {
    /// Flat all-day period.
    pub fn flat(name: impl Into<String>, import_rate: KilowattHourRate) -> Self {
        Self {
            name: name.into(),
            months: EnumSet::all(),
            days: EnumSet::all(),
            start: NaiveTime::default(),
            end: NaiveTime::default(),
            import_rate,
            export: ExportCompensation::None,
        }
    }

    #[must_use]
    pub fn applies_on(&self, month: MonthOfYear, day: DayOfWeek) -> bool {
        self.months.contains(month) && self.days.contains(day)
    }

    #[must_use]
    pub fn contains(&self, slot: CalendarSlot) -> bool {
        self.applies_on(slot.month, slot.day)
            && self.windows().any(|window| window.contains(&slot.second_of_day))
    }

    /// Window of the day in seconds, split in two when it wraps past midnight.
    pub fn windows(&self) -> impl Iterator<Item = Range<u32>> {
        let start = self.start.num_seconds_from_midnight();
        let end = self.end.num_seconds_from_midnight();
        let (first, second) = if start == end {
            (0..SECONDS_PER_DAY, None)
        } else if start < end {
            (start..end, None)
        } else {
            (start..SECONDS_PER_DAY, Some(0..end))
        };
        std::iter::once(first).chain(second.filter(|window| !window.is_empty()))
    }
}
