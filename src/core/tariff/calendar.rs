use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Hash, Serialize, Deserialize, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
#[enumset(serialize_repr = "list")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Hash, Serialize, Deserialize, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
#[enumset(serialize_repr = "list")]
pub enum MonthOfYear {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl MonthOfYear {
    const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];
}

impl Display for MonthOfYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Calendar coordinates a rate period is matched against.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CalendarSlot {
    pub month: MonthOfYear,
    pub day: DayOfWeek,

    /// Seconds since the wall-clock midnight.
    pub second_of_day: u32,
}

impl From<NaiveDateTime> for CalendarSlot {
    fn from(timestamp: NaiveDateTime) -> Self {
        Self {
            month: MonthOfYear::ALL[timestamp.month0() as usize],
            day: timestamp.weekday().into(),
            second_of_day: timestamp.num_seconds_from_midnight(),
        }
    }
}

/// Second of the day formatted as `HH:MM`, the end of the day is `24:00`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClockTime(pub u32);

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 3600, self.0 % 3600 / 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_calendar_slot() {
        // 2024-03-29 was a Friday.
        let timestamp =
            NaiveDate::from_ymd_opt(2024, 3, 29).unwrap().and_hms_opt(16, 30, 15).unwrap();
        let slot = CalendarSlot::from(timestamp);
        assert_eq!(slot.month, MonthOfYear::Mar);
        assert_eq!(slot.day, DayOfWeek::Fri);
        assert_eq!(slot.second_of_day, 16 * 3600 + 30 * 60 + 15);
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(ClockTime(7 * 3600 + 30 * 60).to_string(), "07:30");
        assert_eq!(ClockTime(86_400).to_string(), "24:00");
    }
}
