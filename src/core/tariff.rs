pub mod calendar;
pub mod period;

use chrono::NaiveDateTime;
use enumset::EnumSet;
use itertools::Itertools;

pub use self::period::{ExportCompensation, RatePeriod};
use crate::{
    core::{
        error::ScheduleError,
        tariff::{
            calendar::{CalendarSlot, ClockTime, DayOfWeek, MonthOfYear},
            period::SECONDS_PER_DAY,
        },
    },
    prelude::*,
    quantity::rate::KilowattRate,
};

/// Validated time-of-use tariff.
///
/// For every month and day of week, the rate periods cover the whole day exactly once,
/// so that any timestamp resolves to a single period.
#[must_use]
#[derive(Clone, Debug)]
pub struct TariffSchedule {
    name: String,
    periods: Vec<RatePeriod>,

    /// Monthly charge per kilowatt of the peak grid import.
    demand_charge: Option<KilowattRate>,
}

impl TariffSchedule {
    #[instrument(skip_all, fields(n_periods = periods.len()))]
    pub fn try_new(
        name: impl Into<String>,
        periods: Vec<RatePeriod>,
        demand_charge: Option<KilowattRate>,
    ) -> Result<Self, ScheduleError> {
        if periods.is_empty() {
            return Err(ScheduleError::Empty);
        }
        for month in EnumSet::<MonthOfYear>::all() {
            for day in EnumSet::<DayOfWeek>::all() {
                Self::validate_day(&periods, month, day)?;
            }
        }
        debug!("validated");
        Ok(Self { name: name.into(), periods, demand_charge })
    }

    /// Check that the periods applicable on the day partition it without gaps and overlaps.
    fn validate_day(
        periods: &[RatePeriod],
        month: MonthOfYear,
        day: DayOfWeek,
    ) -> Result<(), ScheduleError> {
        let windows = periods
            .iter()
            .filter(|period| period.applies_on(month, day))
            .flat_map(|period| period.windows().map(move |window| (window, period.name.as_str())))
            .sorted_by_key(|(window, _)| window.start);

        let mut covered_until = 0;
        let mut previous_name: Option<&str> = None;
        for (window, name) in windows {
            if window.start > covered_until {
                return Err(ScheduleError::Gap {
                    month,
                    day,
                    from: ClockTime(covered_until),
                    until: ClockTime(window.start),
                });
            }
            if window.start < covered_until {
                return Err(ScheduleError::Overlap {
                    month,
                    day,
                    first: previous_name.unwrap_or_default().to_owned(),
                    second: name.to_owned(),
                    at: ClockTime(window.start),
                });
            }
            covered_until = window.end;
            previous_name = Some(name);
        }
        if covered_until < SECONDS_PER_DAY {
            return Err(ScheduleError::Gap {
                month,
                day,
                from: ClockTime(covered_until),
                until: ClockTime(SECONDS_PER_DAY),
            });
        }
        Ok(())
    }

    /// Bypass the validation, so that the callers can exercise unresolvable timestamps.
    #[cfg(test)]
    pub(crate) fn new_unchecked(name: &str, periods: Vec<RatePeriod>) -> Self {
        Self { name: name.to_owned(), periods, demand_charge: None }
    }

    /// Find the rate period the timestamp falls into.
    ///
    /// Always [`Some`] for a validated schedule, the caller still surfaces [`None`] as an error.
    #[must_use]
    pub fn resolve(&self, timestamp: NaiveDateTime) -> Option<&RatePeriod> {
        let slot = CalendarSlot::from(timestamp);
        self.periods.iter().find(|period| period.contains(slot))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn periods(&self) -> &[RatePeriod] {
        &self.periods
    }

    #[must_use]
    pub const fn demand_charge(&self) -> Option<KilowattRate> {
        self.demand_charge
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::quantity::rate::KilowattHourRate;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn windowed(name: &str, start: NaiveTime, end: NaiveTime, rate: f64) -> RatePeriod {
        RatePeriod { start, end, ..RatePeriod::flat(name, KilowattHourRate::from(rate)) }
    }

    /// Weekday peak and partial peak, the rest of the time is off-peak.
    fn time_of_use() -> Vec<RatePeriod> {
        let weekdays = EnumSet::<DayOfWeek>::all() - DayOfWeek::Sat - DayOfWeek::Sun;
        vec![
            RatePeriod { days: weekdays, ..windowed("peak", at(16, 0), at(21, 0), 0.35) },
            RatePeriod { days: weekdays, ..windowed("partial-peak", at(7, 0), at(16, 0), 0.25) },
            RatePeriod { days: weekdays, ..windowed("off-peak", at(21, 0), at(7, 0), 0.18) },
            RatePeriod {
                days: DayOfWeek::Sat | DayOfWeek::Sun,
                ..windowed("weekend", at(0, 0), at(0, 0), 0.12)
            },
        ]
    }

    #[test]
    fn test_flat_tariff_ok() -> Result {
        let tariff = TariffSchedule::try_new(
            "flat",
            vec![RatePeriod::flat("flat", KilowattHourRate::from(0.3))],
            None,
        )?;
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(13, 5, 0).unwrap();
        assert_eq!(tariff.resolve(timestamp).unwrap().name, "flat");
        Ok(())
    }

    #[test]
    fn test_time_of_use_resolve() -> Result {
        let tariff = TariffSchedule::try_new("tou", time_of_use(), None)?;
        // Friday:
        let friday = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();
        assert_eq!(tariff.resolve(friday.and_hms_opt(16, 0, 0).unwrap()).unwrap().name, "peak");
        assert_eq!(
            tariff.resolve(friday.and_hms_opt(15, 59, 59).unwrap()).unwrap().name,
            "partial-peak",
        );
        assert_eq!(tariff.resolve(friday.and_hms_opt(23, 0, 0).unwrap()).unwrap().name, "off-peak");
        assert_eq!(tariff.resolve(friday.and_hms_opt(3, 0, 0).unwrap()).unwrap().name, "off-peak");
        // Saturday:
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        assert_eq!(
            tariff.resolve(saturday.and_hms_opt(17, 0, 0).unwrap()).unwrap().name,
            "weekend",
        );
        Ok(())
    }

    #[test]
    fn test_seasonal_resolve() -> Result {
        let summer = MonthOfYear::Jun | MonthOfYear::Jul | MonthOfYear::Aug | MonthOfYear::Sep;
        let tariff = TariffSchedule::try_new(
            "seasonal",
            vec![
                RatePeriod {
                    months: summer,
                    ..RatePeriod::flat("summer", KilowattHourRate::from(0.35))
                },
                RatePeriod {
                    months: EnumSet::<MonthOfYear>::all() - summer,
                    ..RatePeriod::flat("winter", KilowattHourRate::from(0.28))
                },
            ],
            None,
        )?;
        let july = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(tariff.resolve(july).unwrap().name, "summer");
        assert_eq!(tariff.resolve(march).unwrap().name, "winter");
        Ok(())
    }

    #[test]
    fn test_empty_schedule() {
        let result = TariffSchedule::try_new("empty", vec![], None);
        assert!(matches!(result, Err(ScheduleError::Empty)));
    }

    #[test]
    fn test_gap() {
        let mut periods = time_of_use();
        periods.remove(1);
        let error = TariffSchedule::try_new("gap", periods, None).unwrap_err();
        assert!(
            matches!(
                error,
                ScheduleError::Gap { from: ClockTime(25_200), until: ClockTime(57_600), .. }
            ),
            "{error}",
        );
    }

    #[test]
    fn test_gap_at_the_end_of_the_day() {
        let periods = vec![windowed("morning", at(0, 0), at(12, 0), 0.2)];
        let error = TariffSchedule::try_new("gap", periods, None).unwrap_err();
        assert!(
            matches!(
                error,
                ScheduleError::Gap { from: ClockTime(43_200), until: ClockTime(86_400), .. }
            ),
            "{error}",
        );
    }

    #[test]
    fn test_overlap() {
        let mut periods = time_of_use();
        periods.push(RatePeriod {
            days: DayOfWeek::Sat | DayOfWeek::Sun,
            ..windowed("super-off-peak", at(0, 0), at(6, 0), 0.10)
        });
        let error = TariffSchedule::try_new("overlap", periods, None).unwrap_err();
        assert!(matches!(error, ScheduleError::Overlap { .. }), "{error}");
    }

    #[test]
    fn test_seasonal_gap() {
        let periods = vec![RatePeriod {
            months: MonthOfYear::Jun | MonthOfYear::Jul,
            ..RatePeriod::flat("summer", KilowattHourRate::from(0.35))
        }];
        let error = TariffSchedule::try_new("summer only", periods, None).unwrap_err();
        assert!(matches!(error, ScheduleError::Gap { month: MonthOfYear::Jan, .. }), "{error}");
    }
}
