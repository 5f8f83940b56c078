use itertools::Itertools;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{flow::Flow, series::DispatchInterval, year_month::YearMonth},
    quantity::energy::KilowattHours,
    statistics::Spread,
};

/// Battery operation over a calendar month.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct BatteryStatistics {
    #[serde_as(as = "DisplayFromStr")]
    pub month: YearMonth,

    /// Charged energy as the import, discharged energy as the export.
    pub energy: Flow<KilowattHours>,

    pub n_charging: usize,
    pub n_discharging: usize,
    pub n_idle: usize,

    /// State of charge in percent, [`None`] when the log has none.
    pub state_of_charge: Option<Spread>,
}

impl BatteryStatistics {
    /// Summarize the chronological dispatch series per calendar month.
    pub fn monthly(dispatch: &[DispatchInterval]) -> Vec<Self> {
        dispatch
            .iter()
            .chunk_by(|interval| YearMonth::from(interval.interval.start))
            .into_iter()
            .map(|(month, intervals)| Self::summarize(month, &intervals.collect_vec()))
            .collect()
    }

    fn summarize(month: YearMonth, intervals: &[&DispatchInterval]) -> Self {
        let n_charging = intervals.iter().filter(|interval| interval.is_charging()).count();
        let n_discharging = intervals.iter().filter(|interval| interval.is_discharging()).count();
        let energy = intervals
            .iter()
            .map(|interval| Flow::from_net(-interval.energy))
            .fold(Flow::ZERO, |total, flow| total + flow);
        let state_of_charge = intervals
            .iter()
            .filter_map(|interval| interval.state_of_charge)
            .collect_vec();
        Self {
            month,
            energy,
            n_charging,
            n_discharging,
            n_idle: intervals.len() - n_charging - n_discharging,
            state_of_charge: Spread::from_sample(&state_of_charge),
        }
    }

    /// Discharged energy over charged energy, [`None`] when nothing has been charged.
    #[must_use]
    pub fn round_trip(&self) -> Option<f64> {
        (self.energy.import > KilowattHours::ZERO)
            .then(|| (self.energy.export / self.energy.import).0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::core::interval::Interval;

    fn interval(
        day: u32,
        month: u32,
        energy: f64,
        state_of_charge: Option<f64>,
    ) -> DispatchInterval {
        let start =
            NaiveDate::from_ymd_opt(2024, month, day).unwrap().and_hms_opt(12, 0, 0).unwrap();
        DispatchInterval::new(
            Interval::starting_at(start, TimeDelta::hours(1)).unwrap(),
            energy.into(),
        )
            .with_state_of_charge(state_of_charge)
    }

    #[test]
    fn test_monthly() {
        let statistics = BatteryStatistics::monthly(&[
            interval(30, 3, -2.0, Some(20.0)),
            interval(31, 3, 1.5, Some(60.0)),
            interval(31, 3, 0.0, None),
            interval(1, 4, 0.5, None),
        ]);
        assert_eq!(statistics.len(), 2);

        let march = &statistics[0];
        assert_eq!(march.month, YearMonth { year: 2024, month: 3 });
        assert_abs_diff_eq!(march.energy.import.0.0, 2.0);
        assert_abs_diff_eq!(march.energy.export.0.0, 1.5);
        assert_eq!((march.n_charging, march.n_discharging, march.n_idle), (1, 1, 1));
        assert_abs_diff_eq!(march.state_of_charge.unwrap().mean, 40.0);
        assert_abs_diff_eq!(march.round_trip().unwrap(), 0.75);

        let april = &statistics[1];
        assert!(april.state_of_charge.is_none());
        assert!(april.round_trip().is_none());
    }
}
