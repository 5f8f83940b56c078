use std::{io::Read, path::Path};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    core::{
        interval::Interval,
        series::{DispatchInterval, LoadPoint},
    },
    ingest::{Format, ensure_spacing, open, timestamp::FlexibleTimestamp},
    prelude::*,
    quantity::power::Kilowatts,
};

/// Battery log row, the powers are averaged over the interval.
#[serde_as]
#[derive(Deserialize)]
struct BatteryRecord {
    #[serde_as(as = "FlexibleTimestamp")]
    timestamp: NaiveDateTime,

    charge_power: Kilowatts,
    discharge_power: Kilowatts,

    /// Percent.
    #[serde(default)]
    state_of_charge: Option<f64>,

    /// Household consumption without the battery.
    #[serde(default)]
    load_power: Option<Kilowatts>,
}

impl BatteryRecord {
    fn validate(&self) -> Result {
        for (name, power) in [("charge", self.charge_power), ("discharge", self.discharge_power)] {
            ensure!(
                power.is_finite() && power >= Kilowatts::ZERO,
                "{name} power at `{}` must be a non-negative number, got {power}",
                self.timestamp,
            );
        }
        if let Some(state_of_charge) = self.state_of_charge {
            ensure!(
                (0.0..=100.0).contains(&state_of_charge),
                "state of charge at `{}` is out of range: {state_of_charge}",
                self.timestamp,
            );
        }
        Ok(())
    }
}

/// Battery log converted into the dispatch series.
pub struct BatteryLog {
    pub dispatch: Vec<DispatchInterval>,

    /// Baseline load when the log carries it in every row.
    pub load: Option<Vec<LoadPoint>>,
}

impl BatteryLog {
    pub fn read(reader: impl Read, format: Format, duration: TimeDelta) -> Result<Self> {
        ensure!(duration > TimeDelta::zero(), "interval duration must be positive");
        let records = format.read_records::<BatteryRecord>(reader)?;
        ensure_spacing(records.iter().map(|record| record.timestamp), duration)?;
        for record in &records {
            record.validate()?;
        }

        let n_with_load = records.iter().filter(|record| record.load_power.is_some()).count();
        ensure!(
            n_with_load == 0 || n_with_load == records.len(),
            "load power is present in {n_with_load} of {} rows, it must be either in all or none",
            records.len(),
        );
        let load = (n_with_load != 0).then(|| {
            records
                .iter()
                .filter_map(|record| {
                    let load_power = record.load_power?;
                    Some(LoadPoint::new(record.timestamp, load_power * duration))
                })
                .collect()
        });

        let dispatch = records
            .iter()
            .map(|record| {
                let interval = Interval::starting_at(record.timestamp, duration).with_context(
                    || format!("interval at `{}` ends out of the time range", record.timestamp),
                )?;
                Ok(DispatchInterval::new(
                    interval,
                    (record.discharge_power - record.charge_power) * duration,
                )
                .with_state_of_charge(record.state_of_charge))
            })
            .collect::<Result<_>>()?;

        Ok(Self { dispatch, load })
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path, duration: TimeDelta) -> Result<Self> {
        let log = Self::read(open(path)?, Format::of(path)?, duration)
            .with_context(|| format!("failed to load the battery log from `{}`", path.display()))?;
        info!(n_intervals = log.dispatch.len(), has_load = log.load.is_some(), "loaded");
        Ok(log)
    }
}
