use std::{io::Read, path::Path};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    core::series::LoadPoint,
    ingest::{Format, ensure_spacing, open, timestamp::FlexibleTimestamp},
    prelude::*,
    quantity::power::Kilowatts,
};

#[serde_as]
#[derive(Deserialize)]
struct LoadRecord {
    #[serde_as(as = "FlexibleTimestamp")]
    timestamp: NaiveDateTime,

    load_power: Kilowatts,
}

/// Read the baseline load, every row being the average power over an interval of `duration`.
pub fn read_load(
    reader: impl Read,
    format: Format,
    duration: TimeDelta,
) -> Result<Vec<LoadPoint>> {
    let records = format.read_records::<LoadRecord>(reader)?;
    ensure_spacing(records.iter().map(|record| record.timestamp), duration)?;
    records
        .into_iter()
        .map(|record| {
            ensure!(record.load_power.is_finite(), "invalid load at `{}`", record.timestamp);
            Ok(LoadPoint::new(record.timestamp, record.load_power * duration))
        })
        .collect()
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_load(path: &Path, duration: TimeDelta) -> Result<Vec<LoadPoint>> {
    let load = read_load(open(path)?, Format::of(path)?, duration)
        .with_context(|| format!("failed to load the baseline load from `{}`", path.display()))?;
    info!(n_points = load.len(), "loaded");
    Ok(load)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_read() -> Result {
        let load = read_load(
            "timestamp,load_power\n2024-03-01T00:00:00,1.2\n2024-03-01T00:15:00,-0.4\n".as_bytes(),
            Format::Csv,
            TimeDelta::minutes(15),
        )?;
        assert_abs_diff_eq!(load[0].energy.0.0, 0.3);
        // Solar surplus:
        assert_abs_diff_eq!(load[1].energy.0.0, -0.1);
        Ok(())
    }

    #[test]
    fn test_too_dense() {
        let result = read_load(
            "timestamp,load_power\n2024-03-01 00:00,1.2\n2024-03-01 00:10,1.2\n".as_bytes(),
            Format::Csv,
            TimeDelta::minutes(15),
        );
        assert!(result.is_err());
    }
}
