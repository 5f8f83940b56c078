use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    core::bill::Bill,
    prelude::*,
    statistics::{battery::BatteryStatistics, market::MarketStatistics},
};

/// Machine-readable outcome of a tally.
#[derive(Serialize)]
pub struct Report<'a> {
    pub tariff: &'a str,
    pub currency: Option<&'a str>,
    pub bill: &'a Bill,
    pub battery: &'a [BatteryStatistics],
    pub market: &'a [MarketStatistics],
}

impl Report<'_> {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) -> Result {
        let file = File::create(path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("failed to write the report to `{}`", path.display()))?;
        writer.flush().with_context(|| format!("failed to flush `{}`", path.display()))?;
        info!("written");
        Ok(())
    }
}
