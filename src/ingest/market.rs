use std::{io::Read, path::Path};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    core::series::MarketPricePoint,
    ingest::{Format, ensure_spacing, open, timestamp::FlexibleTimestamp},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

#[serde_as]
#[derive(Deserialize)]
struct MarketRecord {
    #[serde_as(as = "FlexibleTimestamp")]
    timestamp: NaiveDateTime,

    price: KilowattHourRate,
}

/// Read the wholesale prices, negative prices are allowed.
pub fn read_market_prices(reader: impl Read, format: Format) -> Result<Vec<MarketPricePoint>> {
    let records = format.read_records::<MarketRecord>(reader)?;
    ensure_spacing(records.iter().map(|record| record.timestamp), TimeDelta::zero())?;
    records
        .into_iter()
        .map(|record| {
            ensure!(record.price.is_finite(), "invalid price at `{}`", record.timestamp);
            Ok(MarketPricePoint::new(record.timestamp, record.price))
        })
        .collect()
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_market_prices(path: &Path) -> Result<Vec<MarketPricePoint>> {
    let prices = read_market_prices(open(path)?, Format::of(path)?)
        .with_context(|| format!("failed to load the market prices from `{}`", path.display()))?;
    info!(n_points = prices.len(), "loaded");
    Ok(prices)
}
