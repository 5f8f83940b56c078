//! Readers turning the input files into the core series.

pub mod battery;
pub mod load;
pub mod market;
pub mod tariff;
pub mod timestamp;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use chrono::{NaiveDateTime, TimeDelta};
use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use serde::de::DeserializeOwned;

use crate::prelude::*;

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open `{}`", path.display()))
}

/// Tabular input file format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    /// Header row followed by one record per row.
    Csv,

    /// Array of objects with the same fields as the CSV columns.
    Json,
}

impl Format {
    /// Detect the format by the file extension.
    pub fn of(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|extension| extension.to_str());
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => bail!("unsupported format of `{}`, expected `.csv` or `.json`", path.display()),
        }
    }

    /// Deserialize all the records.
    fn read_records<T: DeserializeOwned>(self, reader: impl Read) -> Result<Vec<T>> {
        match self {
            Self::Csv => ReaderBuilder::new()
                .has_headers(true)
                .trim(Trim::All)
                .from_reader(reader)
                .deserialize()
                .map(|record| record.context("failed to read the record"))
                .collect(),
            Self::Json => serde_json::from_reader(BufReader::new(reader))
                .context("failed to parse the JSON records"),
        }
    }
}

/// Ensure that the timestamps are ascending and at least `min_spacing` apart.
fn ensure_spacing(
    timestamps: impl IntoIterator<Item = NaiveDateTime>,
    min_spacing: TimeDelta,
) -> Result {
    for (previous, next) in timestamps.into_iter().tuple_windows() {
        ensure!(next > previous, "`{next}` is not after `{previous}`, the rows must be sorted");
        ensure!(
            next - previous >= min_spacing,
            "`{next}` is closer than {} to `{previous}`",
            humantime::format_duration(min_spacing.to_std()?),
        );
    }
    Ok(())
}
