use average::{Max, Min, Variance};
use itertools::Itertools;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{series::MarketPricePoint, year_month::YearMonth},
    quantity::rate::KilowattHourRate,
};

/// Market conditions over a calendar month.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct MarketStatistics {
    #[serde_as(as = "DisplayFromStr")]
    pub month: YearMonth,

    pub n_points: usize,
    pub mean: KilowattHourRate,
    pub min: KilowattHourRate,
    pub max: KilowattHourRate,

    /// Sample standard deviation.
    pub standard_deviation: KilowattHourRate,

    /// Points priced above the monthly mean.
    pub n_above_mean: usize,

    pub n_at_or_below_mean: usize,
}

impl MarketStatistics {
    pub fn monthly(prices: &[MarketPricePoint]) -> Vec<Self> {
        prices
            .iter()
            .chunk_by(|point| YearMonth::from(point.time))
            .into_iter()
            .map(|(month, points)| {
                Self::summarize(month, &points.map(|point| point.price.0.0).collect_vec())
            })
            .collect()
    }

    fn summarize(month: YearMonth, prices: &[f64]) -> Self {
        let variance: Variance = prices.iter().copied().collect();
        let min: Min = prices.iter().copied().collect();
        let max: Max = prices.iter().copied().collect();
        let mean = variance.mean();
        let n_above_mean = prices.iter().filter(|price| **price > mean).count();
        Self {
            month,
            n_points: prices.len(),
            mean: mean.into(),
            min: min.min().into(),
            max: max.max().into(),
            standard_deviation: variance.sample_variance().sqrt().into(),
            n_above_mean,
            n_at_or_below_mean: prices.len() - n_above_mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_monthly() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let prices = [0.1, 0.2, 0.3, 0.4]
            .into_iter()
            .zip(0..)
            .map(|(price, hour)| {
                MarketPricePoint::new(start + chrono::TimeDelta::hours(hour), price.into())
            })
            .collect_vec();
        let statistics = MarketStatistics::monthly(&prices);
        assert_eq!(statistics.len(), 1);

        let march = &statistics[0];
        assert_eq!(march.n_points, 4);
        assert_abs_diff_eq!(march.mean.0.0, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(march.min.0.0, 0.1);
        assert_abs_diff_eq!(march.max.0.0, 0.4);
        assert_abs_diff_eq!(march.standard_deviation.0.0, 0.129_099_444_873_580_57, epsilon = 1e-9);
        assert_eq!(march.n_above_mean, 2);
        assert_eq!(march.n_at_or_below_mean, 2);
    }
}
