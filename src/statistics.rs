//! Monthly summaries of the inputs, independent of the tariff.

pub mod battery;
pub mod market;

use average::{Max, Mean, Min};
use serde::Serialize;

/// Mean and extremes of a sample.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Spread {
    /// [`None`] for an empty sample.
    pub fn from_sample(sample: &[f64]) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }
        let mean: Mean = sample.iter().copied().collect();
        let min: Min = sample.iter().copied().collect();
        let max: Max = sample.iter().copied().collect();
        Some(Self { mean: mean.mean(), min: min.min(), max: max.max() })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_spread() {
        let spread = Spread::from_sample(&[40.0, 70.0, 55.0]).unwrap();
        assert_abs_diff_eq!(spread.mean, 55.0);
        assert_abs_diff_eq!(spread.min, 40.0);
        assert_abs_diff_eq!(spread.max, 70.0);
    }

    #[test]
    fn test_empty_spread() {
        assert!(Spread::from_sample(&[]).is_none());
    }
}
