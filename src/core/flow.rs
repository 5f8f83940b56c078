use std::ops::Mul;

use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::quantity::{Quantity, cost::Cost, energy::KilowattHours, rate::KilowattHourRate};

/// Grid energy flow of a single interval, split by direction.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize, Add, AddAssign)]
pub struct Flow<T> {
    /// Importing from the grid.
    pub import: T,

    /// Exporting to the grid.
    pub export: T,
}

impl Flow<KilowattHours> {
    pub const ZERO: Self = Self { import: Quantity::ZERO, export: Quantity::ZERO };

    /// Split the signed net draw: positive is import, negative is export.
    pub fn from_net(net_draw: KilowattHours) -> Self {
        Self { import: net_draw.positive_part(), export: (-net_draw).positive_part() }
    }
}

/// Prices applicable to the grid flow within an interval.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct GridRates {
    pub import: KilowattHourRate,

    /// Compensation for exported energy, zero when the tariff pays nothing.
    pub export: KilowattHourRate,
}

impl Mul<GridRates> for Flow<KilowattHours> {
    type Output = Cost;

    /// Net cost: import is paid for, export is credited.
    fn mul(self, rates: GridRates) -> Self::Output {
        self.import * rates.import - self.export * rates.export
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ordered_float::OrderedFloat;

    use super::*;

    const RATES: GridRates =
        GridRates { import: Quantity(OrderedFloat(0.3)), export: Quantity(OrderedFloat(0.05)) };

    #[test]
    fn test_import_cost() {
        let flow = Flow::from_net(KilowattHours::from(2.0));
        assert_eq!(flow.export, KilowattHours::ZERO);
        assert_abs_diff_eq!((flow * RATES).0.0, 0.6);
    }

    #[test]
    fn test_export_credit() {
        let flow = Flow::from_net(KilowattHours::from(-1.0));
        assert_eq!(flow.import, KilowattHours::ZERO);
        assert_abs_diff_eq!((flow * RATES).0.0, -0.05);
    }
}
