pub mod cost;
pub mod energy;
pub mod power;
pub mod rate;

use std::ops::Div;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Physical quantity tagged with the exponents of its power, time, and cost dimensions.
///
/// The tags keep kilowatt-hours, kilowatts, and money apart at compile time,
/// while the cross-dimension products are spelled out in the submodules.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize, const COST: isize>(
    pub OrderedFloat<f64>,
);

impl<const POWER: isize, const TIME: isize, const COST: isize> Quantity<POWER, TIME, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    /// Positive part of the quantity, negative values become zero.
    pub fn positive_part(self) -> Self {
        self.max(Self::ZERO)
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Div<Self>
    for Quantity<POWER, TIME, COST>
{
    type Output = OrderedFloat<f64>;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{Debug, Formatter};

    use super::*;

    pub type Bare = Quantity<0, 0, 0>;

    impl Debug for Bare {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn test_min() {
        assert_eq!(Bare::from(1.0).min(Bare::from(2.0)), Bare::from(1.0));
        assert_eq!(Bare::from(2.0).min(Bare::from(1.0)), Bare::from(1.0));
    }

    #[test]
    fn test_max() {
        assert_eq!(Bare::from(1.0).max(Bare::from(2.0)), Bare::from(2.0));
        assert_eq!(Bare::from(2.0).max(Bare::from(1.0)), Bare::from(2.0));
    }

    #[test]
    fn test_positive_part() {
        assert_eq!(Bare::from(-3.0).positive_part(), Bare::ZERO);
        assert_eq!(Bare::from(3.0).positive_part(), Bare::from(3.0));
    }

    #[test]
    fn test_sum() {
        let total: Bare = [1.0, 2.0, 3.5].into_iter().map(Bare::from).sum();
        assert_eq!(total, Bare::from(6.5));
    }
}
