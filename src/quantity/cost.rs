use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;

use crate::quantity::Quantity;

pub type Cost = Quantity<0, 0, 1>;

impl Cost {
    pub const ONE_CENT: Self = Self(OrderedFloat(0.01));

    /// Round to the nearest multiple of `step`.
    ///
    /// Non-positive steps leave the cost untouched.
    pub fn round_to(self, step: Self) -> Self {
        if step <= Self::ZERO {
            self
        } else {
            Self(OrderedFloat((self.0.0 / step.0.0).round() * step.0.0))
        }
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.0 < 0.0 { write!(f, "-${:.2}", -self.0.0) } else { write!(f, "${:.2}", self.0.0) }
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}$", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_abs_diff_eq!(Cost::from(1.234_9).round_to(Cost::ONE_CENT).0.0, 1.23);
        assert_abs_diff_eq!(Cost::from(-0.056).round_to(Cost::ONE_CENT).0.0, -0.06);
    }

    #[test]
    fn test_round_to_zero_step() {
        assert_abs_diff_eq!(Cost::from(1.234_9).round_to(Cost::ZERO).0.0, 1.234_9);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from(0.6).to_string(), "$0.60");
        assert_eq!(Cost::from(-0.05).to_string(), "-$0.05");
    }
}
