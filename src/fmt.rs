use std::fmt::{Debug, Display, Formatter};

use enumset::{EnumSet, EnumSetType};
use itertools::Itertools;

/// Ratio displayed as a percentage.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Comma-separated set, or `all` when it is full.
pub struct FormattedSet<T: EnumSetType>(pub EnumSet<T>);

impl<T: EnumSetType + Display> Display for FormattedSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == EnumSet::all() {
            write!(f, "all")
        } else {
            write!(f, "{}", self.0.iter().join(", "))
        }
    }
}
