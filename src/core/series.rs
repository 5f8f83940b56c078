use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    core::interval::Interval,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Battery energy flow within a single interval.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct DispatchInterval {
    pub interval: Interval,

    /// Positive when discharging into the load, negative when charging from the grid.
    pub energy: KilowattHours,

    /// State of charge at the interval start, in percent.
    pub state_of_charge: Option<f64>,
}

impl DispatchInterval {
    pub const fn new(interval: Interval, energy: KilowattHours) -> Self {
        Self { interval, energy, state_of_charge: None }
    }

    pub const fn with_state_of_charge(mut self, state_of_charge: Option<f64>) -> Self {
        self.state_of_charge = state_of_charge;
        self
    }

    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.energy < KilowattHours::ZERO
    }

    #[must_use]
    pub fn is_discharging(&self) -> bool {
        self.energy > KilowattHours::ZERO
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize, derive_more::Constructor)]
pub struct MarketPricePoint {
    pub time: NaiveDateTime,
    pub price: KilowattHourRate,
}

/// Energy demand that would exist without the battery.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize, derive_more::Constructor)]
pub struct LoadPoint {
    pub time: NaiveDateTime,
    pub energy: KilowattHours,
}
