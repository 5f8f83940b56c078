use std::collections::BTreeMap;

use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{flow::Flow, interval::Interval, year_month::YearMonth},
    quantity::{
        Quantity,
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        rate::{KilowattHourRate, KilowattRate},
    },
};

/// Billing outcome of a single interval.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct BillingResult {
    pub interval: Interval,

    /// Name of the tariff period the interval resolved to.
    pub period: String,

    pub import_rate: KilowattHourRate,
    pub export_rate: KilowattHourRate,

    pub baseline_load: KilowattHours,
    pub dispatch: KilowattHours,

    /// Baseline load minus the battery dispatch.
    pub net_draw: KilowattHours,

    pub cost_without_battery: Cost,
    pub cost_with_battery: Cost,

    /// `cost_without_battery - cost_with_battery`.
    pub savings: Cost,
}

impl BillingResult {
    /// Average grid import power without and with the battery.
    fn peak_demand(&self) -> (Kilowatts, Kilowatts) {
        let duration = self.interval.duration();
        if duration <= chrono::TimeDelta::zero() {
            return (Kilowatts::ZERO, Kilowatts::ZERO);
        }
        (
            Flow::from_net(self.baseline_load).import / duration,
            Flow::from_net(self.net_draw).import / duration,
        )
    }
}

/// Savings aggregated over a calendar month.
///
/// All the money figures are rounded once, here.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct MonthlySummary {
    #[serde_as(as = "DisplayFromStr")]
    pub month: YearMonth,

    pub n_intervals: usize,
    pub grid_without_battery: Flow<KilowattHours>,
    pub grid_with_battery: Flow<KilowattHours>,
    pub cost_without_battery: Cost,
    pub cost_with_battery: Cost,

    /// Rounded sum of the per-interval savings.
    pub energy_savings: Cost,

    /// Energy savings relative to the cost without the battery, when that cost is positive.
    pub energy_cost_reduction: Option<f64>,

    pub peak_demand_without_battery: Kilowatts,
    pub peak_demand_with_battery: Kilowatts,

    /// `1 - peak_with / peak_without`, when there is any peak without the battery.
    pub peak_demand_reduction: Option<f64>,

    pub demand_savings: Cost,

    pub total_savings: Cost,
}

/// Unrounded running totals of a month.
#[derive(Copy, Clone)]
struct MonthlyAccumulator {
    n_intervals: usize,
    grid_without_battery: Flow<KilowattHours>,
    grid_with_battery: Flow<KilowattHours>,
    cost_without_battery: Cost,
    cost_with_battery: Cost,
    savings: Cost,
    peak_demand_without_battery: Kilowatts,
    peak_demand_with_battery: Kilowatts,
}

impl Default for MonthlyAccumulator {
    fn default() -> Self {
        Self {
            n_intervals: 0,
            grid_without_battery: Flow::ZERO,
            grid_with_battery: Flow::ZERO,
            cost_without_battery: Quantity::ZERO,
            cost_with_battery: Quantity::ZERO,
            savings: Quantity::ZERO,
            peak_demand_without_battery: Quantity::ZERO,
            peak_demand_with_battery: Quantity::ZERO,
        }
    }
}

impl MonthlyAccumulator {
    fn push(&mut self, result: &BillingResult) {
        let (peak_without_battery, peak_with_battery) = result.peak_demand();
        self.n_intervals += 1;
        self.grid_without_battery += Flow::from_net(result.baseline_load);
        self.grid_with_battery += Flow::from_net(result.net_draw);
        self.cost_without_battery += result.cost_without_battery;
        self.cost_with_battery += result.cost_with_battery;
        self.savings += result.savings;
        self.peak_demand_without_battery =
            self.peak_demand_without_battery.max(peak_without_battery);
        self.peak_demand_with_battery = self.peak_demand_with_battery.max(peak_with_battery);
    }

    /// Unrounded demand-charge savings.
    fn demand_savings(&self, demand_charge: Option<KilowattRate>) -> Cost {
        demand_charge.map_or(Cost::ZERO, |demand_charge| {
            (self.peak_demand_without_battery - self.peak_demand_with_battery) * demand_charge
        })
    }

    fn finish(
        self,
        month: YearMonth,
        rounding: Cost,
        demand_charge: Option<KilowattRate>,
    ) -> MonthlySummary {
        let demand_savings = self.demand_savings(demand_charge);
        MonthlySummary {
            month,
            n_intervals: self.n_intervals,
            grid_without_battery: self.grid_without_battery,
            grid_with_battery: self.grid_with_battery,
            cost_without_battery: self.cost_without_battery.round_to(rounding),
            cost_with_battery: self.cost_with_battery.round_to(rounding),
            energy_savings: self.savings.round_to(rounding),
            energy_cost_reduction: (self.cost_without_battery > Cost::ZERO)
                .then(|| (self.savings / self.cost_without_battery).0),
            peak_demand_without_battery: self.peak_demand_without_battery,
            peak_demand_with_battery: self.peak_demand_with_battery,
            peak_demand_reduction: (self.peak_demand_without_battery > Kilowatts::ZERO).then(|| {
                1.0 - (self.peak_demand_with_battery / self.peak_demand_without_battery).0
            }),
            demand_savings: demand_savings.round_to(rounding),
            total_savings: (self.savings + demand_savings).round_to(rounding),
        }
    }
}

/// Outcome of one savings calculation.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Bill {
    /// One result per dispatch interval, in the dispatch order.
    pub intervals: Vec<BillingResult>,

    /// One summary per calendar month touched by the intervals, chronologically.
    pub months: Vec<MonthlySummary>,

    /// Savings over all the months, rounded once.
    pub total_savings: Cost,
}

impl Bill {
    pub fn aggregate(
        intervals: Vec<BillingResult>,
        rounding: Cost,
        demand_charge: Option<KilowattRate>,
    ) -> Self {
        let mut accumulators = BTreeMap::<YearMonth, MonthlyAccumulator>::new();
        for result in &intervals {
            accumulators.entry(YearMonth::from(result.interval.start)).or_default().push(result);
        }
        let total_savings = accumulators
            .values()
            .map(|accumulator| accumulator.savings + accumulator.demand_savings(demand_charge))
            .sum::<Cost>()
            .round_to(rounding);
        let months = accumulators
            .into_iter()
            .map(|(month, accumulator)| accumulator.finish(month, rounding, demand_charge))
            .collect();
        Self { intervals, months, total_savings }
    }

    /// Unrounded sum of the per-interval savings.
    pub fn interval_savings(&self) -> Cost {
        self.intervals.iter().map(|result| result.savings).sum()
    }
}
