use bon::Builder;
use chrono::NaiveDateTime;
use itertools::{EitherOrBoth, Itertools, izip};

use crate::{
    core::{
        bill::{Bill, BillingResult},
        error::{SavingsError, SeriesKind},
        flow::{Flow, GridRates},
        series::{DispatchInterval, LoadPoint, MarketPricePoint},
        tariff::TariffSchedule,
    },
    prelude::*,
    quantity::cost::Cost,
};

/// Prices the battery dispatch against the no-battery baseline.
///
/// The calculation is a pure function of its inputs: one [`BillingResult`] per interval,
/// aggregated per calendar month.
#[derive(Builder)]
pub struct SavingsEngine<'a> {
    tariff: &'a TariffSchedule,

    /// Currency rounding step, applied once to the aggregates and never to the intervals.
    #[builder(default = Cost::ONE_CENT)]
    rounding: Cost,
}

impl SavingsEngine<'_> {
    /// Compute the bill with and without the battery.
    ///
    /// The market prices and the baseline load must have exactly the same timestamps as the
    /// battery dispatch intervals, in the same order.
    #[instrument(skip_all, fields(tariff = self.tariff.name(), n_intervals = dispatch.len()))]
    pub fn compute(
        &self,
        dispatch: &[DispatchInterval],
        prices: &[MarketPricePoint],
        baseline: &[LoadPoint],
    ) -> Result<Bill, SavingsError> {
        ensure_aligned(SeriesKind::MarketPrices, dispatch, prices, |point| point.time)?;
        ensure_aligned(SeriesKind::BaselineLoad, dispatch, baseline, |point| point.time)?;

        let intervals = izip!(dispatch, prices, baseline)
            .map(|(dispatch, price, load)| self.bill_interval(dispatch, price, load))
            .collect::<Result<Vec<_>, _>>()?;
        let bill = Bill::aggregate(intervals, self.rounding, self.tariff.demand_charge());

        info!(n_months = bill.months.len(), total_savings = %bill.total_savings, "computed");
        Ok(bill)
    }

    fn bill_interval(
        &self,
        dispatch: &DispatchInterval,
        price: &MarketPricePoint,
        load: &LoadPoint,
    ) -> Result<BillingResult, SavingsError> {
        let start = dispatch.interval.start;
        let period = self.tariff.resolve(start).ok_or(SavingsError::UncoveredInterval(start))?;
        let rates =
            GridRates { import: period.import_rate, export: period.export.rate(price.price) };

        let net_draw = load.energy - dispatch.energy;
        let cost_without_battery = Flow::from_net(load.energy) * rates;
        let cost_with_battery = Flow::from_net(net_draw) * rates;
        trace!(
            start = %start,
            period = period.name.as_str(),
            ?net_draw,
            ?cost_without_battery,
            ?cost_with_battery,
        );

        Ok(BillingResult {
            interval: dispatch.interval,
            period: period.name.clone(),
            import_rate: rates.import,
            export_rate: rates.export,
            baseline_load: load.energy,
            dispatch: dispatch.energy,
            net_draw,
            cost_without_battery,
            cost_with_battery,
            savings: cost_without_battery - cost_with_battery,
        })
    }
}

/// Fail on the first index where the series timestamp differs from the dispatch interval start.
fn ensure_aligned<T>(
    series: SeriesKind,
    dispatch: &[DispatchInterval],
    other: &[T],
    time_of: impl Fn(&T) -> NaiveDateTime,
) -> Result<(), SavingsError> {
    for (index, pair) in dispatch.iter().zip_longest(other).enumerate() {
        let (expected, found) = match pair {
            EitherOrBoth::Both(dispatch, point) => {
                let found = time_of(point);
                if dispatch.interval.start == found {
                    continue;
                }
                (Some(dispatch.interval.start), Some(found))
            }
            EitherOrBoth::Left(dispatch) => (Some(dispatch.interval.start), None),
            EitherOrBoth::Right(point) => (None, Some(time_of(point))),
        };
        return Err(SavingsError::MisalignedSeries { series, index, expected, found });
    }
    Ok(())
}
