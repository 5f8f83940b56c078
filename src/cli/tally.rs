use std::path::PathBuf;

use chrono::TimeDelta;
use clap::Parser;

use crate::{
    core::{
        engine::SavingsEngine,
        series::{DispatchInterval, LoadPoint, MarketPricePoint},
        year_month::YearMonth,
    },
    ingest::{
        battery::BatteryLog,
        load::load_load,
        market::load_market_prices,
        tariff::TariffDocument,
    },
    prelude::*,
    quantity::cost::Cost,
    report::Report,
    statistics::{battery::BatteryStatistics, market::MarketStatistics},
    tables::{
        build_battery_table,
        build_intervals_table,
        build_market_table,
        build_monthly_table,
    },
};

#[derive(Parser)]
pub struct TallyArgs {
    /// Tariff TOML file.
    #[clap(long, env = "MAGPIE_TARIFF")]
    pub tariff: PathBuf,

    /// Battery log, `.csv` or `.json`: `timestamp`, `charge_power`, `discharge_power`,
    /// and optionally `state_of_charge` and `load_power`.
    #[clap(long, env = "MAGPIE_BATTERY_DATA")]
    pub battery_data: PathBuf,

    /// Market prices, `.csv` or `.json`: `timestamp` and `price` per kWh.
    #[clap(long, env = "MAGPIE_MARKET_DATA")]
    pub market_data: PathBuf,

    /// Baseline load, `.csv` or `.json`: `timestamp` and `load_power`.
    ///
    /// Defaults to the `load_power` column of the battery log.
    #[clap(long, env = "MAGPIE_LOAD_DATA")]
    pub load_data: Option<PathBuf>,

    /// Only tally the calendar month, `YYYY-MM`.
    #[clap(long, env = "MAGPIE_MONTH")]
    pub month: Option<YearMonth>,

    /// Duration of every log row.
    #[clap(long, env = "MAGPIE_INTERVAL", default_value = "5m")]
    interval: humantime::Duration,

    /// Currency rounding step of the monthly figures.
    #[clap(long, env = "MAGPIE_ROUNDING", default_value = "0.01")]
    pub rounding: Cost,

    /// Write the full result as JSON.
    #[clap(long, env = "MAGPIE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print every interval.
    #[clap(long)]
    pub details: bool,
}

impl TallyArgs {
    pub fn interval(&self) -> Result<TimeDelta> {
        let interval = TimeDelta::from_std(self.interval.into())?;
        ensure!(interval > TimeDelta::zero(), "the interval must be positive");
        Ok(interval)
    }
}

/// Series fed into the engine.
struct Inputs {
    dispatch: Vec<DispatchInterval>,
    prices: Vec<MarketPricePoint>,
    baseline: Vec<LoadPoint>,
}

impl Inputs {
    /// A separate load series wins over the one of the battery log.
    fn new(
        battery_log: BatteryLog,
        prices: Vec<MarketPricePoint>,
        load: Option<Vec<LoadPoint>>,
    ) -> Result<Self> {
        let baseline = match load {
            Some(load) => load,
            None => battery_log.load.context(
                "no baseline load: pass `--load-data` or add `load_power` to the battery log",
            )?,
        };
        Ok(Self { dispatch: battery_log.dispatch, prices, baseline })
    }

    /// Keep only the points starting within the month.
    fn select_month(&mut self, month: YearMonth) -> Result {
        self.dispatch.retain(|interval| month.contains(interval.interval.start));
        self.prices.retain(|point| month.contains(point.time));
        self.baseline.retain(|point| month.contains(point.time));
        ensure!(!self.dispatch.is_empty(), "no battery data in {month}");
        info!(%month, n_intervals = self.dispatch.len(), "selected");
        Ok(())
    }
}

#[instrument(skip_all)]
pub fn tally(args: &TallyArgs) -> Result {
    let document = TariffDocument::from_path(&args.tariff)?;
    let currency = document.currency.clone();
    let tariff = document.into_schedule()?;
    info!(name = tariff.name(), n_periods = tariff.periods().len(), "loaded the tariff");

    let interval = args.interval()?;
    let battery_log = BatteryLog::from_path(&args.battery_data, interval)?;
    let prices = load_market_prices(&args.market_data)?;
    let load = args.load_data.as_deref().map(|path| load_load(path, interval)).transpose()?;
    let mut inputs = Inputs::new(battery_log, prices, load)?;
    if let Some(month) = args.month {
        inputs.select_month(month)?;
    }

    let bill = SavingsEngine::builder()
        .tariff(&tariff)
        .rounding(args.rounding)
        .build()
        .compute(&inputs.dispatch, &inputs.prices, &inputs.baseline)?;
    let battery_statistics = BatteryStatistics::monthly(&inputs.dispatch);
    let market_statistics = MarketStatistics::monthly(&inputs.prices);

    println!("{}", build_battery_table(&battery_statistics));
    println!("{}", build_market_table(&market_statistics));
    if args.details {
        println!("{}", build_intervals_table(&bill.intervals));
    }
    println!("{}", build_monthly_table(&bill.months, bill.total_savings));
    info!(
        total = %bill.total_savings,
        currency = currency.as_deref().unwrap_or_default(),
        "savings",
    );

    if let Some(path) = &args.output {
        Report {
            tariff: tariff.name(),
            currency: currency.as_deref(),
            bill: &bill,
            battery: &battery_statistics,
            market: &market_statistics,
        }
        .write_to(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::tariff::{RatePeriod, TariffSchedule},
        ingest::{Format, load::read_load, market::read_market_prices},
        quantity::rate::KilowattHourRate,
    };

    const BATTERY: &str = "\
timestamp,charge_power,discharge_power,load_power
2024-02-29 23:00,0,1.0,1.0
2024-03-01 00:00,2.0,0,0.5
2024-03-01 01:00,0,1.5,2.0
";

    const PRICES: &str = "\
timestamp,price
2024-02-29 23:00,0.20
2024-03-01 00:00,0.05
2024-03-01 01:00,0.30
";

    fn battery_log(csv: &str) -> Result<BatteryLog> {
        BatteryLog::read(csv.as_bytes(), Format::Csv, TimeDelta::hours(1))
    }

    fn prices() -> Result<Vec<MarketPricePoint>> {
        read_market_prices(PRICES.as_bytes(), Format::Csv)
    }

    #[test]
    fn test_select_month() -> Result {
        let mut inputs = Inputs::new(battery_log(BATTERY)?, prices()?, None)?;
        inputs.select_month("2024-03".parse()?)?;
        assert_eq!(inputs.dispatch.len(), 2);
        assert_eq!(inputs.prices.len(), 2);
        assert_eq!(inputs.baseline.len(), 2);
        assert_eq!(inputs.prices[0].time, inputs.dispatch[0].interval.start);

        let tariff = TariffSchedule::try_new(
            "flat",
            vec![RatePeriod::flat("flat", KilowattHourRate::from(0.3))],
            None,
        )?;
        let bill = SavingsEngine::builder().tariff(&tariff).build().compute(
            &inputs.dispatch,
            &inputs.prices,
            &inputs.baseline,
        )?;
        assert_eq!(bill.months.len(), 1);
        assert_eq!(bill.months[0].month.to_string(), "2024-03");
        // Charging 2 kWh costs 0.6, discharging 1.5 kWh saves 0.45:
        assert_abs_diff_eq!(bill.total_savings.0.0, -0.15, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_empty_month_is_rejected() -> Result {
        let mut inputs = Inputs::new(battery_log(BATTERY)?, prices()?, None)?;
        let error = inputs.select_month("2024-04".parse()?).unwrap_err();
        assert_eq!(error.to_string(), "no battery data in 2024-04");
        Ok(())
    }

    #[test]
    fn test_separate_load_wins() -> Result {
        let load = read_load(
            "\
timestamp,load_power
2024-02-29 23:00,3.0
2024-03-01 00:00,3.0
2024-03-01 01:00,3.0
"
            .as_bytes(),
            Format::Csv,
            TimeDelta::hours(1),
        )?;
        let inputs = Inputs::new(battery_log(BATTERY)?, prices()?, Some(load))?;
        for point in &inputs.baseline {
            assert_abs_diff_eq!(point.energy.0.0, 3.0);
        }
        Ok(())
    }

    #[test]
    fn test_missing_baseline_is_rejected() -> Result {
        let log =
            battery_log("timestamp,charge_power,discharge_power\n2024-03-01 00:00,0,1.0\n")?;
        let error = Inputs::new(log, prices()?, None).err().unwrap();
        assert!(error.to_string().starts_with("no baseline load"), "{error}");
        Ok(())
    }
}
