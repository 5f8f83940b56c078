use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        bill::{BillingResult, MonthlySummary},
        tariff::TariffSchedule,
    },
    fmt::{FormattedPercentage, FormattedSet},
    quantity::{cost::Cost, energy::KilowattHours},
    statistics::{battery::BatteryStatistics, market::MarketStatistics},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn right(cell: Cell) -> Cell {
    cell.set_alignment(CellAlignment::Right)
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map(|ratio| FormattedPercentage(ratio).to_string()).unwrap_or_default()
}

fn savings_cell(savings: Cost) -> Cell {
    right(Cell::new(savings)).fg(if savings >= Cost::ZERO { Color::Green } else { Color::Red })
}

pub fn build_tariff_table(tariff: &TariffSchedule) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Months", "Days", "Start", "End", "Import", "Export"]);
    for period in tariff.periods() {
        table.add_row(vec![
            Cell::new(&period.name).add_attribute(Attribute::Bold),
            Cell::new(FormattedSet(period.months)),
            Cell::new(FormattedSet(period.days)),
            Cell::new(period.start.format("%H:%M")),
            Cell::new(period.end.format("%H:%M")).add_attribute(Attribute::Dim),
            right(Cell::new(period.import_rate)),
            right(Cell::new(period.export)),
        ]);
    }
    table
}

pub fn build_intervals_table(intervals: &[BillingResult]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Date", "Start", "End", "Period", "Import", "Export", "Load", "Battery", "Net", "Without",
        "With", "Savings",
    ]);
    for result in intervals {
        table.add_row(vec![
            Cell::new(result.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(result.interval.start.format("%H:%M")),
            Cell::new(result.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(&result.period),
            right(Cell::new(result.import_rate)),
            right(Cell::new(result.export_rate)).add_attribute(Attribute::Dim),
            right(Cell::new(result.baseline_load)),
            right(Cell::new(result.dispatch)).fg(if result.dispatch > KilowattHours::ZERO {
                Color::Green
            } else if result.dispatch < KilowattHours::ZERO {
                Color::Magenta
            } else {
                Color::Reset
            }),
            right(Cell::new(result.net_draw)),
            right(Cell::new(result.cost_without_battery)).add_attribute(Attribute::Dim),
            right(Cell::new(result.cost_with_battery)),
            savings_cell(result.savings),
        ]);
    }
    table
}

pub fn build_monthly_table(months: &[MonthlySummary], total_savings: Cost) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Month"),
        right(Cell::new("Intervals")),
        right(Cell::new("Import\nwithout")),
        right(Cell::new("Import\nwith")),
        right(Cell::new("Export\nwith")),
        right(Cell::new("Cost\nwithout")),
        right(Cell::new("Cost\nwith")),
        right(Cell::new("Energy\nsavings")),
        right(Cell::new("Energy\nreduction")),
        right(Cell::new("Peak\nwithout")),
        right(Cell::new("Peak\nwith")),
        right(Cell::new("Peak\nreduction")),
        right(Cell::new("Demand\nsavings")),
        right(Cell::new("Total\nsavings")).add_attribute(Attribute::Bold),
    ]);
    for month in months {
        table.add_row(vec![
            Cell::new(month.month).add_attribute(Attribute::Bold),
            right(Cell::new(month.n_intervals)).add_attribute(Attribute::Dim),
            right(Cell::new(month.grid_without_battery.import)),
            right(Cell::new(month.grid_with_battery.import)),
            right(Cell::new(month.grid_with_battery.export)),
            right(Cell::new(month.cost_without_battery)),
            right(Cell::new(month.cost_with_battery)),
            savings_cell(month.energy_savings),
            right(Cell::new(format_ratio(month.energy_cost_reduction))),
            right(Cell::new(month.peak_demand_without_battery)).add_attribute(Attribute::Dim),
            right(Cell::new(month.peak_demand_with_battery)).add_attribute(Attribute::Dim),
            right(Cell::new(format_ratio(month.peak_demand_reduction))),
            savings_cell(month.demand_savings),
            savings_cell(month.total_savings).add_attribute(Attribute::Bold),
        ]);
    }
    if months.len() > 1 {
        let mut total = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
        total.extend((0..12).map(|_| Cell::new("")));
        total.push(savings_cell(total_savings).add_attribute(Attribute::Bold));
        table.add_row(total);
    }
    table
}

pub fn build_battery_table(statistics: &[BatteryStatistics]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Month"),
        right(Cell::new("Charged")).fg(Color::Magenta),
        right(Cell::new("Discharged")).fg(Color::Green),
        right(Cell::new("Round\ntrip")),
        right(Cell::new("Charging")),
        right(Cell::new("Discharging")),
        right(Cell::new("Idle")),
        right(Cell::new("SoC\nmean")),
        right(Cell::new("SoC\nmin")),
        right(Cell::new("SoC\nmax")),
    ]);
    for month in statistics {
        let (mean, min, max) = month.state_of_charge.map_or_else(Default::default, |spread| {
            let percent = |value: f64| format!("{value:.0}%");
            (percent(spread.mean), percent(spread.min), percent(spread.max))
        });
        table.add_row(vec![
            Cell::new(month.month).add_attribute(Attribute::Bold),
            right(Cell::new(month.energy.import)).fg(Color::Magenta),
            right(Cell::new(month.energy.export)).fg(Color::Green),
            right(Cell::new(format_ratio(month.round_trip()))),
            right(Cell::new(month.n_charging)),
            right(Cell::new(month.n_discharging)),
            right(Cell::new(month.n_idle)).add_attribute(Attribute::Dim),
            right(Cell::new(mean)),
            right(Cell::new(min)).add_attribute(Attribute::Dim),
            right(Cell::new(max)).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_market_table(statistics: &[MarketStatistics]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Month"),
        right(Cell::new("Points")),
        right(Cell::new("Mean")),
        right(Cell::new("Min")).fg(Color::Green),
        right(Cell::new("Max")).fg(Color::Red),
        right(Cell::new("Std. dev.")),
        right(Cell::new("Above\nmean")).fg(Color::Red),
        right(Cell::new("At or\nbelow")).fg(Color::Green),
    ]);
    for month in statistics {
        table.add_row(vec![
            Cell::new(month.month).add_attribute(Attribute::Bold),
            right(Cell::new(month.n_points)).add_attribute(Attribute::Dim),
            right(Cell::new(month.mean)),
            right(Cell::new(month.min)).fg(Color::Green),
            right(Cell::new(month.max)).fg(Color::Red),
            right(Cell::new(month.standard_deviation)).add_attribute(Attribute::Dim),
            right(Cell::new(month.n_above_mean)),
            right(Cell::new(month.n_at_or_below_mean)),
        ]);
    }
    table
}
