use std::path::Path;

use serde::Deserialize;

use crate::{
    core::tariff::{ExportCompensation, RatePeriod, TariffSchedule},
    prelude::*,
    quantity::rate::KilowattRate,
};

/// Tariff as written by the user, before the validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffDocument {
    pub name: String,

    /// Display-only currency label.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub demand_charge_per_kw: Option<KilowattRate>,

    pub periods: Vec<RatePeriod>,
}

impl TariffDocument {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        text.parse()
    }

    /// Validate the document into a schedule.
    pub fn into_schedule(self) -> Result<TariffSchedule> {
        for period in &self.periods {
            ensure!(
                period.import_rate.is_finite(),
                "import rate of `{}` must be a finite number",
                period.name,
            );
            if let ExportCompensation::Fixed(rate) = period.export {
                ensure!(
                    rate.is_finite(),
                    "export rate of `{}` must be a finite number",
                    period.name,
                );
            }
        }
        if let Some(demand_charge) = self.demand_charge_per_kw {
            ensure!(
                demand_charge.is_finite() && demand_charge >= KilowattRate::ZERO,
                "demand charge must be a non-negative number",
            );
        }
        let name = self.name;
        TariffSchedule::try_new(name.clone(), self.periods, self.demand_charge_per_kw)
            .with_context(|| format!("invalid tariff `{name}`"))
    }
}

impl std::str::FromStr for TariffDocument {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse the tariff")
    }
}
