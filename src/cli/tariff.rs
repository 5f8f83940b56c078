use std::path::PathBuf;

use clap::Parser;

use crate::{ingest::tariff::TariffDocument, prelude::*, tables::build_tariff_table};

#[derive(Parser)]
pub struct TariffArgs {
    /// Tariff TOML file.
    #[clap(long, env = "MAGPIE_TARIFF")]
    pub tariff: PathBuf,
}

#[instrument(skip_all)]
pub fn show_tariff(args: &TariffArgs) -> Result {
    let document = TariffDocument::from_path(&args.tariff)?;
    let currency = document.currency.clone();
    let tariff = document.into_schedule()?;
    info!(name = tariff.name(), currency = currency.as_deref().unwrap_or_default(), "valid");
    if let Some(demand_charge) = tariff.demand_charge() {
        info!(%demand_charge, "monthly demand charge");
    }
    println!("{}", build_tariff_table(&tariff));
    Ok(())
}
