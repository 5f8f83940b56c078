mod tally;
mod tariff;

use clap::{Parser, Subcommand};

pub use self::{
    tally::{TallyArgs, tally},
    tariff::{TariffArgs, show_tariff},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: compute the monthly savings of the battery.
    #[clap(name = "tally")]
    Tally(Box<TallyArgs>),

    /// Validate and print the tariff.
    #[clap(name = "tariff")]
    Tariff(TariffArgs),
}
