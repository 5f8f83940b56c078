#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod fmt;
mod ingest;
mod prelude;
mod quantity;
mod report;
mod statistics;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, show_tariff, tally},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Tally(args) => {
            tally(&args)?;
        }
        Command::Tariff(args) => {
            show_tariff(&args)?;
        }
    }

    info!("done!");
    Ok(())
}
