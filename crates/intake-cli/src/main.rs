//! Incident Intake - vehicle incident triage from image annotations
//!
//! A CLI tool that classifies annotated incident photos, reads registration
//! cards and keeps a local register of incident reports.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use env_logger::Env;
use log::LevelFilter;

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
