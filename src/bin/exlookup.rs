//! exlookup CLI Binary
//!
//! Command-line interface for exFAT path resolution.

use anyhow::Context;
use clap::Parser;
use exfat_lookup::logging::init_logging;
use exfat_lookup::tooling::cli::{Cli, CliContext};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = CliContext::new(cli.root.clone(), cli.config.clone(), cli.upcase.clone())
        .context("failed to initialize volume")?;

    let mut logging = context.config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    init_logging(&logging).context("failed to initialize logging")?;

    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
