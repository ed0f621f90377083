use anyhow::Context;
use clap::Parser;
use mif_tools::cli::{Cli, execute};
use mif_tools::config::ConfigLoader;
use mif_tools::observability::init_logging;
use std::io;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ConfigLoader::load(&cli.root, cli.config).context("failed to load configuration")?;
    ConfigLoader::validate(&config)?;
    init_logging(&config.logging);
    info!("Repository root: {}", config.root.display());

    let exit = execute(cli.command, &config, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    Ok(exit.into())
}
