//! Switchboard CLI - Main entry point.
//!
//! - `switchboard exec <words...>` runs one command line
//! - `switchboard complete <line> [word]` prints completions
//! - `switchboard` reads command lines from stdin

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use switchboard_cli::cli::{Cli, Settings, dispatch_command, init_logging};
use switchboard_cli::config::ConsoleConfig;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ConsoleConfig::load(&cli.options.config)?;
    let settings = Settings::resolve(&cli.options, &config);
    init_logging(settings.log_level);

    dispatch_command(cli, &settings)
}
