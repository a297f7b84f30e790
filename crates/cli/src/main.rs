//! Command line postprocessor for synthetic spectral diagnostics

// Split into subfiles for development
mod cli;
mod commands;
mod demo;
mod error;

// crate modules
use crate::cli::{Cli, Verbosity};

// standard library
use std::process::ExitCode;

// external crates
use clap::Parser;
use log::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbosity) {
        eprintln!("unable to start logging: {e}");
    }

    match commands::dispatch(cli.command, cli.verbosity.quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// Warnings and run phases by default, more detail with every `-v`
fn init_logging(verbosity: Verbosity) -> Result<(), log::SetLoggerError> {
    stderrlog::new()
        .quiet(verbosity.quiet)
        .verbosity(2 + usize::from(verbosity.verbose))
        .show_module_names(verbosity.verbose > 1)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
}
