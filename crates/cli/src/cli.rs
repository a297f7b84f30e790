//! Command line arguments

// standard library
use std::path::PathBuf;

// external crates
use clap::{ArgAction, Args, Parser, Subcommand};

/// Ray tracing postprocessor for synthetic spectral diagnostics
///
/// Rays are traced from synthetic detectors back through every snapshot of
/// a zoned mesh, and the emission and absorption of every zone crossed is
/// accumulated into per-patch, detector-integrated and time-integrated
/// spectra.
#[derive(Parser, Debug)]
#[command(name = "spectrace", version, about, long_about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Logging options shared by every command
#[derive(Args, Debug, Clone, Copy)]
pub struct Verbosity {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars (overrules --verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every detector of a run description over its snapshots
    Run(RunArgs),

    /// Validate snapshot files and summarise their meshes
    Check {
        /// Snapshot files in JSON
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },

    /// Write a small self-contained example run
    Init {
        /// Directory receiving the example files
        directory: PathBuf,

        /// Overwrite an existing run description
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run description in JSON
    pub config: PathBuf,

    /// Number of worker threads, overrides the run description
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output directory, overrides the run description
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Abandon rays after this many zone crossings
    #[arg(long)]
    pub max_crossings: Option<usize>,
}
