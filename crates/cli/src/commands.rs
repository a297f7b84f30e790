//! What each command does

// crate modules
use crate::cli::{Command, RunArgs};
use crate::demo::write_example;
use crate::error::Result;

// spectrace modules
use spectrace_detector::{bounding_extent, RunConfig};
use spectrace_mesh::Snapshot;
use spectrace_utils::ValueExt;

// standard library
use std::path::PathBuf;

// external crates
use log::{info, warn};

/// Carry out `command`, with progress bars hidden when `quiet`
pub fn dispatch(command: Command, quiet: bool) -> Result<()> {
    match command {
        Command::Run(args) => run(args, quiet),
        Command::Check { snapshots } => check(&snapshots),
        Command::Init { directory, force } => {
            let run_path = write_example(&directory, force)?;
            println!("spectrace run {}", run_path.display());
            Ok(())
        }
    }
}

fn run(args: RunArgs, quiet: bool) -> Result<()> {
    let mut config = RunConfig::from_json_file(&args.config)?;
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(max) = args.max_crossings {
        config.max_crossings = Some(max);
    }
    config.disable_progress |= args.no_progress || quiet;
    config.validate()?;

    let detectors = spectrace_detector::run(&config)?;
    for detector in &detectors {
        info!("{detector}");
    }
    Ok(())
}

fn check(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let snapshot = Snapshot::from_json_file(path)?;
        let unpaired = snapshot.mesh.validate(&snapshot.grid)?;
        let (center, radius) = bounding_extent(&snapshot)?;
        let filled = snapshot
            .mesh
            .iter()
            .filter(|zone| zone.has_materials())
            .count();

        println!("{}", path.display());
        println!("  nodes            {}", snapshot.grid.len());
        println!("  zones            {} ({filled} with materials)", snapshot.mesh.len());
        println!(
            "  bounding sphere  radius {} cm about ({}, {}, {})",
            radius.sci(4, 2),
            center.x.sci(4, 2),
            center.y.sci(4, 2),
            center.z.sci(4, 2)
        );
        println!("  unpaired faces   {}", unpaired.len());
        for (face, neighbor) in &unpaired {
            warn!("  {face} -> {neighbor} is not mirrored");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;

    #[rstest]
    fn example_run_is_consistent() {
        let dir = std::env::temp_dir().join("spectrace-cli-example");
        let _ = std::fs::remove_dir_all(&dir);

        let run_path = write_example(&dir, false).unwrap();
        let config = RunConfig::from_json_file(&run_path).unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(config.detectors.len(), 3);
        assert!(check(&config.snapshots).is_ok());

        assert!(matches!(
            write_example(&dir, false),
            Err(Error::Existing(_))
        ));
        assert!(write_example(&dir, true).is_ok());
    }

    #[rstest]
    #[case::missing_file("no-such-snapshot.json")]
    fn check_reports_unreadable_snapshots(#[case] name: &str) {
        let path = std::env::temp_dir().join(name);
        assert!(check(&[path]).is_err());
    }
}
