//! Processing every snapshot of a run

// crate modules
use crate::config::RunConfig;
use crate::detector::Detector;
use crate::error::{Error, Result};
use crate::interval::Interval;

// spectrace modules
use spectrace_material::{Database, Table};
use spectrace_mesh::Snapshot;
use spectrace_ray::{write_spectrum, SpectralData};

// external crates
use log::info;
use rayon::ThreadPoolBuilder;

/// Run every detector over every snapshot of `config`
///
/// Loads the database and material table named in the configuration and
/// hands over to [run_with()].
///
/// ```rust, no_run
/// # use spectrace_detector::{run, RunConfig};
/// let config = RunConfig::from_json_file("run.json").unwrap();
/// let detectors = run(&config).unwrap();
/// ```
pub fn run(config: &RunConfig) -> Result<Vec<Detector>> {
    let database = Database::from_json_file(&config.database)?;
    let table = Table::from_json_file(&config.table)?;
    info!(
        "Loaded {} spectral states on {} photon energies and {} materials",
        database.len(),
        database.nhv(),
        table.len()
    );
    run_with(config, &database, &table)
}

/// Run every detector over every snapshot with the spectral data given
///
/// Detectors are set up from the first snapshot. Snapshots are then read
/// one at a time, and the patches of each detector evaluated in parallel on
/// a pool of `config.threads` workers. Time-integrated spectra are written
/// once the last snapshot is done, and the detectors returned.
pub fn run_with(config: &RunConfig, database: &Database, table: &Table) -> Result<Vec<Detector>> {
    config.validate()?;
    std::fs::create_dir_all(&config.output)?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .build()?;
    info!(
        "Processing {} snapshots for {} detectors on {} threads",
        config.len(),
        config.detectors.len(),
        pool.current_num_threads()
    );

    let nt = config.len();
    let mut detectors = Vec::with_capacity(config.detectors.len());
    for (it, path) in config.snapshots.iter().enumerate() {
        let mut snapshot = Snapshot::from_json_file(path)?;
        if it == 0 {
            detectors = init_detectors(config, database, &snapshot)?;
        }

        let (time, dt) = config.interval(it).ok_or(Error::TimeMismatch {
            snapshots: nt,
            expected: nt + 1,
            found: config.times.len(),
        })?;
        let interval = Interval::new(it, nt, time, dt);

        for detector in &mut detectors {
            // zone spectra shared under spherical symmetry belong to one energy window
            snapshot.mesh.clear_cache();
            let data = SpectralData {
                database,
                table,
                symmetry: detector.symmetry(),
            };
            pool.install(|| {
                detector.evaluate(&snapshot, &data, &interval, config.disable_progress)
            })?;
        }
    }

    for detector in &detectors {
        detector.write_time_integrated()?;
    }
    write_spectrum(
        config.output.join("times.txt"),
        "times\ndata in s",
        &config.times,
    )?;
    info!("Results written to {}", config.output.display());
    Ok(detectors)
}

/// Set up every detector and write its photon energy and backlighter files
pub fn init_detectors(
    config: &RunConfig,
    database: &Database,
    snapshot: &Snapshot,
) -> Result<Vec<Detector>> {
    config
        .detectors
        .iter()
        .map(|c| {
            let detector = Detector::new(c, database, snapshot, &config.output)?
                .with_max_crossings(config.max_crossings);
            detector.write_grid_files()?;
            Ok(detector)
        })
        .collect()
}
