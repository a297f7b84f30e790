//! Self-contained example run

// crate modules
use crate::error::{Error, Result};

// spectrace modules
use spectrace_detector::{Bundle, DetectorConfig, RunConfig};
use spectrace_geometry::Vector3d;
use spectrace_material::{Component, Database, Element, Grids, State, Table};
use spectrace_mesh::builder::spherical_shells;
use spectrace_mesh::{Snapshot, Symmetry};
use spectrace_ray::Backlighter;
use spectrace_utils::{f, planckian};

// standard library
use std::path::{Path, PathBuf};

// external crates
use log::info;

/// Core and shell temperatures of each snapshot, in eV
const HISTORY: [(f64, f64); 3] = [(400.0, 100.0), (800.0, 200.0), (300.0, 150.0)];

/// Snapshot interval in s
const DT: f64 = 1.0e-10;

/// Write a run of three snapshots of a hot argon core in a plastic shell
///
/// Opacities fall off as `hv^-3` and emissivities follow from Kirchhoff's
/// law, so optically thick zones emit the blackbody at their temperature.
pub fn write_example(directory: &Path, force: bool) -> Result<PathBuf> {
    let run_path = directory.join("run.json");
    if run_path.exists() && !force {
        return Err(Error::Existing(run_path));
    }
    std::fs::create_dir_all(directory)?;

    let database = database()?;
    database.to_json_file(directory.join("database.json"))?;
    table().to_json_file(directory.join("table.json"))?;

    let mut snapshots = Vec::new();
    for (it, (core, shell)) in HISTORY.iter().enumerate() {
        let name = f!("snapshot-{it}.json");
        snapshot(*core, *shell)?.to_json_file(directory.join(&name))?;
        snapshots.push(PathBuf::from(name));
    }

    let config = RunConfig {
        output: "output".into(),
        database: "database.json".into(),
        table: "table.json".into(),
        times: (0..=HISTORY.len()).map(|i| i as f64 * DT).collect(),
        snapshots,
        detectors: detectors(),
        threads: None,
        disable_progress: false,
        max_crossings: None,
    };
    config.to_json_file(&run_path)?;
    info!("Example run written to {}", run_path.display());
    Ok(run_path)
}

fn table() -> Table {
    let mut table = Table::default();
    table.insert("Ar", Element::new(18, 39.948, "ar"));
    table.insert("CH", Element::new(4, 6.5, "ch"));
    table
}

/// Argon and plastic on a small (te, ne) grid in LTE
fn database() -> Result<Database> {
    let grids = Grids {
        te: vec![100.0, 200.0, 400.0, 800.0],
        tr: vec![0.0],
        ne_mantissa: vec![1.0, 3.0],
        ne_exponent: vec![21, 22, 23, 24],
        hv: (1..=60).map(|j| 50.0 * j as f64).collect(),
    };
    let nne = grids.ne_mantissa.len() * grids.ne_exponent.len();

    let mut states = Vec::new();
    for (handle, z, kappa) in [("ar", 18.0, 1.0e-22), ("ch", 3.5, 1.0e-24)] {
        for (ite, te) in grids.te.iter().enumerate() {
            let zbar = (te / 25.0).sqrt().min(z);
            let ab = grids
                .hv
                .iter()
                .map(|hv| kappa * zbar * zbar * (1000.0 / hv).powi(3))
                .collect::<Vec<f64>>();
            let em = grids
                .hv
                .iter()
                .zip(&ab)
                .map(|(hv, ab)| ab * planckian(*hv, *te))
                .collect::<Vec<f64>>();

            for ine in 0..nne {
                states.push(State {
                    handle: handle.to_string(),
                    ite,
                    itr: 0,
                    ine,
                    zbar,
                    em: em.clone(),
                    ab: ab.clone(),
                    sc: vec![0.0; grids.hv.len()],
                });
            }
        }
    }
    Ok(Database::new(grids, states)?)
}

/// Argon core of radius 50 μm inside a plastic shell out to 100 μm
fn snapshot(core: f64, shell: f64) -> Result<Snapshot> {
    let mut snapshot = spherical_shells(&[0.005, 0.01])?;
    for zone in snapshot.mesh.iter_mut() {
        let (te, np, material) = match zone.id {
            1 => (core, 1.0e22, "Ar"),
            2 => (shell, 5.0e22, "CH"),
            _ => continue,
        };
        zone.te = te;
        zone.np = np;
        zone.materials = vec![Component::new(material, 1.0)];
    }
    Ok(snapshot)
}

fn detectors() -> Vec<DetectorConfig> {
    let camera = DetectorConfig {
        name: "camera".into(),
        path: "camera".into(),
        symmetry: Symmetry::None,
        rc: Vector3d::new(0.0, 0.0, 1.0),
        rx: Vector3d::new(0.012, 0.0, 0.0),
        ry: Vector3d::new(0.0, 0.012, 0.0),
        dx: 0.002,
        dy: 0.002,
        hv_range: [100.0, 2000.0],
        fwhm: 0.0,
        backlighter: Backlighter::None,
        tracking: false,
        write_rays: false,
        bundle: Bundle::axial(),
    };

    let profile = DetectorConfig {
        name: "profile".into(),
        path: "profile".into(),
        symmetry: Symmetry::Spherical,
        rx: Vector3d::new(0.012, 0.0, 0.0),
        dx: 0.0005,
        fwhm: 100.0,
        ..camera.clone()
    };

    let spectrometer = DetectorConfig {
        name: "spectrometer".into(),
        path: "spectrometer".into(),
        rc: Vector3d::new(0.0, 10.0, 0.0),
        rx: Vector3d::new(0.0, 0.0, 0.05),
        ry: Vector3d::new(0.05, 0.0, 0.0),
        dx: 0.1,
        dy: 0.1,
        fwhm: 50.0,
        backlighter: Backlighter::Blackbody(50.0),
        bundle: Bundle::rings(24, 12),
        ..camera.clone()
    };

    vec![camera, profile, spectrometer]
}
