//! Full runs of small detectors looking at a uniform ball

use spectrace_detector::{run, run_with, Bundle, DetectorConfig, RunConfig};
use spectrace_geometry::Vector3d;
use spectrace_material::{Component, Database, Element, Grids, State, Table};
use spectrace_mesh::builder::spherical_shells;
use spectrace_mesh::{Snapshot, Symmetry};
use spectrace_ray::Backlighter;
use spectrace_utils::ValueExt;

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};

fn state(handle: &str, em: [f64; 3], ab: [f64; 3]) -> State {
    State {
        handle: handle.to_string(),
        ite: 0,
        itr: 0,
        ine: 0,
        zbar: 1.0,
        em: em.to_vec(),
        ab: ab.to_vec(),
        sc: vec![0.0; 3],
    }
}

/// An emitter with source function 2 and an optically thin emitter
#[fixture]
fn database() -> Database {
    let grids = Grids {
        te: vec![100.0],
        tr: vec![0.0],
        ne_mantissa: vec![1.0],
        ne_exponent: vec![20],
        hv: vec![1.0, 2.0, 3.0],
    };
    let states = vec![
        state("ar", [1.0, 2.0, 3.0], [0.5, 1.0, 1.5]),
        state("thin", [1.0; 3], [1.0e-12; 3]),
    ];
    Database::new(grids, states).unwrap()
}

#[fixture]
fn table() -> Table {
    let mut table = Table::default();
    table.insert("Ar", Element::new(18, 39.948, "ar"));
    table.insert("H", Element::new(1, 1.008, "thin"));
    table
}

/// Ball of radius 1 made of `material`, in a bounding sphere of radius 2
fn ball(material: &str) -> Snapshot {
    let mut snapshot = spherical_shells(&[1.0]).unwrap();
    for zone in snapshot.mesh.iter_mut().filter(|z| z.id == 1) {
        zone.te = 100.0;
        zone.np = 1.0;
        zone.materials = vec![Component::new(material, 1.0)];
    }
    snapshot
}

/// Square detector of half-width `half` on the z axis at z = 10
fn camera(name: &str, half: f64, d: f64) -> DetectorConfig {
    DetectorConfig {
        name: name.into(),
        path: PathBuf::new(),
        symmetry: Symmetry::None,
        rc: Vector3d::new(0.0, 0.0, 10.0),
        rx: Vector3d::new(half, 0.0, 0.0),
        ry: Vector3d::new(0.0, half, 0.0),
        dx: d,
        dy: d,
        hv_range: [0.5, 3.5],
        fwhm: 0.0,
        backlighter: Backlighter::None,
        tracking: false,
        write_rays: false,
        bundle: Bundle::axial(),
    }
}

/// Write two identical snapshots of `snapshot` and a run description to a
/// fresh directory
fn setup(
    case: &str,
    snapshot: &Snapshot,
    database: &Database,
    table: &Table,
    detectors: Vec<DetectorConfig>,
) -> RunConfig {
    let dir = std::env::temp_dir().join(format!("spectrace-detector-{case}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    database.to_json_file(dir.join("database.json")).unwrap();
    table.to_json_file(dir.join("table.json")).unwrap();
    snapshot.to_json_file(dir.join("s0.json")).unwrap();
    snapshot.to_json_file(dir.join("s1.json")).unwrap();

    let config = RunConfig {
        output: "out".into(),
        database: "database.json".into(),
        table: "table.json".into(),
        times: vec![0.0, 1.0, 3.0],
        snapshots: vec!["s0.json".into(), "s1.json".into()],
        detectors,
        threads: Some(2),
        disable_progress: true,
        max_crossings: None,
    };
    let path = dir.join("run.json");
    config.to_json_file(&path).unwrap();
    RunConfig::from_json_file(&path).unwrap()
}

fn relative_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1e-300)
}

/// Intensity along a chord of `length` through the ball, per photon energy
fn through_ball(length: f64) -> Vec<f64> {
    [0.5_f64, 1.0, 1.5]
        .iter()
        .map(|kappa| 2.0 * (1.0 - (-kappa * length).exp()))
        .collect()
}

fn values(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[rstest]
fn planar_camera_images_the_ball(database: Database, table: Table) {
    let config = setup(
        "planar",
        &ball("Ar"),
        &database,
        &table,
        vec![camera("cam", 0.5, 0.5)],
    );
    let detectors = run(&config).unwrap();
    let cam = &detectors[0];
    assert_eq!((cam.nx(), cam.ny()), (2, 2));

    // every patch centre is 0.25 sqrt(2) off axis, and each snapshot lasts 1 + 2 s
    let expected = through_ball(2.0 * 0.875_f64.sqrt());
    for (ix, iy) in cam.patches() {
        for (yt, y) in cam.yt(ix, iy).unwrap().iter().zip(&expected) {
            assert!(relative_eq(*yt, 3.0 * y, 1e-10));
        }
    }
    for (yst, y) in cam.yst().iter().zip(&expected) {
        assert!(relative_eq(*yst, 4.0 * 0.25 * 3.0 * y, 1e-10));
    }

    let out = &config.output;
    for name in [
        "cam-hv_grid.txt",
        "cam-backlighter.txt",
        "cam-yp_ix1_iy0_time1.txt",
        "cam-ys_time0.txt",
        "cam-yt_ix1_iy1.txt",
        "cam-yst.txt",
        "times.txt",
    ] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let patch = values(&out.join("cam-yp_ix0_iy0_time0.txt"));
    assert_eq!(patch.len(), 8);
    assert_eq!(patch[0], "cam-yp_ix0_iy0_time0");
    assert_eq!(patch[1], "time 0    0.000000e+00 s");
    assert_eq!(patch[2], "ix 0   2.500000e-01 cm");
    assert_eq!(patch[3], "iy 0   2.500000e-01 cm");
    assert_eq!(patch[4], "data in W/cm2/sr/eV");

    assert_eq!(values(&out.join("cam-ys_time1.txt"))[2], "data in W/sr/eV");
    assert_eq!(values(&out.join("cam-yt_ix0_iy1.txt"))[3], "data in J/cm2/sr/eV");
    assert_eq!(values(&out.join("cam-yst.txt"))[1], "data in J/sr/eV");
}

#[rstest]
fn spherical_detector_sums_rings(database: Database, table: Table) {
    let mut config = camera("rings", 1.0, 0.5);
    config.symmetry = Symmetry::Spherical;
    let config = setup("spherical", &ball("Ar"), &database, &table, vec![config]);

    let detectors = run(&config).unwrap();
    let rings = &detectors[0];
    assert_eq!((rings.nx(), rings.ny()), (3, 1));

    // rays at radii 0, 0.4 and 0.8 on rings of width 0.4
    let y0 = through_ball(2.0);
    let y1 = through_ball(2.0 * 0.84_f64.sqrt());
    let y2 = through_ball(2.0 * 0.36_f64.sqrt());
    for j in 0..3 {
        let ys = (y0[j] / 8.0 + y1[j] + 2.0 * y2[j]) * 2.0 * PI * 0.16;
        assert!(relative_eq(rings.yst()[j], 3.0 * ys, 1e-10));
        assert!(relative_eq(rings.yt(2, 0).unwrap()[j], 3.0 * y2[j], 1e-10));
    }

    let header = values(&config.output.join("rings-yp_ix2_iy0_time1.txt"));
    assert_eq!(header[1], "time 1    1.000000e+00 s");
    assert_eq!(header[2], "ix 2   8.000000e-01 cm");
    assert_eq!(header[3], "iy 0   0.000000e+00 cm");
}

#[rstest]
fn bundle_collects_the_flux_of_a_thin_ball(database: Database, table: Table) {
    let mut config = camera("flux", 0.05, 0.1);
    config.bundle = Bundle::rings(40, 16);
    let config = setup("flux", &ball("H"), &database, &table, vec![config]);

    let detectors = run(&config).unwrap();
    let flux = &detectors[0];
    assert_eq!(flux.len(), 1);

    // thin emission of 1 W/cm3/sr from a unit ball seen from 10 cm, on 0.01 cm2
    let expected = 4.0 / 3.0 * PI / 100.0 * 0.01;
    for yst in flux.yst() {
        assert!(relative_eq(*yst, 3.0 * expected, 0.03));
    }

    let units = values(&config.output.join("flux-yp_ix0_iy0_time0.txt"));
    assert_eq!(units[4], "data in W/eV");
    assert_eq!(values(&config.output.join("flux-yst.txt"))[1], "data in J/eV");
}

#[rstest]
fn rays_and_tracking_files(database: Database, table: Table) {
    let mut config = camera("trk", 0.25, 0.5);
    config.write_rays = true;
    config.tracking = true;
    config.path = "trk".into();
    let config = setup("tracking", &ball("Ar"), &database, &table, vec![config]);
    run(&config).unwrap();

    let dir = config.output.join("trk");
    let ray = values(&dir.join("trk-yp_ix0_iy0_it0_ip0_time0.txt"));
    assert_eq!(ray[0], "trk-yp_ix0_iy0_it0_ip0_time0");
    assert_eq!(ray[4], "it 0   0.000000e+00 deg");
    assert_eq!(ray[5], "ip 0   0.000000e+00 deg");
    assert_eq!(ray[6], "data in W/cm2/sr/eV");

    // start, entry into the ball and exit, replayed from the far side
    for iz in 0..3 {
        let name = format!("trk-yp_ix0_iy0_it0_ip0_time1_iz{iz}.txt");
        assert!(dir.join(&name).exists(), "missing {name}");
    }
    let entry = values(&dir.join("trk-yp_ix0_iy0_it0_ip0_time1_iz1.txt"));
    assert_eq!(entry[0], "trk-yp_ix0_iy0_it0_ip0_time1_iz1");
    assert_eq!(entry[7], "ZoneID 1");
}

#[rstest]
fn rays_missing_the_mesh_see_nothing(database: Database, table: Table) {
    let mut config = camera("miss", 5.0, 5.0);
    config.ry = Vector3d::new(0.0, 0.5, 0.0);
    config.dy = 1.0;
    config.backlighter = Backlighter::Flat(1.0);
    let config = setup("miss", &ball("Ar"), &database, &table, vec![config]);

    let detectors = run(&config).unwrap();
    let miss = &detectors[0];
    assert_eq!((miss.nx(), miss.ny()), (2, 1));
    assert!(miss.yst().iter().all(|y| *y == 0.0));

    // the backlighter is still written for reference
    let backlighter = values(&config.output.join("miss-backlighter.txt"));
    assert_eq!(backlighter[2], "   1.000000e+00");
}

#[rstest]
fn narrow_window_and_broadening(database: Database, table: Table) {
    let mut narrow = camera("narrow", 0.25, 0.5);
    narrow.hv_range = [1.5, 2.5];
    narrow.fwhm = 5.0;

    let mut broad = camera("broad", 0.25, 0.5);
    broad.fwhm = 5.0;

    let config = setup(
        "broadening",
        &ball("Ar"),
        &database,
        &table,
        vec![narrow, broad],
    );
    let detectors = run_with(&config, &database, &table).unwrap();

    // a single photon energy passes through unchanged
    assert_eq!(detectors[0].hv(), &[2.0]);
    let y = through_ball(2.0)[1];
    assert!(relative_eq(detectors[0].yst()[0], 3.0 * 0.25 * y, 1e-10));

    // broadening only changes what is written, never what is accumulated
    let written = values(&config.output.join("broad-yst.txt"));
    let exact = detectors[1]
        .yst()
        .iter()
        .map(|v| v.column())
        .collect::<Vec<_>>();
    assert_eq!(written.len(), 5);
    assert_ne!(written[2..], exact[..]);
}
