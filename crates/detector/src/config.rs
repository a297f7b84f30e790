//! Run and detector descriptions read from JSON

// crate modules
use crate::error::{Error, Result};

// spectrace modules
use spectrace_geometry::{Vector3d, VectorExt};
use spectrace_mesh::Symmetry;
use spectrace_ray::Backlighter;
use spectrace_utils::f;

// standard library
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Directions sampled by every patch of a detector
///
/// With `ntheta == 0` each patch sends a single ray along the detector axis
/// and results are intensities per steradian. Otherwise rings of `nphi` rays
/// at polar angles `it * theta_max / ntheta` for `it` in `1..ntheta` are
/// added around the axis and the solid angle is integrated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Number of polar angle steps out to the edge of the mesh
    #[serde(default)]
    pub ntheta: usize,
    /// Number of azimuthal angles per ring
    #[serde(default)]
    pub nphi: usize,
}

impl Bundle {
    /// Single ray along the axis
    pub fn axial() -> Self {
        Self::default()
    }

    /// Rings of `nphi` rays at `ntheta` polar angle steps
    ///
    /// Azimuthal sampling is meaningless without polar steps, so `nphi` is
    /// dropped when `ntheta` is zero.
    pub fn rings(ntheta: usize, nphi: usize) -> Self {
        Self {
            ntheta,
            nphi: if ntheta == 0 { 0 } else { nphi },
        }
    }

    /// True if results are integrated over solid angle
    pub fn is_integrated(&self) -> bool {
        self.ntheta > 0
    }

    /// Direction indices `(itheta, iphi)` in the order they are traced
    ///
    /// ```rust
    /// # use spectrace_detector::Bundle;
    /// let bundle = Bundle::rings(3, 2);
    /// assert_eq!(
    ///     bundle.directions(),
    ///     vec![(0, 0), (1, 0), (1, 1), (2, 0), (2, 1)]
    /// );
    /// ```
    pub fn directions(&self) -> Vec<(usize, usize)> {
        let mut directions = vec![(0, 0)];
        for itheta in 1..self.ntheta {
            for iphi in 0..self.nphi {
                directions.push((itheta, iphi));
            }
        }
        directions
    }
}

/// Everything needed to set up one detector
///
/// The detector plane is centred on `rc` and spanned by the half-widths `rx`
/// and `ry`, cut into patches of `dx` by `dy` cm. Photon energies between
/// `hv_range[0]` and `hv_range[1]` eV are kept.
///
/// ```rust
/// # use spectrace_detector::DetectorConfig;
/// let json = r#"{
///     "name": "xrs",
///     "rc": [0.0, 0.0, 10.0],
///     "rx": [0.1, 0.0, 0.0],
///     "ry": [0.0, 0.1, 0.0],
///     "dx": 0.1,
///     "dy": 0.1,
///     "hv_range": [1.0, 3.0],
///     "backlighter": { "kind": "blackbody", "value": 100.0 }
/// }"#;
///
/// let config: DetectorConfig = serde_json::from_str(json).unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.bundle.ntheta, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Name used as the root of every output file
    pub name: String,
    /// Sub-directory of the run output, if any
    #[serde(default)]
    pub path: PathBuf,
    /// Symmetry of the mesh to exploit
    #[serde(default)]
    pub symmetry: Symmetry,
    /// Centre of the detector plane
    pub rc: Vector3d,
    /// Half-width vector along the first detector axis
    pub rx: Vector3d,
    /// Half-width vector along the second detector axis
    pub ry: Vector3d,
    /// Patch width along `rx` in cm
    pub dx: f64,
    /// Patch width along `ry` in cm
    pub dy: f64,
    /// Lower and upper photon energy in eV
    pub hv_range: [f64; 2],
    /// Instrumental broadening in eV, none if zero
    #[serde(default)]
    pub fwhm: f64,
    /// Spectrum entering at the far side of the mesh
    #[serde(default)]
    pub backlighter: Backlighter,
    /// Write spectra after every zone crossed, for every ray
    #[serde(default)]
    pub tracking: bool,
    /// Write the spectrum of every ray, not only of every patch
    #[serde(default)]
    pub write_rays: bool,
    /// Ray directions sampled per patch
    #[serde(default)]
    pub bundle: Bundle,
}

impl DetectorConfig {
    /// Check that the detector can be sampled
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidDetector {
            name: self.name.clone(),
            reason,
        };

        if self.name.is_empty() || self.name.contains(['/', '\\']) {
            return Err(invalid("name must be a plain, non-empty file stem".into()));
        }
        if !(self.dx > 0.0 && self.dy > 0.0) {
            return Err(invalid(f!("patch sizes {} x {} cm", self.dx, self.dy)));
        }
        if self.rx.norm() == 0.0 || self.ry.norm() == 0.0 {
            return Err(invalid("zero detector half-width".into()));
        }
        if self.rx.unit().cross(&self.ry.unit()).norm() < 1.0e-12 {
            return Err(invalid("rx and ry are parallel".into()));
        }
        if !(self.hv_range[0] < self.hv_range[1]) {
            return Err(invalid(f!(
                "empty photon energy range {} - {} eV",
                self.hv_range[0],
                self.hv_range[1]
            )));
        }
        if self.fwhm < 0.0 {
            return Err(invalid(f!("negative fwhm {}", self.fwhm)));
        }
        if self.bundle.ntheta == 0 && self.bundle.nphi > 0 {
            warn!(
                "Detector \"{}\" has nphi = {} without polar steps, only the axial ray is traced",
                self.name, self.bundle.nphi
            );
        }
        if self.bundle.ntheta > 1 && self.bundle.nphi == 0 {
            warn!(
                "Detector \"{}\" has ntheta = {} without azimuthal steps, only the axial ray is traced",
                self.name, self.bundle.ntheta
            );
        }
        Ok(())
    }
}

/// A full postprocessing run
///
/// Snapshot `i` is weighted by the interval `times[i + 1] - times[i]`, so
/// there is one more time than there are snapshots. Relative paths are
/// resolved against the directory of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory that receives every output file
    pub output: PathBuf,
    /// Spectral database in JSON
    pub database: PathBuf,
    /// Material table in JSON
    pub table: PathBuf,
    /// Interval boundaries in s
    pub times: Vec<f64>,
    /// Snapshot files in JSON, in time order
    pub snapshots: Vec<PathBuf>,
    /// Detectors evaluated for every snapshot
    pub detectors: Vec<DetectorConfig>,
    /// Worker threads, all available cores if unset
    #[serde(default)]
    pub threads: Option<usize>,
    /// Hide progress bars
    #[serde(default)]
    pub disable_progress: bool,
    /// Zone crossings after which a ray is abandoned, `16 n + 16` if unset
    #[serde(default)]
    pub max_crossings: Option<usize>,
}

impl RunConfig {
    /// Read and check a run description
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut config: Self = serde_json::from_reader(BufReader::new(file))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        debug!("Read run configuration from {}", path.display());
        Ok(config)
    }

    /// Write the run description
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Make every relative path relative to `base` instead
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output);
        resolve(&mut self.database);
        resolve(&mut self.table);
        self.snapshots.iter_mut().for_each(resolve);
    }

    /// Check the run for consistency
    pub fn validate(&self) -> Result<()> {
        if self.snapshots.is_empty() {
            return Err(Error::InvalidRun("no snapshots listed".into()));
        }
        if self.times.len() != self.snapshots.len() + 1 {
            return Err(Error::TimeMismatch {
                snapshots: self.snapshots.len(),
                expected: self.snapshots.len() + 1,
                found: self.times.len(),
            });
        }
        if let Some(i) = self.times.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(Error::InvalidRun(f!(
                "times must increase, found {} after {}",
                self.times[i + 1],
                self.times[i]
            )));
        }
        if self.detectors.is_empty() {
            return Err(Error::InvalidRun("no detectors listed".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidRun("threads must be at least 1".into()));
        }

        let mut names = HashSet::new();
        for detector in &self.detectors {
            detector.validate()?;
            if !names.insert((&detector.path, &detector.name)) {
                return Err(Error::InvalidRun(f!(
                    "detector \"{}\" listed twice",
                    detector.name
                )));
            }
        }
        Ok(())
    }

    /// Number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True if there is no snapshot to process
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Start time and duration of snapshot `it`
    pub fn interval(&self, it: usize) -> Option<(f64, f64)> {
        let t0 = self.times.get(it)?;
        let t1 = self.times.get(it + 1)?;
        Some((*t0, t1 - t0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> DetectorConfig {
        DetectorConfig {
            name: "det".into(),
            path: PathBuf::new(),
            symmetry: Symmetry::None,
            rc: Vector3d::new(0.0, 0.0, 10.0),
            rx: Vector3d::new(1.0, 0.0, 0.0),
            ry: Vector3d::new(0.0, 1.0, 0.0),
            dx: 0.5,
            dy: 0.5,
            hv_range: [1.0, 3.0],
            fwhm: 0.0,
            backlighter: Backlighter::None,
            tracking: false,
            write_rays: false,
            bundle: Bundle::axial(),
        }
    }

    fn run() -> RunConfig {
        RunConfig {
            output: "out".into(),
            database: "db.json".into(),
            table: "table.json".into(),
            times: vec![0.0, 1.0, 3.0],
            snapshots: vec!["s0.json".into(), "s1.json".into()],
            detectors: vec![detector()],
            threads: None,
            disable_progress: true,
            max_crossings: None,
        }
    }

    #[test]
    fn bundle_without_rings() {
        assert_eq!(Bundle::rings(0, 8), Bundle::axial());
        assert_eq!(Bundle::axial().directions(), vec![(0, 0)]);
        assert_eq!(Bundle::rings(1, 8).directions(), vec![(0, 0)]);
        assert!(Bundle::rings(1, 8).is_integrated());
    }

    #[test]
    fn detector_checks() {
        assert!(detector().validate().is_ok());

        let mut parallel = detector();
        parallel.ry = Vector3d::new(2.0, 0.0, 0.0);
        assert!(parallel.validate().is_err());

        let mut empty = detector();
        empty.hv_range = [3.0, 3.0];
        assert!(empty.validate().is_err());

        let mut flat = detector();
        flat.dy = 0.0;
        assert!(flat.validate().is_err());

        let mut nested = detector();
        nested.name = "a/b".into();
        assert!(nested.validate().is_err());
    }

    #[test]
    fn run_checks() {
        assert!(run().validate().is_ok());

        let mut short = run();
        short.times.pop();
        assert!(matches!(
            short.validate(),
            Err(Error::TimeMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));

        let mut backwards = run();
        backwards.times[2] = 0.5;
        assert!(backwards.validate().is_err());

        let mut twice = run();
        twice.detectors.push(detector());
        assert!(twice.validate().is_err());

        let mut moved = twice.clone();
        moved.detectors[1].path = "other".into();
        assert!(moved.validate().is_ok());
    }

    #[test]
    fn intervals() {
        let run = run();
        assert_eq!(run.interval(1), Some((1.0, 2.0)));
        assert_eq!(run.interval(2), None);
    }

    #[test]
    fn relative_paths() {
        let mut run = run();
        run.output = "/tmp/out".into();
        run.resolve_paths(Path::new("/data"));
        assert_eq!(run.output, PathBuf::from("/tmp/out"));
        assert_eq!(run.database, PathBuf::from("/data/db.json"));
        assert_eq!(run.snapshots[1], PathBuf::from("/data/s1.json"));
    }
}
