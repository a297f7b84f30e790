//! Detector patches, ray bundles and the spectra built from them

// crate modules
use crate::config::{Bundle, DetectorConfig};
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::writer::write_hv_grid;

// spectrace modules
use spectrace_geometry::{FaceId, FaceKind, Vector3d, VectorExt};
use spectrace_material::Database;
use spectrace_mesh::{Snapshot, Symmetry};
use spectrace_ray::{write_spectrum, Backlighter, Ray, SpectralData, Tracking};
use spectrace_utils::constants::{CV, FOUR_PI};
use spectrace_utils::{convolve_gaussian, f, ndigits, nint, IndexExt, ValueExt};

// standard library
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

// external crates
use itertools::iproduct;
use kdam::par_tqdm;
use log::{debug, info, trace};
use nalgebra::Matrix3;
use rayon::prelude::*;

/// Tolerance for the first probe of the bounding sphere from the detector
const PROBE_EQT: f64 = 1.0e-15;

/// A synthetic detector looking at the mesh
///
/// The detector plane is cut into `nx` by `ny` patches. Every patch traces a
/// [Bundle] of rays back into the mesh, starting from the patch centre, and
/// accumulates the spectra they bring back. For each snapshot this gives
/// one spectrum per patch and their sum over the detector. Both are also
/// integrated over time as snapshots are added.
///
/// With spherical symmetry the patches are rings about the detector axis,
/// sampled by one ray each along a single radius of the detector.
///
/// Rays are directed from the detector towards the centre of the bounding
/// sphere, along `-bz` of a local frame whose `bz` axis points from the
/// centre of the mesh to the detector centre. Off-axis directions of a
/// bundle are polar angles measured from `-bz`, out to `theta_max` at which
/// rays graze the bounding sphere.
#[derive(Debug, Clone)]
pub struct Detector {
    name: String,
    path: PathBuf,
    symmetry: Symmetry,
    rc: Vector3d,
    /// Unit normal of the detector plane
    ez: Vector3d,
    /// Patch step along the first axis
    ux: Vector3d,
    /// Patch step along the second axis
    uy: Vector3d,
    /// Centre of the first patch
    ro: Vector3d,
    /// Columns `bx`, `by`, `bz` of the frame rays are aimed in
    basis: Matrix3<f64>,
    dx: f64,
    dy: f64,
    da: f64,
    nx: usize,
    ny: usize,
    bundle: Bundle,
    theta_max: f64,
    dtheta: f64,
    dphi: f64,
    window: (usize, usize),
    hv: Vec<f64>,
    fwhm: f64,
    backlighter: Backlighter,
    tracking: bool,
    write_rays: bool,
    max_crossings: Option<usize>,
    yt: Vec<Vec<f64>>,
    yst: Vec<f64>,
}

impl Detector {
    /// Set up a detector looking at the mesh of `snapshot`
    ///
    /// Output files go to `output` joined with the detector path. The energy
    /// window is selected from the photon energy grid of `database` and the
    /// frame of the bundles from the bounding sphere of `snapshot`.
    pub fn new(
        config: &DetectorConfig,
        database: &Database,
        snapshot: &Snapshot,
        output: &Path,
    ) -> Result<Self> {
        config.validate()?;
        let invalid = |reason: String| Error::InvalidDetector {
            name: config.name.clone(),
            reason,
        };

        let window = database.energy_window(config.hv_range[0], config.hv_range[1])?;
        let hv = database.hv()[window.0..=window.1].to_vec();

        // patch grid
        let nx = nint(2.0 * config.rx.norm() / config.dx);
        let ny = nint(2.0 * config.ry.norm() / config.dy);
        let (nx, ny, dx, dy, da) = match config.symmetry {
            Symmetry::None => {
                if nx < 1 || ny < 1 {
                    return Err(invalid(f!("patch grid of {nx} x {ny}")));
                }
                (nx as usize, ny as usize, config.dx, config.dy, config.dx * config.dy)
            }
            Symmetry::Spherical => {
                let nx = nx.max(0) as usize / 2 + 1;
                let dx = config.rx.norm() / (nx as f64 - 0.5);
                (nx, 1, dx, 2.0 * config.ry.norm(), 1.0)
            }
        };

        // detector plane
        let ex = config.rx.unit();
        let ey = config.ry.unit();
        let ez = ex.cross(&ey);
        let ux = ex * dx;
        let uy = ey * dy;
        let ro = config.rc - config.rx - config.ry + (ux + uy) * 0.5;

        // frame of the bundles, with bz pointing away from the mesh
        let (sc, sr) = bounding_extent(snapshot)?;
        let distance = (config.rc - sc).norm();
        if distance <= sr {
            return Err(Error::InsideBoundingSphere {
                name: config.name.clone(),
                distance,
                radius: sr,
            });
        }
        let bz = (config.rc - sc).unit();
        let mut bx = ex.perpendicular_to(&bz);
        let mut by = ey.perpendicular_to(&bz);
        if bx.norm() > by.norm() {
            bx = bx.unit();
            by = bz.cross(&bx);
        } else {
            by = by.unit();
            bx = by.cross(&bz);
        }
        let basis = Matrix3::from_columns(&[bx, by, bz]);

        let bundle = Bundle::rings(config.bundle.ntheta, config.bundle.nphi);
        let theta_max = (sr / distance).asin();
        let dtheta = match bundle.ntheta {
            0 => 0.0,
            n => theta_max / n as f64,
        };
        let dphi = match bundle.nphi {
            0 => 0.0,
            n => 2.0 * PI / n as f64,
        };

        let n = hv.len();
        let detector = Self {
            name: config.name.clone(),
            path: output.join(&config.path),
            symmetry: config.symmetry,
            rc: config.rc,
            ez,
            ux,
            uy,
            ro,
            basis,
            dx,
            dy,
            da,
            nx,
            ny,
            bundle,
            theta_max,
            dtheta,
            dphi,
            window,
            hv,
            fwhm: config.fwhm,
            backlighter: config.backlighter.clone(),
            tracking: config.tracking,
            write_rays: config.write_rays,
            max_crossings: None,
            yt: vec![vec![0.0; n]; nx * ny],
            yst: vec![0.0; n],
        };
        debug!("{detector}");
        Ok(detector)
    }

    /// Give up on rays after `max` zone crossings, `16 n + 16` if `None`
    pub fn with_max_crossings(mut self, max: Option<usize>) -> Self {
        self.max_crossings = max;
        self
    }

    /// Name of the detector, the root of its file names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory receiving the detector files
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Symmetry exploited by the detector
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Patches along the first axis
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Patches along the second axis
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of patches
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// True for a detector without patches
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patch widths in cm
    pub fn patch_size(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Unit normal of the detector plane
    pub fn normal(&self) -> Vector3d {
        self.ez
    }

    /// Frame the bundle directions are given in, as columns `bx`, `by`, `bz`
    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    /// Ray directions sampled by every patch
    pub fn bundle(&self) -> Bundle {
        self.bundle
    }

    /// Half-angle of the bounding sphere seen from the detector centre
    pub fn theta_max(&self) -> f64 {
        self.theta_max
    }

    /// Photon energies kept by the detector
    pub fn hv(&self) -> &[f64] {
        &self.hv
    }

    /// Indices of the first and last photon energy in the database grid
    pub fn window(&self) -> (usize, usize) {
        self.window
    }

    /// Time-integrated spectrum of patch `(ix, iy)`
    pub fn yt(&self, ix: usize, iy: usize) -> Option<&[f64]> {
        self.yt.get(self.patch_index(ix, iy)?).map(Vec::as_slice)
    }

    /// Time-integrated spectrum summed over the detector
    pub fn yst(&self) -> &[f64] {
        &self.yst
    }

    /// Every patch `(ix, iy)`, with `iy` running fastest
    pub fn patches(&self) -> Vec<(usize, usize)> {
        iproduct!(0..self.nx, 0..self.ny).collect()
    }

    fn patch_index(&self, ix: usize, iy: usize) -> Option<usize> {
        (ix < self.nx && iy < self.ny).then_some(ix * self.ny + iy)
    }

    /// Starting point of the rays of patch `(ix, iy)`
    ///
    /// Under spherical symmetry this is a point along the first axis at
    /// radius `ix dx` from the detector centre.
    pub fn origin(&self, ix: usize, iy: usize) -> Vector3d {
        match self.symmetry {
            Symmetry::None => self.ro + self.ux * ix as f64 + self.uy * iy as f64,
            Symmetry::Spherical => self.rc + self.ux * ix as f64,
        }
    }

    /// Ray velocity for bundle direction `(itheta, iphi)`
    pub fn direction(&self, itheta: usize, iphi: usize) -> Vector3d {
        let theta = itheta as f64 * self.dtheta;
        let phi = iphi as f64 * self.dphi;
        self.basis * (Vector3d::from_angles(theta, phi) * -CV)
    }

    /// Solid angle in sr represented by bundle direction `(itheta, iphi)`
    ///
    /// The axial ray stands for a cone of half-angle `dtheta / 2`, every
    /// other ray for its share of a ring of width `dtheta`.
    pub fn solid_angle(&self, itheta: usize, iphi: usize) -> f64 {
        if itheta == 0 && iphi == 0 {
            FOUR_PI * (self.dtheta / 4.0).sin().powi(2)
        } else {
            let theta = itheta as f64 * self.dtheta;
            2.0 * self.dphi * theta.sin() * (self.dtheta / 2.0).sin()
        }
    }

    /// Area in cm² of the patches in column `ix`
    ///
    /// Spherical patches are the central disc and the rings about it.
    pub fn patch_area(&self, ix: usize) -> f64 {
        match self.symmetry {
            Symmetry::None => self.da,
            Symmetry::Spherical if ix == 0 => PI * (self.dx / 2.0).powi(2),
            Symmetry::Spherical => 2.0 * PI * ix as f64 * self.dx.powi(2),
        }
    }

    /// Apply the instrumental broadening
    ///
    /// Spectra with fewer than two photon energies cannot be broadened and
    /// are returned unchanged.
    pub fn broaden(&self, y: &[f64]) -> Result<Vec<f64>> {
        if self.fwhm <= 0.0 || self.hv.len() < 2 {
            return Ok(y.to_vec());
        }
        Ok(convolve_gaussian(self.fwhm, &self.hv, y)?)
    }

    /// Write the photon energy grid and backlighter spectrum
    pub fn write_grid_files(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path)?;
        write_hv_grid(self.file(&f!("{}-hv_grid", self.name)), &self.hv)?;

        let stem = f!("{}-backlighter", self.name);
        write_spectrum(
            self.file(&stem),
            &f!("{stem}\ndata in W/cm2/sr/eV"),
            &self.backlighter.spectrum(&self.hv),
        )?;
        Ok(())
    }

    /// Trace every patch through `snapshot` and accumulate the results
    ///
    /// Patches are evaluated in parallel on the current rayon pool and their
    /// spectra written as they complete. The spectrum summed over the
    /// detector is written and returned, and both are added to the time
    /// integrals weighted by the length of `interval`.
    pub fn evaluate(
        &mut self,
        snapshot: &Snapshot,
        data: &SpectralData,
        interval: &Interval,
        disable_progress: bool,
    ) -> Result<Vec<f64>> {
        info!(
            "Detector \"{}\", {}: {} patches of {} rays",
            self.name,
            interval.label(),
            self.len(),
            self.bundle.directions().len()
        );

        let patches = self.patches();
        let spectra = {
            let detector = &*self;
            par_tqdm!(
                patches
                    .par_iter()
                    .map(|&(ix, iy)| detector.do_patch(snapshot, data, interval, ix, iy)),
                desc = detector.name.clone(),
                disable = disable_progress,
                bar_format = "{desc}: {count}/{total} patches [{rate:.2} patches/s]  "
            )
            .collect::<Result<Vec<Vec<f64>>>>()?
        };
        if !disable_progress {
            eprintln!();
        }

        let dt = interval.dt;
        let integrated = self.bundle.is_integrated();
        let mut ys = vec![0.0; self.hv.len()];
        for (&(ix, iy), yp) in patches.iter().zip(&spectra) {
            match self.symmetry {
                Symmetry::Spherical if !integrated && ix == 0 => {
                    ys = yp.iter().map(|y| y / 8.0).collect();
                }
                Symmetry::Spherical if !integrated => {
                    ys.iter_mut()
                        .zip(yp)
                        .for_each(|(s, y)| *s += y * ix as f64);
                }
                _ => ys.iter_mut().zip(yp).for_each(|(s, y)| *s += y),
            }

            let index = self.patch_index(ix, iy).ok_or(Error::PatchOutOfRange {
                ix,
                iy,
                nx: self.nx,
                ny: self.ny,
            })?;
            self.yt[index]
                .iter_mut()
                .zip(yp)
                .for_each(|(t, y)| *t += y * dt);
        }

        if !integrated {
            let area = match self.symmetry {
                Symmetry::None => self.da,
                Symmetry::Spherical => 2.0 * PI * self.dx.powi(2),
            };
            ys.iter_mut().for_each(|s| *s *= area);
        }
        self.yst.iter_mut().zip(&ys).for_each(|(t, s)| *t += s * dt);

        let stem = f!("{}-ys_{}", self.name, interval.label());
        let units = if integrated { "W/eV" } else { "W/sr/eV" };
        write_spectrum(
            self.file(&stem),
            &f!("{stem}\n{}data in {units}", interval.header()),
            &self.broaden(&ys)?,
        )?;
        Ok(ys)
    }

    /// Spectrum of patch `(ix, iy)` for one snapshot
    ///
    /// Without rings this is the intensity of the axial ray in W/cm²/sr/eV.
    /// Otherwise the rays are weighted by solid angle and obliquity and the
    /// sum multiplied by the patch area, giving W/eV.
    pub fn do_patch(
        &self,
        snapshot: &Snapshot,
        data: &SpectralData,
        interval: &Interval,
        ix: usize,
        iy: usize,
    ) -> Result<Vec<f64>> {
        let mut yp = vec![0.0; self.hv.len()];
        for (itheta, iphi) in self.bundle.directions() {
            let Some(ray) = self.do_ray(snapshot, data, interval, (ix, iy), (itheta, iphi))?
            else {
                continue;
            };

            if self.bundle.is_integrated() {
                let weight = self.solid_angle(itheta, iphi) * self.ez.cos_angle(&ray.v);
                yp.iter_mut()
                    .zip(&ray.y)
                    .for_each(|(p, y)| *p += y * weight);
            } else {
                yp = ray.y;
            }
        }

        if self.bundle.is_integrated() {
            let area = self.patch_area(ix);
            yp.iter_mut().for_each(|p| *p *= area);
        }

        let stem = f!(
            "{}-yp_{}_{}",
            self.name,
            self.patch_label(ix, iy),
            interval.label()
        );
        let units = if self.bundle.is_integrated() {
            "W/eV"
        } else {
            "W/cm2/sr/eV"
        };
        write_spectrum(
            self.file(&stem),
            &f!(
                "{stem}\n{}{}data in {units}",
                interval.header(),
                self.patch_header(ix, iy)
            ),
            &self.broaden(&yp)?,
        )?;
        Ok(yp)
    }

    /// Trace one ray of patch `(ix, iy)` along bundle direction `(itheta, iphi)`
    ///
    /// Rays that miss the bounding sphere see nothing and give `None`.
    /// Otherwise the ray is traced through the mesh, lit by the backlighter
    /// and transported back to the detector.
    pub fn do_ray(
        &self,
        snapshot: &Snapshot,
        data: &SpectralData,
        interval: &Interval,
        (ix, iy): (usize, usize),
        (itheta, iphi): (usize, usize),
    ) -> Result<Option<Ray>> {
        let r0 = self.origin(ix, iy);
        let v = self.direction(itheta, iphi);
        let stem = f!(
            "{}-yp_{}_{}_{}",
            self.name,
            self.patch_label(ix, iy),
            self.direction_label(itheta, iphi),
            interval.label()
        );
        let header = f!(
            "{stem}\n{}{}{}",
            interval.header(),
            self.patch_header(ix, iy),
            self.direction_header(itheta, iphi)
        );

        let probe = snapshot.mesh.bounding_sphere()?.intercept(
            &snapshot.grid,
            &r0,
            &v,
            PROBE_EQT,
            FaceId::DETECTOR,
        )?;

        let ray = if probe.is_found {
            let mut ray = Ray::new(r0, v, self.window);
            if let Some(max) = self.max_crossings {
                ray = ray.with_max_crossings(max);
            }
            if self.tracking {
                let froot = self.path.join(&stem).to_string_lossy().into_owned();
                ray = ray.with_tracking(Tracking::new(froot, header.clone()));
            }
            ray.trace(&snapshot.grid, &snapshot.mesh)?;
            ray.set_backlighter(&self.backlighter, &self.hv)?;
            ray.cross_mesh(&snapshot.mesh, data, ix)?;
            Some(ray)
        } else {
            trace!("{stem} misses the bounding sphere");
            None
        };

        if self.write_rays {
            let y = match &ray {
                Some(ray) => self.broaden(&ray.y)?,
                None => vec![0.0; self.hv.len()],
            };
            write_spectrum(
                self.file(&stem),
                &f!("{header}\ndata in W/cm2/sr/eV"),
                &y,
            )?;
        }
        Ok(ray)
    }

    /// Write the time-integrated spectra of every patch and of the detector
    pub fn write_time_integrated(&self) -> Result<()> {
        let integrated = self.bundle.is_integrated();
        let units = if integrated { "J/eV" } else { "J/cm2/sr/eV" };
        for (ix, iy) in self.patches() {
            let Some(yt) = self.yt(ix, iy) else {
                continue;
            };
            let stem = f!("{}-yt_{}", self.name, self.patch_label(ix, iy));
            write_spectrum(
                self.file(&stem),
                &f!("{stem}\n{}data in {units}", self.patch_header(ix, iy)),
                &self.broaden(yt)?,
            )?;
        }

        let stem = f!("{}-yst", self.name);
        let units = if integrated { "J/eV" } else { "J/sr/eV" };
        write_spectrum(
            self.file(&stem),
            &f!("{stem}\ndata in {units}"),
            &self.broaden(&self.yst)?,
        )?;
        Ok(())
    }

    /// Path of the text file `stem`
    fn file(&self, stem: &str) -> PathBuf {
        self.path.join(f!("{stem}.txt"))
    }

    fn patch_label(&self, ix: usize, iy: usize) -> String {
        f!(
            "ix{}_iy{}",
            ix.padded(ndigits(self.nx)),
            iy.padded(ndigits(self.ny))
        )
    }

    fn patch_header(&self, ix: usize, iy: usize) -> String {
        let (x, y) = match self.symmetry {
            Symmetry::None => (
                self.dx * (ix as f64 + 0.5),
                self.dy * (iy as f64 + 0.5),
            ),
            Symmetry::Spherical => (self.dx * ix as f64, 0.0),
        };
        f!(
            "ix {}{} cm\niy {}{} cm\n",
            ix.aligned(ndigits(self.nx)),
            x.column(),
            iy.aligned(ndigits(self.ny)),
            y.column()
        )
    }

    fn direction_label(&self, itheta: usize, iphi: usize) -> String {
        f!(
            "it{}_ip{}",
            itheta.padded(ndigits(self.bundle.ntheta)),
            iphi.padded(ndigits(self.bundle.nphi))
        )
    }

    fn direction_header(&self, itheta: usize, iphi: usize) -> String {
        let theta = (itheta as f64 * self.dtheta).to_degrees();
        let phi = (iphi as f64 * self.dphi).to_degrees();
        f!(
            "it {}{} deg\nip {}{} deg",
            itheta.aligned(ndigits(self.bundle.ntheta)),
            theta.column(),
            iphi.aligned(ndigits(self.bundle.nphi)),
            phi.column()
        )
    }
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Detector \"{}\" ({} symmetry)", self.name, self.symmetry)?;
        writeln!(
            f,
            "  patches {} x {} of {} x {} cm",
            self.nx,
            self.ny,
            self.dx.sci(4, 2),
            self.dy.sci(4, 2)
        )?;
        writeln!(
            f,
            "  bundle ntheta {} nphi {}, theta_max {} deg",
            self.bundle.ntheta,
            self.bundle.nphi,
            self.theta_max.to_degrees().sci(4, 2)
        )?;
        write!(
            f,
            "  {} photon energies, window {}..={}, fwhm {} eV, backlighter {}",
            self.hv.len(),
            self.window.0,
            self.window.1,
            self.fwhm,
            self.backlighter
        )
    }
}

/// Centre and radius of the bounding sphere of `snapshot`
pub fn bounding_extent(snapshot: &Snapshot) -> Result<(Vector3d, f64)> {
    let face = snapshot.mesh.bounding_sphere()?;
    match &face.shape {
        FaceKind::Sphere(sphere) => Ok((
            snapshot.grid.position(sphere.center)?,
            sphere.radius.abs(),
        )),
        other => Err(spectrace_mesh::Error::MalformedBoundingZone(f!(
            "face 0 of zone 0 is a {}",
            other.name()
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrace_material::{Grids, State};
    use spectrace_mesh::builder::spherical_shells;

    fn database() -> Database {
        let grids = Grids {
            te: vec![100.0],
            tr: vec![0.0],
            ne_mantissa: vec![1.0],
            ne_exponent: vec![20],
            hv: vec![1.0, 2.0, 3.0, 4.0],
        };
        let state = State {
            handle: "ar".into(),
            ite: 0,
            itr: 0,
            ine: 0,
            zbar: 1.0,
            em: vec![0.0; 4],
            ab: vec![0.0; 4],
            sc: vec![0.0; 4],
        };
        Database::new(grids, vec![state]).unwrap()
    }

    fn config(symmetry: Symmetry, bundle: Bundle) -> DetectorConfig {
        DetectorConfig {
            name: "det".into(),
            path: PathBuf::new(),
            symmetry,
            rc: Vector3d::new(0.0, 0.0, 4.0),
            rx: Vector3d::new(1.0, 0.0, 0.0),
            ry: Vector3d::new(0.0, 0.5, 0.0),
            dx: 0.5,
            dy: 0.5,
            hv_range: [2.0, 3.0],
            fwhm: 0.0,
            backlighter: Backlighter::None,
            tracking: false,
            write_rays: false,
            bundle,
        }
    }

    fn detector(symmetry: Symmetry, bundle: Bundle) -> Detector {
        let snapshot = spherical_shells(&[1.0]).unwrap();
        Detector::new(
            &config(symmetry, bundle),
            &database(),
            &snapshot,
            Path::new("out"),
        )
        .unwrap()
    }

    #[test]
    fn planar_patch_grid() {
        let d = detector(Symmetry::None, Bundle::axial());
        assert_eq!((d.nx(), d.ny()), (4, 2));
        assert_eq!(d.len(), 8);
        assert_eq!(d.patches()[..3], [(0, 0), (0, 1), (1, 0)]);
        assert_eq!(d.window(), (1, 2));
        assert_eq!(d.hv(), &[2.0, 3.0]);

        // first patch centre sits half a patch in from the corner
        let o = d.origin(0, 0);
        assert!((o - Vector3d::new(-0.75, -0.25, 4.0)).norm() < 1e-12);
        assert_eq!(d.patch_area(3), 0.25);
    }

    #[test]
    fn spherical_patch_grid() {
        let d = detector(Symmetry::Spherical, Bundle::axial());
        assert_eq!((d.nx(), d.ny()), (3, 1));

        // rings of width dx about a central disc of radius dx / 2
        let (dx, _) = d.patch_size();
        assert!((dx - 0.4).abs() < 1e-12);
        assert!((d.origin(2, 0) - Vector3d::new(0.8, 0.0, 4.0)).norm() < 1e-12);
        assert!((d.patch_area(0) - PI * 0.04).abs() < 1e-12);
        assert!((d.patch_area(2) - 4.0 * PI * 0.16).abs() < 1e-12);
    }

    #[test]
    fn orthonormal_bundle_frame() {
        let d = detector(Symmetry::None, Bundle::rings(4, 6));
        let b = d.basis();
        assert!((b.transpose() * b - Matrix3::identity()).norm() < 1e-12);
        assert!((b.column(2) - Vector3d::z()).norm() < 1e-12);

        // the axial ray heads straight for the mesh centre
        let v = d.direction(0, 0);
        assert!((v / CV + Vector3d::z()).norm() < 1e-12);
        assert!((d.theta_max() - (0.5_f64).asin()).abs() < 1e-12);
    }

    #[test]
    fn bundle_covers_the_cone() {
        let d = detector(Symmetry::None, Bundle::rings(40, 64));
        let total = d
            .bundle()
            .directions()
            .into_iter()
            .map(|(it, ip)| d.solid_angle(it, ip))
            .sum::<f64>();

        // rings stop half a step short of theta_max
        let edge = d.theta_max() - d.theta_max() / 80.0;
        let cone = 2.0 * PI * (1.0 - edge.cos());
        assert!((total - cone).abs() < 1e-9);
    }

    #[test]
    fn labels() {
        let d = detector(Symmetry::None, Bundle::rings(12, 4));
        assert_eq!(d.patch_label(3, 1), "ix3_iy1");
        assert_eq!(d.direction_label(2, 3), "it02_ip3");
        assert_eq!(
            d.patch_header(1, 0),
            "ix 1   7.500000e-01 cm\niy 0   2.500000e-01 cm\n"
        );
        assert!(d.direction_header(0, 0).starts_with("it  0   0.000000e+00 deg\nip 0"));
    }

    #[test]
    fn detector_inside_the_mesh() {
        let snapshot = spherical_shells(&[1.0]).unwrap();
        let mut config = config(Symmetry::None, Bundle::axial());
        config.rc = Vector3d::new(0.0, 0.0, 1.5);
        assert!(matches!(
            Detector::new(&config, &database(), &snapshot, Path::new("out")),
            Err(Error::InsideBoundingSphere { .. })
        ));
    }

    #[test]
    fn single_energy_is_not_broadened() {
        let mut config = config(Symmetry::None, Bundle::axial());
        config.hv_range = [2.5, 3.5];
        config.fwhm = 10.0;
        let snapshot = spherical_shells(&[1.0]).unwrap();
        let d = Detector::new(&config, &database(), &snapshot, Path::new("out")).unwrap();

        assert_eq!(d.hv(), &[3.0]);
        assert_eq!(d.broaden(&[7.0]).unwrap(), vec![7.0]);
    }
}
