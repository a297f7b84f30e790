//! Rays carrying a spectrum through the mesh

// crate modules
use crate::backlighter::Backlighter;
use crate::error::{Error, Result};
use crate::tracking::Tracking;
use crate::waypoint::Waypoint;

// spectrace modules
use spectrace_geometry::{FaceId, Grid, Vector3d};
use spectrace_material::{Database, NeSearch, Table};
use spectrace_mesh::{Mesh, Symmetry, Zone};
use spectrace_utils::{ndigits, ValueExt};

// external crates
use itertools::izip;
use log::{debug, trace, warn};

/// Optical depth below which a zone is treated as optically thin
const THIN_DEPTH: f64 = 2.0e-10;

/// Where the spectra of every zone are looked up during replay
#[derive(Debug, Clone, Copy)]
pub struct SpectralData<'a> {
    /// Spectral states on their (te, tr, ne, hv) grids
    pub database: &'a Database,
    /// Material names to database handles
    pub table: &'a Table,
    /// Symmetry the rays of the detector exploit
    pub symmetry: Symmetry,
}

/// A ray carrying a spectrum with its own position and direction
///
/// A ray is used in two passes. [Ray::trace] follows it geometrically from
/// its starting point until it leaves the mesh through the bounding sphere,
/// recording every boundary crossing on a stack of [Waypoint]s, and then
/// turns it around. [Ray::cross_mesh] replays the stack, so that the zones
/// are crossed in the direction light actually travels, and updates the
/// spectrum zone by zone with [Ray::transport].
///
/// The spectrum `y` is in W/cm²/sr/eV over the photon energy window
/// `jmin..=jmax` of the database.
#[derive(Debug, Clone)]
pub struct Ray {
    /// Current position
    pub r: Vector3d,
    /// Current direction, scaled to the speed of light
    pub v: Vector3d,
    /// Zone the ray is in
    pub zid: usize,
    /// Specific intensity in W/cm²/sr/eV
    pub y: Vec<f64>,
    /// Emissivity of the zone being crossed, in W/cm³/sr/eV
    em: Vec<f64>,
    /// Absorption of the zone being crossed, in 1/cm
    ab: Vec<f64>,
    /// Scattering of the zone being crossed, in 1/cm
    sc: Vec<f64>,
    /// Database grid point of the last zone crossed
    grid_point: NeSearch,
    /// Boundary crossings still to be replayed
    wpt: Vec<Waypoint>,
    window: (usize, usize),
    max_crossings: Option<usize>,
    crossings: usize,
    unresolved: usize,
    tracking: Option<Tracking>,
}

impl Ray {
    /// New dark ray starting at `r` along `v` in the bounding zone
    ///
    /// The spectrum spans photon energy indices `jmin..=jmax`.
    pub fn new(r: Vector3d, v: Vector3d, (jmin, jmax): (usize, usize)) -> Self {
        let n = jmax.saturating_sub(jmin) + 1;
        Self {
            r,
            v,
            zid: 0,
            y: vec![0.0; n],
            em: vec![0.0; n],
            ab: vec![0.0; n],
            sc: vec![0.0; n],
            grid_point: NeSearch::default(),
            wpt: vec![Waypoint::start(r)],
            window: (jmin, jmax),
            max_crossings: None,
            crossings: 0,
            unresolved: 0,
            tracking: None,
        }
    }

    /// Start with the given spectrum instead of a dark one
    pub fn with_spectrum(mut self, y: Vec<f64>) -> Result<Self> {
        if y.len() != self.y.len() {
            return Err(Error::SpectrumLengthMismatch {
                expected: self.y.len(),
                found: y.len(),
            });
        }
        self.y = y;
        Ok(self)
    }

    /// Write the partial spectrum after every zone crossed
    pub fn with_tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = Some(tracking);
        self
    }

    /// Give up tracing after `max` zone crossings
    ///
    /// Defaults to `16 n + 16` for a mesh of `n` zones.
    pub fn with_max_crossings(mut self, max: usize) -> Self {
        self.max_crossings = Some(max);
        self
    }

    /// Replace the spectrum with a backlighter over photon energies `hv`
    pub fn set_backlighter(&mut self, backlighter: &Backlighter, hv: &[f64]) -> Result<()> {
        let y = backlighter.spectrum(hv);
        if y.len() != self.y.len() {
            return Err(Error::SpectrumLengthMismatch {
                expected: self.y.len(),
                found: y.len(),
            });
        }
        self.y = y;
        Ok(())
    }

    /// Number of photon energies in the spectrum
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// True for a ray without any photon energies
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Photon energy indices `(jmin, jmax)` of the spectrum
    pub fn window(&self) -> (usize, usize) {
        self.window
    }

    /// Waypoints still to be replayed, bottom of the stack first
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.wpt
    }

    /// Number of zone intercept searches made by the last trace
    pub fn crossings(&self) -> usize {
        self.crossings
    }

    /// Crossings where no neighbour contained the hit point
    ///
    /// The ray then carries on from the bounding zone.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// Database grid point of the last zone crossed
    pub fn grid_point(&self) -> NeSearch {
        self.grid_point
    }

    /// Tracking state, if partial spectra are written
    pub fn tracking(&self) -> Option<&Tracking> {
        self.tracking.as_ref()
    }

    /// Follow the ray through the mesh until it leaves the bounding sphere
    ///
    /// Each step searches the current zone for its exit face, excluding the
    /// face the ray came in through, and asks the mesh which face is entered
    /// next. Every crossing is pushed onto the waypoint stack. Once the
    /// bounding sphere is hit the direction is reversed, ready for
    /// [Ray::cross_mesh].
    pub fn trace(&mut self, grid: &Grid, mesh: &Mesh) -> Result<()> {
        let max_crossings = self.max_crossings.unwrap_or(16 * mesh.len() + 16);
        let mut outface = self
            .wpt
            .last()
            .map(|w| w.outface)
            .unwrap_or(FaceId::BOUNDING_SPHERE);

        self.crossings = 0;
        loop {
            if self.crossings >= max_crossings {
                return Err(Error::RayNotTerminated {
                    crossings: max_crossings,
                });
            }
            self.crossings += 1;

            let h = mesh.zone(self.zid)?.hit(grid, &self.r, &self.v, outface)?;
            if !h.is_found {
                return Err(Error::RayLost {
                    zone: self.zid,
                    position: self.r,
                });
            }
            self.r = h.w;
            if h.fid == FaceId::BOUNDING_SPHERE {
                break;
            }

            outface = mesh.next_face(grid, &h)?;
            if outface == FaceId::NO_NEIGHBOR {
                self.unresolved += 1;
                warn!(
                    "No neighbour of face {} contains {:?}, continuing from the bounding zone",
                    h.fid, h.w
                );
            }
            trace!("{} -> {} at t = {}", h.fid, outface, h.t.sci(6, 2));

            self.zid = outface.zone;
            self.wpt.push(Waypoint::new(outface, h.fid, h.w));
        }

        if let Some(tracking) = &mut self.tracking {
            tracking.set_crossings(self.crossings);
        }
        debug!(
            "Traced {} crossings, {} unresolved",
            self.crossings, self.unresolved
        );
        self.v = -self.v;
        Ok(())
    }

    /// Update the spectrum across a chord of length `ct` in the current zone
    ///
    /// Each photon energy follows the closed-form solution of the transfer
    /// equation for constant coefficients. Where the transmission is within
    /// `2e-10` optical depths of unity the self-emission takes its optically
    /// thin limit `em ct`.
    pub fn transport(&mut self, ct: f64) {
        let thin = (-THIN_DEPTH).exp();
        for (y, em, ab, sc) in izip!(&mut self.y, &self.em, &self.ab, &self.sc) {
            let op = ab + sc;
            let tr = (-op * ct).exp();
            let se = if tr > thin {
                em * ct
            } else {
                (1.0 - tr) * em / op
            };
            *y = *y * tr + se;
        }
    }

    /// Cross `zone` up to the next waypoint
    ///
    /// The zone spectra are looked up for the ray's energy window and the
    /// spectrum is transported along the chord. With tracking enabled the
    /// partial spectrum is written out, `zone_width` being the number of
    /// digits of the zone count.
    pub fn cross_zone(
        &mut self,
        zone: &Zone,
        data: &SpectralData,
        ix: usize,
        zone_width: usize,
    ) -> Result<()> {
        let w = self.wpt.pop().ok_or(Error::EmptyPath)?;
        let ct = (w.hitpt - self.r).norm();
        self.r = w.hitpt;

        let (jmin, jmax) = self.window;
        let zs = zone.load_spectra(data.database, data.table, data.symmetry, ix, jmin, jmax)?;
        self.em = zs.spectra.em;
        self.ab = zs.spectra.ab;
        self.sc = zs.spectra.sc;
        self.grid_point = zs.grid_point;
        self.transport(ct);

        if let Some(tracking) = &mut self.tracking {
            tracking.record(ct, zone.id, zone_width, &self.y)?;
        }
        Ok(())
    }

    /// Replay the waypoint stack, transporting the spectrum through the mesh
    ///
    /// `ix` is the detector patch of the ray, used to share zone spectra
    /// between rays under spherical symmetry.
    pub fn cross_mesh(&mut self, mesh: &Mesh, data: &SpectralData, ix: usize) -> Result<()> {
        let zone_width = ndigits(mesh.len());
        while let Some(zid) = self.wpt.last().map(|w| w.outface.zone) {
            self.zid = zid;
            self.cross_zone(mesh.zone(zid)?, data, ix, zone_width)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "Ray at ({}, {}, {}) along ({}, {}, {})",
            self.r.x.sci(6, 2),
            self.r.y.sci(6, 2),
            self.r.z.sci(6, 2),
            self.v.x.sci(6, 2),
            self.v.y.sci(6, 2),
            self.v.z.sci(6, 2)
        )?;
        writeln!(f, "zone {}, {} photon energies", self.zid, self.y.len())?;
        for value in &self.y {
            writeln!(f, "{}", value.column())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_with(em: f64, ab: f64, sc: f64, y: f64) -> Ray {
        let mut ray = Ray::new(Vector3d::zeros(), Vector3d::x(), (0, 0));
        ray.em = vec![em];
        ray.ab = vec![ab];
        ray.sc = vec![sc];
        ray.y = vec![y];
        ray
    }

    #[test]
    fn zero_chord_leaves_spectrum() {
        let mut ray = ray_with(3.0, 2.0, 0.5, 7.0);
        ray.transport(0.0);
        assert_eq!(ray.y, vec![7.0]);
    }

    #[test]
    fn vacuum_is_transparent() {
        let mut ray = ray_with(0.0, 0.0, 0.0, 7.0);
        ray.transport(1.0e3);
        assert_eq!(ray.y, vec![7.0]);
    }

    #[test]
    fn optically_thin_limit() {
        // optical depth 1e-12, well inside the thin branch
        let mut ray = ray_with(4.0, 1.0e-12, 0.0, 0.0);
        ray.transport(1.0);
        assert_eq!(ray.y, vec![4.0]);
    }

    #[test]
    fn optically_thick_saturates() {
        // emission saturates at the source function em / (ab + sc)
        let mut ray = ray_with(6.0, 2.0, 1.0, 100.0);
        ray.transport(1.0e3);
        assert!((ray.y[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn scattering_attenuates() {
        let mut ray = ray_with(0.0, 0.0, 1.0, 1.0);
        ray.transport(2.0);
        assert!((ray.y[0] - (-2.0_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn spectrum_length_is_checked() {
        let ray = Ray::new(Vector3d::zeros(), Vector3d::x(), (2, 4));
        assert_eq!(ray.len(), 3);
        assert!(matches!(
            ray.with_spectrum(vec![1.0; 2]),
            Err(Error::SpectrumLengthMismatch {
                expected: 3,
                found: 2
            })
        ));
    }
}
