//! Mesh cells, their faces and material state

// crate modules
use crate::error::{Error, Result};
use crate::symmetry::Symmetry;

// spectrace modules
use spectrace_geometry::{Face, FaceId, Grid, Intercept, Vector3d};
use spectrace_material::{Component, Database, NeSearch, Spectra, Table};
use spectrace_utils::f;

// standard library
use std::sync::OnceLock;

// external crates
use log::trace;
use serde::{Deserialize, Serialize};

/// Smallest forward distance, in units of the direction vector, of a hit
///
/// Zones are never smaller than about 1e-8 cm, which light crosses in about
/// 3e-19 s.
pub const EQT: f64 = 1.0e-19;

/// Hits closer than this fraction of the face size to the start of a ray
/// are treated as lying on the entry edge
const CORNER_EQT: f64 = 1.0e-10;

/// Volumetric spectra of a zone with the grid point they were taken from
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ZoneSpectra {
    /// Emissivity, absorption and scattering
    pub spectra: Spectra,
    /// Database grid point and charge-neutral electron density
    pub grid_point: NeSearch,
    /// Photon energy indices `(jmin, jmax)` of the spectra
    pub window: (usize, usize),
}

impl ZoneSpectra {
    fn zeros((jmin, jmax): (usize, usize)) -> Self {
        Self {
            spectra: Spectra::zeros(jmax - jmin + 1),
            grid_point: NeSearch::default(),
            window: (jmin, jmax),
        }
    }
}

/// A cell of the mesh
///
/// Zone 0 is the synthetic bounding zone, whose face 0 is the bounding
/// sphere and whose face 1 is the composite surface mirroring every domain
/// boundary face of the regular zones.
///
/// ```rust
/// # use spectrace_mesh::Zone;
/// # use spectrace_material::Component;
/// let zone = Zone::new(3, vec![])
///     .with_state(100.0, 0.0, 1.0e20)
///     .with_materials(vec![Component::new("Ar", 1.0)]);
///
/// assert_eq!(zone.id, 3);
/// assert!(zone.has_materials());
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Index of the zone in its mesh
    pub id: usize,
    /// Bounding faces
    pub faces: Vec<Face>,
    /// Electron temperature in eV
    #[serde(default)]
    pub te: f64,
    /// Radiation temperature in eV
    #[serde(default)]
    pub tr: f64,
    /// Total ion density in ions/cm³
    #[serde(default)]
    pub np: f64,
    /// Electron density in electrons/cm³, as provided by the hydrodynamics
    #[serde(default)]
    pub ne: f64,
    /// Materials and their ion fractions
    #[serde(default)]
    pub materials: Vec<Component>,
    #[serde(skip)]
    cache: OnceLock<ZoneSpectra>,
}

impl Zone {
    /// Empty zone with the given faces
    pub fn new(id: usize, faces: Vec<Face>) -> Self {
        Self {
            id,
            faces,
            ..Default::default()
        }
    }

    /// Set the temperatures and ion density
    pub fn with_state(mut self, te: f64, tr: f64, np: f64) -> Self {
        self.te = te;
        self.tr = tr;
        self.np = np;
        self
    }

    /// Set the material composition
    pub fn with_materials(mut self, materials: Vec<Component>) -> Self {
        self.materials = materials;
        self
    }

    /// True if the zone emits or absorbs anything at all
    pub fn has_materials(&self) -> bool {
        !self.materials.is_empty()
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True for a zone without faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face with local index `fid.id`
    pub fn face(&self, fid: FaceId) -> Result<&Face> {
        fid.index()
            .and_then(|i| self.faces.get(i))
            .ok_or(Error::FaceNotFound(fid))
    }

    /// Interior point from the mean of the face points
    pub fn zone_point(&self, grid: &Grid, p: &Vector3d) -> Result<Vector3d> {
        let mut s = Vector3d::zeros();
        for face in &self.faces {
            s += face.face_point(grid, p)?;
        }
        Ok(s / self.faces.len().max(1) as f64)
    }

    /// Closest exit of the ray `p + u t` through the faces of this zone
    ///
    /// The face `incoming` is the one the ray entered through and is skipped
    /// where it could only be hit at `t = 0`. When round-off puts `p` just
    /// outside the zone and nothing is found, the search is repeated from an
    /// interior point along the same direction.
    pub fn hit(
        &self,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        incoming: FaceId,
    ) -> Result<Intercept> {
        let closest = self.closest_hit(grid, p, u, incoming)?;
        if closest.is_found {
            return Ok(closest);
        }

        let zp = self.zone_point(grid, p)?;
        trace!("zone {} retrying hit from interior point {zp:?}", self.id);
        self.closest_hit(grid, &zp, u, incoming)
    }

    fn closest_hit(
        &self,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        incoming: FaceId,
    ) -> Result<Intercept> {
        let mut closest = Intercept::default();
        for face in &self.faces {
            let mut hit = face.intercept(grid, p, u, EQT, incoming)?;
            if let Some(exits) = self.corner_exit(grid, face, &hit, p, u)? {
                hit.is_found = exits;
            }
            if hit.is_found && hit.t < closest.t {
                closest = hit;
            }
        }
        Ok(closest)
    }

    /// Decide a hit on a flat face at the very start of the ray
    ///
    /// This happens when the ray enters through an edge or corner the face
    /// shares with the entry face, so the sign of `t` is round-off. The ray
    /// exits through the face only if it moves outwards across it. Returns
    /// `None` for regular hits, curved faces and the bounding zone.
    fn corner_exit(
        &self,
        grid: &Grid,
        face: &Face,
        hit: &Intercept,
        p: &Vector3d,
        u: &Vector3d,
    ) -> Result<Option<bool>> {
        if self.id == 0 || hit.fid != face.fid || face.is_curved(grid)? {
            return Ok(None);
        }

        let point = face.face_point(grid, p)?;
        if hit.t.abs() * u.norm() > CORNER_EQT * (point - p).norm() {
            return Ok(None);
        }

        let outward = point - self.zone_point(grid, p)?;
        let n = face.normal(grid)?;
        let leaving = outward.dot(&n) * u.dot(&n) > 0.0;
        trace!(
            "zone {} corner hit on {} is {}",
            self.id,
            face.fid,
            if leaving { "an exit" } else { "skipped" }
        );
        Ok(Some(leaving && face.contains(grid, &hit.w)?))
    }

    /// Spectra of this zone over photon energies `jmin..=jmax`
    ///
    /// Zones without materials are transparent and give zeros. Otherwise the
    /// database grid point is found from the zone temperatures and charge
    /// neutrality, and the spectra of every material are mixed by fraction.
    ///
    /// With spherical symmetry all rays of a snapshot see identical zones, so
    /// the spectra computed for the central ray (`ix == 0`) are kept and
    /// reused by every other ray.
    pub fn load_spectra(
        &self,
        database: &Database,
        table: &Table,
        symmetry: Symmetry,
        ix: usize,
        jmin: usize,
        jmax: usize,
    ) -> Result<ZoneSpectra> {
        if jmin > jmax {
            return Err(spectrace_material::Error::EnergyIndexOutOfRange {
                jmin,
                jmax,
                nhv: database.nhv(),
            }
            .into());
        }
        if !self.has_materials() {
            return Ok(ZoneSpectra::zeros((jmin, jmax)));
        }

        if symmetry == Symmetry::Spherical && ix > 0 {
            if let Some(cached) = self.cache.get().filter(|c| c.window == (jmin, jmax)) {
                return Ok(cached.clone());
            }
        }

        let grid_point = database.find_ne(table, self.te, self.tr, self.np, &self.materials)?;
        let spectra = database.mixture(
            table,
            self.np,
            &self.materials,
            &grid_point,
            (jmin, jmax),
        )?;
        let computed = ZoneSpectra {
            spectra,
            grid_point,
            window: (jmin, jmax),
        };

        if symmetry == Symmetry::Spherical {
            // the first window stored wins, other windows are never cached
            let _ = self.cache.set(computed.clone());
        }
        Ok(computed)
    }

    /// Spectra kept for reuse under spherical symmetry, if any
    pub fn cached_spectra(&self) -> Option<&ZoneSpectra> {
        self.cache.get()
    }

    /// Forget spectra kept for reuse
    pub fn clear_cache(&mut self) {
        self.cache = OnceLock::new();
    }

    /// One-line summary of the material state
    pub fn state_summary(&self) -> String {
        let materials = self
            .materials
            .iter()
            .map(|c| f!("{} {}", c.name, c.fraction))
            .collect::<Vec<String>>()
            .join(", ");
        f!(
            "te {} eV, tr {} eV, np {} /cc, ne {} /cc [{}]",
            self.te, self.tr, self.np, self.ne, materials
        )
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Zone {} with {} faces", self.id, self.faces.len())?;
        writeln!(f, "  {}", self.state_summary())?;
        for face in &self.faces {
            writeln!(f, "  {face}")?;
        }
        Ok(())
    }
}
