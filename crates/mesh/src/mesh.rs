//! The zoned mesh and neighbour resolution between zones

// crate modules
use crate::error::{Error, Result};
use crate::zone::Zone;

// spectrace modules
use spectrace_geometry::{Face, FaceId, FaceKind, Grid, Intercept, Surface};
use spectrace_utils::f;

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Every zone of the simulation at one time instant
///
/// Zones refer to each other only through [FaceId]s. Zone 0 is the bounding
/// zone: a sphere enclosing the whole domain (face 0) and a composite surface
/// (face 1) whose members pair one-to-one with the domain boundary faces of
/// the regular zones.
///
/// A ray leaves one zone through the face it hits and enters the next zone
/// through whichever neighbour candidate of that face contains the hit
/// point, see [Mesh::next_face].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Mesh {
    zones: Vec<Zone>,
}

impl Mesh {
    /// Build a mesh from zones whose ids match their positions
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        let mesh = Self { zones };
        mesh.check_ids()?;
        Ok(mesh)
    }

    /// Number of zones, including the bounding zone
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// True for a mesh without zones
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate over the zones in order
    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    /// Iterate mutably over the zones, e.g. to set material state
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Zone> {
        self.zones.iter_mut()
    }

    /// Zone at `index`
    pub fn zone(&self, index: usize) -> Result<&Zone> {
        self.zones.get(index).ok_or(Error::ZoneNotFound {
            index,
            len: self.zones.len(),
        })
    }

    /// Face identified by `fid`
    pub fn face(&self, fid: FaceId) -> Result<&Face> {
        self.zone(fid.zone)?.face(fid)
    }

    /// Outer sphere of the bounding zone
    pub fn bounding_sphere(&self) -> Result<&Face> {
        self.face(FaceId::BOUNDING_SPHERE)
    }

    /// Inner composite surface of the bounding zone, with its face record
    pub fn bounding_surface(&self) -> Result<(&Face, &Surface)> {
        let face = self.face(FaceId::BOUNDING_SURFACE)?;
        let surface = face.as_surface().ok_or_else(|| {
            Error::MalformedBoundingZone("face 1 of zone 0 is not a surface".to_string())
        })?;
        Ok((face, surface))
    }

    /// Face a ray enters after leaving its zone at intercept `h`
    ///
    /// Hits on the bounding surface resolve directly through the one-to-one
    /// pairing of surface members. Otherwise the neighbour candidates of the
    /// exit face are tried in order and the first that contains the hit point
    /// is returned, where a candidate `(i, -1)` stands for member `i` of the
    /// bounding surface.
    ///
    /// The bounding sphere has no neighbours. When no candidate contains the
    /// hit point [FaceId::NO_NEIGHBOR] is returned and left to the caller.
    pub fn next_face(&self, grid: &Grid, h: &Intercept) -> Result<FaceId> {
        if h.fid.is_member() {
            let (face, _) = self.bounding_surface()?;
            return face
                .neighbors
                .get(h.fid.zone)
                .copied()
                .ok_or(Error::FaceNotFound(h.fid));
        }

        let exit = self.face(h.fid)?;
        for candidate in &exit.neighbors {
            if candidate.is_member() {
                let (face, surface) = self.bounding_surface()?;
                let member = surface.member(face.fid, candidate.zone)?;
                if member.contains(grid, &h.w)? {
                    return Ok(FaceId::BOUNDING_SURFACE);
                }
            } else if self.face(*candidate)?.contains(grid, &h.w)? {
                return Ok(*candidate);
            }
        }
        Ok(FaceId::NO_NEIGHBOR)
    }

    /// Check the mesh against its grid before any ray is traced
    ///
    /// Hard inconsistencies are errors: misplaced zones or faces, malformed
    /// faces, neighbours that do not resolve, and a bounding zone that is not
    /// a sphere around a composite surface with one neighbour per member.
    ///
    /// Neighbour relations that are not mirrored by the other side are only
    /// suspicious, and are logged and returned as `(face, neighbour)` pairs.
    pub fn validate(&self, grid: &Grid) -> Result<Vec<(FaceId, FaceId)>> {
        self.check_ids()?;
        self.check_bounding_zone()?;

        let mut unpaired = Vec::new();
        for zone in &self.zones {
            for (position, face) in zone.faces.iter().enumerate() {
                if face.fid.zone != zone.id || face.fid.index() != Some(position) {
                    return Err(Error::FaceIdMismatch {
                        fid: face.fid,
                        zone: zone.id,
                        position,
                    });
                }
                face.check(grid)?;

                if face.as_surface().is_some() {
                    continue;
                }
                for candidate in &face.neighbors {
                    if !self.is_mirrored(face.fid, *candidate)? {
                        warn!("Neighbour {candidate} of face {} does not point back", face.fid);
                        unpaired.push((face.fid, *candidate));
                    }
                }
            }
        }

        debug!(
            "Validated {} zones with {} unpaired neighbours",
            self.zones.len(),
            unpaired.len()
        );
        Ok(unpaired)
    }

    /// Whether the neighbour `candidate` of face `fid` lists `fid` in return
    fn is_mirrored(&self, fid: FaceId, candidate: FaceId) -> Result<bool> {
        if candidate.is_member() {
            let (face, surface) = self.bounding_surface()?;
            surface.member(face.fid, candidate.zone)?;
            return Ok(face.neighbors.get(candidate.zone) == Some(&fid));
        }
        Ok(self.face(candidate)?.neighbors.contains(&fid))
    }

    fn check_bounding_zone(&self) -> Result<()> {
        let malformed = |reason: &str| Error::MalformedBoundingZone(reason.to_string());

        let zone = self.zone(0)?;
        if zone.len() != 2 {
            return Err(malformed("zone 0 must have exactly two faces"));
        }
        if !matches!(self.bounding_sphere()?.shape, FaceKind::Sphere(_)) {
            return Err(malformed("face 0 of zone 0 is not a sphere"));
        }
        if !self.bounding_sphere()?.neighbors.is_empty() {
            return Err(malformed("the bounding sphere cannot have neighbours"));
        }

        let (face, surface) = self.bounding_surface()?;
        if face.neighbors.len() != surface.len() {
            return Err(malformed(&f!(
                "{} surface members but {} neighbours",
                surface.len(),
                face.neighbors.len()
            )));
        }
        for neighbor in &face.neighbors {
            self.face(*neighbor)?;
        }
        Ok(())
    }

    fn check_ids(&self) -> Result<()> {
        for (expected, zone) in self.zones.iter().enumerate() {
            if zone.id != expected {
                return Err(Error::ZoneIdMismatch {
                    expected,
                    found: zone.id,
                });
            }
        }
        Ok(())
    }

    /// Forget spectra kept for reuse by every zone
    pub fn clear_cache(&mut self) {
        self.zones.iter_mut().for_each(Zone::clear_cache);
    }

    /// Load a mesh from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mesh: Mesh = serde_json::from_reader(reader)?;
        mesh.check_ids()?;
        Ok(mesh)
    }

    /// Write the mesh to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl std::fmt::Display for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let nfaces = self.zones.iter().map(Zone::len).sum::<usize>();
        let nfilled = self.zones.iter().filter(|z| z.has_materials()).count();
        writeln!(
            f,
            "Mesh of {} zones ({} with materials) and {} faces",
            self.zones.len(),
            nfilled,
            nfaces
        )
    }
}
