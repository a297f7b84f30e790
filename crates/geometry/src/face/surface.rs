//! Composite surfaces made of other faces

// crate modules
use crate::error::{Error, Result};
use crate::face::{Boundary, Face};
use crate::face_id::FaceId;
use crate::grid::Grid;
use crate::intercept::Intercept;
use crate::vector::Vector3d;

// external crates
use serde::{Deserialize, Serialize};

/// Composite of member faces, used for the inner boundary of the bounding zone
///
/// Each member keeps the id of the regular-zone face it mirrors. Hits are
/// reported with the member's position in the list, `(index, -1)`, so the
/// neighbour of the hit can be found without searching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Member faces, in order
    pub faces: Vec<Face>,
}

impl Surface {
    /// Composite of the given faces
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Member at `index`
    pub fn member(&self, fid: FaceId, index: usize) -> Result<&Face> {
        self.faces.get(index).ok_or(Error::MemberNotFound {
            fid: fid.to_string(),
            index,
        })
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True for a surface without members
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl Boundary for Surface {
    fn check(&self, fid: FaceId, grid: &Grid) -> Result<()> {
        if self.faces.is_empty() {
            return Err(Error::MalformedFace {
                fid: fid.to_string(),
                reason: "composite surface has no members".to_string(),
            });
        }
        for face in &self.faces {
            if matches!(face.shape, super::FaceKind::Surface(_)) {
                return Err(Error::MalformedFace {
                    fid: fid.to_string(),
                    reason: "composite surfaces cannot be nested".to_string(),
                });
            }
            face.check(grid)?;
        }
        Ok(())
    }

    fn is_curved(&self, _grid: &Grid) -> Result<bool> {
        Ok(true)
    }

    fn normal(&self, _grid: &Grid) -> Result<Vector3d> {
        Ok(Vector3d::zeros())
    }

    fn area(&self, grid: &Grid) -> Result<f64> {
        self.faces.iter().map(|f| f.area(grid)).sum()
    }

    fn distance(&self, _grid: &Grid, _w: &Vector3d) -> Result<f64> {
        Ok(0.0)
    }

    fn subpoint(&self, _grid: &Grid, _w: &Vector3d) -> Result<Vector3d> {
        Ok(Vector3d::zeros())
    }

    /// Mean of the member face points
    fn face_point(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let mut s = Vector3d::zeros();
        for face in &self.faces {
            s += face.face_point(grid, w)?;
        }
        Ok(s / self.faces.len().max(1) as f64)
    }

    fn contains(&self, _grid: &Grid, _w: &Vector3d) -> Result<bool> {
        Ok(true)
    }

    fn intercept(
        &self,
        _fid: FaceId,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
        incoming: FaceId,
    ) -> Result<Intercept> {
        let mut closest = Intercept::default();
        for (i, face) in self.faces.iter().enumerate() {
            let hit = face.intercept(grid, p, u, eqt, incoming)?;
            if hit.is_found && hit.t < closest.t {
                closest = Intercept {
                    fid: FaceId::member(i),
                    ..hit
                };
            }
        }
        Ok(closest)
    }

    fn velocity(&self, _grid: &Grid, _w: &Vector3d) -> Result<Vector3d> {
        Ok(Vector3d::zeros())
    }
}
