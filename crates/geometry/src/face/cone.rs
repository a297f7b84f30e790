//! Frusta of rotational cones about the z axis

// crate modules
use crate::error::{Error, Result};
use crate::face::Boundary;
use crate::face_id::FaceId;
use crate::grid::Grid;
use crate::intercept::Intercept;
use crate::vector::{Vector3d, VectorExt};

// spectrace modules
use spectrace_utils::constants::SMALL;
use spectrace_utils::sign_eqt;

// external crates
use serde::{Deserialize, Serialize};

/// Limit on `|z1 - z0|` below which a cone is treated as a flat annulus
const FLAT_TOL: f64 = 1.0e-8;

/// Tolerance of the segment containment test in the rz plane
const CONTAINS_TOL: f64 = 1.0e-19;

/// Lateral surface of a cone frustum, rotationally symmetric about z
///
/// Both nodes hold `(r, z)` points of the generating segment in the x and
/// y components of their positions. Node velocities are `(v_r, v_z)` pairs
/// in the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Grid indices of the segment end points in the rz plane
    pub nodes: [usize; 2],
}

/// Generating segment resolved against the grid
struct Segment {
    a: Vector3d,
    b: Vector3d,
}

impl Segment {
    fn ra(&self) -> f64 {
        self.a.x
    }

    fn za(&self) -> f64 {
        self.a.y
    }

    fn dr(&self) -> f64 {
        self.b.x - self.a.x
    }

    fn dz(&self) -> f64 {
        self.b.y - self.a.y
    }
}

impl Cone {
    /// Cone generated by the rz segment from node `a` to node `b`
    pub fn new(a: usize, b: usize) -> Self {
        Self { nodes: [a, b] }
    }

    fn segment(&self, grid: &Grid) -> Result<Segment> {
        Ok(Segment {
            a: grid.position(self.nodes[0])?,
            b: grid.position(self.nodes[1])?,
        })
    }

    /// Twice-area normal in the rz plane and the segment midpoint
    pub fn area2_normal_center(&self, grid: &Grid) -> Result<(Vector3d, Vector3d)> {
        let s = self.segment(grid)?;
        let length = s.dr().hypot(s.dz());
        let area2 = std::f64::consts::TAU * (s.a.x + s.b.x) * length;
        Ok(((s.b - s.a).right_normal() * area2, (s.a + s.b) / 2.0))
    }

    fn flat_intercept(
        &self,
        fid: FaceId,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
        incoming: FaceId,
    ) -> Result<Intercept> {
        if fid == incoming || u.z.abs() < SMALL {
            return Ok(Intercept::missed(fid));
        }

        let t = (self.segment(grid)?.za() - p.z) / u.z;
        let w = p + u * t;
        Ok(Intercept {
            t,
            w,
            fid,
            is_found: sign_eqt(t, eqt) == 1 && self.contains(grid, &w)?,
        })
    }

    fn quadric(&self, grid: &Grid, p: &Vector3d, u: &Vector3d) -> Result<(f64, f64, f64)> {
        let s = self.segment(grid)?;
        let (ra, dr, dz) = (s.ra(), s.dr(), s.dz());

        let zd = p.z - s.za();
        let dz2 = dz * dz;
        let ff = dz2 * (p.x * u.x + p.y * u.y);
        let gg = dz * ra * dr;
        let hh = gg + zd * dr * dr;
        let uzdr = u.z * dr;

        Ok((
            dz2 * (u.x * u.x + u.y * u.y) - uzdr * uzdr,
            2.0 * (ff - u.z * hh),
            dz2 * (p.x * p.x + p.y * p.y - ra * ra) - zd * (gg + hh),
        ))
    }
}

impl Boundary for Cone {
    fn check(&self, fid: FaceId, grid: &Grid) -> Result<()> {
        let s = self.segment(grid)?;
        if (s.b - s.a).norm() < SMALL {
            return Err(Error::MalformedFace {
                fid: fid.to_string(),
                reason: "cone segment has zero length".to_string(),
            });
        }
        if s.a.x < 0.0 || s.b.x < 0.0 {
            return Err(Error::MalformedFace {
                fid: fid.to_string(),
                reason: "cone radius is negative".to_string(),
            });
        }
        Ok(())
    }

    fn is_curved(&self, grid: &Grid) -> Result<bool> {
        Ok(self.segment(grid)?.dz().abs() > FLAT_TOL)
    }

    fn normal(&self, grid: &Grid) -> Result<Vector3d> {
        Ok(self.area2_normal_center(grid)?.0.unit())
    }

    fn area(&self, grid: &Grid) -> Result<f64> {
        Ok(self.area2_normal_center(grid)?.0.norm() / 2.0)
    }

    fn distance(&self, grid: &Grid, w: &Vector3d) -> Result<f64> {
        let d = w.rz() - self.subpoint(grid, w)?.rz();
        Ok(d.dot(&self.normal(grid)?))
    }

    fn subpoint(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let s = self.segment(grid)?;
        let (ra, za, dr, dz) = (s.ra(), s.za(), s.dr(), s.dz());

        let wr = w.x.hypot(w.y);
        let phi = w.y.atan2(w.x);

        let t = ((wr - ra) * dr + (w.z - za) * dz) / (dr * dr + dz * dz);
        let rs = ra + t * dr;
        Ok(Vector3d::new(rs * phi.cos(), rs * phi.sin(), za + t * dz))
    }

    fn face_point(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        self.subpoint(grid, w)
    }

    fn contains(&self, grid: &Grid, w: &Vector3d) -> Result<bool> {
        let s = self.segment(grid)?;
        let v = w.rz();
        Ok((v - s.a).dot(&(v - s.b)) <= CONTAINS_TOL)
    }

    fn intercept(
        &self,
        fid: FaceId,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
        incoming: FaceId,
    ) -> Result<Intercept> {
        if !self.is_curved(grid)? {
            return self.flat_intercept(fid, grid, p, u, eqt, incoming);
        }

        let coefficients = self.quadric(grid, p, u)?;
        let mut hit = Intercept::from_quadric(fid, incoming, coefficients, p, u, eqt);
        hit.is_found = hit.is_found && self.contains(grid, &hit.w)?;
        Ok(hit)
    }

    /// Inverse-distance weighting in the rz plane, rotated to the azimuth of `w`
    fn velocity(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let wrz = w.rz();
        let phi = w.y.atan2(w.x);

        let mut u = Vector3d::zeros();
        let mut s = 0.0;
        for i in self.nodes {
            let node = grid.node(i)?;
            let d = (node.position - wrz).norm();
            if d < SMALL {
                u = node.velocity;
                s = 1.0;
                break;
            }
            u += node.velocity / d;
            s += 1.0 / d;
        }
        u /= s;

        Ok(Vector3d::new(u.x * phi.cos(), u.x * phi.sin(), u.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder() -> (Grid, Cone) {
        let mut grid = Grid::default();
        let a = grid.push(Vector3d::new(2.0, 0.0, 0.0));
        let b = grid.push(Vector3d::new(2.0, 4.0, 0.0));
        (grid, Cone::new(a, b))
    }

    #[test]
    fn cylinder_area_and_normal() {
        let (grid, cone) = cylinder();
        let area = cone.area(&grid).unwrap();
        assert!((area - std::f64::consts::TAU * 2.0 * 4.0).abs() < 1e-12);
        assert_eq!(cone.normal(&grid).unwrap(), Vector3d::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn subpoint_projects_radially() {
        let (grid, cone) = cylinder();
        let w = Vector3d::new(0.0, 5.0, 1.0);
        let s = cone.subpoint(&grid, &w).unwrap();
        assert!((s - Vector3d::new(0.0, 2.0, 1.0)).norm() < 1e-12);
        assert!((cone.distance(&grid, &w).unwrap() - 3.0).abs() < 1e-12);
    }
}
