//! Spherical shells

// crate modules
use crate::error::{Error, Result};
use crate::face::Boundary;
use crate::face_id::FaceId;
use crate::grid::Grid;
use crate::intercept::Intercept;
use crate::vector::{Vector3d, VectorExt};

// spectrace modules
use spectrace_utils::constants::{FOUR_PI, SMALL};

// external crates
use serde::{Deserialize, Serialize};

/// Spherical shell about a grid node
///
/// The sign of `radius` carries the orientation: positive for an outward
/// facing shell, negative for an inward facing one. The shell expands at
/// `speed` cm/s on top of the motion of its centre node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Grid index of the centre node
    pub center: usize,
    /// Signed radius in cm
    pub radius: f64,
    /// Radial expansion speed in cm/s
    #[serde(default)]
    pub speed: f64,
}

impl Sphere {
    /// Stationary shell of signed `radius` about node `center`
    pub fn new(center: usize, radius: f64) -> Self {
        Self {
            center,
            radius,
            speed: 0.0,
        }
    }

    /// Shell expanding at `speed`
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Orientation of the shell, `1`, `-1` or `0` for a degenerate radius
    pub fn orientation(&self) -> i32 {
        if self.radius > 0.0 {
            1
        } else if self.radius < 0.0 {
            -1
        } else {
            0
        }
    }

    fn quadric(&self, grid: &Grid, p: &Vector3d, u: &Vector3d) -> Result<(f64, f64, f64)> {
        let d = p - grid.position(self.center)?;
        Ok((
            u.dot(u),
            2.0 * d.dot(u),
            d.dot(&d) - self.radius * self.radius,
        ))
    }
}

impl Boundary for Sphere {
    fn check(&self, fid: FaceId, grid: &Grid) -> Result<()> {
        if self.radius == 0.0 {
            return Err(Error::MalformedFace {
                fid: fid.to_string(),
                reason: "sphere radius is zero".to_string(),
            });
        }
        grid.node(self.center)?;
        Ok(())
    }

    fn is_curved(&self, _grid: &Grid) -> Result<bool> {
        Ok(true)
    }

    /// Carries only the orientation, the actual normal depends on position
    fn normal(&self, _grid: &Grid) -> Result<Vector3d> {
        Ok(Vector3d::new(self.orientation() as f64, 0.0, 0.0))
    }

    fn area(&self, _grid: &Grid) -> Result<f64> {
        Ok(FOUR_PI * self.radius * self.radius)
    }

    fn distance(&self, grid: &Grid, w: &Vector3d) -> Result<f64> {
        let d = w - grid.position(self.center)?;
        Ok((d.norm() - self.radius.abs()) * self.orientation() as f64)
    }

    fn subpoint(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let c = grid.position(self.center)?;
        let d = w - c;
        if d.norm() < SMALL {
            return Ok(Vector3d::unreachable());
        }
        Ok(c + d.unit() * self.radius.abs())
    }

    fn face_point(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        self.subpoint(grid, w)
    }

    fn contains(&self, _grid: &Grid, _w: &Vector3d) -> Result<bool> {
        Ok(true)
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
        let coefficients = self.quadric(grid, p, u)?;
        Ok(Intercept::from_quadric(fid, incoming, coefficients, p, u, eqt))
    }

    fn velocity(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let c = grid.position(self.center)?;
        Ok(grid.velocity(self.center)? + (w - c).unit() * self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_signed_by_orientation() {
        let mut grid = Grid::default();
        let c = grid.push(Vector3d::zeros());
        let w = Vector3d::new(0.0, 7.0, 0.0);

        let outward = Sphere::new(c, 5.0);
        let inward = Sphere::new(c, -5.0);
        assert_eq!(outward.distance(&grid, &w).unwrap(), 2.0);
        assert_eq!(inward.distance(&grid, &w).unwrap(), -2.0);
        assert_eq!(
            inward.subpoint(&grid, &w).unwrap(),
            Vector3d::new(0.0, 5.0, 0.0)
        );
    }

    #[test]
    fn expanding_shell_velocity() {
        let mut grid = Grid::default();
        let c = grid.push_moving(Vector3d::zeros(), Vector3d::new(1.0, 0.0, 0.0));
        let sphere = Sphere::new(c, 2.0).with_speed(3.0);
        let v = sphere.velocity(&grid, &Vector3d::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(v, Vector3d::new(1.0, 0.0, 3.0));
    }
}
