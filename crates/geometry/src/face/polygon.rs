//! Planar convex polygons

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

/// Distance from an edge line, relative to the edge length, within which a
/// point lies on the edge
const EDGE_EQT: f64 = 1.0e-10;

/// Planar, convex polygon through an ordered loop of grid nodes
///
/// The vertex order sets the orientation of the normal by the right-hand
/// rule. The first vertex is the origin of the polygon's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Grid indices of the vertices, in order
    pub nodes: Vec<usize>,
}

impl Polygon {
    /// Polygon through the given grid nodes
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a polygon without vertices
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn vertices(&self, grid: &Grid) -> Result<Vec<Vector3d>> {
        if self.nodes.len() < 3 {
            return Err(Error::DegeneratePolygon {
                nodes: self.nodes.clone(),
            });
        }
        self.nodes.iter().map(|i| grid.position(*i)).collect()
    }

    fn origin(&self, grid: &Grid) -> Result<Vector3d> {
        match self.nodes.first() {
            Some(i) => grid.position(*i),
            None => Err(Error::DegeneratePolygon { nodes: Vec::new() }),
        }
    }

    /// Twice-area normal vector and area-weighted centre
    ///
    /// Built from a fan of triangles about the first vertex, so the length
    /// of the returned vector is twice the polygon area.
    pub fn area2_normal_center(&self, grid: &Grid) -> Result<(Vector3d, Vector3d)> {
        let points = self.vertices(grid)?;
        let origin = points[0];

        let mut s = Vector3d::zeros();
        let mut center = Vector3d::zeros();
        for pair in points[1..].windows(2) {
            let a = (pair[0] - origin).cross(&(pair[1] - origin));
            s += a;
            center += (origin + pair[0] + pair[1]) / 3.0 * a.norm();
        }

        Ok((s, center / s.norm()))
    }

    /// Area-weighted centre of the polygon
    pub fn center(&self, grid: &Grid) -> Result<Vector3d> {
        Ok(self.area2_normal_center(grid)?.1)
    }
}

impl Boundary for Polygon {
    fn check(&self, fid: FaceId, grid: &Grid) -> Result<()> {
        if self.nodes.len() < 3 {
            return Err(Error::MalformedFace {
                fid: fid.to_string(),
                reason: "polygons need at least three vertices".to_string(),
            });
        }
        for i in &self.nodes {
            grid.node(*i)?;
        }
        Ok(())
    }

    fn is_curved(&self, _grid: &Grid) -> Result<bool> {
        Ok(false)
    }

    fn normal(&self, grid: &Grid) -> Result<Vector3d> {
        Ok(self.area2_normal_center(grid)?.0.unit())
    }

    fn area(&self, grid: &Grid) -> Result<f64> {
        Ok(self.area2_normal_center(grid)?.0.norm() / 2.0)
    }

    fn distance(&self, grid: &Grid, w: &Vector3d) -> Result<f64> {
        let origin = self.origin(grid)?;
        Ok((w - origin).dot(&self.normal(grid)?))
    }

    fn subpoint(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let t = self.distance(grid, w)?;
        Ok(w - self.normal(grid)? * t)
    }

    fn face_point(&self, grid: &Grid, _w: &Vector3d) -> Result<Vector3d> {
        self.center(grid)
    }

    fn contains(&self, grid: &Grid, w: &Vector3d) -> Result<bool> {
        let points = self.vertices(grid)?;
        let origin = points[0];

        // local frame in the plane of the polygon
        let zhat = self.normal(grid)?;
        let xhat = (points[1] - origin).unit();
        let yhat = zhat.cross(&xhat);
        let local = |v: Vector3d| {
            let d = v - origin;
            Vector3d::new(d.dot(&xhat), d.dot(&yhat), 0.0)
        };

        let q = local(*w);
        let mut first_turn = None;
        for (j, tail) in points.iter().enumerate() {
            let head = points[(j + 1) % points.len()];
            let turn = q.turn(&local(*tail), &local(head), EDGE_EQT);

            // points on an edge line do not decide anything
            if turn == 0 {
                continue;
            }
            match first_turn {
                None => first_turn = Some(turn),
                Some(first) if first != turn => return Ok(false),
                Some(_) => (),
            }
        }
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
        let n = self.normal(grid)?;
        let denominator = u.dot(&n);
        if fid == incoming || denominator.abs() < SMALL {
            return Ok(Intercept::missed(fid));
        }

        let a = self.origin(grid)?;
        let t = (a - p).dot(&n) / denominator;
        let w = p + u * t;
        Ok(Intercept {
            t,
            w,
            fid,
            is_found: sign_eqt(t, eqt) == 1 && self.contains(grid, &w)?,
        })
    }

    fn velocity(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        let mut u = Vector3d::zeros();
        let mut s = 0.0;
        for i in &self.nodes {
            let node = grid.node(*i)?;
            let d = (node.position - w).norm();
            if d < SMALL {
                return Ok(node.velocity);
            }
            u += node.velocity / d;
            s += 1.0 / d;
        }
        Ok(u / s)
    }
}
