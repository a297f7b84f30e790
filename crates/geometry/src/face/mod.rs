//! Zone faces and the operations rays need from them

mod cone;
mod polygon;
mod sphere;
mod surface;

pub use cone::Cone;
pub use polygon::Polygon;
pub use sphere::Sphere;
pub use surface::Surface;

// crate modules
use crate::error::Result;
use crate::face_id::FaceId;
use crate::grid::Grid;
use crate::intercept::Intercept;
use crate::vector::Vector3d;

// external crates
use serde::{Deserialize, Serialize};

/// Geometry shared by every kind of face
///
/// Node positions are always looked up in a [Grid], so every query can fail
/// on a dangling node index. Points passed as `w` are expected to lie on the
/// face, or at least on its infinite extension, except for
/// [distance()](Boundary::distance) and [subpoint()](Boundary::subpoint).
pub trait Boundary {
    /// Check that the face is well formed against `grid`
    fn check(&self, fid: FaceId, grid: &Grid) -> Result<()>;

    /// False only for faces that are exactly planar
    fn is_curved(&self, grid: &Grid) -> Result<bool>;

    /// Unit normal of a planar face
    fn normal(&self, grid: &Grid) -> Result<Vector3d>;

    /// Surface area in cm²
    fn area(&self, grid: &Grid) -> Result<f64>;

    /// Signed distance from `w` to the face, positive on the normal side
    fn distance(&self, grid: &Grid, w: &Vector3d) -> Result<f64>;

    /// Closest point on the face extension to `w`
    fn subpoint(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d>;

    /// Representative point of the face, used to build interior points
    fn face_point(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d>;

    /// Whether a point on the face extension lies within the face bounds
    fn contains(&self, grid: &Grid, w: &Vector3d) -> Result<bool>;

    /// First forward hit of the ray `p + u t` beyond `eqt`
    ///
    /// A face whose id `fid` equals `incoming` is the one the ray is leaving.
    fn intercept(
        &self,
        fid: FaceId,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
        incoming: FaceId,
    ) -> Result<Intercept>;

    /// Interpolated face velocity at `w`
    fn velocity(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d>;
}

/// Shape of a face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FaceKind {
    Polygon(Polygon),
    Sphere(Sphere),
    Cone(Cone),
    Surface(Surface),
}

impl FaceKind {
    /// Short name of the shape
    pub fn name(&self) -> &'static str {
        match self {
            Self::Polygon(_) => "polygon",
            Self::Sphere(_) => "sphere",
            Self::Cone(_) => "cone",
            Self::Surface(_) => "surface",
        }
    }
}

/// A face of a zone with its neighbour candidates
///
/// Neighbours are the faces on the other side of this one, in the order they
/// are tried. More than one is needed where a face of one zone borders
/// several smaller faces of its neighbours.
///
/// ```rust
/// # use spectrace_geometry::{Face, FaceId, Grid, Vector3d};
/// let mut grid = Grid::default();
/// let c = grid.push(Vector3d::zeros());
///
/// let face = Face::sphere(FaceId::new(0, 0), c, 2.0)
///     .with_neighbors(vec![FaceId::new(3, 1)]);
///
/// let w = Vector3d::new(0.0, 0.0, 5.0);
/// assert_eq!(face.distance(&grid, &w).unwrap(), 3.0);
/// assert_eq!(face.neighbors, vec![FaceId::new(3, 1)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Identifier of the face itself
    pub fid: FaceId,
    /// Candidate faces across this one
    #[serde(default)]
    pub neighbors: Vec<FaceId>,
    /// Shape and its parameters
    pub shape: FaceKind,
}

impl Face {
    /// Face of any shape without neighbours
    pub fn new(fid: FaceId, shape: FaceKind) -> Self {
        Self {
            fid,
            neighbors: Vec::new(),
            shape,
        }
    }

    /// Planar polygon through the given nodes
    pub fn polygon(fid: FaceId, nodes: Vec<usize>) -> Self {
        Self::new(fid, FaceKind::Polygon(Polygon::new(nodes)))
    }

    /// Spherical shell of signed `radius` about node `center`
    pub fn sphere(fid: FaceId, center: usize, radius: f64) -> Self {
        Self::new(fid, FaceKind::Sphere(Sphere::new(center, radius)))
    }

    /// Cone frustum generated by the rz segment between two nodes
    pub fn cone(fid: FaceId, a: usize, b: usize) -> Self {
        Self::new(fid, FaceKind::Cone(Cone::new(a, b)))
    }

    /// Composite of member faces
    pub fn surface(fid: FaceId, faces: Vec<Face>) -> Self {
        Self::new(fid, FaceKind::Surface(Surface::new(faces)))
    }

    /// Replace the neighbour candidates
    pub fn with_neighbors(mut self, neighbors: Vec<FaceId>) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Composite members, if this face is a [Surface]
    pub fn as_surface(&self) -> Option<&Surface> {
        match &self.shape {
            FaceKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    fn boundary(&self) -> &dyn Boundary {
        match &self.shape {
            FaceKind::Polygon(f) => f,
            FaceKind::Sphere(f) => f,
            FaceKind::Cone(f) => f,
            FaceKind::Surface(f) => f,
        }
    }

    /// See [Boundary::check]
    pub fn check(&self, grid: &Grid) -> Result<()> {
        self.boundary().check(self.fid, grid)
    }

    /// See [Boundary::is_curved]
    pub fn is_curved(&self, grid: &Grid) -> Result<bool> {
        self.boundary().is_curved(grid)
    }

    /// See [Boundary::normal]
    pub fn normal(&self, grid: &Grid) -> Result<Vector3d> {
        self.boundary().normal(grid)
    }

    /// See [Boundary::area]
    pub fn area(&self, grid: &Grid) -> Result<f64> {
        self.boundary().area(grid)
    }

    /// See [Boundary::distance]
    pub fn distance(&self, grid: &Grid, w: &Vector3d) -> Result<f64> {
        self.boundary().distance(grid, w)
    }

    /// See [Boundary::subpoint]
    pub fn subpoint(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        self.boundary().subpoint(grid, w)
    }

    /// See [Boundary::face_point]
    pub fn face_point(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        self.boundary().face_point(grid, w)
    }

    /// See [Boundary::contains]
    pub fn contains(&self, grid: &Grid, w: &Vector3d) -> Result<bool> {
        self.boundary().contains(grid, w)
    }

    /// See [Boundary::intercept]
    pub fn intercept(
        &self,
        grid: &Grid,
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
        incoming: FaceId,
    ) -> Result<Intercept> {
        self.boundary()
            .intercept(self.fid, grid, p, u, eqt, incoming)
    }

    /// See [Boundary::velocity]
    pub fn velocity(&self, grid: &Grid, w: &Vector3d) -> Result<Vector3d> {
        self.boundary().velocity(grid, w)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.shape.name(), self.fid)?;
        match &self.shape {
            FaceKind::Polygon(p) => write!(f, " nodes {:?}", p.nodes)?,
            FaceKind::Sphere(s) => write!(
                f,
                " centre {} radius {} speed {}",
                s.center, s.radius, s.speed
            )?,
            FaceKind::Cone(c) => write!(f, " nodes {:?}", c.nodes)?,
            FaceKind::Surface(s) => write!(f, " of {} members", s.len())?,
        }
        if !self.neighbors.is_empty() {
            write!(f, " ->")?;
            for n in &self.neighbors {
                write!(f, " {n}")?;
            }
        }
        Ok(())
    }
}
