//! Result of a ray-face intercept search

// crate modules
use crate::face_id::FaceId;
use crate::vector::{Vector3d, VectorExt};

// spectrace modules
use spectrace_utils::constants::BIG;
use spectrace_utils::{solve_quadratic, ValueExt};

// external crates
use log::trace;

/// Tolerance on quadratic coefficients when intersecting curved faces
const QUADRATIC_TOL: f64 = 1.0e-20;

/// Where a ray `p + u t` meets a face
///
/// `t` is in units of the direction vector, so with a velocity of `c` it is
/// the photon time of flight. A fresh value has `t = 1e100` so that any real
/// hit compares smaller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Ray parameter at the hit
    pub t: f64,
    /// Hit point
    pub w: Vector3d,
    /// Face that was hit
    pub fid: FaceId,
    /// Whether a valid forward hit was found
    pub is_found: bool,
}

impl Default for Intercept {
    fn default() -> Self {
        Self {
            t: BIG,
            w: Vector3d::zeros(),
            fid: FaceId::default(),
            is_found: false,
        }
    }
}

impl Intercept {
    /// A search that cannot succeed, e.g. parallel to a plane
    pub fn missed(fid: FaceId) -> Self {
        Self {
            t: -BIG,
            w: Vector3d::unreachable(),
            fid,
            is_found: false,
        }
    }

    /// Intersect the quadric `a t² + b t + c = 0` along `p + u t`
    ///
    /// Shared by spheres and curved cones. Tangent or missing solutions are
    /// never found. Re-entering the face the ray just left takes the far root,
    /// otherwise the near root is preferred when it lies ahead of `eqt`. The
    /// caller still has to check the hit against the face bounds.
    pub(crate) fn from_quadric(
        fid: FaceId,
        incoming: FaceId,
        (a, b, c): (f64, f64, f64),
        p: &Vector3d,
        u: &Vector3d,
        eqt: f64,
    ) -> Self {
        let roots = solve_quadratic(a, b, c, QUADRATIC_TOL);
        if roots.nroots < 2 {
            trace!("{fid} missed with {} distinct roots", roots.nroots);
            return Self::missed(fid);
        }

        let t = if fid == incoming || roots.x2 <= eqt {
            roots.x1
        } else {
            roots.x2
        };

        Self {
            t,
            w: p + u * t,
            fid,
            is_found: t > eqt,
        }
    }
}

impl std::fmt::Display for Intercept {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "t={} w=({}, {}, {}) face={} found={}",
            self.t.sci(6, 2),
            self.w.x.sci(6, 2),
            self.w.y.sci(6, 2),
            self.w.z.sci(6, 2),
            self.fid,
            self.is_found
        )
    }
}
