//! Three-component vectors and the operations faces need on top of nalgebra

// spectrace modules
use spectrace_utils::constants::{BIG, SMALL};
use spectrace_utils::sign_eqt;

// external crates
use nalgebra::Vector3;

/// Cartesian vector in cm (positions) or cm/s (velocities)
pub type Vector3d = Vector3<f64>;

/// Extends [Vector3d] with the conventions used throughout the tracer
pub trait VectorExt {
    /// Unit vector from polar angle `theta` and azimuth `phi` (radians)
    ///
    /// ```rust
    /// # use spectrace_geometry::{Vector3d, VectorExt};
    /// let z = Vector3d::from_angles(0.0, 0.0);
    /// assert_eq!(z, Vector3d::new(0.0, 0.0, 1.0));
    /// ```
    fn from_angles(theta: f64, phi: f64) -> Self;

    /// The point reported by intercepts that found nothing
    fn unreachable() -> Self;

    /// Unit vector, or the vector unchanged when its length is negligible
    ///
    /// ```rust
    /// # use spectrace_geometry::{Vector3d, VectorExt};
    /// assert_eq!(Vector3d::new(0.0, 3.0, 4.0).unit(), Vector3d::new(0.0, 0.6, 0.8));
    /// assert_eq!(Vector3d::zeros().unit(), Vector3d::zeros());
    /// ```
    fn unit(&self) -> Self;

    /// Cosine of the angle to `other`, or `-4.0` if either is negligible
    fn cos_angle(&self, other: &Self) -> f64;

    /// Cylindrical `(r, z)` projection stored as `(r, z, 0)`
    ///
    /// ```rust
    /// # use spectrace_geometry::{Vector3d, VectorExt};
    /// let w = Vector3d::new(3.0, 4.0, -2.0);
    /// assert_eq!(w.rz(), Vector3d::new(5.0, -2.0, 0.0));
    /// ```
    fn rz(&self) -> Self;

    /// Unit normal `(y, -x, 0)` to the right of an in-plane vector
    fn right_normal(&self) -> Self;

    /// Component of `self` perpendicular to a non-zero `other`
    fn perpendicular_to(&self, other: &Self) -> Self;

    /// Turn direction of `self` relative to the segment `tail -> head`
    ///
    /// Only the x and y components are used. Returns `1` for a left
    /// (counter-clockwise) turn, `-1` for a right turn and `0` when collinear,
    /// which includes points off the line by less than `eqt` times the
    /// length of the segment.
    ///
    /// ```rust
    /// # use spectrace_geometry::{Vector3d, VectorExt};
    /// let tail = Vector3d::new(0.0, 0.0, 0.0);
    /// let head = Vector3d::new(1.0, 0.0, 0.0);
    /// assert_eq!(Vector3d::new(0.5, 1.0, 0.0).turn(&tail, &head, 1e-10), 1);
    /// assert_eq!(Vector3d::new(0.5, -1.0, 0.0).turn(&tail, &head, 1e-10), -1);
    /// assert_eq!(Vector3d::new(2.0, 0.0, 0.0).turn(&tail, &head, 1e-10), 0);
    /// assert_eq!(Vector3d::new(0.5, 1e-17, 0.0).turn(&tail, &head, 1e-10), 0);
    /// ```
    fn turn(&self, tail: &Self, head: &Self, eqt: f64) -> i32;
}

impl VectorExt for Vector3d {
    fn from_angles(theta: f64, phi: f64) -> Self {
        Vector3d::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    }

    fn unreachable() -> Self {
        Vector3d::repeat(-BIG)
    }

    fn unit(&self) -> Self {
        let f = self.norm();
        if f.abs() < SMALL {
            *self
        } else {
            self / f
        }
    }

    fn cos_angle(&self, other: &Self) -> f64 {
        let a = self.norm();
        let b = other.norm();
        if a.abs() < SMALL || b.abs() < SMALL {
            return -4.0;
        }
        self.dot(other) / (a * b)
    }

    fn rz(&self) -> Self {
        Vector3d::new(self.x.hypot(self.y), self.z, 0.0)
    }

    fn right_normal(&self) -> Self {
        Vector3d::new(self.y, -self.x, 0.0).unit()
    }

    fn perpendicular_to(&self, other: &Self) -> Self {
        let e = other.unit();
        self - e * self.dot(&e)
    }

    fn turn(&self, tail: &Self, head: &Self, eqt: f64) -> i32 {
        let w = head - tail;
        let v = self - tail;
        sign_eqt(w.x * v.y - w.y * v.x, eqt * w.norm_squared())
    }
}
