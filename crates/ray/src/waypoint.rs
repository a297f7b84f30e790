// spectrace modules
use spectrace_geometry::{FaceId, Vector3d};

/// One boundary crossing along the path of a [Ray](crate::Ray)
///
/// The ray left a zone through `inface`, the face its intercept search hit,
/// at `hitpt` and entered the next zone through `outface`. The naming follows
/// the replay pass, which walks the path backwards: there the ray comes in
/// through `outface` and the zone of `outface` is the one being crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Face through which the next zone is entered
    pub outface: FaceId,
    /// Face hit on leaving the previous zone
    pub inface: FaceId,
    /// Location of the crossing
    pub hitpt: Vector3d,
}

impl Waypoint {
    /// New waypoint from its faces and location
    pub fn new(outface: FaceId, inface: FaceId, hitpt: Vector3d) -> Self {
        Self {
            outface,
            inface,
            hitpt,
        }
    }

    /// Starting point of a ray, on the bounding sphere
    pub fn start(hitpt: Vector3d) -> Self {
        Self::new(FaceId::BOUNDING_SPHERE, FaceId::BOUNDING_SPHERE, hitpt)
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} at ({:.6e}, {:.6e}, {:.6e})",
            self.inface, self.outface, self.hitpt.x, self.hitpt.y, self.hitpt.z
        )
    }
}
