//! Face identifiers

// external crates
use serde::{Deserialize, Serialize};

/// Identifies a face by the zone that owns it and its local index
///
/// Faces never hold references to each other. Neighbour relations and
/// intercept results are expressed with these small `Copy` values, and the
/// [Mesh](../spectrace_mesh/struct.Mesh.html) resolves them on demand.
///
/// A negative local index is never a real face:
///
/// | value      | meaning                                                  |
/// | ---------- | -------------------------------------------------------- |
/// | `(i, -1)`  | member `i` of the composite bounding surface             |
/// | `(0, -2)`  | no neighbour, the default                                |
/// | `(0, -3)`  | a detector probing the bounding sphere from outside      |
///
/// ```rust
/// # use spectrace_geometry::FaceId;
/// assert_eq!(FaceId::default(), FaceId::NO_NEIGHBOR);
/// assert!(FaceId::member(4).is_member());
/// assert_eq!(FaceId::member(4).zone, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId {
    /// Index of the zone, or of the member face for surface hits
    pub zone: usize,
    /// Local index of the face within the zone
    pub id: i16,
}

impl FaceId {
    /// Outer sphere of the bounding zone, where every ray starts and ends
    pub const BOUNDING_SPHERE: FaceId = FaceId { zone: 0, id: 0 };

    /// Inner composite surface of the bounding zone
    pub const BOUNDING_SURFACE: FaceId = FaceId { zone: 0, id: 1 };

    /// No neighbour could be resolved
    pub const NO_NEIGHBOR: FaceId = FaceId { zone: 0, id: -2 };

    /// Excluded face used when a detector first probes the bounding sphere
    pub const DETECTOR: FaceId = FaceId { zone: 0, id: -3 };

    /// Local index marking a member of a composite surface
    pub const MEMBER_ID: i16 = -1;

    /// Create a new face identifier
    pub const fn new(zone: usize, id: i16) -> Self {
        Self { zone, id }
    }

    /// Identifier of a composite surface member by its position
    pub const fn member(index: usize) -> Self {
        Self {
            zone: index,
            id: Self::MEMBER_ID,
        }
    }

    /// True for hits on a member of a composite surface
    pub fn is_member(&self) -> bool {
        self.id == Self::MEMBER_ID
    }

    /// Local index as a position in the zone's face list, if it is one
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.id).ok()
    }
}

impl Default for FaceId {
    fn default() -> Self {
        Self::NO_NEIGHBOR
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.zone, self.id)
    }
}
