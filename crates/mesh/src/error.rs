//! Result and Error types for spectrace-mesh

use spectrace_geometry::FaceId;

/// Type alias for `Result<T, mesh::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `spectrace-mesh`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read or write JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Inconsistent face geometry
    #[error(transparent)]
    Geometry(#[from] spectrace_geometry::Error),

    /// Missing or inconsistent material data
    #[error(transparent)]
    Material(#[from] spectrace_material::Error),

    /// Zone index outside the mesh
    #[error("zone {index} not found in mesh of {len} zones")]
    ZoneNotFound { index: usize, len: usize },

    /// Face id that does not resolve to a face of its zone
    #[error("face {0} not found")]
    FaceNotFound(FaceId),

    /// Zone stored at a position that differs from its id
    #[error("zone id {found} stored at mesh index {expected}")]
    ZoneIdMismatch { expected: usize, found: usize },

    /// Face listed in a zone it does not claim to belong to
    #[error("face {fid} listed at position {position} of zone {zone}")]
    FaceIdMismatch {
        fid: FaceId,
        zone: usize,
        position: usize,
    },

    /// Zone 0 is not a sphere enclosing a composite surface
    #[error("malformed bounding zone: {0}")]
    MalformedBoundingZone(String),

    /// Unknown symmetry keyword
    #[error("unknown symmetry \"{0}\", expected \"none\" or \"spherical\"")]
    UnknownSymmetry(String),
}
