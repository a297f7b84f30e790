//! Result and Error types for spectrace-ray

use spectrace_geometry::Vector3d;

/// Type alias for `Result<T, ray::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `spectrace-ray`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Inconsistent mesh or missing zone spectra
    #[error(transparent)]
    Mesh(#[from] spectrace_mesh::Error),

    /// Inconsistent face geometry
    #[error(transparent)]
    Geometry(#[from] spectrace_geometry::Error),

    /// Missing or inconsistent material data
    #[error(transparent)]
    Material(#[from] spectrace_material::Error),

    /// Ray still inside the mesh after the maximum number of crossings
    #[error("ray did not reach the bounding sphere within {crossings} zone crossings")]
    RayNotTerminated { crossings: usize },

    /// No face of the current zone lies ahead of the ray
    #[error("ray lost in zone {zone} at {position:?}, no exit face found")]
    RayLost { zone: usize, position: Vector3d },

    /// Replay attempted without a waypoint left to cross
    #[error("no waypoints left to cross")]
    EmptyPath,

    /// Spectrum length does not match the photon energy window
    #[error("spectrum of length {found} does not fit an energy window of {expected} points")]
    SpectrumLengthMismatch { expected: usize, found: usize },

    /// Unknown backlighter keyword
    #[error("unknown backlighter \"{0}\", expected \"none\", \"flat\" or \"blackbody\"")]
    UnknownBacklighter(String),
}
