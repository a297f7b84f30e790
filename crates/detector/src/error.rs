//! Result and Error types for spectrace-detector

/// Type alias for `Result<T, detector::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `spectrace-detector`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read or write JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure while tracing or transporting a ray
    #[error(transparent)]
    Ray(#[from] spectrace_ray::Error),

    /// Inconsistent mesh or snapshot
    #[error(transparent)]
    Mesh(#[from] spectrace_mesh::Error),

    /// Inconsistent face geometry
    #[error(transparent)]
    Geometry(#[from] spectrace_geometry::Error),

    /// Missing or inconsistent material data
    #[error(transparent)]
    Material(#[from] spectrace_material::Error),

    /// Failure in the numeric helpers, e.g. broadening a short spectrum
    #[error("numeric failure: {0}")]
    Utils(#[from] spectrace_utils::Error),

    /// The worker pool could not be started
    #[error("unable to build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Detector description that cannot be sampled
    #[error("invalid detector \"{name}\": {reason}")]
    InvalidDetector { name: String, reason: String },

    /// Run description that is inconsistent
    #[error("invalid run configuration: {0}")]
    InvalidRun(String),

    /// Snapshot times do not bracket every snapshot
    #[error("expected {expected} snapshot times for {snapshots} snapshots, found {found}")]
    TimeMismatch {
        snapshots: usize,
        expected: usize,
        found: usize,
    },

    /// Detector centre within the bounding sphere of the mesh
    #[error("detector \"{name}\" lies {distance} cm from the mesh centre, inside the bounding sphere of radius {radius} cm")]
    InsideBoundingSphere {
        name: String,
        distance: f64,
        radius: f64,
    },

    /// Result of a patch that does not belong to the detector
    #[error("patch ({ix}, {iy}) outside a {nx}x{ny} grid")]
    PatchOutOfRange {
        ix: usize,
        iy: usize,
        nx: usize,
        ny: usize,
    },
}
