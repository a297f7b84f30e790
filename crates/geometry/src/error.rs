//! Result and Error types for spectrace-geometry

/// Type alias for Result<T, geometry::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `spectrace-geometry` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read or write json")]
    JsonError(#[from] serde_json::Error),

    #[error("node {index} not found in grid of {len} nodes")]
    NodeNotFound { index: usize, len: usize },

    #[error("node id {found} stored at grid index {expected}")]
    NodeIdMismatch { expected: usize, found: usize },

    #[error("face {fid} is malformed: {reason}")]
    MalformedFace { fid: String, reason: String },

    #[error("polygon through nodes {nodes:?} needs at least three vertices")]
    DegeneratePolygon { nodes: Vec<usize> },

    #[error("member {index} not found in surface {fid}")]
    MemberNotFound { fid: String, index: usize },
}
