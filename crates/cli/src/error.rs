//! Result and Error types for the command line interface

use std::path::PathBuf;

/// Type alias for `Result<T, cli::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `spectrace`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure during a run
    #[error(transparent)]
    Detector(#[from] spectrace_detector::Error),

    /// Inconsistent or unreadable snapshot
    #[error(transparent)]
    Mesh(#[from] spectrace_mesh::Error),

    /// Inconsistent or unreadable material data
    #[error(transparent)]
    Material(#[from] spectrace_material::Error),

    /// Refusing to overwrite an existing run
    #[error("{0} already exists, use --force to overwrite")]
    Existing(PathBuf),
}
