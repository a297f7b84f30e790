//! Zoned meshes, neighbour resolution and zone spectra
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod mesh;
mod snapshot;
mod symmetry;
mod zone;

pub mod builder;

#[doc(inline)]
pub use mesh::Mesh;

#[doc(inline)]
pub use snapshot::Snapshot;

#[doc(inline)]
pub use symmetry::Symmetry;

#[doc(inline)]
pub use zone::{Zone, ZoneSpectra, EQT};

#[doc(inline)]
pub use error::{Error, Result};
