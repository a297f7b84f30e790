//! Faces, nodes and ray intercepts for zoned meshes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod face;
mod face_id;
mod grid;
mod intercept;
mod vector;

#[doc(inline)]
pub use face::{Boundary, Cone, Face, FaceKind, Polygon, Sphere, Surface};

#[doc(inline)]
pub use face_id::FaceId;

#[doc(inline)]
pub use grid::{Grid, Node};

#[doc(inline)]
pub use intercept::Intercept;

#[doc(inline)]
pub use vector::{Vector3d, VectorExt};

#[doc(inline)]
pub use error::{Error, Result};
