//! Ray tracing and radiative transport through zoned meshes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod backlighter;
mod error;
mod ray;
mod tracking;
mod waypoint;
mod writer;

#[doc(inline)]
pub use ray::{Ray, SpectralData};

#[doc(inline)]
pub use waypoint::Waypoint;

#[doc(inline)]
pub use backlighter::Backlighter;

#[doc(inline)]
pub use tracking::Tracking;

#[doc(inline)]
pub use writer::write_spectrum;

#[doc(inline)]
pub use error::{Error, Result};
