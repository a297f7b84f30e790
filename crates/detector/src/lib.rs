//! Synthetic spectral detectors built from bundles of rays through zoned meshes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod config;
mod detector;
mod error;
mod interval;
mod run;
mod writer;

#[doc(inline)]
pub use detector::{bounding_extent, Detector};

#[doc(inline)]
pub use config::{Bundle, DetectorConfig, RunConfig};

#[doc(inline)]
pub use interval::Interval;

#[doc(inline)]
pub use run::{init_detectors, run, run_with};

#[doc(inline)]
pub use writer::write_hv_grid;

#[doc(inline)]
pub use error::{Error, Result};
