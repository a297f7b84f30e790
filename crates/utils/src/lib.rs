//! Common numeric and formatting utilities
//!
//! These are left public for convenience.
//!
//! Tolerance-aware sign tests, the stable quadratic solver, nearest-index
//! searches and instrumental broadening are shared by the geometry, material
//! and detector crates.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod broadening;
mod error;
mod numeric;
mod slice_ext;
mod value_ext;

// Flatten
pub use broadening::{convolve_gaussian, gaussian, integrate_trapezoid};
pub use error::{Error, Result};
pub use numeric::{
    ndigits, nearest_exhaustive, nint, planckian, sign_eqt, solve_quadratic, Quadratic,
};
pub use slice_ext::SliceExt;
pub use value_ext::{IndexExt, ValueExt};

/// Physical and numerical constants
pub mod constants {
    /// Speed of light in vacuum (cm/s)
    pub const CV: f64 = 2.99792458e10;

    /// Value standing in for "infinitely far" along a ray
    pub const BIG: f64 = 1.0e100;

    /// Magnitude below which vector quantities are treated as zero
    pub const SMALL: f64 = 1.0e-100;

    /// 4π
    pub const FOUR_PI: f64 = 4.0 * std::f64::consts::PI;

    /// Field width used for integers in text headers
    pub const INT_WIDTH: usize = 11;
}
