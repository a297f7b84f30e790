//! Symmetry assumed when sampling a detector

// crate modules
use crate::error::Error;

// external crates
use serde::{Deserialize, Serialize};

/// Symmetry of the mesh that detectors may exploit
///
/// ```rust
/// # use spectrace_mesh::Symmetry;
/// assert_eq!("spherical".parse::<Symmetry>().unwrap(), Symmetry::Spherical);
/// assert_eq!("none".parse::<Symmetry>().unwrap(), Symmetry::None);
/// assert!("cylindrical".parse::<Symmetry>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    /// Full three-dimensional geometry
    #[default]
    None,
    /// Spherically symmetric zones, sampled along one radius
    Spherical,
}

impl std::str::FromStr for Symmetry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "spherical" => Ok(Self::Spherical),
            _ => Err(Error::UnknownSymmetry(s.to_string())),
        }
    }
}

impl std::fmt::Display for Symmetry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Spherical => write!(f, "spherical"),
        }
    }
}
