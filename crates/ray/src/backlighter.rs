//! Spectrum entering the mesh at the far side of a ray

// crate modules
use crate::error::{Error, Result};

// spectrace modules
use spectrace_utils::planckian;

// external crates
use serde::{Deserialize, Serialize};

/// Specific intensity a ray starts with at the far boundary, in W/cm²/sr/eV
///
/// Parsed from a keyword and an optional value.
///
/// ```rust
/// # use spectrace_ray::Backlighter;
/// let flat: Backlighter = "flat 2.5".parse().unwrap();
/// assert_eq!(flat.spectrum(&[1.0, 2.0]), vec![2.5, 2.5]);
///
/// let none: Backlighter = "none".parse().unwrap();
/// assert_eq!(none.spectrum(&[1.0, 2.0]), vec![0.0, 0.0]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Backlighter {
    /// Nothing behind the mesh
    #[default]
    None,
    /// Uniform intensity at every photon energy
    Flat(f64),
    /// Planckian at the given temperature in eV
    Blackbody(f64),
}

impl Backlighter {
    /// Intensity at each photon energy of `hv`
    pub fn spectrum(&self, hv: &[f64]) -> Vec<f64> {
        match self {
            Self::None => vec![0.0; hv.len()],
            Self::Flat(value) => vec![*value; hv.len()],
            Self::Blackbody(tev) => hv.iter().map(|e| planckian(*e, *tev)).collect(),
        }
    }
}

impl std::str::FromStr for Backlighter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let kind = words.next().unwrap_or_default().to_lowercase();
        let value = match words.next() {
            Some(v) => Some(
                v.parse::<f64>()
                    .map_err(|_| Error::UnknownBacklighter(s.to_string()))?,
            ),
            None => None,
        };

        match (kind.as_str(), value) {
            ("none", _) => Ok(Self::None),
            ("flat", Some(v)) => Ok(Self::Flat(v)),
            ("blackbody", Some(v)) => Ok(Self::Blackbody(v)),
            _ => Err(Error::UnknownBacklighter(s.to_string())),
        }
    }
}

impl std::fmt::Display for Backlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Flat(value) => write!(f, "flat {value}"),
            Self::Blackbody(tev) => write!(f, "blackbody {tev} eV"),
        }
    }
}
