//! Zone composition and the spectra it produces

// crate modules
use crate::database::State;

// standard library
use std::ops::RangeInclusive;

// external crates
use serde::{Deserialize, Serialize};

/// One material of a zone and its ion fraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Material name, as listed in the [Table](crate::Table)
    pub name: String,
    /// Fraction of the total ion density
    pub fraction: f64,
}

impl Component {
    /// Material `name` with ion fraction `fraction`
    pub fn new(name: &str, fraction: f64) -> Self {
        Self {
            name: name.to_string(),
            fraction,
        }
    }
}

/// Emissivity, absorption and scattering over a window of photon energies
///
/// For a zone these are volumetric: W/cm³/sr/eV for `em` and 1/cm for the
/// opacities.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectra {
    /// Emissivity
    pub em: Vec<f64>,
    /// Absorption coefficient
    pub ab: Vec<f64>,
    /// Scattering coefficient
    pub sc: Vec<f64>,
}

impl Spectra {
    /// All three spectra zero over `n` photon energies
    pub fn zeros(n: usize) -> Self {
        Self {
            em: vec![0.0; n],
            ab: vec![0.0; n],
            sc: vec![0.0; n],
        }
    }

    /// Number of photon energies
    pub fn len(&self) -> usize {
        self.em.len()
    }

    /// True for spectra over no photon energies
    pub fn is_empty(&self) -> bool {
        self.em.is_empty()
    }

    /// Accumulate `f` times the window `range` of a tabulated state
    pub(crate) fn add_scaled(&mut self, state: &State, range: RangeInclusive<usize>, f: f64) {
        let add = |total: &mut [f64], values: &[f64]| {
            for (t, v) in total.iter_mut().zip(&values[range.clone()]) {
                *t += f * v;
            }
        };
        add(&mut self.em, &state.em);
        add(&mut self.ab, &state.ab);
        add(&mut self.sc, &state.sc);
    }

    /// Multiply every value by `f`
    pub fn scale(&mut self, f: f64) {
        self.em
            .iter_mut()
            .chain(self.ab.iter_mut())
            .chain(self.sc.iter_mut())
            .for_each(|v| *v *= f);
    }
}
