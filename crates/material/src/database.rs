//! Equation-of-state and spectral grids with access by nearest grid point

// crate modules
use crate::error::{Error, Result};
use crate::spectra::{Component, Spectra};
use crate::table::Table;

// spectrace modules
use spectrace_utils::constants::INT_WIDTH;
use spectrace_utils::{nearest_exhaustive, SliceExt};

// standard library
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Temperature, density and photon energy grids of a [Database]
///
/// The electron density grid is not stored directly but assembled from a
/// mantissa and a decimal exponent grid, with the mantissa varying fastest.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grids {
    /// Electron temperatures in eV, increasing
    pub te: Vec<f64>,
    /// Radiation temperatures in eV, increasing
    pub tr: Vec<f64>,
    /// Mantissas of the electron density grid
    pub ne_mantissa: Vec<f64>,
    /// Decimal exponents of the electron density grid
    pub ne_exponent: Vec<i32>,
    /// Photon energies in eV, increasing
    pub hv: Vec<f64>,
}

impl Grids {
    /// Electron densities in electrons/cm³ from every exponent and mantissa
    ///
    /// ```rust
    /// # use spectrace_material::Grids;
    /// let grids = Grids {
    ///     ne_mantissa: vec![1.0, 5.0],
    ///     ne_exponent: vec![20, 21],
    ///     ..Default::default()
    /// };
    /// assert_eq!(grids.ne(), vec![1.0e20, 5.0e20, 1.0e21, 5.0e21]);
    /// ```
    pub fn ne(&self) -> Vec<f64> {
        self.ne_exponent
            .iter()
            .flat_map(|e| {
                let scale = 10f64.powi(*e);
                self.ne_mantissa.iter().map(move |m| m * scale)
            })
            .collect()
    }
}

/// Tabulated state of one material at one `(te, tr, ne)` grid point
///
/// Spectra are per ion, on the full photon energy grid: emissivity in
/// W/sr/eV and absorption and scattering cross sections in cm².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Database handle of the material
    pub handle: String,
    /// Electron temperature index
    pub ite: usize,
    /// Radiation temperature index
    pub itr: usize,
    /// Electron density index
    pub ine: usize,
    /// Mean ionisation
    pub zbar: f64,
    /// Emissivity
    pub em: Vec<f64>,
    /// Absorption
    pub ab: Vec<f64>,
    /// Scattering
    pub sc: Vec<f64>,
}

/// Result of the charge-neutral electron density search
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NeSearch {
    /// Nearest electron temperature index
    pub ite: usize,
    /// Nearest radiation temperature index
    pub itr: usize,
    /// Electron density index closest to charge neutrality
    pub ine: usize,
    /// Electron density implied by the mean ionisation at `ine`
    pub ne: f64,
}

type StateKey = (String, usize, usize, usize);

/// Serialised layout of a [Database]
#[derive(Serialize, Deserialize)]
struct RawDatabase {
    grids: Grids,
    states: Vec<State>,
}

/// In-memory database of equation-of-state and spectral data
///
/// All states are held in memory and looked up by material handle and grid
/// indices. The database is read-only once built and is shared by reference
/// between every ray.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawDatabase", into = "RawDatabase")]
pub struct Database {
    grids: Grids,
    ne: Vec<f64>,
    states: Vec<State>,
    index: HashMap<StateKey, usize>,
}

impl TryFrom<RawDatabase> for Database {
    type Error = Error;

    fn try_from(raw: RawDatabase) -> Result<Self> {
        Database::new(raw.grids, raw.states)
    }
}

impl From<Database> for RawDatabase {
    fn from(db: Database) -> Self {
        RawDatabase {
            grids: db.grids,
            states: db.states,
        }
    }
}

impl Database {
    /// Build a database, checking the grids and every state against them
    pub fn new(grids: Grids, states: Vec<State>) -> Result<Self> {
        for (name, grid) in [
            ("te", grids.te.len()),
            ("tr", grids.tr.len()),
            ("ne_mantissa", grids.ne_mantissa.len()),
            ("ne_exponent", grids.ne_exponent.len()),
            ("hv", grids.hv.len()),
        ] {
            if grid == 0 {
                return Err(Error::EmptyGrid(name));
            }
        }

        let ne = grids.ne();
        let nhv = grids.hv.len();

        let mut index = HashMap::with_capacity(states.len());
        for (i, s) in states.iter().enumerate() {
            for (quantity, found) in [("em", s.em.len()), ("ab", s.ab.len()), ("sc", s.sc.len())] {
                if found != nhv {
                    return Err(Error::SpectrumLengthMismatch {
                        handle: s.handle.clone(),
                        quantity,
                        expected: nhv,
                        found,
                    });
                }
            }
            if s.ite >= grids.te.len() || s.itr >= grids.tr.len() || s.ine >= ne.len() {
                return Err(Error::StateNotFound {
                    handle: s.handle.clone(),
                    ite: s.ite,
                    itr: s.itr,
                    ine: s.ine,
                });
            }
            index.insert((s.handle.clone(), s.ite, s.itr, s.ine), i);
        }

        debug!(
            "Database of {} states on {}x{}x{} grid with {} photon energies",
            states.len(),
            grids.te.len(),
            grids.tr.len(),
            ne.len(),
            nhv
        );

        Ok(Self {
            grids,
            ne,
            states,
            index,
        })
    }

    /// Electron temperature grid
    pub fn te(&self) -> &[f64] {
        &self.grids.te
    }

    /// Radiation temperature grid
    pub fn tr(&self) -> &[f64] {
        &self.grids.tr
    }

    /// Assembled electron density grid
    pub fn ne(&self) -> &[f64] {
        &self.ne
    }

    /// Photon energy grid
    pub fn hv(&self) -> &[f64] {
        &self.grids.hv
    }

    /// Number of photon energies
    pub fn nhv(&self) -> usize {
        self.grids.hv.len()
    }

    /// All grids as loaded
    pub fn grids(&self) -> &Grids {
        &self.grids
    }

    /// Number of tabulated states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True for a database without states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the electron temperature grid point nearest to `te`
    pub fn nearest_te(&self, te: f64) -> usize {
        self.grids.te.nearest_index(te)
    }

    /// Index of the radiation temperature grid point nearest to `tr`
    pub fn nearest_tr(&self, tr: f64) -> usize {
        self.grids.tr.nearest_index(tr)
    }

    /// Tabulated state of material `handle` at a grid point
    pub fn state(&self, handle: &str, ite: usize, itr: usize, ine: usize) -> Result<&State> {
        self.index
            .get(&(handle.to_string(), ite, itr, ine))
            .map(|i| &self.states[*i])
            .ok_or_else(|| Error::StateNotFound {
                handle: handle.to_string(),
                ite,
                itr,
                ine,
            })
    }

    /// Mean ionisation of material `handle` at a grid point
    pub fn zbar(&self, handle: &str, ite: usize, itr: usize, ine: usize) -> Result<f64> {
        Ok(self.state(handle, ite, itr, ine)?.zbar)
    }

    /// Charge-neutral electron density of a mixture at a grid point
    pub fn neutral_ne(
        &self,
        table: &Table,
        np: f64,
        components: &[Component],
        (ite, itr, ine): (usize, usize, usize),
    ) -> Result<f64> {
        let mut s = 0.0;
        for c in components {
            s += c.fraction * self.zbar(table.handle(&c.name)?, ite, itr, ine)?;
        }
        Ok(s * np)
    }

    /// Grid point matching a zone's temperatures and charge neutrality
    ///
    /// Temperatures snap to their nearest grid points. The electron density
    /// index is then the one whose grid value best matches the electron
    /// density implied by the tabulated mean ionisations at that same index,
    /// found by exhaustive search over the density grid.
    pub fn find_ne(
        &self,
        table: &Table,
        te: f64,
        tr: f64,
        np: f64,
        components: &[Component],
    ) -> Result<NeSearch> {
        let ite = self.nearest_te(te);
        let itr = self.nearest_tr(tr);

        let ine = nearest_exhaustive(0.0, self.ne.len(), |i| {
            Ok::<f64, Error>(self.ne[i] - self.neutral_ne(table, np, components, (ite, itr, i))?)
        })?;

        let ne = self.neutral_ne(table, np, components, (ite, itr, ine))?;
        trace!("te[{ite}] tr[{itr}] ne[{ine}] -> ne = {ne}");
        Ok(NeSearch { ite, itr, ine, ne })
    }

    /// Mixture spectra over photon energies `jmin..=jmax`
    ///
    /// Per-ion spectra of every component are weighted by their fractions and
    /// scaled by the ion density `np`.
    pub fn mixture(
        &self,
        table: &Table,
        np: f64,
        components: &[Component],
        grid_point: &NeSearch,
        (jmin, jmax): (usize, usize),
    ) -> Result<Spectra> {
        self.check_energy_indices(jmin, jmax)?;

        let mut spectra = Spectra::zeros(jmax - jmin + 1);
        for c in components {
            let state = self.state(
                table.handle(&c.name)?,
                grid_point.ite,
                grid_point.itr,
                grid_point.ine,
            )?;
            spectra.add_scaled(state, jmin..=jmax, c.fraction);
        }
        spectra.scale(np);
        Ok(spectra)
    }

    /// First and last photon energy indices within `[hvmin, hvmax]`
    ///
    /// ```rust
    /// # use spectrace_material::{Database, Grids};
    /// let grids = Grids {
    ///     te: vec![1.0],
    ///     tr: vec![0.0],
    ///     ne_mantissa: vec![1.0],
    ///     ne_exponent: vec![20],
    ///     hv: vec![10.0, 20.0, 30.0, 40.0],
    /// };
    /// let db = Database::new(grids, vec![]).unwrap();
    ///
    /// assert_eq!(db.energy_window(15.0, 30.0).unwrap(), (1, 2));
    /// assert!(db.energy_window(41.0, 50.0).is_err());
    /// ```
    pub fn energy_window(&self, hvmin: f64, hvmax: f64) -> Result<(usize, usize)> {
        let hv = &self.grids.hv;
        let jmin = hv.iter().position(|e| *e >= hvmin);
        let jmax = hv.iter().rposition(|e| *e <= hvmax);
        match (jmin, jmax) {
            (Some(jmin), Some(jmax)) if jmin <= jmax => Ok((jmin, jmax)),
            _ => Err(Error::EmptyEnergyRange { hvmin, hvmax }),
        }
    }

    fn check_energy_indices(&self, jmin: usize, jmax: usize) -> Result<()> {
        let nhv = self.nhv();
        if jmin > jmax || jmax >= nhv {
            return Err(Error::EnergyIndexOutOfRange { jmin, jmax, nhv });
        }
        Ok(())
    }

    /// Load a database from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the database to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "nte:{:>w$}", self.grids.te.len(), w = INT_WIDTH)?;
        writeln!(f, "ntr:{:>w$}", self.grids.tr.len(), w = INT_WIDTH)?;
        writeln!(f, "nne:{:>w$}", self.ne.len(), w = INT_WIDTH)?;
        write!(f, "nhv:{:>w$}", self.grids.hv.len(), w = INT_WIDTH)
    }
}
