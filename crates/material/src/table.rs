//! Atomic data for the materials of a simulation

// crate modules
use crate::error::{Error, Result};

// spectrace modules
use spectrace_utils::nint;

// standard library
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use log::debug;
use serde::{Deserialize, Serialize};

/// Atomic data for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Nuclear charge
    pub z: u32,
    /// Atomic weight
    pub a: f64,
    /// Name used to look the material up in a [Database](crate::Database)
    pub handle: String,
}

impl Element {
    /// Atomic data with the given database handle
    pub fn new(z: u32, a: f64, handle: &str) -> Self {
        Self {
            z,
            a,
            handle: handle.to_string(),
        }
    }

    /// Neutron number, from the atomic weight rounded to the nearest integer
    pub fn n(&self) -> i64 {
        nint(self.a) - i64::from(self.z)
    }
}

/// Maps material names, as used by zones, to their atomic data
///
/// ```rust
/// # use spectrace_material::{Element, Table};
/// let mut table = Table::default();
/// table.insert("D", Element::new(1, 2.014, "h"));
/// table.insert("Ar", Element::new(18, 39.948, "ar"));
///
/// assert_eq!(table.z("Ar").unwrap(), 18);
/// assert_eq!(table.n("Ar").unwrap(), 22);
/// assert_eq!(table.handle("D").unwrap(), "h");
/// assert!(table.get("Kr").is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    materials: BTreeMap<String, Element>,
}

impl Table {
    /// Add or replace a material
    pub fn insert(&mut self, name: &str, element: Element) {
        self.materials.insert(name.to_string(), element);
    }

    /// Atomic data of material `name`
    pub fn get(&self, name: &str) -> Result<&Element> {
        self.materials
            .get(name)
            .ok_or_else(|| Error::MaterialNotFound(name.to_string()))
    }

    /// Nuclear charge of material `name`
    pub fn z(&self, name: &str) -> Result<u32> {
        Ok(self.get(name)?.z)
    }

    /// Atomic weight of material `name`
    pub fn a(&self, name: &str) -> Result<f64> {
        Ok(self.get(name)?.a)
    }

    /// Neutron number of material `name`
    pub fn n(&self, name: &str) -> Result<i64> {
        Ok(self.get(name)?.n())
    }

    /// Database handle of material `name`
    pub fn handle(&self, name: &str) -> Result<&str> {
        Ok(&self.get(name)?.handle)
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True for a table without materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate over `(name, data)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Element)> {
        self.materials.iter()
    }

    /// Drop every material not named in `used`
    pub fn retain_used<'a, I>(&mut self, used: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let used = used.into_iter().collect::<BTreeSet<&str>>();
        self.materials.retain(|name, _| used.contains(name.as_str()));
        debug!("Table keeps {} materials in use", self.materials.len());
    }

    /// Sorted, unique nuclear charges of every material
    pub fn elements(&self) -> Vec<u32> {
        self.materials
            .values()
            .map(|e| e.z)
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }

    /// Convert atom abundances to mass fractions normalised to one
    ///
    /// ```rust
    /// # use spectrace_material::{Element, Table};
    /// let mut table = Table::default();
    /// table.insert("H", Element::new(1, 1.0, "h"));
    /// table.insert("C", Element::new(6, 12.0, "c"));
    ///
    /// let m = table.atom_to_mass(&["H", "C"], &[4.0, 1.0]).unwrap();
    /// assert_eq!(m, vec![0.25, 0.75]);
    /// ```
    pub fn atom_to_mass(&self, materials: &[&str], abundances: &[f64]) -> Result<Vec<f64>> {
        check_abundances(materials, abundances)?;
        let masses = materials
            .iter()
            .zip(abundances)
            .map(|(name, x)| Ok(x * self.a(name)?))
            .collect::<Result<Vec<f64>>>()?;
        Ok(normalise(masses))
    }

    /// Convert mass abundances to atom fractions normalised to one
    pub fn mass_to_atom(&self, materials: &[&str], abundances: &[f64]) -> Result<Vec<f64>> {
        check_abundances(materials, abundances)?;
        let atoms = materials
            .iter()
            .zip(abundances)
            .map(|(name, m)| Ok(m / self.a(name)?))
            .collect::<Result<Vec<f64>>>()?;
        Ok(normalise(atoms))
    }

    /// Load a table from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the table to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{:<12} {:>5} {:>15} {:>15}",
            "Material", "Z", "Atomic weight", "File handle"
        )?;
        for (name, e) in &self.materials {
            writeln!(f, "{:<12} {:>5} {:>15} {:>15}", name, e.z, e.a, e.handle)?;
        }
        Ok(())
    }
}

fn check_abundances(materials: &[&str], abundances: &[f64]) -> Result<()> {
    if materials.len() != abundances.len() {
        return Err(Error::MismatchedAbundances {
            materials: materials.len(),
            fractions: abundances.len(),
        });
    }
    Ok(())
}

fn normalise(values: Vec<f64>) -> Vec<f64> {
    let total = values.iter().sum::<f64>();
    if total == 0.0 {
        return values;
    }
    values.into_iter().map(|v| v / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_only_used_materials() {
        let mut table = Table::default();
        table.insert("D", Element::new(1, 2.014, "h"));
        table.insert("T", Element::new(1, 3.016, "h"));
        table.insert("Ar", Element::new(18, 39.948, "ar"));

        table.retain_used(["Ar", "D", "Xe"]);
        assert_eq!(table.len(), 2);
        assert!(matches!(table.get("T"), Err(Error::MaterialNotFound(_))));
        assert_eq!(table.elements(), vec![1, 18]);
    }

    #[test]
    fn neutron_number_rounds_weight() {
        assert_eq!(Element::new(1, 2.014, "h").n(), 1);
        assert_eq!(Element::new(1, 3.016, "h").n(), 2);
    }

    #[test]
    fn conversions_check_lengths() {
        let table = Table::default();
        assert!(matches!(
            table.mass_to_atom(&["H"], &[]),
            Err(Error::MismatchedAbundances {
                materials: 1,
                fractions: 0
            })
        ));
        assert!(matches!(
            table.mass_to_atom(&["H"], &[1.0]),
            Err(Error::MaterialNotFound(_))
        ));
    }
}
