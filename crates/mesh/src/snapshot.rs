//! Mesh and grid of one time instant

// crate modules
use crate::error::Result;
use crate::mesh::Mesh;

// spectrace modules
use spectrace_geometry::Grid;

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Hydrodynamic state of the simulation at one time instant
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Node positions and velocities
    pub grid: Grid,
    /// Zones and their material state
    pub mesh: Mesh,
}

impl Snapshot {
    /// Pair a mesh with the grid it refers to
    pub fn new(grid: Grid, mesh: Mesh) -> Self {
        Self { grid, mesh }
    }

    /// Load a snapshot from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;

        let unpaired = snapshot.mesh.validate(&snapshot.grid)?;
        if !unpaired.is_empty() {
            warn!(
                "{} has {} unpaired neighbour relations",
                path.display(),
                unpaired.len()
            );
        }
        info!(
            "Loaded {} with {} nodes and {} zones",
            path.display(),
            snapshot.grid.len(),
            snapshot.mesh.len()
        );
        Ok(snapshot)
    }

    /// Write the snapshot to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
