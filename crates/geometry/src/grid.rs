//! Nodes and the grid that face geometry refers to by index

// crate modules
use crate::error::{Error, Result};
use crate::vector::Vector3d;

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use serde::{Deserialize, Serialize};

/// A point of the hydrodynamic grid
///
/// Positions are in cm and velocities in cm/s. Cone faces store `(r, z)`
/// coordinates in the x and y components of the position instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Index of the node in its grid
    pub id: usize,
    /// Node position
    pub position: Vector3d,
    /// Node velocity
    #[serde(default)]
    pub velocity: Vector3d,
}

impl Node {
    /// Stationary node
    pub fn new(id: usize, position: Vector3d) -> Self {
        Self {
            id,
            position,
            velocity: Vector3d::zeros(),
        }
    }

    /// Node moving with `velocity`
    pub fn moving(id: usize, position: Vector3d, velocity: Vector3d) -> Self {
        Self {
            id,
            position,
            velocity,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:>6} r=({}, {}, {}) v=({}, {}, {})",
            self.id,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z
        )
    }
}

/// Ordered collection of [Node]s for one time instant
///
/// The grid is read-only while rays are traced, so a single instance is
/// shared by reference between every face and every worker.
///
/// ```rust
/// # use spectrace_geometry::{Grid, Node, Vector3d};
/// let mut grid = Grid::default();
/// grid.push(Vector3d::new(1.0, 2.0, 3.0));
///
/// assert_eq!(grid.len(), 1);
/// assert_eq!(grid.position(0).unwrap(), Vector3d::new(1.0, 2.0, 3.0));
/// assert!(grid.node(1).is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    nodes: Vec<Node>,
}

impl Grid {
    /// Build a grid from nodes whose ids match their positions in the list
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self> {
        let grid = Self { nodes };
        grid.check_ids()?;
        Ok(grid)
    }

    /// Append a stationary node, returning its index
    pub fn push(&mut self, position: Vector3d) -> usize {
        self.push_moving(position, Vector3d::zeros())
    }

    /// Append a moving node, returning its index
    pub fn push_moving(&mut self, position: Vector3d, velocity: Vector3d) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::moving(id, position, velocity));
        id
    }

    /// Replace the node at the index given by its own id
    pub fn replace(&mut self, node: Node) -> Result<()> {
        let len = self.nodes.len();
        let slot = self.nodes.get_mut(node.id).ok_or(Error::NodeNotFound {
            index: node.id,
            len,
        })?;
        *slot = node;
        Ok(())
    }

    /// Node at `index`
    pub fn node(&self, index: usize) -> Result<&Node> {
        self.nodes.get(index).ok_or(Error::NodeNotFound {
            index,
            len: self.nodes.len(),
        })
    }

    /// Position of the node at `index`
    pub fn position(&self, index: usize) -> Result<Vector3d> {
        Ok(self.node(index)?.position)
    }

    /// Velocity of the node at `index`
    pub fn velocity(&self, index: usize) -> Result<Vector3d> {
        Ok(self.node(index)?.velocity)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a grid with no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the nodes in order
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Load a grid from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let grid: Grid = serde_json::from_reader(reader)?;
        grid.check_ids()?;
        Ok(grid)
    }

    /// Write the grid to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    fn check_ids(&self) -> Result<()> {
        for (expected, node) in self.nodes.iter().enumerate() {
            if node.id != expected {
                return Err(Error::NodeIdMismatch {
                    expected,
                    found: node.id,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Grid of {} nodes", self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "{node}")?;
        }
        Ok(())
    }
}
