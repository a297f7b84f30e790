//! Generators for simple meshes
//!
//! Useful for tests and quick studies: rectilinear boxes and concentric
//! spherical shells, each wrapped in a complete bounding zone with every
//! neighbour relation filled in.

// crate modules
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::snapshot::Snapshot;
use crate::zone::Zone;

// spectrace modules
use spectrace_geometry::{Face, FaceId, Grid, Vector3d};
use spectrace_utils::f;

/// Bounding sphere radius as a multiple of the domain half-diagonal
const BOUNDING_MARGIN: f64 = 2.0;

/// Rectilinear mesh of boxes between the given x, y and z edges
///
/// Zone `1 + i + nx (j + ny k)` spans `x[i]..x[i+1]`, `y[j]..y[j+1]` and
/// `z[k]..z[k+1]`. Its six faces, all facing outwards, are ordered bottom,
/// top, left, right, front, back (-z, +z, -x, +x, -y, +y).
///
/// ```rust
/// # use spectrace_mesh::builder::rectilinear;
/// let snapshot = rectilinear(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
///
/// // bounding zone and two boxes
/// assert_eq!(snapshot.mesh.len(), 3);
/// assert!(snapshot.mesh.validate(&snapshot.grid).unwrap().is_empty());
/// ```
pub fn rectilinear(x: &[f64], y: &[f64], z: &[f64]) -> Result<Snapshot> {
    for (name, edges) in [("x", x), ("y", y), ("z", z)] {
        if edges.len() < 2 || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::MalformedBoundingZone(f!(
                "{name} edges must be at least two increasing values"
            )));
        }
    }

    let (nx, ny, nz) = (x.len() - 1, y.len() - 1, z.len() - 1);
    let node = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
    let zone_id = |i: usize, j: usize, k: usize| 1 + i + nx * (j + ny * k);

    let mut grid = Grid::default();
    for zk in z {
        for yj in y {
            for xi in x {
                grid.push(Vector3d::new(*xi, *yj, *zk));
            }
        }
    }

    let mut zones = vec![Zone::default()];
    let mut members = Vec::new();
    let mut member_neighbors = Vec::new();

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let id = zone_id(i, j, k);
                let corners = [
                    // bottom, top
                    vec![
                        node(i, j, k),
                        node(i, j + 1, k),
                        node(i + 1, j + 1, k),
                        node(i + 1, j, k),
                    ],
                    vec![
                        node(i, j, k + 1),
                        node(i + 1, j, k + 1),
                        node(i + 1, j + 1, k + 1),
                        node(i, j + 1, k + 1),
                    ],
                    // left, right
                    vec![
                        node(i, j, k),
                        node(i, j, k + 1),
                        node(i, j + 1, k + 1),
                        node(i, j + 1, k),
                    ],
                    vec![
                        node(i + 1, j, k),
                        node(i + 1, j + 1, k),
                        node(i + 1, j + 1, k + 1),
                        node(i + 1, j, k + 1),
                    ],
                    // front, back
                    vec![
                        node(i, j, k),
                        node(i + 1, j, k),
                        node(i + 1, j, k + 1),
                        node(i, j, k + 1),
                    ],
                    vec![
                        node(i, j + 1, k),
                        node(i, j + 1, k + 1),
                        node(i + 1, j + 1, k + 1),
                        node(i + 1, j + 1, k),
                    ],
                ];

                // zone across each face, if any, and the face it sees
                let across = [
                    (k > 0).then(|| (zone_id(i, j, k - 1), 1)),
                    (k + 1 < nz).then(|| (zone_id(i, j, k + 1), 0)),
                    (i > 0).then(|| (zone_id(i - 1, j, k), 3)),
                    (i + 1 < nx).then(|| (zone_id(i + 1, j, k), 2)),
                    (j > 0).then(|| (zone_id(i, j - 1, k), 5)),
                    (j + 1 < ny).then(|| (zone_id(i, j + 1, k), 4)),
                ];

                let mut faces = Vec::with_capacity(6);
                for (f, (nodes, other)) in corners.into_iter().zip(across).enumerate() {
                    let fid = FaceId::new(id, f as i16);
                    let face = Face::polygon(fid, nodes);
                    let neighbor = match other {
                        Some((zone, id)) => FaceId::new(zone, id),
                        None => {
                            members.push(face.clone());
                            member_neighbors.push(fid);
                            FaceId::member(members.len() - 1)
                        }
                    };
                    faces.push(face.with_neighbors(vec![neighbor]));
                }
                zones.push(Zone::new(id, faces));
            }
        }
    }

    let low = Vector3d::new(x[0], y[0], z[0]);
    let high = Vector3d::new(x[nx], y[ny], z[nz]);
    let radius = BOUNDING_MARGIN * (high - low).norm() / 2.0;
    let center = grid.push((low + high) / 2.0);

    zones[0] = bounding_zone(center, radius, members, member_neighbors);
    Ok(Snapshot::new(grid, Mesh::new(zones)?))
}

/// Concentric spherical shells about the origin with the given outer radii
///
/// Zone 1 is the central ball and zone `k` the shell between `radii[k-2]`
/// and `radii[k-1]`. Face 0 of every zone is its outer sphere and face 1, for
/// all but the central ball, its inner sphere facing inwards.
///
/// ```rust
/// # use spectrace_mesh::builder::spherical_shells;
/// let snapshot = spherical_shells(&[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(snapshot.mesh.len(), 4);
/// assert_eq!(snapshot.mesh.zone(2).unwrap().len(), 2);
/// ```
pub fn spherical_shells(radii: &[f64]) -> Result<Snapshot> {
    if radii.is_empty() || radii[0] <= 0.0 || radii.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::MalformedBoundingZone(
            "shell radii must be positive and increasing".to_string(),
        ));
    }

    let mut grid = Grid::default();
    let center = grid.push(Vector3d::zeros());
    let n = radii.len();

    let mut zones = vec![Zone::default()];
    for (k, r) in radii.iter().enumerate() {
        let id = k + 1;
        let outer_neighbor = if id < n {
            FaceId::new(id + 1, 1)
        } else {
            FaceId::member(0)
        };
        let mut faces = vec![
            Face::sphere(FaceId::new(id, 0), center, *r).with_neighbors(vec![outer_neighbor]),
        ];
        if k > 0 {
            faces.push(
                Face::sphere(FaceId::new(id, 1), center, -radii[k - 1])
                    .with_neighbors(vec![FaceId::new(id - 1, 0)]),
            );
        }
        zones.push(Zone::new(id, faces));
    }

    let boundary = Face::sphere(FaceId::new(n, 0), center, radii[n - 1]);
    let radius = BOUNDING_MARGIN * radii[n - 1];
    zones[0] = bounding_zone(center, radius, vec![boundary], vec![FaceId::new(n, 0)]);
    Ok(Snapshot::new(grid, Mesh::new(zones)?))
}

fn bounding_zone(center: usize, radius: f64, members: Vec<Face>, neighbors: Vec<FaceId>) -> Zone {
    let sphere = Face::sphere(FaceId::BOUNDING_SPHERE, center, radius);
    let surface = Face::surface(FaceId::BOUNDING_SURFACE, members).with_neighbors(neighbors);
    Zone::new(0, vec![sphere, surface])
}
