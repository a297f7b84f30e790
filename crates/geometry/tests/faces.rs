use spectrace_geometry::{Face, FaceId, FaceKind, Grid, Vector3d};
use spectrace_utils::constants::BIG;

use rstest::{fixture, rstest};

const EQT: f64 = 1.0e-19;

fn assert_close(a: &Vector3d, b: &Vector3d) {
    assert!((a - b).norm() < 1e-12, "{a:?} != {b:?}");
}

/// Sphere of radius 13 about (1, 2, 3) with its grid
#[fixture]
fn sphere() -> (Grid, Face) {
    let mut grid = Grid::default();
    let c = grid.push(Vector3d::new(1.0, 2.0, 3.0));
    (grid, Face::sphere(FaceId::new(4, 3), c, 13.0))
}

/// Unit square in the z = 0 plane facing +z
#[fixture]
fn square() -> (Grid, Face) {
    let mut grid = Grid::default();
    let nodes = vec![
        grid.push(Vector3d::new(0.0, 0.0, 0.0)),
        grid.push(Vector3d::new(1.0, 0.0, 0.0)),
        grid.push(Vector3d::new(1.0, 1.0, 0.0)),
        grid.push(Vector3d::new(0.0, 1.0, 0.0)),
    ];
    (grid, Face::polygon(FaceId::new(1, 2), nodes))
}

#[rstest]
#[case::one_positive_root([2.5, 1.0, 10.0], FaceId::NO_NEIGHBOR, 2.56019662378358, true)]
#[case::two_positive_roots([2.5, 34.0, -1.0], FaceId::NO_NEIGHBOR, 6.43980337621642, true)]
#[case::leaving_same_face([2.5, 34.0, -1.0], FaceId::new(4, 3), 13.5601966237836, true)]
#[case::two_negative_roots([2.5, -26.0, 19.0], FaceId::NO_NEIGHBOR, -6.43980337621642, false)]
fn sphere_roots(
    sphere: (Grid, Face),
    #[case] p: [f64; 3],
    #[case] incoming: FaceId,
    #[case] t: f64,
    #[case] is_found: bool,
) {
    let (grid, face) = sphere;
    let p = Vector3d::from(p);
    let u = Vector3d::new(0.0, -3.0, 1.0);

    let hit = face.intercept(&grid, &p, &u, EQT, incoming).unwrap();
    assert!((hit.t - t).abs() < 1e-12, "t = {}", hit.t);
    assert_close(&hit.w, &(p + u * t));
    assert_eq!(hit.fid, FaceId::new(4, 3));
    assert_eq!(hit.is_found, is_found);
}

#[rstest]
#[case::no_roots([7.0, 7.0, 28.0])]
#[case::tangent([4.0, 3.0, 16.0])]
fn sphere_missed(sphere: (Grid, Face), #[case] p: [f64; 3]) {
    let (grid, face) = sphere;
    let u = Vector3d::new(0.0, -3.0, 1.0);

    let hit = face
        .intercept(&grid, &Vector3d::from(p), &u, EQT, FaceId::NO_NEIGHBOR)
        .unwrap();
    assert_eq!(hit.t, -BIG);
    assert_eq!(hit.w, Vector3d::repeat(-BIG));
    assert!(!hit.is_found);
}

#[rstest]
#[case::from_outside([-21.0, 4.0, 0.0], [3.0, 0.0, 0.0], 6.0, [-3.0, 4.0, 0.0], true)]
#[case::skips_root_at_start([-3.0, 4.0, 0.0], [3.0, 0.0, 0.0], 2.0, [3.0, 4.0, 0.0], true)]
#[case::keeps_root_at_start([-3.0, 4.0, 0.0], [0.0, 3.0, 0.0], 0.0, [-3.0, 4.0, 0.0], false)]
fn sphere_at_origin(
    #[case] p: [f64; 3],
    #[case] u: [f64; 3],
    #[case] t: f64,
    #[case] w: [f64; 3],
    #[case] is_found: bool,
) {
    let mut grid = Grid::default();
    let c = grid.push(Vector3d::zeros());
    let face = Face::sphere(FaceId::new(1, 0), c, 5.0);

    let hit = face
        .intercept(
            &grid,
            &Vector3d::from(p),
            &Vector3d::from(u),
            EQT,
            FaceId::NO_NEIGHBOR,
        )
        .unwrap();
    assert_eq!(hit.t, t);
    assert_eq!(hit.w, Vector3d::from(w));
    assert_eq!(hit.is_found, is_found);
}

#[rstest]
fn square_geometry(square: (Grid, Face)) {
    let (grid, face) = square;
    assert_eq!(face.area(&grid).unwrap(), 1.0);
    assert_eq!(face.normal(&grid).unwrap(), Vector3d::new(0.0, 0.0, 1.0));
    assert!(!face.is_curved(&grid).unwrap());
    assert_close(
        &face.face_point(&grid, &Vector3d::zeros()).unwrap(),
        &Vector3d::new(0.5, 0.5, 0.0),
    );

    let w = Vector3d::new(0.2, 0.3, -4.0);
    assert_eq!(face.distance(&grid, &w).unwrap(), -4.0);
    assert_eq!(
        face.subpoint(&grid, &w).unwrap(),
        Vector3d::new(0.2, 0.3, 0.0)
    );
}

#[rstest]
#[case::inside([0.25, 0.5, 0.0], true)]
#[case::on_edge([1.0, 0.5, 0.0], true)]
#[case::on_vertex([1.0, 1.0, 0.0], true)]
#[case::outside([2.0, 0.5, 0.0], false)]
#[case::beyond_corner([-0.1, -0.1, 0.0], false)]
#[case::rounded_off_corner([-1e-16, -1e-16, 0.0], true)]
#[case::rounded_off_edge([1.0000000000000002, 0.5, 0.0], true)]
#[case::off_edge_line([1.0, 1.5, 0.0], false)]
fn square_contains(square: (Grid, Face), #[case] w: [f64; 3], #[case] expected: bool) {
    let (grid, face) = square;
    assert_eq!(face.contains(&grid, &Vector3d::from(w)).unwrap(), expected);
}

#[rstest]
#[case::forward([0.25, 0.5, -2.0], [0.0, 0.0, 1.0], FaceId::NO_NEIGHBOR, 2.0, true)]
#[case::outside([2.0, 0.5, -2.0], [0.0, 0.0, 1.0], FaceId::NO_NEIGHBOR, 2.0, false)]
#[case::behind([0.25, 0.5, -2.0], [0.0, 0.0, -1.0], FaceId::NO_NEIGHBOR, -2.0, false)]
#[case::parallel([0.25, 0.5, -2.0], [1.0, 0.0, 0.0], FaceId::NO_NEIGHBOR, -BIG, false)]
#[case::leaving_same_face([0.25, 0.5, -2.0], [0.0, 0.0, 1.0], FaceId::new(1, 2), -BIG, false)]
fn square_intercept(
    square: (Grid, Face),
    #[case] p: [f64; 3],
    #[case] u: [f64; 3],
    #[case] incoming: FaceId,
    #[case] t: f64,
    #[case] is_found: bool,
) {
    let (grid, face) = square;
    let hit = face
        .intercept(&grid, &Vector3d::from(p), &Vector3d::from(u), EQT, incoming)
        .unwrap();
    assert_eq!(hit.t, t);
    assert_eq!(hit.is_found, is_found);
}

#[rstest]
fn polygon_velocity_interpolates(square: (Grid, Face)) {
    let (mut grid, face) = square;
    for i in 0..grid.len() {
        let mut node = *grid.node(i).unwrap();
        node.velocity = Vector3d::new(0.0, 0.0, 2.0);
        grid.replace(node).unwrap();
    }

    // uniform node velocities give a uniform face velocity
    let v = face.velocity(&grid, &Vector3d::new(0.3, 0.6, 0.0)).unwrap();
    assert_close(&v, &Vector3d::new(0.0, 0.0, 2.0));

    // exactly at a vertex
    let v = face.velocity(&grid, &Vector3d::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(v, Vector3d::new(0.0, 0.0, 2.0));
}

#[rstest]
#[case::on_annulus([2.0, 0.0, 0.0], true)]
#[case::through_hole([0.5, 0.0, 0.0], false)]
fn flat_cone(#[case] p: [f64; 3], #[case] is_found: bool) {
    let mut grid = Grid::default();
    let a = grid.push(Vector3d::new(1.0, 2.0, 0.0));
    let b = grid.push(Vector3d::new(3.0, 2.0, 0.0));
    let face = Face::cone(FaceId::new(2, 0), a, b);
    assert!(!face.is_curved(&grid).unwrap());

    let hit = face
        .intercept(
            &grid,
            &Vector3d::from(p),
            &Vector3d::new(0.0, 0.0, 1.0),
            EQT,
            FaceId::NO_NEIGHBOR,
        )
        .unwrap();
    assert_eq!(hit.t, 2.0);
    assert_eq!(hit.is_found, is_found);
}

#[rstest]
#[case::within_height([-5.0, 0.0, 1.0], true)]
#[case::above_top([-5.0, 0.0, 6.0], false)]
fn curved_cone(#[case] p: [f64; 3], #[case] is_found: bool) {
    // cylinder of radius 2 between z = 0 and z = 4
    let mut grid = Grid::default();
    let a = grid.push(Vector3d::new(2.0, 0.0, 0.0));
    let b = grid.push(Vector3d::new(2.0, 4.0, 0.0));
    let face = Face::cone(FaceId::new(2, 1), a, b);
    assert!(face.is_curved(&grid).unwrap());

    let p = Vector3d::from(p);
    let hit = face
        .intercept(
            &grid,
            &p,
            &Vector3d::new(1.0, 0.0, 0.0),
            EQT,
            FaceId::NO_NEIGHBOR,
        )
        .unwrap();
    assert_eq!(hit.t, 3.0);
    assert_eq!(hit.w, Vector3d::new(-2.0, 0.0, p.z));
    assert_eq!(hit.is_found, is_found);
}

#[rstest]
fn surface_retags_closest_member(square: (Grid, Face)) {
    let (mut grid, lower) = square;
    let upper_nodes = vec![
        grid.push(Vector3d::new(0.0, 0.0, 1.0)),
        grid.push(Vector3d::new(1.0, 0.0, 1.0)),
        grid.push(Vector3d::new(1.0, 1.0, 1.0)),
        grid.push(Vector3d::new(0.0, 1.0, 1.0)),
    ];
    let upper = Face::polygon(FaceId::new(2, 0), upper_nodes);
    let surface = Face::surface(FaceId::BOUNDING_SURFACE, vec![upper, lower]);

    assert_eq!(surface.area(&grid).unwrap(), 2.0);
    assert!(surface.is_curved(&grid).unwrap());
    surface.check(&grid).unwrap();

    let p = Vector3d::new(0.5, 0.5, -2.0);
    let hit = surface
        .intercept(&grid, &p, &Vector3d::z(), EQT, FaceId::NO_NEIGHBOR)
        .unwrap();
    assert!(hit.is_found);
    assert_eq!(hit.t, 2.0);
    assert_eq!(hit.fid, FaceId::member(1));

    let hit = surface
        .intercept(&grid, &p, &-Vector3d::z(), EQT, FaceId::NO_NEIGHBOR)
        .unwrap();
    assert!(!hit.is_found);
    assert_eq!(hit.t, BIG);
}

#[test]
fn malformed_faces_are_rejected() {
    let mut grid = Grid::default();
    let a = grid.push(Vector3d::zeros());
    let b = grid.push(Vector3d::x());

    assert!(Face::polygon(FaceId::new(1, 0), vec![a, b]).check(&grid).is_err());
    assert!(Face::polygon(FaceId::new(1, 0), vec![a, b, 7]).check(&grid).is_err());
    assert!(Face::sphere(FaceId::new(1, 0), a, 0.0).check(&grid).is_err());
    assert!(Face::surface(FaceId::new(0, 1), vec![]).check(&grid).is_err());
}

#[rstest]
#[case::no_nodes(vec![])]
#[case::two_nodes(vec![0, 1])]
fn degenerate_polygons_fail_without_validation(#[case] nodes: Vec<usize>) {
    let mut grid = Grid::default();
    grid.push(Vector3d::zeros());
    grid.push(Vector3d::x());

    let face = Face::polygon(FaceId::new(1, 0), nodes);
    let p = Vector3d::new(0.0, 0.0, -1.0);
    assert!(face.normal(&grid).is_err());
    assert!(face.contains(&grid, &p).is_err());
    assert!(face.distance(&grid, &p).is_err());
    assert!(face
        .intercept(&grid, &p, &Vector3d::z(), EQT, FaceId::NO_NEIGHBOR)
        .is_err());
}

#[test]
fn face_from_json() {
    let json = r#"{
        "fid": {"zone": 1, "id": 0},
        "neighbors": [{"zone": 2, "id": 3}],
        "shape": {"kind": "sphere", "center": 0, "radius": -2.0}
    }"#;
    let face: Face = serde_json::from_str(json).unwrap();

    assert_eq!(face.fid, FaceId::new(1, 0));
    assert_eq!(face.neighbors, vec![FaceId::new(2, 3)]);
    match face.shape {
        FaceKind::Sphere(s) => {
            assert_eq!(s.radius, -2.0);
            assert_eq!(s.speed, 0.0);
        }
        _ => panic!("expected a sphere"),
    }
}
