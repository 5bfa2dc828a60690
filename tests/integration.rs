use approx::assert_relative_eq;
use voroplane::{BorderEdgeGeneration, Edge, Point, PointBorderLocation, Site, tessellate_once};

const NO_BORDER: BorderEdgeGeneration = BorderEdgeGeneration::DoNotMakeBorderEdges;
const BORDER: BorderEdgeGeneration = BorderEdgeGeneration::MakeBorderEdges;
const TOL: f64 = 1e-9;

fn sites(coords: &[[f64; 2]]) -> Vec<Site> {
    coords.iter().map(|&c| Site::from(c)).collect()
}

fn run(coords: &[[f64; 2]], mode: BorderEdgeGeneration) -> (Vec<Site>, Vec<Edge>) {
    let mut sites = sites(coords);
    let edges = tessellate_once(&mut sites, 0.0, 0.0, 100.0, 100.0, mode).expect("valid input");
    (sites, edges)
}

fn edge(a: [f64; 2], b: [f64; 2]) -> Edge {
    Edge::new(Point::from(a), Point::from(b), None, None)
}

fn point_counts(sites: &[Site]) -> Vec<usize> {
    sites.iter().map(|s| s.points().len()).collect()
}

fn assert_has_edge(edges: &[Edge], expected: Edge) {
    assert!(
        edges.iter().any(|e| e.start.approx_eq(&expected.start, TOL) && e.end.approx_eq(&expected.end, TOL)
            || e.start.approx_eq(&expected.end, TOL) && e.end.approx_eq(&expected.start, TOL)),
        "missing edge {:?} -> {:?} in {:?}",
        expected.start,
        expected.end,
        edges
    );
}

#[test]
fn test_single_site() {
    let (sites, edges) = run(&[[50.0, 50.0]], NO_BORDER);
    assert!(edges.is_empty());
    assert!(sites[0].points().is_empty());
    assert_eq!(sites[0].lies_on_edge(), None);
    assert_eq!(sites[0].lies_on_corner(), None);
}

#[test]
fn test_single_site_with_border() {
    let (sites, edges) = run(&[[50.0, 50.0]], BORDER);
    assert_eq!(edges.len(), 4);
    assert!(edges.iter().all(Edge::is_border));
    assert_eq!(point_counts(&sites), vec![4]);
    assert_eq!(sites[0].lies_on_edge(), None);
    assert_eq!(sites[0].lies_on_corner(), None);
}

#[test]
fn test_single_site_on_the_boundary() {
    for coords in [[0.0, 40.0], [100.0, 100.0], [30.0, 0.0]] {
        let (sites, edges) = run(&[coords], NO_BORDER);
        assert!(edges.is_empty());
        assert_eq!(sites[0].lies_on_edge(), None);
        assert_eq!(sites[0].lies_on_corner(), None);
    }
}

#[test]
fn test_two_sites() {
    let (sites, edges) = run(&[[25.0, 50.0], [75.0, 50.0]], NO_BORDER);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0], edge([50.0, 0.0], [50.0, 100.0]));
    for site in &sites {
        assert_eq!(site.points().len(), 2);
        assert!(site.points().contains(&edges[0].start));
        assert!(site.points().contains(&edges[0].end));
    }
    assert_eq!(sites[0].neighbours(), &[1]);
    assert_eq!(sites[1].neighbours(), &[0]);
}

#[test]
fn test_two_sites_off_center() {
    let (_, edges) = run(&[[10.0, 20.0], [30.0, 40.0]], NO_BORDER);
    assert_eq!(edges.len(), 1);
    // Bisector x + y = 50.
    assert_has_edge(&edges, edge([0.0, 50.0], [50.0, 0.0]));
}

#[test]
fn test_three_points_in_a_row() {
    let (sites, edges) = run(&[[25.0, 50.0], [50.0, 50.0], [75.0, 50.0]], NO_BORDER);
    assert_eq!(edges.len(), 2);
    assert_has_edge(&edges, edge([37.5, 0.0], [37.5, 100.0]));
    assert_has_edge(&edges, edge([62.5, 0.0], [62.5, 100.0]));
    assert_eq!(point_counts(&sites), vec![2, 4, 2]);
}

#[test]
fn test_four_points_in_a_row() {
    let (sites, edges) = run(&[[20.0, 50.0], [40.0, 50.0], [60.0, 50.0], [80.0, 50.0]], NO_BORDER);
    assert_eq!(edges.len(), 3);
    for x in [30.0, 50.0, 70.0] {
        assert_has_edge(&edges, edge([x, 0.0], [x, 100.0]));
    }
    assert_eq!(point_counts(&sites), vec![2, 4, 4, 2]);
    assert_eq!(sites[1].neighbours(), &[0, 2]);
}

#[test]
fn test_three_points_in_a_column() {
    let (sites, edges) = run(&[[50.0, 25.0], [50.0, 50.0], [50.0, 75.0]], NO_BORDER);
    assert_eq!(edges.len(), 2);
    assert_has_edge(&edges, edge([0.0, 37.5], [100.0, 37.5]));
    assert_has_edge(&edges, edge([0.0, 62.5], [100.0, 62.5]));
    assert_eq!(point_counts(&sites), vec![2, 4, 2]);
}

#[test]
fn test_diagonal_row() {
    let (sites, edges) = run(&[[25.0, 25.0], [50.0, 50.0], [75.0, 75.0]], NO_BORDER);
    assert_eq!(edges.len(), 2);
    assert_has_edge(&edges, edge([0.0, 75.0], [75.0, 0.0]));
    assert_has_edge(&edges, edge([25.0, 100.0], [100.0, 25.0]));
    assert_eq!(point_counts(&sites), vec![2, 4, 2]);
}

#[test]
fn test_square() {
    let (sites, edges) = run(&[[25.0, 25.0], [75.0, 25.0], [25.0, 75.0], [75.0, 75.0]], NO_BORDER);
    assert_eq!(edges.len(), 4);
    let center = Point::new(50.0, 50.0);
    for e in &edges {
        assert!(e.start.approx_eq(&center, TOL) || e.end.approx_eq(&center, TOL));
    }
    assert_has_edge(&edges, edge([50.0, 0.0], [50.0, 50.0]));
    assert_has_edge(&edges, edge([0.0, 50.0], [50.0, 50.0]));
    assert_eq!(point_counts(&sites), vec![3, 3, 3, 3]);
}

#[test]
fn test_square_with_border() {
    let (sites, edges) = run(&[[25.0, 25.0], [75.0, 25.0], [25.0, 75.0], [75.0, 75.0]], BORDER);
    // Four internal edges, the box split at four points.
    assert_eq!(edges.len(), 12);
    assert_eq!(point_counts(&sites), vec![4, 4, 4, 4]);
    for site in &sites {
        assert!((site.area() - 2500.0).abs() < 1e-9);
    }
}

#[test]
fn test_cross() {
    let (sites, edges) = run(
        &[[50.0, 50.0], [50.0, 25.0], [25.0, 50.0], [75.0, 50.0], [50.0, 75.0]],
        NO_BORDER,
    );
    assert_eq!(edges.len(), 8);
    // The center cell is the square [37.5, 62.5]^2.
    for (a, b) in [
        ([37.5, 37.5], [62.5, 37.5]),
        ([62.5, 37.5], [62.5, 62.5]),
        ([62.5, 62.5], [37.5, 62.5]),
        ([37.5, 62.5], [37.5, 37.5]),
    ] {
        assert_has_edge(&edges, edge(a, b));
    }
    // Its corners connect to the box corners.
    assert_has_edge(&edges, edge([0.0, 0.0], [37.5, 37.5]));
    assert_has_edge(&edges, edge([100.0, 100.0], [62.5, 62.5]));
    assert_eq!(point_counts(&sites), vec![4, 4, 4, 4, 4]);
    assert_eq!(sites[0].neighbours(), &[1, 2, 3, 4]);
}

#[test]
fn test_sites_in_opposite_corners() {
    let (sites, edges) = run(&[[0.0, 0.0], [100.0, 100.0]], NO_BORDER);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0], edge([0.0, 100.0], [100.0, 0.0]));
    assert!(edges[0].start.border.is_corner());
    assert!(edges[0].end.border.is_corner());
    assert_eq!(sites[0].lies_on_corner(), None);

    let (sites, edges) = run(&[[0.0, 0.0], [100.0, 100.0]], BORDER);
    assert_eq!(edges.len(), 5);
    assert_eq!(point_counts(&sites), vec![3, 3]);
    assert_eq!(sites[0].lies_on_corner(), Some(Point::new(0.0, 0.0)));
    assert_eq!(sites[1].lies_on_corner(), Some(Point::new(100.0, 100.0)));
    assert_eq!(sites[0].lies_on_edge(), None);
}

#[test]
fn test_site_on_a_side() {
    let (sites, edges) = run(&[[0.0, 50.0], [50.0, 50.0]], BORDER);
    let on = sites[0].lies_on_edge().expect("site on the left side");
    assert!(edges[on].is_border());
    assert_eq!(edges[on].start.x, 0.0);
    assert_eq!(edges[on].end.x, 0.0);
    assert_eq!(sites[0].lies_on_corner(), None);
    assert_eq!(sites[1].lies_on_edge(), None);
    assert_eq!(sites[1].lies_on_corner(), None);
}

#[test]
fn test_edge_orientation_and_borders() {
    let (_, edges) = run(&[[25.0, 50.0], [75.0, 50.0]], BORDER);
    assert_eq!(edges.len(), 7);

    let internal: Vec<&Edge> = edges.iter().filter(|e| !e.is_border()).collect();
    assert_eq!(internal.len(), 1);
    let e = internal[0];
    // Site 0 is on the left of the edge direction.
    let left = if e.left == Some(0) { [25.0, 50.0] } else { [75.0, 50.0] };
    let cross = (e.end.x - e.start.x) * (left[1] - e.start.y) - (e.end.y - e.start.y) * (left[0] - e.start.x);
    assert!(cross > 0.0);

    let bottom: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.is_border() && e.start.y == 0.0 && e.end.y == 0.0)
        .collect();
    assert_eq!(bottom.len(), 2);
    assert_eq!(bottom[0].end, Point::new(50.0, 0.0));
    assert_eq!(bottom[0].end.border, PointBorderLocation::Bottom);
}

#[test]
fn test_row_with_float_noise() {
    // 0.1 + 0.2 is one ulp above 0.3.
    for coords in [
        [[20.0, 0.3], [80.0, 0.3], [50.0, 0.1 + 0.2]],
        [[20.0, 10.0], [80.0, 10.0], [50.0, 10.0 + 5e-10]],
    ] {
        let (sites, edges) = run(&coords, BORDER);
        assert_eq!(edges.iter().filter(|e| !e.is_border()).count(), 2);
        let areas: Vec<f64> = sites.iter().map(Site::area).collect();
        assert_relative_eq!(areas[0], 3500.0, max_relative = 1e-9);
        assert_relative_eq!(areas[1], 3500.0, max_relative = 1e-9);
        assert_relative_eq!(areas[2], 3000.0, max_relative = 1e-9);
        assert_eq!(sites[2].neighbours(), &[0, 1]);
        assert_eq!(sites[0].neighbours(), &[2]);
        assert_eq!(sites[1].neighbours(), &[2]);
    }
}

#[test]
fn test_tiny_box() {
    let s = 1e-7;
    let coords: Vec<[f64; 2]> = [[50.0, 50.0], [50.0, 25.0], [25.0, 50.0], [75.0, 50.0], [50.0, 75.0]]
        .iter()
        .map(|p| [p[0] * s, p[1] * s])
        .collect();
    for mode in [NO_BORDER, BORDER] {
        let mut sites = sites(&coords);
        let edges = tessellate_once(&mut sites, 0.0, 0.0, 100.0 * s, 100.0 * s, mode).expect("valid input");
        assert_eq!(edges.iter().filter(|e| !e.is_border()).count(), 8);
        assert_eq!(sites[0].neighbours(), &[1, 2, 3, 4]);
        assert_eq!(sites[0].points().len(), 4);
        assert_relative_eq!(sites[0].area(), 625.0 * s * s, max_relative = 1e-9);
        if mode == BORDER {
            let total: f64 = sites.iter().map(Site::area).sum();
            assert_relative_eq!(total, 1e-10, max_relative = 1e-9);
            assert_eq!(point_counts(&sites), vec![4; 5]);
        }
    }
}
