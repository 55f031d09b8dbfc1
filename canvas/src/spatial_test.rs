use super::*;

fn brute_force(points: &[Point], center: Point, radius: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            dx * dx + dy * dy <= radius * radius
        })
        .map(|(i, _)| i)
        .collect()
}

fn grid_points(cols: usize, rows: usize, spacing: f64) -> Vec<Point> {
    let mut points = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            #[allow(clippy::cast_precision_loss)]
            points.push(Point::new(c as f64 * spacing, r as f64 * spacing));
        }
    }
    points
}

fn query_sorted(tree: &mut QuadTree, center: Point, radius: f64) -> Vec<usize> {
    let mut out = Vec::new();
    tree.query_radius(center, radius, &mut out);
    out.sort_unstable();
    out
}

#[test]
fn empty_tree_has_no_cells() {
    let mut tree = QuadTree::build(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.cell_count(), 0);
    assert!(query_sorted(&mut tree, Point::new(0.0, 0.0), 100.0).is_empty());
}

#[test]
fn single_point_is_found() {
    let mut tree = QuadTree::build(&[Point::new(5.0, 5.0)]);
    assert_eq!(tree.len(), 1);
    assert_eq!(query_sorted(&mut tree, Point::new(0.0, 0.0), 10.0), vec![0]);
    assert!(query_sorted(&mut tree, Point::new(100.0, 100.0), 10.0).is_empty());
}

#[test]
fn large_input_subdivides() {
    let points = grid_points(20, 20, 10.0);
    let tree = QuadTree::build(&points);
    assert!(tree.cell_count() > 1);
}

#[test]
fn query_matches_brute_force() {
    let points = grid_points(25, 17, 13.0);
    let mut tree = QuadTree::build(&points);
    for (center, radius) in [
        (Point::new(0.0, 0.0), 30.0),
        (Point::new(150.0, 100.0), 45.5),
        (Point::new(-20.0, 80.0), 60.0),
        (Point::new(320.0, 210.0), 1.0),
        (Point::new(160.0, 110.0), 1000.0),
    ] {
        assert_eq!(query_sorted(&mut tree, center, radius), brute_force(&points, center, radius));
    }
}

#[test]
fn radius_boundary_is_inclusive() {
    let mut tree = QuadTree::build(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    assert_eq!(query_sorted(&mut tree, Point::new(0.0, 0.0), 10.0), vec![0, 1]);
}

#[test]
fn coincident_points_stop_at_max_depth() {
    let points = vec![Point::new(3.0, 3.0); 64];
    let mut tree = QuadTree::build(&points);
    assert!(tree.cell_count() <= QUADTREE_MAX_DEPTH + 1);
    assert_eq!(query_sorted(&mut tree, Point::new(3.0, 3.0), 0.0).len(), 64);
}

#[test]
fn negative_or_nan_radius_finds_nothing() {
    let mut tree = QuadTree::build(&[Point::new(0.0, 0.0)]);
    assert!(query_sorted(&mut tree, Point::new(0.0, 0.0), -1.0).is_empty());
    assert!(query_sorted(&mut tree, Point::new(0.0, 0.0), f64::NAN).is_empty());
}

#[test]
fn rebuild_replaces_previous_points() {
    let mut tree = QuadTree::build(&grid_points(10, 10, 5.0));
    tree.rebuild([Point::new(1000.0, 1000.0)]);
    assert_eq!(tree.len(), 1);
    assert!(query_sorted(&mut tree, Point::new(0.0, 0.0), 50.0).is_empty());
    assert_eq!(query_sorted(&mut tree, Point::new(1000.0, 1000.0), 1.0), vec![0]);
}

#[test]
fn query_order_is_reproducible() {
    let points = grid_points(12, 12, 7.0);
    let mut a = QuadTree::build(&points);
    let mut b = QuadTree::build(&points);
    let mut out_a = Vec::new();
    let mut out_b = Vec::new();
    a.query_radius(Point::new(40.0, 40.0), 25.0, &mut out_a);
    b.query_radius(Point::new(40.0, 40.0), 25.0, &mut out_b);
    assert_eq!(out_a, out_b);
}
