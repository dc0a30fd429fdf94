// Copyright 2025 Lars Brubaker
// Navigation graph, A* corridors and funnel smoothing on real meshes.

mod helpers;

use helpers::*;
use poly2tri_nav::{
    AStar, Error, ErrorKind, NavConfig, NavGraph, PathfindingConfig, Point, Triangulator,
};

/// Two rooms joined by a doorway between y = 4 and y = 6.
fn two_rooms() -> Vec<Point> {
    pts(&[
        (0.0, 0.0),
        (9.0, 0.2),
        (9.1, 4.0),
        (11.0, 4.1),
        (10.9, 0.3),
        (20.0, 0.1),
        (20.2, 10.0),
        (11.1, 9.9),
        (10.95, 6.0),
        (9.05, 6.1),
        (8.9, 10.1),
        (0.1, 9.8),
    ])
}

fn graph_for(contour: &[Point], holes: &[Vec<Point>]) -> NavGraph {
    let mut t = Triangulator::new(contour);
    t.add_holes(holes);
    NavGraph::build(&t.triangulate().unwrap())
}

fn near(a: Point, b: Point) -> bool {
    a.distance(&b) < 1e-4
}

fn path_length(path: &[Point]) -> f32 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[test]
fn path_through_doorway_bends_at_door_corners() {
    let graph = graph_for(&two_rooms(), &[]);
    let (start, goal) = (Point::new(2.0, 9.0), Point::new(18.0, 9.0));
    let path = graph
        .find_path(start, goal, &PathfindingConfig::default())
        .unwrap();
    assert_eq!(path.len(), 4, "{:?}", path);
    assert_eq!(path[0], start);
    assert!(near(path[1], Point::new(9.05, 6.1)), "{:?}", path);
    assert!(near(path[2], Point::new(10.95, 6.0)), "{:?}", path);
    assert_eq!(path[3], goal);
}

#[test]
fn straight_shot_through_doorway() {
    let graph = graph_for(&two_rooms(), &[]);
    let (start, goal) = (Point::new(2.0, 2.0), Point::new(18.0, 8.0));
    let path = graph
        .find_path(start, goal, &PathfindingConfig::default())
        .unwrap();
    assert_eq!(path, vec![start, goal]);
}

#[test]
fn path_is_no_longer_than_corridor_centroids() {
    let graph = graph_for(&two_rooms(), &[]);
    let (start, goal) = (Point::new(1.0, 1.0), Point::new(19.0, 1.0));
    let from = graph.locate(start).unwrap();
    let to = graph.locate(goal).unwrap();
    let corridor = AStar::with_defaults(&graph).find(from, to).unwrap();

    let mut through: Vec<Point> = vec![goal];
    through.extend(corridor.iter().map(|&n| graph.node(n).centroid));
    through.push(start);

    let path = graph
        .find_path(start, goal, &PathfindingConfig::default())
        .unwrap();
    assert!(path.len() <= corridor.len() + 1, "{:?}", path);
    assert!(path_length(&path) <= path_length(&through) + 1e-3);
    assert!(path_length(&path) >= start.distance(&goal) - 1e-3);
}

/// A 20 x 10 hall with four slightly skewed blocks.
fn hall_with_blocks() -> (Vec<Point>, Vec<Vec<Point>>) {
    let hall = rect(0.0, 0.0, 20.0, 10.0);
    let blocks = vec![
        pts(&[(2.0, 2.0), (5.1, 2.1), (4.9, 4.05), (2.1, 3.9)]),
        pts(&[(7.0, 5.5), (9.9, 5.4), (10.1, 8.0), (6.9, 8.1)]),
        pts(&[(12.0, 1.5), (15.2, 1.6), (15.0, 3.5), (12.1, 3.4)]),
        pts(&[(14.5, 6.0), (17.9, 6.2), (18.1, 8.5), (14.4, 8.4)]),
    ];
    (hall, blocks)
}

#[test]
fn every_path_in_a_blocked_hall_is_short() {
    let (hall, blocks) = hall_with_blocks();
    let graph = graph_for(&hall, &blocks);
    let config = PathfindingConfig::default();

    let samples: Vec<(Point, u32)> = (0..16)
        .flat_map(|i| (0..8).map(move |j| (i as f32, j as f32)))
        .map(|(i, j)| Point::new(0.35 + 1.3 * i, 0.35 + 1.3 * j))
        .filter_map(|p| graph.locate(p).ok().map(|n| (p, n)))
        .collect();
    assert!(samples.len() > 80, "{} samples", samples.len());

    let mut checked = 0;
    for (a, &(start, from)) in samples.iter().enumerate() {
        for &(goal, to) in &samples[a + 1..] {
            let corridor = AStar::with_defaults(&graph).find(from, to).unwrap();
            let path = graph.find_path(start, goal, &config).unwrap();

            assert!(
                path.len() <= corridor.len() + 1,
                "{:?} -> {:?}: {} points for {} triangles",
                start,
                goal,
                path.len(),
                corridor.len()
            );
            assert_eq!(path[0], start);
            assert_eq!(path[path.len() - 1], goal);

            let mut through: Vec<Point> = vec![goal];
            through.extend(corridor.iter().map(|&n| graph.node(n).centroid));
            through.push(start);
            assert!(
                path_length(&path) <= path_length(&through) + 1e-3,
                "{:?} -> {:?}: {:?}",
                start,
                goal,
                path
            );
            checked += 1;
        }
    }
    assert!(checked > 3000);
}

#[test]
fn pillar_forces_a_detour() {
    let room = rect(0.0, 0.0, 10.0, 6.0);
    let pillar = pts(&[(4.0, 2.1), (6.1, 1.9), (5.9, 4.0), (4.1, 3.9)]);
    let graph = graph_for(&room, &[pillar.clone()]);
    let (start, goal) = (Point::new(1.0, 3.0), Point::new(9.0, 3.05));
    let path = graph
        .find_path(start, goal, &PathfindingConfig::default())
        .unwrap();
    assert!(path.len() >= 3, "{:?}", path);
    for p in &path[1..path.len() - 1] {
        assert!(pillar.iter().any(|&c| near(*p, c)), "bend {:?} off pillar", p);
    }
}

#[test]
fn same_triangle_is_a_single_segment() {
    let graph = graph_for(&two_rooms(), &[]);
    let start = Point::new(3.0, 5.0);
    let node = graph.locate(start).unwrap();
    let goal = graph.node(node).centroid;
    let path = graph
        .find_path(start, goal, &PathfindingConfig::default())
        .unwrap();
    assert_eq!(path, vec![start, goal]);
}

#[test]
fn point_outside_mesh_is_a_lookup_error() {
    let graph = graph_for(&two_rooms(), &[]);
    let err = graph
        .find_path(
            Point::new(2.0, 2.0),
            Point::new(10.0, 2.0),
            &PathfindingConfig::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::PointOutsideMesh { .. }));
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.kind().is_recoverable());
}

#[test]
fn truncated_cost_from_toml() {
    let cfg = NavConfig::from_toml_str(
        r#"
        [pathfinding.astar]
        cost = "truncated"
        max_iterations = 500
        "#,
    )
    .unwrap();
    let graph = graph_for(&two_rooms(), &[]);
    let (start, goal) = (Point::new(2.0, 9.0), Point::new(18.0, 9.0));
    let path = graph.find_path(start, goal, &cfg.pathfinding).unwrap();
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert!(path.len() >= 4);
}

#[test]
fn iteration_limit_is_a_search_error() {
    let mut cfg = PathfindingConfig::default();
    cfg.astar.max_iterations = 0;
    let graph = graph_for(&two_rooms(), &[]);
    let err = graph
        .find_path(Point::new(1.0, 1.0), Point::new(19.0, 9.0), &cfg)
        .unwrap_err();
    assert!(matches!(err, Error::SearchLimitExceeded(0)));
    assert_eq!(err.kind(), ErrorKind::Search);
}

#[test]
fn walls_never_become_links() {
    let graph = graph_for(&two_rooms(), &[]);
    let left = graph.locate(Point::new(8.5, 1.0)).unwrap();
    let right = graph.locate(Point::new(11.5, 1.0)).unwrap();
    assert!(!graph.node(left).neighbors.contains(&right));
    // Every link crosses an edge shared by two triangles.
    for (i, node) in graph.nodes().iter().enumerate() {
        for &n in &node.neighbors {
            let shared = node
                .vertices
                .iter()
                .filter(|v| graph.node(n).vertices.contains(v))
                .count();
            assert_eq!(shared, 2, "link {} -> {}", i, n);
        }
    }
}
