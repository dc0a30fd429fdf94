// Copyright 2025 Lars Brubaker
// License: MIT
//
// Navigation graph over a finished triangulation.
//
// Each interior triangle becomes one node placed at its centroid. Two nodes
// are linked when their triangles share an edge that is not constrained;
// polygon and hole edges are walls and never become graph edges.

pub mod astar;
pub mod funnel;

use log::debug;

use crate::cdt::Triangulation;
use crate::config::PathfindingConfig;
use crate::error::{Error, Result};
use crate::geom::{centroid, point_in_triangle, Point};

pub use astar::AStar;

/// One walkable triangle.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialNode {
    pub centroid: Point,
    /// Index of the triangle in the source triangulation.
    pub triangle: u32,
    /// Point indices, counter-clockwise.
    pub vertices: [u32; 3],
    /// Nodes reachable across an unconstrained edge.
    pub neighbors: Vec<u32>,
}

impl SpatialNode {
    #[inline]
    fn slot(&self, p: u32) -> Option<usize> {
        self.vertices.iter().position(|&v| v == p)
    }

    #[inline]
    pub fn contains_vertex(&self, p: u32) -> bool {
        self.slot(p).is_some()
    }

    /// Vertex clockwise from `p`.
    #[inline]
    pub fn point_cw(&self, p: u32) -> Option<u32> {
        self.slot(p).map(|i| self.vertices[(i + 2) % 3])
    }

    /// Vertex counter-clockwise from `p`.
    #[inline]
    pub fn point_ccw(&self, p: u32) -> Option<u32> {
        self.slot(p).map(|i| self.vertices[(i + 1) % 3])
    }
}

/// Walkable triangles and their adjacency. Node `i` is triangle `i`.
#[derive(Clone, Debug)]
pub struct NavGraph {
    points: Vec<Point>,
    nodes: Vec<SpatialNode>,
}

impl NavGraph {
    /// Build every node in one pass over the triangles. Finalization leaves
    /// the interior as a single connected region, so this is the same graph
    /// a lazy walk from any triangle would discover.
    pub fn build(mesh: &Triangulation) -> Self {
        let points = mesh.points().to_vec();
        let nodes: Vec<SpatialNode> = mesh
            .triangles()
            .iter()
            .enumerate()
            .map(|(i, tri)| {
                let [a, b, c] = tri.vertices;
                let neighbors = (0..3)
                    .filter(|&s| !tri.constrained[s])
                    .filter_map(|s| tri.neighbors[s])
                    .collect();
                SpatialNode {
                    centroid: centroid(
                        &points[a as usize],
                        &points[b as usize],
                        &points[c as usize],
                    ),
                    triangle: i as u32,
                    vertices: tri.vertices,
                    neighbors,
                }
            })
            .collect();

        let links: usize = nodes.iter().map(|n| n.neighbors.len()).sum();
        debug!(
            "[NavGraph] built {} nodes, {} links",
            nodes.len(),
            links / 2
        );
        NavGraph { points, nodes }
    }

    #[inline]
    pub fn nodes(&self) -> &[SpatialNode] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, i: u32) -> &SpatialNode {
        &self.nodes[i as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn point(&self, i: u32) -> Point {
        self.points[i as usize]
    }

    /// Whether `p` lies inside (or on the border of) node `i`'s triangle.
    pub fn contains(&self, i: u32, p: &Point) -> bool {
        let [a, b, c] = self.node(i).vertices.map(|v| self.point(v));
        point_in_triangle(&a, &b, &c, p)
    }

    /// The node whose triangle contains `p`.
    pub fn locate(&self, p: Point) -> Result<u32> {
        (0..self.nodes.len() as u32)
            .find(|&i| self.contains(i, &p))
            .ok_or(Error::PointOutsideMesh { x: p.x, y: p.y })
    }

    /// Shortest smoothed path from `start` to `end`, both inclusive.
    ///
    /// ```
    /// use poly2tri_nav::{NavGraph, PathfindingConfig, Point, Triangulator};
    ///
    /// let room = [
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 0.0),
    ///     Point::new(10.0, 10.0),
    ///     Point::new(0.0, 10.0),
    /// ];
    /// let mesh = Triangulator::new(&room).triangulate().unwrap();
    /// let graph = NavGraph::build(&mesh);
    /// let path = graph
    ///     .find_path(
    ///         Point::new(1.0, 1.0),
    ///         Point::new(9.0, 9.0),
    ///         &PathfindingConfig::default(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(path, vec![Point::new(1.0, 1.0), Point::new(9.0, 9.0)]);
    /// ```
    pub fn find_path(&self, start: Point, end: Point, cfg: &PathfindingConfig) -> Result<Vec<Point>> {
        let from = self.locate(start)?;
        let to = self.locate(end)?;
        if from == to {
            return Ok(vec![start, end]);
        }
        let corridor = AStar::new(self, cfg.astar.clone()).find(from, to)?;
        funnel::string_pull(self, start, end, &corridor, &cfg.funnel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdt::Triangulator;

    fn square_with_hole() -> Triangulation {
        let outer = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let hole = [
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 1.0),
        ];
        let mut t = Triangulator::new(&outer);
        t.add_hole(&hole);
        t.triangulate().unwrap()
    }

    #[test]
    fn one_node_per_triangle() {
        let mesh = square_with_hole();
        let graph = NavGraph::build(&mesh);
        assert_eq!(graph.len(), mesh.len());
        for (i, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.triangle, i as u32);
            let [a, b, c] = mesh.triangle_points(i);
            let expect = centroid(&a, &b, &c);
            assert!(node.centroid.distance(&expect) < 1e-5);
        }
    }

    #[test]
    fn walls_are_not_links() {
        let mesh = square_with_hole();
        let graph = NavGraph::build(&mesh);
        for (i, node) in graph.nodes().iter().enumerate() {
            let tri = &mesh.triangles()[i];
            for &n in &node.neighbors {
                let slot = tri.shared_edge(n).unwrap();
                assert!(!tri.constrained[slot]);
                // Links are symmetric.
                assert!(graph.node(n).neighbors.contains(&(i as u32)));
            }
        }
    }

    #[test]
    fn locate_finds_containing_triangle() {
        let graph = NavGraph::build(&square_with_hole());
        let p = Point::new(0.5, 2.0);
        let i = graph.locate(p).unwrap();
        assert!(graph.contains(i, &p));
    }

    #[test]
    fn locate_inside_hole_fails() {
        let graph = NavGraph::build(&square_with_hole());
        let err = graph.locate(Point::new(2.0, 2.0)).unwrap_err();
        assert!(matches!(err, Error::PointOutsideMesh { .. }));
        assert!(err.kind().is_recoverable());
    }

    #[test]
    fn cw_and_ccw_neighbors_of_a_vertex() {
        let node = SpatialNode {
            centroid: Point::new(0.0, 0.0),
            triangle: 0,
            vertices: [4, 7, 9],
            neighbors: Vec::new(),
        };
        assert_eq!(node.point_ccw(4), Some(7));
        assert_eq!(node.point_cw(4), Some(9));
        assert_eq!(node.point_cw(7), Some(4));
        assert_eq!(node.point_ccw(9), Some(4));
        assert_eq!(node.point_cw(5), None);
    }

    #[test]
    fn path_around_hole_stays_in_corridor() {
        let graph = NavGraph::build(&square_with_hole());
        let start = Point::new(0.5, 0.5);
        let end = Point::new(3.5, 3.5);
        let path = graph
            .find_path(start, end, &PathfindingConfig::default())
            .unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        // The straight line crosses the hole, so the path must bend at a
        // hole corner.
        assert!(path.len() >= 3, "{:?}", path);
        for p in &path[1..path.len() - 1] {
            let corner = [(1.0, 3.0), (3.0, 1.0)]
                .iter()
                .any(|&(x, y)| p.distance(&Point::new(x, y)) < 1e-4);
            assert!(corner, "unexpected bend {:?}", p);
        }
    }
}
