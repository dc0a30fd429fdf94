// Copyright 2025 Lars Brubaker
// Shared test utilities for poly2tri-nav tests.

#![allow(dead_code)]

use poly2tri_nav::geom::{orient2d, ring_area, Orientation};
use poly2tri_nav::{Point, Triangulation};

pub fn pts(coords: &[(f32, f32)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    pts(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Regular polygon with `n` corners, rotated so no two corners share a y.
pub fn regular_polygon(n: usize, radius: f32, cx: f32, cy: f32) -> Vec<Point> {
    let step = std::f32::consts::TAU / n as f32;
    (0..n)
        .map(|i| {
            let a = 0.1 + i as f32 * step;
            Point::new(cx + radius * a.cos(), cy + radius * a.sin())
        })
        .collect()
}

/// Star with alternating outer and inner radius.
pub fn star(points: usize, outer: f32, inner: f32) -> Vec<Point> {
    let step = std::f32::consts::PI / points as f32;
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = 0.05 + i as f32 * step;
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

/// Expected area: |contour| minus each |hole|.
pub fn polygon_area(contour: &[Point], holes: &[Vec<Point>]) -> f32 {
    ring_area(contour).abs() - holes.iter().map(|h| ring_area(h).abs()).sum::<f32>()
}

pub fn assert_area(mesh: &Triangulation, expected: f32) {
    let got = mesh.area();
    let tol = 1e-3 * expected.abs().max(1.0);
    assert!(
        (got - expected).abs() < tol,
        "area {} != expected {}",
        got,
        expected
    );
}

/// Euler count for a triangulated polygon with `holes` holes and no
/// Steiner points: n + 2h - 2 triangles.
pub fn expected_triangles(vertices: usize, holes: usize) -> usize {
    vertices + 2 * holes - 2
}

/// Winding, neighbor symmetry and constraint agreement across every edge.
pub fn assert_mesh_invariants(mesh: &Triangulation) {
    let pts = mesh.points();
    for (i, tri) in mesh.triangles().iter().enumerate() {
        let [a, b, c] = tri.vertices.map(|v| pts[v as usize]);
        assert_eq!(
            orient2d(&a, &b, &c),
            Orientation::Ccw,
            "triangle {} is not counter-clockwise",
            i
        );
        for s in 0..3 {
            let Some(n) = tri.neighbors[s] else {
                assert!(
                    tri.constrained[s],
                    "triangle {} has an open edge that is not constrained",
                    i
                );
                continue;
            };
            let other = &mesh.triangles()[n as usize];
            let back = other
                .shared_edge(i as u32)
                .unwrap_or_else(|| panic!("triangle {} -> {} is one-way", i, n));
            assert_eq!(tri.constrained[s], other.constrained[back]);
            // The shared edge has the same two endpoints on both sides.
            let e1 = [tri.vertices[(s + 1) % 3], tri.vertices[(s + 2) % 3]];
            let e2 = [other.vertices[(back + 1) % 3], other.vertices[(back + 2) % 3]];
            assert_eq!(e1, [e2[1], e2[0]]);
        }
    }
}

/// Every input ring edge is an edge of the mesh and flagged constrained.
pub fn assert_constraints_present(mesh: &Triangulation, ring_sizes: &[usize]) {
    let mut start = 0u32;
    for &n in ring_sizes {
        for k in 0..n as u32 {
            let a = start + k;
            let b = start + (k + 1) % n as u32;
            let found = mesh.triangles().iter().any(|t| {
                (0..3).any(|s| {
                    let e = [t.vertices[(s + 1) % 3], t.vertices[(s + 2) % 3]];
                    (e == [a, b] || e == [b, a]) && t.constrained[s]
                })
            });
            assert!(found, "constraint edge {}-{} missing", a, b);
        }
        start += n as u32;
    }
}

/// No vertex sits strictly inside the circumcircle of a triangle across an
/// unconstrained edge.
pub fn assert_locally_delaunay(mesh: &Triangulation) {
    let pts = mesh.points();
    for (i, tri) in mesh.triangles().iter().enumerate() {
        let [a, b, c] = tri.vertices.map(|v| pts[v as usize]);
        for s in 0..3 {
            if tri.constrained[s] {
                continue;
            }
            let Some(n) = tri.neighbors[s] else { continue };
            let other = &mesh.triangles()[n as usize];
            let Some(back) = other.shared_edge(i as u32) else { continue };
            let d = pts[other.vertices[back] as usize];
            // Cocircular points are fine.
            let cc = circumcenter(&a, &b, &c);
            let r = cc.distance_sq(&a);
            assert!(
                cc.distance_sq(&d) > r * (1.0 - 1e-3),
                "triangle {} is not Delaunay against {}",
                i,
                n
            );
        }
    }
}

fn circumcenter(a: &Point, b: &Point, c: &Point) -> Point {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    )
}

/// Every vertex index is an input point.
pub fn assert_vertices_in_range(mesh: &Triangulation) {
    let n = mesh.points().len() as u32;
    for tri in mesh.triangles() {
        assert!(tri.vertices.iter().all(|&v| v < n));
    }
}
