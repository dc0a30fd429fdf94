// Copyright 2025 Lars Brubaker
// Finalization and the triangulation result.

use std::collections::VecDeque;

use log::debug;

use super::SweepContext;
use crate::error::{Error, Result};
use crate::geom::{signed_area, Point, Real};
use crate::mesh::TriIdx;

/// One output triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    /// Point indices, counter-clockwise.
    pub vertices: [u32; 3],
    /// Slot i is the triangle across from vertices[i]; `None` on the
    /// polygon boundary.
    pub neighbors: [Option<u32>; 3],
    /// Slot i is true when the edge across from vertices[i] is a polygon
    /// or hole edge.
    pub constrained: [bool; 3],
}

impl Triangle {
    /// The slot of the edge shared with triangle `other`, if any.
    pub fn shared_edge(&self, other: u32) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == Some(other))
    }
}

/// The interior triangles of a polygon with holes.
#[derive(Clone, Debug)]
pub struct Triangulation {
    points: Vec<Point>,
    triangles: Vec<Triangle>,
    bounds: (Point, Point),
}

impl Triangulation {
    /// Input points in insertion order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_points(&self, i: usize) -> [Point; 3] {
        let [a, b, c] = self.triangles[i].vertices;
        [
            self.points[a as usize],
            self.points[b as usize],
            self.points[c as usize],
        ]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Total area covered by the triangles.
    pub fn area(&self) -> Real {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle_points(i);
                signed_area(&a, &b, &c)
            })
            .sum()
    }

    /// Axis-aligned bounding box of the input points, as (min, max).
    #[inline]
    pub fn bounds(&self) -> (Point, Point) {
        self.bounds
    }
}

impl SweepContext {
    pub(super) fn finalize(mut self) -> Result<Triangulation> {
        let first = self.next_node(self.front.head())?;
        let p = self.node_point(first);
        let mut t = self.node_tri(first)?;
        while !self.mesh.tri(t).constrained_cw(p) {
            self.tick()?;
            t = self
                .mesh
                .tri(t)
                .neighbor_ccw(p)
                .ok_or_else(|| self.missing_neighbor(t, p))?;
        }
        let interior = self.mesh_clean(t)?;
        debug!(
            "[Sweep] finalized {} interior triangles of {}",
            interior.len(),
            self.mesh.len()
        );

        let mut remap: Vec<Option<u32>> = vec![None; self.mesh.len()];
        for (out, &t) in interior.iter().enumerate() {
            remap[t as usize] = Some(out as u32);
        }
        let triangles = interior
            .iter()
            .map(|&t| {
                let tri = self.mesh.tri(t);
                Triangle {
                    vertices: tri.points,
                    neighbors: tri.neighbors.map(|n| n.and_then(|n| remap[n as usize])),
                    constrained: tri.constrained,
                }
            })
            .collect();

        self.points.truncate(self.input_len);
        Ok(Triangulation {
            points: self.points,
            triangles,
            bounds: self.bounds,
        })
    }

    /// Flood from `start` across unconstrained edges and collect what it
    /// reaches.
    fn mesh_clean(&mut self, start: TriIdx) -> Result<Vec<TriIdx>> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(t) = queue.pop_front() {
            let tri = self.mesh.tri(t);
            if tri.interior {
                continue;
            }
            if tri.points.iter().any(|&v| v as usize >= self.input_len) {
                return Err(Error::Topology(format!(
                    "interior region leaks to the bounding triangle at {}",
                    t
                )));
            }
            self.mesh.tri_mut(t).interior = true;
            out.push(t);
            let tri = self.mesh.tri(t);
            for i in 0..3 {
                if tri.constrained[i] {
                    continue;
                }
                if let Some(n) = tri.neighbors[i] {
                    queue.push_back(n);
                }
            }
        }
        Ok(out)
    }
}
