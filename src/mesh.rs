// Copyright 2025 Lars Brubaker
// License: MIT
//
// Triangle arena for the sweep.
//
// Design:
//   - Triangles live in a Vec and are addressed by u32 handles (TriIdx).
//     A handle stays valid for the life of the mesh; flips relabel a
//     triangle in place instead of replacing it.
//   - Points are referenced by u32 index into the owning context's point
//     list. Two points with equal coordinates are still distinct vertices.
//   - Slot i of `neighbors`, `constrained` and `delaunay` describes the edge
//     opposite points[i], i.e. the edge (points[i+1], points[i+2]).
//   - Points are stored counter-clockwise.

mod flip;

use crate::error::{Error, Result};

/// Index into Mesh::triangles
pub type TriIdx = u32;
/// Index into the owning context's point list
pub type PointIdx = u32;

#[derive(Clone, Debug)]
pub struct MeshTriangle {
    pub points: [PointIdx; 3],
    pub neighbors: [Option<TriIdx>; 3],
    /// Edge lies on an input constraint.
    pub constrained: [bool; 3],
    /// Edge was proven locally Delaunay during the current legalization.
    pub delaunay: [bool; 3],
    /// Set by the final flood fill for triangles inside the polygon.
    pub interior: bool,
}

impl MeshTriangle {
    pub fn new(a: PointIdx, b: PointIdx, c: PointIdx) -> Self {
        MeshTriangle {
            points: [a, b, c],
            neighbors: [None; 3],
            constrained: [false; 3],
            delaunay: [false; 3],
            interior: false,
        }
    }

    #[inline]
    pub fn contains(&self, p: PointIdx) -> bool {
        self.points.contains(&p)
    }

    #[inline]
    pub fn contains_edge(&self, p: PointIdx, q: PointIdx) -> bool {
        self.contains(p) && self.contains(q)
    }

    #[inline]
    pub fn index(&self, p: PointIdx) -> Option<usize> {
        self.points.iter().position(|&v| v == p)
    }

    /// Slot of `p`. Callers pass a vertex of this triangle; anything else
    /// maps to slot 2.
    #[inline]
    fn slot(&self, p: PointIdx) -> usize {
        if p == self.points[0] {
            0
        } else if p == self.points[1] {
            1
        } else {
            2
        }
    }

    /// Slot of the edge clockwise of `p` (the edge from `p` to point_ccw(p)).
    #[inline]
    pub fn cw_slot(&self, p: PointIdx) -> usize {
        (self.slot(p) + 1) % 3
    }

    /// Slot of the edge counter-clockwise of `p`.
    #[inline]
    pub fn ccw_slot(&self, p: PointIdx) -> usize {
        (self.slot(p) + 2) % 3
    }

    /// Slot of the edge across from `p`.
    #[inline]
    pub fn across_slot(&self, p: PointIdx) -> usize {
        self.slot(p)
    }

    #[inline]
    pub fn point_cw(&self, p: PointIdx) -> PointIdx {
        self.points[(self.slot(p) + 2) % 3]
    }

    #[inline]
    pub fn point_ccw(&self, p: PointIdx) -> PointIdx {
        self.points[(self.slot(p) + 1) % 3]
    }

    #[inline]
    pub fn neighbor_cw(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.cw_slot(p)]
    }

    #[inline]
    pub fn neighbor_ccw(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.ccw_slot(p)]
    }

    #[inline]
    pub fn neighbor_across(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.across_slot(p)]
    }

    #[inline]
    pub fn constrained_cw(&self, p: PointIdx) -> bool {
        self.constrained[self.cw_slot(p)]
    }

    #[inline]
    pub fn constrained_ccw(&self, p: PointIdx) -> bool {
        self.constrained[self.ccw_slot(p)]
    }

    #[inline]
    pub fn constrained_across(&self, p: PointIdx) -> bool {
        self.constrained[self.across_slot(p)]
    }

    /// Slot of the edge joining p1 and p2, in either order.
    pub fn edge_index(&self, p1: PointIdx, p2: PointIdx) -> Option<usize> {
        let [a, b, c] = self.points;
        let has = |x: PointIdx, y: PointIdx| (p1 == x && p2 == y) || (p1 == y && p2 == x);
        if has(a, b) {
            Some(2)
        } else if has(a, c) {
            Some(1)
        } else if has(b, c) {
            Some(0)
        } else {
            None
        }
    }

    pub fn mark_constrained_edge(&mut self, p: PointIdx, q: PointIdx) {
        if let Some(i) = self.edge_index(p, q) {
            self.constrained[i] = true;
        }
    }

    #[inline]
    pub fn clear_neighbors(&mut self) {
        self.neighbors = [None; 3];
    }

    #[inline]
    pub fn clear_delaunay(&mut self) {
        self.delaunay = [false; 3];
    }

    /// Relabel for one step of an edge flip: `npoint` takes the place
    /// opposite `opoint` while the triangle stays CCW.
    pub fn legalize(&mut self, opoint: PointIdx, npoint: PointIdx) {
        let [a, b, c] = self.points;
        if opoint == a {
            self.points = [c, a, npoint];
        } else if opoint == b {
            self.points = [npoint, a, b];
        } else if opoint == c {
            self.points = [c, npoint, b];
        }
    }
}

/// The triangle arena.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub triangles: Vec<MeshTriangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh { triangles: Vec::new() }
    }

    pub fn add(&mut self, a: PointIdx, b: PointIdx, c: PointIdx) -> TriIdx {
        let idx = self.triangles.len() as TriIdx;
        self.triangles.push(MeshTriangle::new(a, b, c));
        idx
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn tri(&self, t: TriIdx) -> &MeshTriangle {
        &self.triangles[t as usize]
    }

    #[inline]
    pub fn tri_mut(&mut self, t: TriIdx) -> &mut MeshTriangle {
        &mut self.triangles[t as usize]
    }

    /// Link `t` and `ot` through the edge they share. Fails if they share
    /// no edge.
    pub fn mark_neighbor(&mut self, t: TriIdx, ot: TriIdx) -> Result<()> {
        let pts = self.tri(t).points;
        for i in 0..3 {
            let p1 = pts[(i + 1) % 3];
            let p2 = pts[(i + 2) % 3];
            if let Some(j) = self.tri(ot).edge_index(p1, p2) {
                self.tri_mut(t).neighbors[i] = Some(ot);
                self.tri_mut(ot).neighbors[j] = Some(t);
                return Ok(());
            }
        }
        Err(Error::NotContiguous(t, ot))
    }

    /// The vertex of `ot` opposite the edge it shares with `t` across `p`.
    #[inline]
    pub fn opposite_point(&self, ot: TriIdx, t: TriIdx, p: PointIdx) -> PointIdx {
        let cw = self.tri(t).point_cw(p);
        self.tri(ot).point_cw(cw)
    }

    /// If (p, q) is a side of `t`, flag it constrained on both triangles
    /// that share it and return true.
    pub fn mark_constrained_side(&mut self, t: TriIdx, p: PointIdx, q: PointIdx) -> bool {
        let Some(i) = self.tri(t).edge_index(p, q) else {
            return false;
        };
        self.tri_mut(t).constrained[i] = true;
        if let Some(n) = self.tri(t).neighbors[i] {
            self.tri_mut(n).mark_constrained_edge(p, q);
        }
        true
    }
}
