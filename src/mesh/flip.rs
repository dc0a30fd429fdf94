// Copyright 2025 Lars Brubaker
// Edge flip for Mesh.

use super::{Mesh, PointIdx, TriIdx};
use crate::error::Result;

impl Mesh {
    /// Rotate the edge shared by `t` and `ot` one vertex clockwise.
    ///
    /// `p` is the vertex of `t` and `op` the vertex of `ot` opposite the
    /// shared edge. Afterwards the shared edge runs p-op. Both triangles
    /// keep their handles; their outer neighbors and edge flags are
    /// carried over to the new slots.
    ///
    /// ```text
    ///       n2                    n2
    ///  P +-----+             P +-----+
    ///    | t  /|               |\  t |
    ///    |   / |               | \   |
    ///  n1|  /  |n3           n1|  \  |n3
    ///    | /   |               |   \ |
    ///    |/ oT |               | oT \|
    ///    +-----+ oP            +-----+
    ///       n4                    n4
    /// ```
    pub fn rotate_pair(&mut self, t: TriIdx, p: PointIdx, ot: TriIdx, op: PointIdx) -> Result<()> {
        let (n1, ce1, de1, n2, ce2, de2) = {
            let tt = self.tri(t);
            let (ccw, cw) = (tt.ccw_slot(p), tt.cw_slot(p));
            (
                tt.neighbors[ccw],
                tt.constrained[ccw],
                tt.delaunay[ccw],
                tt.neighbors[cw],
                tt.constrained[cw],
                tt.delaunay[cw],
            )
        };
        let (n3, ce3, de3, n4, ce4, de4) = {
            let ott = self.tri(ot);
            let (ccw, cw) = (ott.ccw_slot(op), ott.cw_slot(op));
            (
                ott.neighbors[ccw],
                ott.constrained[ccw],
                ott.delaunay[ccw],
                ott.neighbors[cw],
                ott.constrained[cw],
                ott.delaunay[cw],
            )
        };

        self.tri_mut(t).legalize(p, op);
        self.tri_mut(ot).legalize(op, p);

        let o = self.tri_mut(ot);
        let s = o.ccw_slot(p);
        o.delaunay[s] = de1;
        o.constrained[s] = ce1;
        let s = o.cw_slot(op);
        o.delaunay[s] = de4;
        o.constrained[s] = ce4;
        o.clear_neighbors();

        let tt = self.tri_mut(t);
        let s = tt.cw_slot(p);
        tt.delaunay[s] = de2;
        tt.constrained[s] = ce2;
        let s = tt.ccw_slot(op);
        tt.delaunay[s] = de3;
        tt.constrained[s] = ce3;
        tt.clear_neighbors();

        if let Some(n) = n1 {
            self.mark_neighbor(ot, n)?;
        }
        if let Some(n) = n2 {
            self.mark_neighbor(t, n)?;
        }
        if let Some(n) = n3 {
            self.mark_neighbor(t, n)?;
        }
        if let Some(n) = n4 {
            self.mark_neighbor(ot, n)?;
        }
        self.mark_neighbor(t, ot)
    }
}
