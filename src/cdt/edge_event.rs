// Copyright 2025 Lars Brubaker
// Constraint insertion for SweepContext.
//
// An edge event first fills the front below the new constraint, then walks
// the triangles around its upper endpoint and flips every triangle the
// constraint still crosses until the edge exists in the mesh.

use log::trace;

use super::SweepContext;
use crate::error::{Error, Result};
use crate::front::NodeIdx;
use crate::geom::{in_scan_area, Orientation};
use crate::mesh::{PointIdx, TriIdx};
use crate::sweep::{Edge, EdgeEvent};

/// Pending work for the walk / flip / flip-scan process. `ep`-`eq` is the
/// edge being forced in; `t` and `p` are the triangle and vertex in hand.
#[derive(Copy, Clone, Debug)]
enum FlipStep {
    /// Rotate around `p` until reaching a triangle the edge crosses.
    Walk {
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
    },
    /// Flip `t` with its neighbor across `p`.
    Flip {
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
    },
    /// Look past a flip that was not possible for a point that makes it so.
    Scan {
        ep: PointIdx,
        eq: PointIdx,
        flip_t: TriIdx,
        t: TriIdx,
        p: PointIdx,
    },
}

impl SweepContext {
    pub(super) fn edge_event_by_edge(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        self.tick()?;
        trace!("[Sweep] edge event {} -> {}", edge.p, edge.q);
        self.edge_event = EdgeEvent {
            constrained_edge: Some(edge),
            right: self.pt(edge.p).x > self.pt(edge.q).x,
        };

        let t = self.node_tri(node)?;
        if self.mesh.mark_constrained_side(t, edge.p, edge.q) {
            return Ok(());
        }

        self.fill_edge_event(edge, node)?;
        let t = self.node_tri(node)?;
        self.edge_event_by_points(edge.p, edge.q, t, edge.q)
    }

    fn fill_edge_event(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        if self.edge_event.right {
            self.fill_right_above(edge, node)
        } else {
            self.fill_left_above(edge, node)
        }
    }

    // ─── Right side ───

    fn fill_right_above(&mut self, edge: Edge, mut node: NodeIdx) -> Result<()> {
        let px = self.pt(edge.p).x;
        loop {
            let next = self.next_node(node)?;
            if self.node_pt(next).x >= px {
                return Ok(());
            }
            self.tick()?;
            if self.orient(edge.q, self.node_point(next), edge.p) == Orientation::Ccw {
                self.fill_right_below(edge, node)?;
            } else {
                node = next;
            }
        }
    }

    fn fill_right_below(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        let px = self.pt(edge.p).x;
        while self.node_pt(node).x < px {
            self.tick()?;
            let n1 = self.next_node(node)?;
            let n2 = self.next_node(n1)?;
            if self.orient_nodes(node, n1, n2) == Orientation::Ccw {
                return self.fill_right_concave(edge, node);
            }
            self.fill_right_convex(edge, node)?;
        }
        Ok(())
    }

    fn fill_right_concave(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        loop {
            self.tick()?;
            let next = self.next_node(node)?;
            self.fill(next)?;
            let next = self.next_node(node)?;
            if self.node_point(next) == edge.p {
                return Ok(());
            }
            if self.orient(edge.q, self.node_point(next), edge.p) != Orientation::Ccw {
                return Ok(());
            }
            let n2 = self.next_node(next)?;
            if self.orient_nodes(node, next, n2) != Orientation::Ccw {
                return Ok(());
            }
        }
    }

    fn fill_right_convex(&mut self, edge: Edge, mut node: NodeIdx) -> Result<()> {
        loop {
            self.tick()?;
            let n1 = self.next_node(node)?;
            let n2 = self.next_node(n1)?;
            let n3 = self.next_node(n2)?;
            if self.orient_nodes(n1, n2, n3) == Orientation::Ccw {
                return self.fill_right_concave(edge, n1);
            }
            if self.orient(edge.q, self.node_point(n2), edge.p) != Orientation::Ccw {
                return Ok(());
            }
            node = n1;
        }
    }

    // ─── Left side ───

    fn fill_left_above(&mut self, edge: Edge, mut node: NodeIdx) -> Result<()> {
        let px = self.pt(edge.p).x;
        loop {
            let prev = self.prev_node(node)?;
            if self.node_pt(prev).x <= px {
                return Ok(());
            }
            self.tick()?;
            if self.orient(edge.q, self.node_point(prev), edge.p) == Orientation::Cw {
                self.fill_left_below(edge, node)?;
            } else {
                node = prev;
            }
        }
    }

    fn fill_left_below(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        let px = self.pt(edge.p).x;
        while self.node_pt(node).x > px {
            self.tick()?;
            let p1 = self.prev_node(node)?;
            let p2 = self.prev_node(p1)?;
            if self.orient_nodes(node, p1, p2) == Orientation::Cw {
                return self.fill_left_concave(edge, node);
            }
            self.fill_left_convex(edge, node)?;
        }
        Ok(())
    }

    fn fill_left_concave(&mut self, edge: Edge, node: NodeIdx) -> Result<()> {
        loop {
            self.tick()?;
            let prev = self.prev_node(node)?;
            self.fill(prev)?;
            let prev = self.prev_node(node)?;
            if self.node_point(prev) == edge.p {
                return Ok(());
            }
            if self.orient(edge.q, self.node_point(prev), edge.p) != Orientation::Cw {
                return Ok(());
            }
            let p2 = self.prev_node(prev)?;
            if self.orient_nodes(node, prev, p2) != Orientation::Cw {
                return Ok(());
            }
        }
    }

    fn fill_left_convex(&mut self, edge: Edge, mut node: NodeIdx) -> Result<()> {
        loop {
            self.tick()?;
            let p1 = self.prev_node(node)?;
            let p2 = self.prev_node(p1)?;
            let p3 = self.prev_node(p2)?;
            if self.orient_nodes(p1, p2, p3) == Orientation::Cw {
                return self.fill_left_concave(edge, p1);
            }
            if self.orient(edge.q, self.node_point(p2), edge.p) != Orientation::Cw {
                return Ok(());
            }
            node = p1;
        }
    }

    // ─── Walk and flip ───

    pub(super) fn edge_event_by_points(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
    ) -> Result<()> {
        let mut stack = vec![FlipStep::Walk { ep, eq, t, p }];
        while let Some(step) = stack.pop() {
            self.tick()?;
            match step {
                FlipStep::Walk { ep, eq, t, p } => self.walk(ep, eq, t, p, &mut stack)?,
                FlipStep::Flip { ep, eq, t, p } => self.flip(ep, eq, t, p, &mut stack)?,
                FlipStep::Scan {
                    ep,
                    eq,
                    flip_t,
                    t,
                    p,
                } => self.flip_scan(ep, eq, flip_t, t, p, &mut stack)?,
            }
        }
        Ok(())
    }

    fn walk(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
        stack: &mut Vec<FlipStep>,
    ) -> Result<()> {
        if self.mesh.mark_constrained_side(t, ep, eq) {
            return Ok(());
        }
        let tri = self.mesh.tri(t);
        let p1 = tri.point_ccw(p);
        let p2 = tri.point_cw(p);
        let o1 = self.strict_orient(eq, p1, ep)?;
        let o2 = self.strict_orient(eq, p2, ep)?;
        if o1 == o2 {
            // Both on one side: rotate around p toward the edge.
            let tri = self.mesh.tri(t);
            let next = if o1 == Orientation::Cw {
                tri.neighbor_ccw(p)
            } else {
                tri.neighbor_cw(p)
            };
            let next = next.ok_or_else(|| self.missing_neighbor(t, p))?;
            stack.push(FlipStep::Walk { ep, eq, t: next, p });
        } else {
            stack.push(FlipStep::Flip { ep, eq, t, p });
        }
        Ok(())
    }

    fn flip(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
        stack: &mut Vec<FlipStep>,
    ) -> Result<()> {
        let tri = self.mesh.tri(t);
        let ot = tri
            .neighbor_across(p)
            .ok_or_else(|| self.missing_neighbor(t, p))?;
        let op = self.mesh.opposite_point(ot, t, p);
        let (pccw, pcw) = (tri.point_ccw(p), tri.point_cw(p));

        if tri.constrained_across(p) {
            return Err(Error::IntersectingConstraints {
                points: [*self.pt(p), *self.pt(op), *self.pt(pccw), *self.pt(pcw)],
            });
        }

        if in_scan_area(self.pt(p), self.pt(pccw), self.pt(pcw), self.pt(op)) {
            trace!("[Sweep] flip {} <-> {} for edge {} -> {}", t, ot, ep, eq);
            self.mesh.rotate_pair(t, p, ot, op)?;
            self.map_triangle_to_nodes(t);
            self.map_triangle_to_nodes(ot);

            if p == eq && op == ep {
                if self.edge_event.constrained_edge == Some(Edge { p: ep, q: eq }) {
                    self.mesh.tri_mut(t).mark_constrained_edge(ep, eq);
                    self.mesh.tri_mut(ot).mark_constrained_edge(ep, eq);
                    self.legalize(t)?;
                    self.legalize(ot)?;
                }
            } else {
                let o = self.orient(eq, op, ep);
                let t = self.next_flip_triangle(o, t, ot, p, op)?;
                stack.push(FlipStep::Flip { ep, eq, t, p });
            }
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            // Come back to this triangle once the scan has flipped its way
            // through.
            stack.push(FlipStep::Walk { ep, eq, t, p });
            stack.push(FlipStep::Scan {
                ep,
                eq,
                flip_t: t,
                t: ot,
                p: new_p,
            });
        }
        Ok(())
    }

    fn flip_scan(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        flip_t: TriIdx,
        t: TriIdx,
        p: PointIdx,
        stack: &mut Vec<FlipStep>,
    ) -> Result<()> {
        let ot = self
            .mesh
            .tri(t)
            .neighbor_across(p)
            .ok_or_else(|| self.missing_neighbor(t, p))?;
        let op = self.mesh.opposite_point(ot, t, p);
        let ft = self.mesh.tri(flip_t);
        let (a, b) = (ft.point_ccw(eq), ft.point_cw(eq));

        if in_scan_area(self.pt(eq), self.pt(a), self.pt(b), self.pt(op)) {
            stack.push(FlipStep::Flip {
                ep: eq,
                eq: op,
                t: ot,
                p: op,
            });
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            stack.push(FlipStep::Scan {
                ep,
                eq,
                flip_t,
                t: ot,
                p: new_p,
            });
        }
        Ok(())
    }

    /// After a flip, pick which of the two triangles still crosses the edge.
    /// The other one is legalized on the spot.
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t: TriIdx,
        ot: TriIdx,
        p: PointIdx,
        op: PointIdx,
    ) -> Result<TriIdx> {
        let (done, keep) = if o == Orientation::Ccw { (ot, t) } else { (t, ot) };
        let ei = self
            .mesh
            .tri(done)
            .edge_index(p, op)
            .ok_or(Error::NotContiguous(t, ot))?;
        self.mesh.tri_mut(done).delaunay[ei] = true;
        self.legalize(done)?;
        self.mesh.tri_mut(done).clear_delaunay();
        Ok(keep)
    }

    fn next_flip_point(
        &self,
        ep: PointIdx,
        eq: PointIdx,
        ot: TriIdx,
        op: PointIdx,
    ) -> Result<PointIdx> {
        match self.orient(eq, op, ep) {
            Orientation::Cw => Ok(self.mesh.tri(ot).point_ccw(op)),
            Orientation::Ccw => Ok(self.mesh.tri(ot).point_cw(op)),
            Orientation::Collinear => Err(Error::Collinear {
                points: [*self.pt(eq), *self.pt(op), *self.pt(ep)],
            }),
        }
    }

    fn strict_orient(&self, a: PointIdx, b: PointIdx, c: PointIdx) -> Result<Orientation> {
        match self.orient(a, b, c) {
            Orientation::Collinear => Err(Error::Collinear {
                points: [*self.pt(a), *self.pt(b), *self.pt(c)],
            }),
            o => Ok(o),
        }
    }
}
