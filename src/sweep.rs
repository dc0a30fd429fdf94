// Copyright 2025 Lars Brubaker
// License: MIT
//
// Sweep bookkeeping types: constraint edges, the basin being filled, and
// the edge event currently being inserted. All logic is driven through the
// Triangulator in cdt.rs.

use crate::error::{Error, Result};
use crate::front::NodeIdx;
use crate::geom::{Point, Real};
use crate::mesh::PointIdx;

/// A constraint edge. `q` is the endpoint met later by the sweep (greater
/// y, ties broken by greater x); the edge is registered on `q`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub p: PointIdx,
    pub q: PointIdx,
}

impl Edge {
    /// Orient the segment between points `a` and `b` of `points`.
    pub fn new(points: &[Point], a: PointIdx, b: PointIdx) -> Result<Edge> {
        let pa = &points[a as usize];
        let pb = &points[b as usize];
        if pa.y > pb.y || (pa.y == pb.y && pa.x > pb.x) {
            Ok(Edge { p: b, q: a })
        } else if pa.y == pb.y && pa.x == pb.x {
            Err(Error::DegenerateEdge { x: pa.x, y: pa.y })
        } else {
            Ok(Edge { p: a, q: b })
        }
    }
}

/// A pocket in the front below its neighbors, closed off by basin filling.
#[derive(Clone, Debug, Default)]
pub struct Basin {
    pub left: Option<NodeIdx>,
    pub bottom: Option<NodeIdx>,
    pub right: Option<NodeIdx>,
    pub width: Real,
    pub left_highest: bool,
}

impl Basin {
    pub fn clear(&mut self) {
        *self = Basin::default();
    }
}

/// The constraint currently being inserted.
#[derive(Clone, Debug, Default)]
pub struct EdgeEvent {
    pub constrained_edge: Option<Edge>,
    /// The edge's lower endpoint lies to the right of its upper one.
    pub right: bool,
}
