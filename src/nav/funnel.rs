// Copyright 2025 Lars Brubaker
// License: MIT
//
// Funnel (string pulling) smoothing of an A* triangle corridor.
//
// The corridor is turned into a list of portals, the shared edge of each
// consecutive triangle pair seen from the start, bracketed by the start and
// goal points doubled. The funnel then keeps an apex and a left and right
// boundary; a portal side that narrows the funnel tightens it, and one that
// crosses the opposite boundary commits that boundary's point to the path
// and restarts the funnel there.

use std::collections::HashSet;

use log::{debug, trace};

use super::NavGraph;
use crate::config::FunnelSettings;
use crate::error::{Error, Result};
use crate::geom::{Point, Real};

/// A funnel point: a mesh vertex, or the start/goal query point.
#[derive(Clone, Copy, Debug)]
struct PortalPoint {
    pos: Point,
    vertex: Option<u32>,
}

impl PortalPoint {
    fn query(pos: Point) -> Self {
        Self { pos, vertex: None }
    }

    fn mesh_vertex(graph: &NavGraph, v: u32) -> Self {
        Self {
            pos: graph.point(v),
            vertex: Some(v),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Portal {
    left: PortalPoint,
    right: PortalPoint,
}

/// Twice the signed area of (a, b, c), positive when clockwise.
#[inline]
fn triarea2(a: &Point, b: &Point, c: &Point) -> Real {
    let (ax, ay) = (b.x - a.x, b.y - a.y);
    let (bx, by) = (c.x - a.x, c.y - a.y);
    bx * ay - ax * by
}

/// The vertex of `a` that `b` does not have.
fn unshared_vertex(graph: &NavGraph, a: u32, b: u32) -> Result<u32> {
    let nb = graph.node(b);
    graph
        .node(a)
        .vertices
        .iter()
        .copied()
        .find(|&v| !nb.contains_vertex(v))
        .ok_or(Error::NotContiguous(a, b))
}

/// Portals for a corridor ordered start to goal.
fn portals(graph: &NavGraph, start: Point, goal: Point, channel: &[u32]) -> Result<Vec<Portal>> {
    let mut out = Vec::with_capacity(channel.len() + 1);
    out.push(Portal {
        left: PortalPoint::query(start),
        right: PortalPoint::query(start),
    });

    if let &[first, second, ..] = channel {
        let mut cw = unshared_vertex(graph, first, second)?;
        let mut ccw = cw;
        for pair in channel.windows(2) {
            let (cur, next) = (pair[0], pair[1]);
            let node = graph.node(cur);
            let ahead = graph.node(next);
            // The shared edge is the two vertices of `cur` that `next` has.
            if ahead.vertices.iter().filter(|&&v| node.contains_vertex(v)).count() != 2 {
                return Err(Error::NotContiguous(cur, next));
            }
            if !ahead.contains_vertex(cw) {
                cw = node.point_cw(cw).ok_or(Error::NotContiguous(cur, next))?;
            }
            if !ahead.contains_vertex(ccw) {
                ccw = node.point_ccw(ccw).ok_or(Error::NotContiguous(cur, next))?;
            }
            out.push(Portal {
                left: PortalPoint::mesh_vertex(graph, cw),
                right: PortalPoint::mesh_vertex(graph, ccw),
            });
        }
    }

    out.push(Portal {
        left: PortalPoint::query(goal),
        right: PortalPoint::query(goal),
    });
    Ok(out)
}

/// Collects the path, skipping a funnel point that was already emitted.
struct PathBuilder {
    points: Vec<Point>,
    emitted: HashSet<u32>,
    eps_sq: Real,
}

impl PathBuilder {
    fn push(&mut self, p: PortalPoint) {
        if let Some(v) = p.vertex {
            if !self.emitted.insert(v) {
                return;
            }
        }
        if let Some(last) = self.points.last() {
            if last.distance_sq(&p.pos) < self.eps_sq {
                return;
            }
        }
        self.points.push(p.pos);
    }
}

/// Smooth `corridor` (goal to start, as `AStar::find` returns it) into a
/// polyline from `start` to `goal`.
pub fn string_pull(
    graph: &NavGraph,
    start: Point,
    goal: Point,
    corridor: &[u32],
    settings: &FunnelSettings,
) -> Result<Vec<Point>> {
    let channel: Vec<u32> = corridor.iter().rev().copied().collect();
    if let (Some(&first), Some(&last)) = (channel.first(), channel.last()) {
        if !graph.contains(first, &start) {
            return Err(Error::PointOutsideMesh {
                x: start.x,
                y: start.y,
            });
        }
        if !graph.contains(last, &goal) {
            return Err(Error::PointOutsideMesh {
                x: goal.x,
                y: goal.y,
            });
        }
    }

    let portals = portals(graph, start, goal, &channel)?;
    let eps_sq = settings.equal_epsilon * settings.equal_epsilon;
    let same = |a: &Point, b: &Point| a.distance_sq(b) < eps_sq;

    let mut path = PathBuilder {
        points: vec![start],
        emitted: HashSet::new(),
        eps_sq,
    };

    let mut apex = portals[0].left;
    let mut left = portals[0].left;
    let mut right = portals[0].right;
    let (mut left_index, mut right_index) = (0usize, 0usize);

    let mut i = 1;
    while i < portals.len() {
        let Portal { left: pl, right: pr } = portals[i];

        // Right side.
        if triarea2(&apex.pos, &right.pos, &pr.pos) <= 0.0 {
            if same(&apex.pos, &right.pos) || triarea2(&apex.pos, &left.pos, &pr.pos) > 0.0 {
                right = pr;
                right_index = i;
            } else {
                // Crossed over the left boundary.
                path.push(left);
                trace!("[Funnel] apex -> left ({}, {})", left.pos.x, left.pos.y);
                apex = left;
                right = apex;
                right_index = left_index;
                i = left_index + 1;
                continue;
            }
        }

        // Left side.
        if triarea2(&apex.pos, &left.pos, &pl.pos) >= 0.0 {
            if same(&apex.pos, &left.pos) || triarea2(&apex.pos, &right.pos, &pl.pos) < 0.0 {
                left = pl;
                left_index = i;
            } else {
                // Crossed over the right boundary.
                path.push(right);
                trace!("[Funnel] apex -> right ({}, {})", right.pos.x, right.pos.y);
                apex = right;
                left = apex;
                left_index = right_index;
                i = right_index + 1;
                continue;
            }
        }

        i += 1;
    }

    if path.points.last().map_or(true, |p| !same(p, &goal)) {
        path.points.push(goal);
    }
    debug!(
        "[Funnel] {} corridor nodes -> {} path points",
        corridor.len(),
        path.points.len()
    );
    Ok(path.points)
}
