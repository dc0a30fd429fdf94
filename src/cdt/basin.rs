// Copyright 2025 Lars Brubaker
// Basin filling for SweepContext.
//
// A basin is a dip in the front to the right of a new point. Filling it
// early keeps the front from growing long thin triangles.

use super::SweepContext;
use crate::error::{Error, Result};
use crate::front::NodeIdx;
use crate::geom::Orientation;
use crate::sweep::Basin;

impl SweepContext {
    pub(super) fn is_basin_angle_right(&self, node: NodeIdx) -> Result<bool> {
        let nn = self.next_node(self.next_node(node)?)?;
        let (a, b) = (self.node_pt(node), self.node_pt(nn));
        let ax = a.x - b.x;
        let ay = a.y - b.y;
        if ay < 0.0 {
            return Err(Error::Topology(format!(
                "front out of y order at ({}, {})",
                a.x, a.y
            )));
        }
        Ok(ax >= 0.0 || ax.abs() < ay)
    }

    pub(super) fn fill_basin(&mut self, node: NodeIdx) -> Result<()> {
        let n1 = self.next_node(node)?;
        let n2 = self.next_node(n1)?;
        let left = if self.orient_nodes(node, n1, n2) == Orientation::Ccw {
            n2
        } else {
            n1
        };

        let mut bottom = left;
        while let Some(next) = self.front.next(bottom) {
            if self.node_pt(bottom).y < self.node_pt(next).y {
                break;
            }
            bottom = next;
        }
        if bottom == left {
            return Ok(());
        }

        let mut right = bottom;
        while let Some(next) = self.front.next(right) {
            if self.node_pt(right).y >= self.node_pt(next).y {
                break;
            }
            right = next;
        }
        if right == bottom {
            return Ok(());
        }

        let (lp, rp) = (*self.node_pt(left), *self.node_pt(right));
        self.basin = Basin {
            left: Some(left),
            bottom: Some(bottom),
            right: Some(right),
            width: rp.x - lp.x,
            left_highest: lp.y > rp.y,
        };
        let filled = self.fill_basin_from(bottom, left, right);
        self.basin.clear();
        filled
    }

    fn fill_basin_from(&mut self, mut node: NodeIdx, left: NodeIdx, right: NodeIdx) -> Result<()> {
        loop {
            self.tick()?;
            if self.is_shallow(node, left, right) {
                return Ok(());
            }
            self.fill(node)?;

            // `node` is off the front now but still links to its old
            // neighbors.
            let prev = self.prev_node(node)?;
            let next = self.next_node(node)?;
            if prev == left && next == right {
                return Ok(());
            } else if prev == left {
                let n2 = self.next_node(next)?;
                if self.orient_nodes(node, next, n2) == Orientation::Cw {
                    return Ok(());
                }
                node = next;
            } else if next == right {
                let p2 = self.prev_node(prev)?;
                if self.orient_nodes(node, prev, p2) == Orientation::Ccw {
                    return Ok(());
                }
                node = prev;
            } else if self.node_pt(prev).y < self.node_pt(next).y {
                node = prev;
            } else {
                node = next;
            }
        }
    }

    fn is_shallow(&self, node: NodeIdx, left: NodeIdx, right: NodeIdx) -> bool {
        let rim = if self.basin.left_highest { left } else { right };
        let height = self.node_pt(rim).y - self.node_pt(node).y;
        self.basin.width > height
    }
}
