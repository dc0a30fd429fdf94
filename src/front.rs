// Copyright 2025 Lars Brubaker
// License: MIT
//
// The advancing front: an x-ordered doubly-linked list of nodes tracing the
// upper boundary of the triangulated region so far.
//
// Nodes live in a Vec arena and link by index. A removed node keeps its own
// prev/next links so a caller holding it can still step back onto the front.

use crate::geom::Real;
use crate::mesh::{PointIdx, TriIdx};

/// Index into AdvancingFront::nodes
pub type NodeIdx = u32;

#[derive(Clone, Debug)]
pub struct FrontNode {
    pub point: PointIdx,
    /// x coordinate of `point`.
    pub value: Real,
    /// Triangle directly below the front segment (self, next).
    pub triangle: Option<TriIdx>,
    pub next: Option<NodeIdx>,
    pub prev: Option<NodeIdx>,
}

pub struct AdvancingFront {
    pub nodes: Vec<FrontNode>,
    head: NodeIdx,
    tail: NodeIdx,
    /// Last node returned by a lookup; consecutive sweep queries are close.
    search: NodeIdx,
}

impl AdvancingFront {
    /// Front of three nodes: head, middle, tail, in increasing x.
    pub fn new(
        head: (PointIdx, Real),
        middle: (PointIdx, Real),
        tail: (PointIdx, Real),
        triangle: TriIdx,
    ) -> Self {
        let nodes = vec![
            FrontNode {
                point: head.0,
                value: head.1,
                triangle: Some(triangle),
                next: Some(1),
                prev: None,
            },
            FrontNode {
                point: middle.0,
                value: middle.1,
                triangle: Some(triangle),
                next: Some(2),
                prev: Some(0),
            },
            FrontNode {
                point: tail.0,
                value: tail.1,
                triangle: None,
                next: None,
                prev: Some(1),
            },
        ];
        AdvancingFront {
            nodes,
            head: 0,
            tail: 2,
            search: 0,
        }
    }

    #[inline]
    pub fn head(&self) -> NodeIdx {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> NodeIdx {
        self.tail
    }

    #[inline]
    pub fn node(&self, n: NodeIdx) -> &FrontNode {
        &self.nodes[n as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, n: NodeIdx) -> &mut FrontNode {
        &mut self.nodes[n as usize]
    }

    #[inline]
    pub fn next(&self, n: NodeIdx) -> Option<NodeIdx> {
        self.nodes[n as usize].next
    }

    #[inline]
    pub fn prev(&self, n: NodeIdx) -> Option<NodeIdx> {
        self.nodes[n as usize].prev
    }

    /// Splice a new node in right after `node`.
    pub fn insert_after(&mut self, node: NodeIdx, point: PointIdx, value: Real) -> NodeIdx {
        let new_idx = self.nodes.len() as NodeIdx;
        let next = self.nodes[node as usize].next;
        self.nodes.push(FrontNode {
            point,
            value,
            triangle: None,
            next,
            prev: Some(node),
        });
        if let Some(nx) = next {
            self.nodes[nx as usize].prev = Some(new_idx);
        }
        self.nodes[node as usize].next = Some(new_idx);
        new_idx
    }

    /// Unlink `node` from the front.
    pub fn remove(&mut self, node: NodeIdx) {
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        if let Some(p) = prev {
            self.nodes[p as usize].next = next;
        }
        if let Some(n) = next {
            self.nodes[n as usize].prev = prev;
        }
        if self.search == node {
            self.search = prev.or(next).unwrap_or(self.head);
        }
    }

    /// Node with the greatest value <= x.
    pub fn locate_node(&mut self, x: Real) -> Option<NodeIdx> {
        let mut node = self.search;
        if x < self.node(node).value {
            while let Some(p) = self.prev(node) {
                node = p;
                if x >= self.node(node).value {
                    self.search = node;
                    return Some(node);
                }
            }
        } else {
            while let Some(n) = self.next(node) {
                if x < self.node(n).value {
                    self.search = node;
                    return Some(node);
                }
                node = n;
            }
        }
        None
    }

    /// Node holding `point`, whose x coordinate is `px`.
    ///
    /// Walks from the cached node toward `px`. Equal x values may appear
    /// out of order for a moment, so an equal-x miss checks both neighbors
    /// and then falls back to a full scan from the head.
    pub fn locate_point(&mut self, point: PointIdx, px: Real) -> Option<NodeIdx> {
        let start = self.search;
        let nx = self.node(start).value;
        let found = if px == nx {
            if self.node(start).point == point {
                Some(start)
            } else {
                self.prev(start)
                    .filter(|&p| self.node(p).point == point)
                    .or_else(|| self.next(start).filter(|&n| self.node(n).point == point))
                    .or_else(|| self.scan(point))
            }
        } else if px < nx {
            self.walk(start, point, |f, n| f.prev(n))
        } else {
            self.walk(start, point, |f, n| f.next(n))
        };
        if let Some(n) = found {
            self.search = n;
        }
        found
    }

    fn walk<F>(&self, from: NodeIdx, point: PointIdx, step: F) -> Option<NodeIdx>
    where
        F: Fn(&Self, NodeIdx) -> Option<NodeIdx>,
    {
        let mut node = step(self, from);
        while let Some(n) = node {
            if self.node(n).point == point {
                return Some(n);
            }
            node = step(self, n);
        }
        None
    }

    fn scan(&self, point: PointIdx) -> Option<NodeIdx> {
        let mut node = Some(self.head);
        while let Some(n) = node {
            if self.node(n).point == point {
                return Some(n);
            }
            node = self.next(n);
        }
        None
    }

    /// Live nodes from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(Some(self.head), move |&n| self.next(n))
    }
}
