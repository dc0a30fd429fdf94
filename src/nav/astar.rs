// Copyright 2025 Lars Brubaker
// License: MIT
//
// A* over the navigation graph. Nodes are scored by centroid distance; the
// open list is a handle heap so an improved node can be re-keyed in place.

use log::{debug, trace};

use super::NavGraph;
use crate::config::AStarSettings;
use crate::error::{Error, Result};
use crate::geom::Real;
use crate::priorityq::{Handle, PriorityQ};

/// Per-node search bookkeeping.
#[derive(Clone, Copy, Debug)]
struct Visit {
    g: Real,
    parent: Option<u32>,
    open: Option<Handle>,
    closed: bool,
}

impl Default for Visit {
    fn default() -> Self {
        Visit {
            g: Real::INFINITY,
            parent: None,
            open: None,
            closed: false,
        }
    }
}

/// A* search over a `NavGraph`.
///
/// Search state lives in the call, so one `AStar` can answer any number of
/// queries.
pub struct AStar<'a> {
    graph: &'a NavGraph,
    settings: AStarSettings,
}

impl<'a> AStar<'a> {
    pub fn new(graph: &'a NavGraph, settings: AStarSettings) -> Self {
        Self { graph, settings }
    }

    /// Create with default settings
    pub fn with_defaults(graph: &'a NavGraph) -> Self {
        Self::new(graph, AStarSettings::default())
    }

    #[inline]
    fn cost(&self, a: u32, b: u32) -> Real {
        let d = self
            .graph
            .node(a)
            .centroid
            .distance(&self.graph.node(b).centroid);
        self.settings.cost.apply(d)
    }

    /// Corridor of node indices from `goal` back to `start`, both included.
    pub fn find(&self, start: u32, goal: u32) -> Result<Vec<u32>> {
        trace!("[AStar] find: start={} goal={}", start, goal);
        let n = self.graph.len();
        if start as usize >= n || goal as usize >= n {
            return Err(Error::NoPath { start, goal });
        }

        let mut visits = vec![Visit::default(); n];
        let mut open = PriorityQ::with_capacity(n.min(1024));
        visits[start as usize].g = 0.0;
        visits[start as usize].open = Some(open.insert(self.cost(start, goal), start));

        let mut expanded = 0usize;
        while let Some((_, current)) = open.extract_min() {
            let cur = current as usize;
            visits[cur].open = None;
            visits[cur].closed = true;
            if current == goal {
                break;
            }

            expanded += 1;
            if expanded > self.settings.max_iterations {
                debug!(
                    "[AStar] FAILED: iteration limit {} reached",
                    self.settings.max_iterations
                );
                return Err(Error::SearchLimitExceeded(self.settings.max_iterations));
            }

            let g_cur = visits[cur].g;
            for &next in &self.graph.node(current).neighbors {
                let v = visits[next as usize];
                if v.closed {
                    continue;
                }
                let g = g_cur + self.cost(current, next);
                if g >= v.g {
                    continue;
                }
                if let Some(h) = v.open {
                    open.delete(h);
                }
                let f = g + self.cost(next, goal);
                visits[next as usize] = Visit {
                    g,
                    parent: Some(current),
                    open: Some(open.insert(f, next)),
                    closed: false,
                };
            }
        }

        if !visits[goal as usize].closed {
            debug!(
                "[AStar] FAILED: no path from {} to {} after {} expansions",
                start, goal, expanded
            );
            return Err(Error::NoPath { start, goal });
        }

        let mut corridor = vec![goal];
        let mut at = goal;
        while let Some(p) = visits[at as usize].parent {
            corridor.push(p);
            at = p;
        }
        debug!(
            "[AStar] found corridor of {} nodes, cost {:.2}, {} expansions",
            corridor.len(),
            visits[goal as usize].g,
            expanded
        );
        Ok(corridor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdt::Triangulator;
    use crate::config::CostMetric;
    use crate::geom::Point;

    /// A long strip, so corridors have several triangles.
    fn strip() -> NavGraph {
        let mut contour = Vec::new();
        for i in 0..6 {
            let (x, y) = (i as f32 * 2.0, i as f32 * 0.07 + (i % 2) as f32 * 0.3);
            contour.push(Point::new(x, y));
        }
        for i in (0..6).rev() {
            let (x, y) = (i as f32 * 2.0 + 0.5, 3.0 + i as f32 * 0.05 + (i % 2) as f32 * 0.2);
            contour.push(Point::new(x, y));
        }
        NavGraph::build(&Triangulator::new(&contour).triangulate().unwrap())
    }

    fn assert_corridor(graph: &NavGraph, corridor: &[u32], start: u32, goal: u32) {
        assert_eq!(corridor.first(), Some(&goal));
        assert_eq!(corridor.last(), Some(&start));
        for w in corridor.windows(2) {
            assert!(graph.node(w[0]).neighbors.contains(&w[1]));
        }
    }

    #[test]
    fn corridor_runs_goal_to_start() {
        let graph = strip();
        let start = graph.locate(Point::new(0.6, 1.0)).unwrap();
        let goal = graph.locate(Point::new(9.8, 2.0)).unwrap();
        let corridor = AStar::with_defaults(&graph).find(start, goal).unwrap();
        assert!(corridor.len() > 2);
        assert_corridor(&graph, &corridor, start, goal);
    }

    #[test]
    fn start_equals_goal() {
        let graph = strip();
        let corridor = AStar::with_defaults(&graph).find(3, 3).unwrap();
        assert_eq!(corridor, vec![3]);
    }

    #[test]
    fn truncated_cost_still_finds_a_corridor() {
        let graph = strip();
        let settings = AStarSettings {
            cost: CostMetric::Truncated,
            ..AStarSettings::default()
        };
        let last = graph.len() as u32 - 1;
        let corridor = AStar::new(&graph, settings).find(0, last).unwrap();
        assert_corridor(&graph, &corridor, 0, last);
    }

    #[test]
    fn iteration_limit_aborts() {
        let graph = strip();
        let start = graph.locate(Point::new(0.6, 1.0)).unwrap();
        let goal = graph.locate(Point::new(9.8, 2.0)).unwrap();
        let settings = AStarSettings {
            max_iterations: 1,
            ..AStarSettings::default()
        };
        let err = AStar::new(&graph, settings).find(start, goal).unwrap_err();
        assert!(matches!(err, Error::SearchLimitExceeded(1)));
    }

    #[test]
    fn disconnected_goal_is_no_path() {
        // Two triangles separated by a wall: build the graph, then cut the
        // only link.
        let square = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let mut graph = NavGraph::build(&Triangulator::new(&square).triangulate().unwrap());
        assert_eq!(graph.len(), 2);
        for node in &mut graph.nodes {
            node.neighbors.clear();
        }
        let err = AStar::with_defaults(&graph).find(0, 1).unwrap_err();
        assert!(matches!(err, Error::NoPath { start: 0, goal: 1 }));
        assert!(err.kind().is_recoverable());
    }
}
