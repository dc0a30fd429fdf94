// Copyright 2025 Lars Brubaker
// License: MIT
//
// Sweep-line constrained Delaunay triangulation.
//
// Input points are swept bottom to top. Each point event hangs a triangle
// off the advancing front and fills any notches it leaves; each constraint
// edge ending at that point is then forced into the mesh by filling below
// it and flipping the triangles it crosses. Every new triangle is
// legalized (Delaunay flips) as soon as it exists. When the sweep is done,
// triangles reachable from the outer boundary without crossing a
// constraint are collected as the result.
//
// The public entry point is `Triangulator`; the sweep state lives in a
// private `SweepContext` owned by a single `triangulate` call. The sweep is
// split across this file (point events, fill, legalize), basin.rs,
// edge_event.rs and output.rs.

mod basin;
mod edge_event;
mod output;


use std::cmp::Ordering;
use std::ops::Range;

use log::{debug, trace};

use crate::config::TriangulationConfig;
use crate::error::{Error, Result};
use crate::front::{AdvancingFront, NodeIdx};
use crate::geom::{in_circle, is_angle_obtuse, orient2d, Orientation, Point, EPSILON};
use crate::mesh::{Mesh, PointIdx, TriIdx};
use crate::sweep::{Basin, Edge, EdgeEvent};

pub use output::{Triangle, Triangulation};

// ─────────────────────────────── Triangulator ─────────────────────────────────

/// Collects a polygon, its holes and any Steiner points, then triangulates.
///
/// ```
/// use poly2tri_nav::{Point, Triangulator};
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 4.0),
///     Point::new(0.0, 4.0),
/// ];
/// let hole = [
///     Point::new(1.0, 1.0),
///     Point::new(1.0, 3.0),
///     Point::new(3.0, 3.0),
///     Point::new(3.0, 1.0),
/// ];
/// let mut tri = Triangulator::new(&square);
/// tri.add_hole(&hole);
/// let mesh = tri.triangulate().unwrap();
/// assert_eq!(mesh.len(), 8);
/// assert!((mesh.area() - 12.0).abs() < 1e-4);
/// ```
#[derive(Clone, Debug)]
pub struct Triangulator {
    points: Vec<Point>,
    rings: Vec<Range<u32>>,
    config: TriangulationConfig,
}

impl Triangulator {
    pub fn new(contour: &[Point]) -> Self {
        Self::with_config(contour, TriangulationConfig::default())
    }

    pub fn with_config(contour: &[Point], config: TriangulationConfig) -> Self {
        let mut t = Triangulator {
            points: Vec::with_capacity(contour.len()),
            rings: Vec::new(),
            config,
        };
        t.push_ring(contour);
        t
    }

    fn push_ring(&mut self, ring: &[Point]) {
        let start = self.points.len() as u32;
        self.points.extend_from_slice(ring);
        self.rings.push(start..self.points.len() as u32);
    }

    /// Add a hole. Its orientation does not matter.
    pub fn add_hole(&mut self, hole: &[Point]) -> &mut Self {
        self.push_ring(hole);
        self
    }

    pub fn add_holes<I>(&mut self, holes: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<[Point]>,
    {
        for h in holes {
            self.push_ring(h.as_ref());
        }
        self
    }

    /// Add an interior point that must appear as a mesh vertex.
    ///
    /// A point outside the contour or inside a hole is kept in
    /// [`Triangulation::points`] but no output triangle uses it.
    pub fn add_steiner_point(&mut self, p: Point) -> &mut Self {
        self.points.push(p);
        self
    }

    /// Add several Steiner points; see [`Triangulator::add_steiner_point`].
    pub fn add_steiner_points(&mut self, points: &[Point]) -> &mut Self {
        self.points.extend_from_slice(points);
        self
    }

    /// Run the sweep. Point indices in the result follow insertion order:
    /// contour, then holes and Steiner points as they were added.
    pub fn triangulate(self) -> Result<Triangulation> {
        let mut tcx = SweepContext::new(self)?;
        tcx.sweep_points()?;
        tcx.finalize()
    }
}

// ─────────────────────────────── Sweep context ────────────────────────────────

pub(crate) struct SweepContext {
    /// Input points followed by the two synthetic bounding points.
    points: Vec<Point>,
    input_len: usize,
    /// Input point indices sorted by (y, x).
    order: Vec<PointIdx>,
    /// Constraint edges keyed by their upper endpoint.
    edge_list: Vec<Vec<Edge>>,
    mesh: Mesh,
    front: AdvancingFront,
    basin: Basin,
    edge_event: EdgeEvent,
    bounds: (Point, Point),
    steps: usize,
    step_limit: Option<usize>,
}

impl SweepContext {
    fn new(input: Triangulator) -> Result<Self> {
        let Triangulator {
            mut points,
            rings,
            config,
        } = input;

        if points.len() < 3 {
            return Err(Error::TooFewPoints(points.len()));
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(Error::InvalidCoordinate { x: p.x, y: p.y });
        }
        let margin = config.bounding_margin;
        if !margin.is_finite() || margin <= 0.0 {
            return Err(Error::Config(format!(
                "bounding_margin must be a positive finite number, got {}",
                margin
            )));
        }

        let input_len = points.len();
        let mut edge_list = vec![Vec::new(); input_len];
        for ring in &rings {
            let n = ring.len();
            if n < 3 {
                return Err(Error::TooFewPoints(n));
            }
            for i in ring.clone() {
                let j = if i + 1 == ring.end { ring.start } else { i + 1 };
                let edge = Edge::new(&points, i, j)?;
                edge_list[edge.q as usize].push(edge);
            }
        }

        let mut pmin = points[0];
        let mut pmax = points[0];
        for p in &points[1..] {
            pmin.x = pmin.x.min(p.x);
            pmin.y = pmin.y.min(p.y);
            pmax.x = pmax.x.max(p.x);
            pmax.y = pmax.y.max(p.y);
        }

        let mut order: Vec<PointIdx> = (0..input_len as PointIdx).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (&points[a as usize], &points[b as usize]);
            pa.y.partial_cmp(&pb.y)
                .unwrap_or(Ordering::Equal)
                .then(pa.x.partial_cmp(&pb.x).unwrap_or(Ordering::Equal))
        });
        for w in order.windows(2) {
            let (a, b) = (&points[w[0] as usize], &points[w[1] as usize]);
            if a.x == b.x && a.y == b.y {
                return Err(Error::DuplicatePoint { x: a.x, y: a.y });
            }
        }

        let dx = margin * (pmax.x - pmin.x);
        let dy = margin * (pmax.y - pmin.y);
        let left = input_len as PointIdx;
        let right = left + 1;
        points.push(Point::new(pmin.x - dx, pmin.y - dy));
        points.push(Point::new(pmax.x + dx, pmin.y - dy));
        debug!(
            "[Sweep] {} points, {} rings, bounds ({}, {})-({}, {})",
            input_len,
            rings.len(),
            pmin.x,
            pmin.y,
            pmax.x,
            pmax.y
        );

        let first = order[0];
        let mut mesh = Mesh::new();
        let t0 = mesh.add(first, left, right);
        let front = AdvancingFront::new(
            (left, points[left as usize].x),
            (first, points[first as usize].x),
            (right, points[right as usize].x),
            t0,
        );

        Ok(SweepContext {
            points,
            input_len,
            order,
            edge_list,
            mesh,
            front,
            basin: Basin::default(),
            edge_event: EdgeEvent::default(),
            bounds: (pmin, pmax),
            steps: 0,
            step_limit: config.step_limit,
        })
    }

    // ─── Helpers ───

    /// Count one unit of sweep work against the configured budget.
    #[inline]
    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(Error::StepLimitExceeded(limit)),
            _ => Ok(()),
        }
    }

    #[inline]
    fn pt(&self, p: PointIdx) -> &Point {
        &self.points[p as usize]
    }

    #[inline]
    fn node_point(&self, n: NodeIdx) -> PointIdx {
        self.front.node(n).point
    }

    #[inline]
    fn node_pt(&self, n: NodeIdx) -> &Point {
        self.pt(self.node_point(n))
    }

    fn exhausted(&self, n: NodeIdx) -> Error {
        let p = self.node_pt(n);
        Error::FrontExhausted { x: p.x, y: p.y }
    }

    fn next_node(&self, n: NodeIdx) -> Result<NodeIdx> {
        self.front.next(n).ok_or_else(|| self.exhausted(n))
    }

    fn prev_node(&self, n: NodeIdx) -> Result<NodeIdx> {
        self.front.prev(n).ok_or_else(|| self.exhausted(n))
    }

    fn node_tri(&self, n: NodeIdx) -> Result<TriIdx> {
        self.front.node(n).triangle.ok_or_else(|| {
            let p = self.node_pt(n);
            Error::Topology(format!("front node at ({}, {}) has no triangle", p.x, p.y))
        })
    }

    #[inline]
    fn orient(&self, a: PointIdx, b: PointIdx, c: PointIdx) -> Orientation {
        orient2d(self.pt(a), self.pt(b), self.pt(c))
    }

    #[inline]
    fn orient_nodes(&self, a: NodeIdx, b: NodeIdx, c: NodeIdx) -> Orientation {
        self.orient(self.node_point(a), self.node_point(b), self.node_point(c))
    }

    fn missing_neighbor(&self, t: TriIdx, p: PointIdx) -> Error {
        let tri = self.mesh.tri(t);
        Error::MissingNeighbor {
            edge: [*self.pt(tri.point_ccw(p)), *self.pt(tri.point_cw(p))],
        }
    }

    // ─── Point events ───

    fn sweep_points(&mut self) -> Result<()> {
        for k in 1..self.order.len() {
            let p = self.order[k];
            let node = self.point_event(p)?;
            for e in 0..self.edge_list[p as usize].len() {
                let edge = self.edge_list[p as usize][e];
                self.edge_event_by_edge(edge, node)?;
            }
        }
        debug!(
            "[Sweep] swept {} points into {} triangles ({} steps)",
            self.order.len(),
            self.mesh.len(),
            self.steps
        );
        Ok(())
    }

    fn point_event(&mut self, p: PointIdx) -> Result<NodeIdx> {
        self.tick()?;
        let px = self.pt(p).x;
        let node = self.front.locate_node(px).ok_or_else(|| {
            let pp = self.pt(p);
            Error::FrontExhausted { x: pp.x, y: pp.y }
        })?;
        trace!("[Sweep] point event {} at ({}, {})", p, px, self.pt(p).y);
        let new_node = self.new_front_triangle(p, node)?;

        // The located node never lies right of p, so only the +EPSILON side
        // needs checking.
        if px <= self.node_pt(node).x + EPSILON {
            self.fill(node)?;
        }
        self.fill_advancing_front(new_node)?;
        Ok(new_node)
    }

    fn new_front_triangle(&mut self, p: PointIdx, node: NodeIdx) -> Result<NodeIdx> {
        let next = self.next_node(node)?;
        let (a, b) = (self.node_point(node), self.node_point(next));
        let t = self.mesh.add(p, a, b);
        let below = self.node_tri(node)?;
        self.mesh.mark_neighbor(t, below)?;
        let px = self.pt(p).x;
        let new_node = self.front.insert_after(node, p, px);
        if !self.legalize(t)? {
            self.map_triangle_to_nodes(t);
        }
        Ok(new_node)
    }

    /// Close the notch at `node` with the triangle (prev, node, next) and
    /// drop `node` from the front.
    fn fill(&mut self, node: NodeIdx) -> Result<()> {
        self.tick()?;
        let prev = self.prev_node(node)?;
        let next = self.next_node(node)?;
        let (a, b, c) = (
            self.node_point(prev),
            self.node_point(node),
            self.node_point(next),
        );
        let t = self.mesh.add(a, b, c);
        let left = self.node_tri(prev)?;
        let below = self.node_tri(node)?;
        self.mesh.mark_neighbor(t, left)?;
        self.mesh.mark_neighbor(t, below)?;
        self.front.remove(node);
        if !self.legalize(t)? {
            self.map_triangle_to_nodes(t);
        }
        Ok(())
    }

    /// Fill outward from a freshly added node while the front turns by
    /// less than 90 degrees, then fill a basin to the right if one formed.
    fn fill_advancing_front(&mut self, n: NodeIdx) -> Result<()> {
        let mut node = self.next_node(n)?;
        while let Some(next) = self.front.next(node) {
            let prev = self.prev_node(node)?;
            if is_angle_obtuse(self.node_pt(node), self.node_pt(next), self.node_pt(prev)) {
                break;
            }
            self.fill(node)?;
            node = next;
        }

        let mut node = self.prev_node(n)?;
        while let Some(prev) = self.front.prev(node) {
            let next = self.next_node(node)?;
            if is_angle_obtuse(self.node_pt(node), self.node_pt(next), self.node_pt(prev)) {
                break;
            }
            self.fill(node)?;
            node = prev;
        }

        if let Some(next) = self.front.next(n) {
            if self.front.next(next).is_some() && self.is_basin_angle_right(n)? {
                self.fill_basin(n)?;
            }
        }
        Ok(())
    }

    // ─── Legalization ───

    /// Restore the Delaunay property around `t` by flipping edges. Returns
    /// true if any flip happened, in which case every touched triangle has
    /// already been mapped onto the front.
    fn legalize(&mut self, t: TriIdx) -> Result<bool> {
        enum Frame {
            Enter(TriIdx),
            AfterFirst { t: TriIdx, ot: TriIdx, i: usize, oi: usize },
            AfterSecond { t: TriIdx, ot: TriIdx, i: usize, oi: usize },
        }

        let mut stack = vec![Frame::Enter(t)];
        let mut flipped = false;
        while let Some(frame) = stack.pop() {
            self.tick()?;
            match frame {
                Frame::Enter(t) => match self.legalize_edge(t)? {
                    None => flipped = false,
                    Some((ot, i, oi)) => {
                        stack.push(Frame::AfterFirst { t, ot, i, oi });
                        stack.push(Frame::Enter(t));
                    }
                },
                Frame::AfterFirst { t, ot, i, oi } => {
                    if !flipped {
                        self.map_triangle_to_nodes(t);
                    }
                    stack.push(Frame::AfterSecond { t, ot, i, oi });
                    stack.push(Frame::Enter(ot));
                }
                Frame::AfterSecond { t, ot, i, oi } => {
                    if !flipped {
                        self.map_triangle_to_nodes(ot);
                    }
                    // Delaunay marks only hold until the next insertion.
                    self.mesh.tri_mut(t).delaunay[i] = false;
                    self.mesh.tri_mut(ot).delaunay[oi] = false;
                    flipped = true;
                }
            }
        }
        Ok(flipped)
    }

    /// Flip the first edge of `t` that fails the in-circle test. Returns the
    /// neighbor it was flipped with and the two edge slots that were marked.
    fn legalize_edge(&mut self, t: TriIdx) -> Result<Option<(TriIdx, usize, usize)>> {
        for i in 0..3 {
            let tri = self.mesh.tri(t);
            if tri.delaunay[i] {
                continue;
            }
            let Some(ot) = tri.neighbors[i] else {
                continue;
            };
            let p = tri.points[i];
            let op = self.mesh.opposite_point(ot, t, p);
            let oi = self
                .mesh
                .tri(ot)
                .index(op)
                .ok_or(Error::NotContiguous(t, ot))?;

            let other = self.mesh.tri(ot);
            if other.constrained[oi] || other.delaunay[oi] {
                let c = other.constrained[oi];
                self.mesh.tri_mut(t).constrained[i] = c;
                continue;
            }

            let tri = self.mesh.tri(t);
            if in_circle(
                self.pt(p),
                self.pt(tri.point_ccw(p)),
                self.pt(tri.point_cw(p)),
                self.pt(op),
            ) {
                trace!("[Sweep] legalize flip {} <-> {}", t, ot);
                self.mesh.tri_mut(t).delaunay[i] = true;
                self.mesh.tri_mut(ot).delaunay[oi] = true;
                self.mesh.rotate_pair(t, p, ot, op)?;
                return Ok(Some((ot, i, oi)));
            }
        }
        Ok(None)
    }

    /// Point the front nodes at `t` for each of its edges that has no
    /// neighbor (edges on the front).
    fn map_triangle_to_nodes(&mut self, t: TriIdx) {
        for i in 0..3 {
            let tri = self.mesh.tri(t);
            if tri.neighbors[i].is_some() {
                continue;
            }
            let p = tri.point_cw(tri.points[i]);
            let px = self.points[p as usize].x;
            if let Some(n) = self.front.locate_point(p, px) {
                self.front.node_mut(n).triangle = Some(t);
            }
        }
    }
}
