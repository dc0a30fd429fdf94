// poly2tri-nav: constrained Delaunay triangulation and navigation meshes
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod cdt;
pub mod config;
pub mod error;
pub mod front;
pub mod geom;
pub mod io;
pub mod mesh;
pub mod nav;
pub mod priorityq;
pub mod sweep;

pub use cdt::{Triangle, Triangulation, Triangulator};
pub use config::{
    AStarSettings, CostMetric, FunnelSettings, NavConfig, PathfindingConfig, TriangulationConfig,
};
pub use error::{Error, ErrorKind, Result};
pub use geom::{Point, Real};
pub use nav::{AStar, NavGraph, SpatialNode};

/// Triangulate `contour` with the given holes using default settings.
pub fn triangulate<H>(contour: &[Point], holes: &[H]) -> Result<Triangulation>
where
    H: AsRef<[Point]>,
{
    let mut t = Triangulator::new(contour);
    t.add_holes(holes);
    t.triangulate()
}
