// Copyright 2025 Lars Brubaker
// WASM bindings for poly2tri-nav

use poly2tri_nav::{NavGraph, PathfindingConfig, Point, Triangulation, Triangulator};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// [x0,y0, x1,y1, ...] -> points. An unpaired trailing value is dropped.
fn to_points(flat: &[f32]) -> Vec<Point> {
    flat.chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

/// Split flat hole coordinates into rings of `hole_sizes[i]` points each.
fn to_holes(flat_holes: &[f32], hole_sizes: &[u32]) -> Result<Vec<Vec<Point>>, JsError> {
    let mut holes = Vec::with_capacity(hole_sizes.len());
    let mut at = 0usize;
    for &n in hole_sizes {
        let end = at + 2 * n as usize;
        let ring = flat_holes
            .get(at..end)
            .ok_or_else(|| JsError::new("hole_sizes exceed flat_holes"))?;
        holes.push(to_points(ring));
        at = end;
    }
    Ok(holes)
}

fn build(flat_contour: &[f32], flat_holes: &[f32], hole_sizes: &[u32]) -> Result<Triangulation, JsError> {
    let holes = to_holes(flat_holes, hole_sizes)?;
    let mut t = Triangulator::new(&to_points(flat_contour));
    t.add_holes(&holes);
    t.triangulate().map_err(|e| JsError::new(&e.to_string()))
}

/// Flat triangle corners [ax,ay, bx,by, cx,cy, ...].
fn flat_triangles(mesh: &Triangulation) -> Vec<f32> {
    let mut out = Vec::with_capacity(mesh.len() * 6);
    for i in 0..mesh.len() {
        for p in mesh.triangle_points(i) {
            out.push(p.x);
            out.push(p.y);
        }
    }
    out
}

/// Triangulate a contour with holes. Holes are concatenated in
/// `flat_holes`; `hole_sizes[i]` is the point count of hole i.
#[wasm_bindgen]
pub fn triangulate(
    flat_contour: &[f32],
    flat_holes: &[f32],
    hole_sizes: &[u32],
) -> Result<Vec<f32>, JsError> {
    build(flat_contour, flat_holes, hole_sizes).map(|m| flat_triangles(&m))
}

/// A triangulated polygon ready for path queries.
#[wasm_bindgen]
pub struct NavMeshJs {
    mesh: Triangulation,
    graph: NavGraph,
    config: PathfindingConfig,
}

#[wasm_bindgen]
impl NavMeshJs {
    #[wasm_bindgen(constructor)]
    pub fn new(
        flat_contour: &[f32],
        flat_holes: &[f32],
        hole_sizes: &[u32],
    ) -> Result<NavMeshJs, JsError> {
        let mesh = build(flat_contour, flat_holes, hole_sizes)?;
        let graph = NavGraph::build(&mesh);
        Ok(NavMeshJs {
            mesh,
            graph,
            config: PathfindingConfig::default(),
        })
    }

    pub fn triangle_count(&self) -> u32 {
        self.mesh.len() as u32
    }

    /// Flat triangle corners, three points per triangle.
    pub fn triangles(&self) -> Vec<f32> {
        flat_triangles(&self.mesh)
    }

    /// Abort searches after this many node expansions.
    pub fn set_max_iterations(&mut self, n: u32) {
        self.config.astar.max_iterations = n as usize;
    }

    /// Smoothed path as [x0,y0, x1,y1, ...]. Throws when either point is
    /// outside the mesh or no path exists.
    pub fn find_path(&self, sx: f32, sy: f32, gx: f32, gy: f32) -> Result<Vec<f32>, JsError> {
        let path = self
            .graph
            .find_path(Point::new(sx, sy), Point::new(gx, gy), &self.config)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(path.iter().flat_map(|p| [p.x, p.y]).collect())
    }
}
