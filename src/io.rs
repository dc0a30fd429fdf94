// Copyright 2025 Lars Brubaker
// License: MIT
//
// Text import of point rings and Wavefront OBJ export of a triangulation.

use std::collections::HashMap;
use std::io::Write;

use crate::cdt::Triangulation;
use crate::error::{Error, Result};
use crate::geom::{Point, Real};

/// Parse one ring per non-empty line. Coordinates are separated by spaces
/// or commas and read in (x, y) pairs; an unpaired trailing value is
/// dropped.
///
/// The first ring is conventionally the outer contour, the rest holes.
pub fn parse_point_rings(text: &str) -> Result<Vec<Vec<Point>>> {
    let mut rings = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let values = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Real>().map_err(|e| Error::Parse {
                    line: n + 1,
                    message: format!("{:?}: {}", s, e),
                })
            })
            .collect::<Result<Vec<Real>>>()?;
        let ring: Vec<Point> = values
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect();
        rings.push(ring);
    }
    Ok(rings)
}

/// Write `mesh` as OBJ: each used vertex once as `v x y 0`, numbered from 1
/// in order of first use, then one `f a b c` line per triangle.
pub fn write_obj<W: Write>(out: &mut W, mesh: &Triangulation) -> Result<()> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut used: Vec<u32> = Vec::new();
    let mut faces = Vec::with_capacity(mesh.len());
    for tri in mesh.triangles() {
        let face = tri.vertices.map(|v| {
            *index.entry(v).or_insert_with(|| {
                used.push(v);
                used.len()
            })
        });
        faces.push(face);
    }

    for v in used {
        let p = mesh.points()[v as usize];
        writeln!(out, "v {} {} 0", p.x, p.y)?;
    }
    for [a, b, c] in faces {
        writeln!(out, "f {} {} {}", a, b, c)?;
    }
    Ok(())
}
