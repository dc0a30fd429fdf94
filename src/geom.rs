// Copyright 2025 Lars Brubaker
// License: MIT
//
// Geometry kernel: points and the orientation / in-circle / scan-area
// predicates used by the sweep. All predicates are stateless.
//
// Coordinates are single precision. The orientation tolerance is a fixed
// constant; changing it changes which inputs are reported as collinear.

use serde::{Deserialize, Serialize};

pub type Real = f32;

/// Tolerance band around zero for the orientation determinant.
pub const EPSILON: Real = 1e-12;

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn distance_sq(&self, other: &Point) -> Real {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> Real {
        self.distance_sq(other).sqrt()
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point { x, y }
    }
}

impl From<[Real; 2]> for Point {
    fn from([x, y]: [Real; 2]) -> Self {
        Point { x, y }
    }
}

/// Turn direction of an ordered point triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Cw,
    Ccw,
    Collinear,
}

/// Orientation of (pa, pb, pc) from the sign of twice their signed area.
/// Values inside (-EPSILON, EPSILON) are reported as collinear.
pub fn orient2d(pa: &Point, pb: &Point, pc: &Point) -> Orientation {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let val = detleft - detright;
    if val > -EPSILON && val < EPSILON {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Ccw
    } else {
        Orientation::Cw
    }
}

/// Returns true if `pd` lies strictly inside the circle through pa, pb, pc.
///
/// Requires pa, pb, pc to form a CCW triangle with pd on the opposite side
/// of edge bc from pa. Under that precondition pd can only be inside the
/// circle if it is left of both ab and ca, so those two half-plane tests
/// reject early before the full determinant is evaluated.
/// A point exactly on the circle is not inside.
pub fn in_circle(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> bool {
    let adx = pa.x - pd.x;
    let ady = pa.y - pd.y;
    let bdx = pb.x - pd.x;
    let bdy = pb.y - pd.y;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let oabd = adxbdy - bdxady;
    if oabd <= 0.0 {
        return false;
    }

    let cdx = pc.x - pd.x;
    let cdy = pc.y - pd.y;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let ocad = cdxady - adxcdy;
    if ocad <= 0.0 {
        return false;
    }

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * ocad + clift * oabd;
    det > 0.0
}

/// Returns true if `pd` lies strictly inside the wedge at `pa` spanned by
/// pb and pc (the area a flip of edge bc may sweep through).
pub fn in_scan_area(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> bool {
    let oadb = (pa.x - pb.x) * (pd.y - pb.y) - (pd.x - pb.x) * (pa.y - pb.y);
    if oadb >= -EPSILON {
        return false;
    }
    let oadc = (pa.x - pc.x) * (pd.y - pc.y) - (pd.x - pc.x) * (pa.y - pc.y);
    if oadc <= EPSILON {
        return false;
    }
    true
}

/// Returns true if the angle at `pa` between pb and pc exceeds 90 degrees.
#[inline]
pub fn is_angle_obtuse(pa: &Point, pb: &Point, pc: &Point) -> bool {
    let ax = pb.x - pa.x;
    let ay = pb.y - pa.y;
    let bx = pc.x - pa.x;
    let by = pc.y - pa.y;
    (ax * bx + ay * by) < 0.0
}

/// Cross product of (p1 - p3) and (p2 - p3).
#[inline]
fn product(p1: &Point, p2: &Point, p3: &Point) -> Real {
    (p1.x - p3.x) * (p2.y - p3.y) - (p1.y - p3.y) * (p2.x - p3.x)
}

/// Inclusive point-in-triangle test for either winding of (a, b, c).
pub fn point_in_triangle(a: &Point, b: &Point, c: &Point, p: &Point) -> bool {
    if product(a, b, c) >= 0.0 {
        product(a, b, p) >= 0.0 && product(b, c, p) >= 0.0 && product(c, a, p) >= 0.0
    } else {
        product(a, b, p) <= 0.0 && product(b, c, p) <= 0.0 && product(c, a, p) <= 0.0
    }
}

/// Mean of the three corners.
#[inline]
pub fn centroid(a: &Point, b: &Point, c: &Point) -> Point {
    Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Signed area of triangle (a, b, c); positive when CCW.
#[inline]
pub fn signed_area(a: &Point, b: &Point, c: &Point) -> Real {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Signed area of a closed ring (shoelace formula); positive when CCW.
pub fn ring_area(ring: &[Point]) -> Real {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}
