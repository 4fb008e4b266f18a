//! # Footprint Validation
//!
//! Simple-polygon checks for level footprints. Orientation tests go through
//! the `robust` exact predicates so a sliver self-intersection cannot slip
//! past floating-point noise.

use config::constants::{EPSILON, MIN_FOOTPRINT_VERTICES};
use glam::DVec2;
use robust::{orient2d, Coord};

fn coord(p: DVec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Exact orientation of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise, negative for clockwise, zero for
/// collinear.
pub fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(coord(a), coord(b), coord(c))
}

/// Signed area of a ring (shoelace). Positive for counter-clockwise.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Returns true if segment `(a, b)` properly intersects or overlaps `(c, d)`.
fn segments_cross(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    // Collinear cases: overlap counts as a crossing.
    let on_segment = |p: DVec2, q: DVec2, r: DVec2| -> bool {
        r.x <= p.x.max(q.x) + EPSILON
            && r.x >= p.x.min(q.x) - EPSILON
            && r.y <= p.y.max(q.y) + EPSILON
            && r.y >= p.y.min(q.y) - EPSILON
    };
    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}

/// Checks that a ring is a simple polygon.
///
/// Rejects rings with fewer than [`MIN_FOOTPRINT_VERTICES`] vertices,
/// duplicate consecutive points, near-zero area, and self-intersections.
///
/// # Returns
///
/// `Ok(())` for a simple ring, or the reason it is not.
pub fn check_simple(ring: &[DVec2]) -> Result<(), String> {
    let n = ring.len();
    if n < MIN_FOOTPRINT_VERTICES {
        return Err(format!("ring has {n} vertices, need at least {MIN_FOOTPRINT_VERTICES}"));
    }

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if a.distance_squared(b) < EPSILON {
            return Err(format!("duplicate consecutive vertices at index {i}"));
        }
    }

    if signed_area(ring).abs() < EPSILON {
        return Err("ring has zero area".to_string());
    }

    // O(N^2) pair test; footprints are small.
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip segments sharing a vertex with segment i.
            if j == i || (j + 1) % n == i || j == (i + 1) % n {
                continue;
            }
            let c = ring[j];
            let d = ring[(j + 1) % n];
            if segments_cross(a, b, c, d) {
                return Err(format!("edges {i} and {j} intersect"));
            }
        }
    }

    Ok(())
}
