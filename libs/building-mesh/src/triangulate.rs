//! # Polygon Triangulation
//!
//! Ear-clipping triangulation of simple polygons, used for flat roof caps
//! and for the flattened facets the skeleton solver produces. Emits
//! triangles over the ring's own vertices only; a simple N-gon always
//! yields exactly N - 2 triangles.

use config::constants::EPSILON;
use glam::DVec2;
use robust::{orient2d, Coord};

use crate::error::MeshError;

fn coord(p: DVec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(coord(a), coord(b), coord(c))
}

fn ring_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// True if `p` lies inside or on the boundary of triangle `(a, b, c)`,
/// which must be counter-clockwise.
fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    orientation(a, b, p) >= 0.0 && orientation(b, c, p) >= 0.0 && orientation(c, a, p) >= 0.0
}

/// Triangulates a simple polygon ring by ear clipping.
///
/// Accepts either winding and non-convex rings, including the many-vertex
/// facets produced by the skeleton solver. Returned triangles index into
/// `ring` and are counter-clockwise in its plane.
///
/// # Errors
///
/// Degenerate input (fewer than 3 vertices, duplicate consecutive points,
/// zero area) and non-simple rings yield [`MeshError::DegenerateGeometry`];
/// the caller reports, it never retries.
///
/// # Example
///
/// ```rust
/// use building_mesh::triangulate::triangulate_ring;
/// use glam::DVec2;
///
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let triangles = triangulate_ring(&square).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate_ring(ring: &[DVec2]) -> Result<Vec<[u32; 3]>, MeshError> {
    let n = ring.len();
    if n < 3 {
        return Err(MeshError::degenerate(format!(
            "cannot triangulate a ring of {n} vertices"
        )));
    }

    for i in 0..n {
        if ring[i].distance_squared(ring[(i + 1) % n]) < EPSILON {
            return Err(MeshError::degenerate(format!(
                "duplicate consecutive vertices at index {i}"
            )));
        }
    }

    let area = ring_area(ring);
    if area.abs() < EPSILON {
        return Err(MeshError::degenerate("ring has zero area"));
    }

    // Work on an index list in counter-clockwise order; emitted triangles
    // still index the caller's ring directly.
    let mut active: Vec<u32> = if area > 0.0 {
        (0..n as u32).collect()
    } else {
        (0..n as u32).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);

    while active.len() > 3 {
        let m = active.len();
        let mut clipped = false;

        for i in 0..m {
            let pi = active[(i + m - 1) % m];
            let ci = active[i];
            let ni = active[(i + 1) % m];
            let prev = ring[pi as usize];
            let curr = ring[ci as usize];
            let next = ring[ni as usize];

            let orient = orientation(prev, curr, next);
            if orient < 0.0 {
                continue; // reflex corner, not an ear
            }

            // Collinear corners clip immediately; their triangle is empty
            // but keeps the N - 2 count exact.
            let mut is_ear = true;
            if orient > 0.0 {
                for &other in &active {
                    if other == pi || other == ci || other == ni {
                        continue;
                    }
                    if point_in_triangle(ring[other as usize], prev, curr, next) {
                        is_ear = false;
                        break;
                    }
                }
            }

            if is_ear {
                triangles.push([pi, ci, ni]);
                active.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            // A full scan with no ear means the ring self-intersects.
            return Err(MeshError::degenerate(
                "no ear found; ring is not a simple polygon",
            ));
        }
    }

    triangles.push([active[0], active[1], active[2]]);
    Ok(triangles)
}

/// Sums the unsigned area of a triangulation over `ring`.
pub fn triangulated_area(ring: &[DVec2], triangles: &[[u32; 3]]) -> f64 {
    triangles
        .iter()
        .map(|t| {
            let a = ring[t[0] as usize];
            let b = ring[t[1] as usize];
            let c = ring[t[2] as usize];
            ((b - a).perp_dot(c - a) * 0.5).abs()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ring: &[DVec2]) {
        let triangles = triangulate_ring(ring).unwrap();
        assert_eq!(triangles.len(), ring.len() - 2);
        let area = triangulated_area(ring, &triangles);
        assert!(
            (area - ring_area(ring).abs()).abs() < 1e-9,
            "triangulated area {area} vs ring area {}",
            ring_area(ring).abs()
        );
    }

    #[test]
    fn test_triangle_passes_through() {
        let tri = [DVec2::ZERO, DVec2::X, DVec2::Y];
        let out = triangulate_ring(&tri).unwrap();
        assert_eq!(out, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_convex_rings() {
        assert_covers(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 3.0),
            DVec2::new(0.0, 3.0),
        ]);
        let hex: Vec<DVec2> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                DVec2::new(a.cos(), a.sin())
            })
            .collect();
        assert_covers(&hex);
    }

    #[test]
    fn test_reflex_ring() {
        assert_covers(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 6.0),
            DVec2::new(0.0, 6.0),
        ]);
    }

    #[test]
    fn test_clockwise_ring_is_accepted() {
        let mut square = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 3.0),
            DVec2::new(0.0, 3.0),
        ];
        square.reverse();
        assert_covers(&square);
    }

    #[test]
    fn test_collinear_vertex_keeps_count() {
        // Midpoint of the bottom edge is a genuine ring vertex.
        assert_covers(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 3.0),
            DVec2::new(0.0, 3.0),
        ]);
    }

    #[test]
    fn test_degenerate_input_is_reported() {
        assert!(triangulate_ring(&[DVec2::ZERO, DVec2::X]).is_err());
        assert!(triangulate_ring(&[DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)]).is_err());
        assert!(triangulate_ring(&[DVec2::ZERO, DVec2::ZERO, DVec2::X, DVec2::Y]).is_err());
    }

    #[test]
    fn test_spiky_ring() {
        // Star-like ring with alternating radii exercises many reflex ears.
        let star: Vec<DVec2> = (0..10)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 10.0;
                let r = if i % 2 == 0 { 4.0 } else { 1.5 };
                DVec2::new(a.cos() * r, a.sin() * r)
            })
            .collect();
        assert_covers(&star);
    }
}
