//! # Level Extrusion
//!
//! Analytic "upper polygon" construction for levels the skeleton solver is
//! not needed for: at most 4 edges, or all-vertical walls. Each footprint
//! vertex rises along the intersection line of its two adjacent roof
//! planes, the closed-form version of the N-way plane meeting the skeleton
//! handles.
//!
//! The upper polygon is linear in the rise, so the first height at which
//! an upper edge's length reaches zero is where the roof closes into a
//! ridge; the extrusion is capped there instead of pushing planes past
//! each other.

use config::constants::EPSILON;
use glam::{DQuat, DVec3};

use crate::error::MeshError;

/// Result of extruding one story.
#[derive(Debug, Clone)]
pub struct Extrusion {
    /// Upper ring, one vertex per lower vertex. Collapsed edges leave
    /// coincident vertices, keeping edge correspondence intact.
    pub upper: Vec<DVec3>,
    /// Achieved rise; equals the requested story height unless the roof
    /// closed earlier.
    pub rise: f64,
    /// True when the roof closed below the requested story height.
    pub closed: bool,
}

/// Rotation of the up vector about an edge's direction by its slope,
/// giving the edge's roof-plane normal. Slope 90 yields the horizontal
/// outward normal of a vertical wall.
fn plane_normal(edge_dir: DVec3, slope_deg: f64) -> DVec3 {
    DQuat::from_axis_angle(edge_dir, -slope_deg.to_radians()) * DVec3::Y
}

/// Extrudes one story of a level footprint.
///
/// `ring` is the lower ring (counter-clockwise in plan, any base height);
/// `slopes_deg[i]` belongs to the edge from `ring[i]` to the next vertex.
///
/// Per vertex: both adjacent slopes 90 translates straight up; otherwise
/// the two adjacent plane normals are crossed for the roofline direction,
/// scaled so one meter of the direction is one meter of rise. Anti-parallel
/// normals (parallel planes, cross product near zero) fall back to the
/// straight-up translation.
///
/// # Example
///
/// ```rust
/// use building_mesh::extrude::extrude_story;
/// use glam::DVec3;
///
/// let ring = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(10.0, 0.0, 0.0),
///     DVec3::new(10.0, 0.0, 6.0),
///     DVec3::new(0.0, 0.0, 6.0),
/// ];
/// let out = extrude_story(&ring, &[90.0; 4], 3.0).unwrap();
/// assert!(!out.closed);
/// assert_eq!(out.upper[0], DVec3::new(0.0, 3.0, 0.0));
/// ```
pub fn extrude_story(
    ring: &[DVec3],
    slopes_deg: &[f64],
    story_height: f64,
) -> Result<Extrusion, MeshError> {
    let n = ring.len();
    if n < 3 {
        return Err(MeshError::degenerate(format!(
            "cannot extrude a ring of {n} vertices"
        )));
    }
    if slopes_deg.len() != n {
        return Err(MeshError::degenerate(format!(
            "{} slopes for {n} edges",
            slopes_deg.len()
        )));
    }
    if story_height <= 0.0 {
        return Err(MeshError::degenerate("story height must be positive"));
    }

    let mut edge_dirs = Vec::with_capacity(n);
    for i in 0..n {
        let mut d = ring[(i + 1) % n] - ring[i];
        d.y = 0.0;
        let length = d.length();
        if length < EPSILON {
            return Err(MeshError::degenerate(format!("edge {i} has zero length")));
        }
        edge_dirs.push(d / length);
    }

    // Per-vertex rise direction, scaled so the vertical component is 1.
    let mut dirs = Vec::with_capacity(n);
    for i in 0..n {
        let prev_edge = (i + n - 1) % n;
        let slope_prev = slopes_deg[prev_edge];
        let slope_next = slopes_deg[i];

        if slope_prev == 90.0 && slope_next == 90.0 {
            dirs.push(DVec3::Y);
            continue;
        }

        let n_prev = plane_normal(edge_dirs[prev_edge], slope_prev);
        let n_next = plane_normal(edge_dirs[i], slope_next);
        let mut cross = n_prev.cross(n_next);
        if cross.length() < EPSILON || cross.y.abs() < EPSILON {
            // Parallel planes: no unique roofline at this vertex.
            dirs.push(DVec3::Y);
            continue;
        }
        if cross.y < 0.0 {
            cross = -cross;
        }
        dirs.push(cross / cross.y);
    }

    // Upper edge lengths are linear in the rise; the earliest collapse
    // caps the story.
    let mut rise = story_height;
    let mut closed = false;
    for i in 0..n {
        let j = (i + 1) % n;
        let length0 = (ring[j] - ring[i]).dot(edge_dirs[i]);
        let shrink = (dirs[j] - dirs[i]).dot(edge_dirs[i]);
        if shrink < -EPSILON {
            let k = -length0 / shrink;
            if k > EPSILON && k < rise - EPSILON {
                rise = k;
                closed = true;
            } else if k > EPSILON && (k - rise).abs() <= EPSILON {
                closed = true;
            }
        }
    }

    let upper = (0..n).map(|i| ring[i] + rise * dirs[i]).collect();
    Ok(Extrusion {
        upper,
        rise,
        closed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_ring(w: f64, d: f64) -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(w, 0.0, 0.0),
            DVec3::new(w, 0.0, d),
            DVec3::new(0.0, 0.0, d),
        ]
    }

    #[test]
    fn test_vertical_walls_translate_up() {
        let ring = rect_ring(10.0, 6.0);
        let out = extrude_story(&ring, &[90.0; 4], 2.8).unwrap();
        assert!(!out.closed);
        assert_eq!(out.rise, 2.8);
        for (lower, upper) in ring.iter().zip(&out.upper) {
            assert!((*upper - *lower - DVec3::new(0.0, 2.8, 0.0)).length() < 1e-12);
        }
    }

    #[test]
    fn test_rectangle_ridge_closes_at_half_width() {
        // All edges at 30 degrees: the roof closes into a ridge at
        // half-width * tan(30), well below the requested story height.
        let ring = rect_ring(10.0, 6.0);
        let out = extrude_story(&ring, &[30.0; 4], 3.0).unwrap();
        let expected = 3.0 * 30.0_f64.to_radians().tan();
        assert!(out.closed);
        assert!((out.rise - expected).abs() < 1e-9);
        // Short edges collapse: their endpoints meet on the ridge.
        assert!(out.upper[1].distance(out.upper[2]) < 1e-9);
        assert!(out.upper[3].distance(out.upper[0]) < 1e-9);
        // Ridge runs along the centerline z = 3.
        assert!((out.upper[0].z - 3.0).abs() < 1e-9);
        assert!((out.upper[1].z - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_gable_with_vertical_ends() {
        let ring = rect_ring(10.0, 6.0);
        let out = extrude_story(&ring, &[40.0, 90.0, 40.0, 90.0], 5.0).unwrap();
        let expected = 3.0 * 40.0_f64.to_radians().tan();
        assert!(out.closed);
        assert!((out.rise - expected).abs() < 1e-9);
        // Gable ends stay in their wall planes.
        assert!((out.upper[1].x - 10.0).abs() < 1e-9);
        assert!((out.upper[0].x - 0.0).abs() < 1e-9);
        // Long edges survive as the two sides of the ridge.
        assert!(out.upper[0].distance(out.upper[1]) > 1.0);
    }

    #[test]
    fn test_shed_roof_single_pitch() {
        // One sloped edge, three vertical: a shed roof that never closes
        // within one story.
        let ring = rect_ring(10.0, 6.0);
        let out = extrude_story(&ring, &[30.0, 90.0, 90.0, 90.0], 1.0).unwrap();
        assert!(!out.closed);
        // Front vertices lean inward, back vertices go straight up.
        assert!(out.upper[0].z > 0.0);
        assert!((out.upper[2].z - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_antiparallel_fallback_goes_straight_up() {
        // A collinear vertex between two same-slope edges has parallel
        // plane normals; it translates straight up.
        let ring = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 6.0),
        ];
        let out = extrude_story(&ring, &[40.0, 40.0, 90.0, 90.0], 0.5).unwrap();
        let moved = out.upper[1] - ring[1];
        assert!((moved.x).abs() < 1e-9);
        assert!((moved.z).abs() < 1e-9);
        assert!((moved.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_input_is_rejected() {
        assert!(extrude_story(&[], &[], 3.0).is_err());
        let ring = rect_ring(4.0, 4.0);
        assert!(extrude_story(&ring, &[90.0; 3], 3.0).is_err());
        assert!(extrude_story(&ring, &[90.0; 4], 0.0).is_err());
    }

    #[test]
    fn test_base_height_is_preserved() {
        let ring: Vec<DVec3> = rect_ring(8.0, 8.0)
            .into_iter()
            .map(|p| p + DVec3::new(0.0, 6.0, 0.0))
            .collect();
        let out = extrude_story(&ring, &[90.0; 4], 3.0).unwrap();
        assert!((out.upper[0].y - 9.0).abs() < 1e-12);
    }
}
