//! # Straight Skeleton Roof Solver
//!
//! Computes the roof formed when every edge of a closed footprint grows a
//! plane inward at its own slope until all planes meet: the general
//! hip/gable construction for contours the analytic extruder cannot
//! handle. The wavefront sweep lives in [`wavefront`], the index-arena
//! roofline graph in [`graph`]; this module owns the public API and facet
//! extraction.
//!
//! A slope of 90 degrees is a vertical plane (a gable wall); slopes must
//! be strictly above 0, since a flat plane never rises and has no meeting
//! point. Contours whose slopes are all 0 or all 90 are routed elsewhere
//! by the reconstructor and never reach this solver.

pub mod graph;
mod wavefront;

use config::constants::{EPSILON, VERTEX_MERGE_EPSILON};
use glam::{DVec2, DVec3};

use crate::error::MeshError;
use crate::triangulate::triangulate_ring;

use graph::{NodeId, SkeletonGraph};
use wavefront::{ContourEdge, Wavefront};

/// Input contour: a simple ring with one slope per edge.
///
/// Edge `i` joins `ring[i]` to `ring[(i + 1) % n]`. Winding may be either
/// way; the solver normalizes internally and facet indices always refer to
/// the caller's edge order.
#[derive(Debug, Clone)]
pub struct RoofContour {
    /// Footprint ring in the ground plane.
    pub ring: Vec<DVec2>,
    /// Slope per edge in degrees, each in (0, 90].
    pub slopes_deg: Vec<f64>,
}

/// One planar roof surface, bounded by its eave edge and skeleton arcs.
#[derive(Debug, Clone)]
pub struct RoofFacet {
    /// Index of the eave edge this facet grew from.
    pub edge: usize,
    /// Facet boundary in 3D, starting with the eave edge's two endpoints.
    pub ring: Vec<DVec3>,
    /// The ring unrolled into the facet plane: (along-eave, up-slope)
    /// meters. Doubles as texture coordinates.
    pub flat: Vec<DVec2>,
    /// Triangles over `ring`, wound for outward-facing normals.
    pub triangles: Vec<[u32; 3]>,
}

/// Solver output: the triangulated facet set and the ridge height.
#[derive(Debug, Clone)]
pub struct RoofMesh {
    /// Greatest height of any roofline vertex above the eave plane.
    pub max_height: f64,
    /// One facet per input edge.
    pub facets: Vec<RoofFacet>,
    /// The underlying roofline graph, exposed for diagnostics.
    pub graph: SkeletonGraph,
}

/// Runs the straight-skeleton construction for a contour.
///
/// # Errors
///
/// [`MeshError::SkeletonFailure`] when a slope is out of range, the
/// wavefront fails to collapse, the graph comes out empty, or a facet loop
/// does not close back to its eave edge. The failure is explicit; there is
/// no silent fallback roof.
///
/// # Example
///
/// ```rust
/// use building_mesh::skeleton::{solve_roof, RoofContour};
/// use glam::DVec2;
///
/// let contour = RoofContour {
///     ring: vec![
///         DVec2::new(0.0, 0.0),
///         DVec2::new(8.0, 0.0),
///         DVec2::new(8.0, 8.0),
///         DVec2::new(0.0, 8.0),
///     ],
///     slopes_deg: vec![45.0; 4],
/// };
/// let roof = solve_roof(&contour).unwrap();
/// assert!((roof.max_height - 4.0).abs() < 1e-6);
/// assert_eq!(roof.facets.len(), 4);
/// ```
pub fn solve_roof(contour: &RoofContour) -> Result<RoofMesh, MeshError> {
    let n = contour.ring.len();
    if n < 3 {
        return Err(MeshError::skeleton(format!(
            "contour has {n} vertices, need at least 3"
        )));
    }
    if contour.slopes_deg.len() != n {
        return Err(MeshError::skeleton(format!(
            "{} slopes for {n} edges",
            contour.slopes_deg.len()
        )));
    }
    for (i, &slope) in contour.slopes_deg.iter().enumerate() {
        if slope <= 0.0 {
            return Err(MeshError::skeleton(format!(
                "edge {i} has slope {slope}; a flat plane never meets the roof"
            )));
        }
        if slope > 90.0 {
            return Err(MeshError::skeleton(format!(
                "edge {i} has slope {slope}, beyond vertical"
            )));
        }
    }

    let (ring, slopes) = normalize_ccw(&contour.ring, &contour.slopes_deg);

    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let length = a.distance(b);
        if length < EPSILON {
            return Err(MeshError::skeleton(format!("edge {i} has zero length")));
        }
        let dir = (b - a) / length;
        let slope_rad = slopes[i].to_radians();
        let speed = if (slopes[i] - 90.0).abs() < EPSILON {
            0.0
        } else {
            slope_rad.cos() / slope_rad.sin()
        };
        edges.push(ContourEdge {
            origin: a,
            dir,
            normal: dir.perp(),
            speed,
        });
    }

    let mut graph = SkeletonGraph::new();
    let mut wavefront = Wavefront::new(&ring, edges.clone(), &mut graph);
    wavefront.propagate(&mut graph)?;

    if graph.arcs.is_empty() {
        return Err(MeshError::skeleton("empty roofline graph"));
    }

    let mut facets = Vec::with_capacity(n);
    for i in 0..n {
        let from = NodeId(((i + 1) % n) as u32);
        let to = NodeId(i as u32);
        let interior = graph
            .chain_face(i as u32, from, to)
            .map_err(MeshError::skeleton)?;

        let mut ring3d = Vec::with_capacity(interior.len() + 2);
        ring3d.push(graph.position(to));
        ring3d.push(graph.position(from));
        ring3d.extend(interior.iter().map(|&id| graph.position(id)));
        dedup_ring(&mut ring3d);
        if ring3d.len() < 3 {
            return Err(MeshError::skeleton(format!(
                "facet {i} collapsed to fewer than 3 vertices"
            )));
        }

        let (flat, triangles) = triangulate_facet(&ring3d, edges[i].dir)
            .map_err(|e| MeshError::skeleton(format!("facet {i}: {e}")))?;

        facets.push(RoofFacet {
            edge: i,
            ring: ring3d,
            flat,
            triangles,
        });
    }

    // Facet indices refer to the caller's edge order.
    if was_flipped(&contour.ring) {
        for facet in &mut facets {
            facet.edge = n - 1 - facet.edge;
        }
        facets.sort_by_key(|f| f.edge);
    }

    Ok(RoofMesh {
        max_height: graph.max_height(),
        facets,
        graph,
    })
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

fn was_flipped(ring: &[DVec2]) -> bool {
    ring_area(ring) < 0.0
}

/// Reverses a clockwise ring (keeping the first vertex) so edge `k` of the
/// reversed ring is edge `n - 1 - k` of the input, and permutes the slopes
/// to match.
fn normalize_ccw(ring: &[DVec2], slopes: &[f64]) -> (Vec<DVec2>, Vec<f64>) {
    if !was_flipped(ring) {
        return (ring.to_vec(), slopes.to_vec());
    }
    let n = ring.len();
    let mut flipped = Vec::with_capacity(n);
    flipped.push(ring[0]);
    for i in (1..n).rev() {
        flipped.push(ring[i]);
    }
    let permuted = (0..n).map(|k| slopes[n - 1 - k]).collect();
    (flipped, permuted)
}

fn dedup_ring(ring: &mut Vec<DVec3>) {
    ring.dedup_by(|a, b| a.distance(*b) < VERTEX_MERGE_EPSILON);
    if ring.len() > 1 {
        let first = ring[0];
        if ring.last().unwrap().distance(first) < VERTEX_MERGE_EPSILON {
            ring.pop();
        }
    }
}

/// Unrolls a planar facet into (along-eave, up-slope) coordinates and
/// triangulates it there. Well-defined even for vertical gable facets,
/// whose plan projection is a line.
fn triangulate_facet(
    ring3d: &[DVec3],
    eave_dir: DVec2,
) -> Result<(Vec<DVec2>, Vec<[u32; 3]>), MeshError> {
    let origin = ring3d[0];
    let axis = DVec3::new(eave_dir.x, 0.0, eave_dir.y);
    let mut flat = Vec::with_capacity(ring3d.len());
    for &p in ring3d {
        let rel = p - origin;
        let s = rel.dot(axis);
        let up = (rel - s * axis).length();
        flat.push(DVec2::new(s, up));
    }
    let mut triangles = triangulate_ring(&flat)?;
    // Counter-clockwise in unrolled space faces into the building; flip
    // for outward normals.
    for tri in &mut triangles {
        tri.swap(1, 2);
    }
    Ok((flat, triangles))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f64, d: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(w, 0.0),
            DVec2::new(w, d),
            DVec2::new(0.0, d),
        ]
    }

    fn plan_area(facets: &[RoofFacet]) -> f64 {
        // Projected (plan) area of every facet triangle.
        facets
            .iter()
            .map(|f| {
                f.triangles
                    .iter()
                    .map(|t| {
                        let a = f.ring[t[0] as usize];
                        let b = f.ring[t[1] as usize];
                        let c = f.ring[t[2] as usize];
                        let ab = DVec2::new(b.x - a.x, b.z - a.z);
                        let ac = DVec2::new(c.x - a.x, c.z - a.z);
                        (ab.perp_dot(ac) * 0.5).abs()
                    })
                    .sum::<f64>()
            })
            .sum()
    }

    #[test]
    fn test_square_pyramid() {
        let contour = RoofContour {
            ring: rect(8.0, 8.0),
            slopes_deg: vec![45.0; 4],
        };
        let roof = solve_roof(&contour).unwrap();
        assert!((roof.max_height - 4.0).abs() < 1e-6);
        assert_eq!(roof.facets.len(), 4);
        for facet in &roof.facets {
            assert_eq!(facet.ring.len(), 3);
            assert_eq!(facet.triangles.len(), 1);
        }
        assert!((plan_area(&roof.facets) - 64.0).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_hip() {
        let contour = RoofContour {
            ring: rect(10.0, 6.0),
            slopes_deg: vec![30.0; 4],
        };
        let roof = solve_roof(&contour).unwrap();
        let expected = 3.0 * 30.0_f64.to_radians().tan();
        assert!((roof.max_height - expected).abs() < 1e-6);
        assert_eq!(roof.facets.len(), 4);
        // Long sides are trapezoids, short sides triangles.
        assert_eq!(roof.facets[0].ring.len(), 4);
        assert_eq!(roof.facets[1].ring.len(), 3);
        assert!((plan_area(&roof.facets) - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_gable_with_vertical_ends() {
        let contour = RoofContour {
            ring: rect(10.0, 6.0),
            slopes_deg: vec![40.0, 90.0, 40.0, 90.0],
        };
        let roof = solve_roof(&contour).unwrap();
        let expected = 3.0 * 40.0_f64.to_radians().tan();
        assert!((roof.max_height - expected).abs() < 1e-6);
        // Gable ends stay in their vertical planes.
        let gable = &roof.facets[1];
        assert_eq!(gable.ring.len(), 3);
        assert!(gable.ring.iter().all(|p| (p.x - 10.0).abs() < 1e-6));
        // Roof planes span eave to ridge.
        let side = &roof.facets[0];
        assert_eq!(side.ring.len(), 4);
    }

    #[test]
    fn test_hexagon_peak() {
        let ring: Vec<DVec2> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                DVec2::new(a.cos() * 5.0, a.sin() * 5.0)
            })
            .collect();
        let contour = RoofContour {
            ring,
            slopes_deg: vec![35.0; 6],
        };
        let roof = solve_roof(&contour).unwrap();
        assert_eq!(roof.facets.len(), 6);
        for facet in &roof.facets {
            assert_eq!(facet.ring.len(), 3, "hexagon facets are triangles");
        }
        // One peak above the eave ring: exactly 7 nodes in the graph.
        assert_eq!(roof.graph.nodes.len(), 7);
        let apothem = 5.0 * (std::f64::consts::PI / 6.0).cos();
        let expected = apothem * 35.0_f64.to_radians().tan();
        assert!((roof.max_height - expected).abs() < 1e-6);
    }

    #[test]
    fn test_l_shape_with_split_event() {
        let contour = RoofContour {
            ring: vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(6.0, 0.0),
                DVec2::new(6.0, 2.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(2.0, 6.0),
                DVec2::new(0.0, 6.0),
            ],
            slopes_deg: vec![45.0; 6],
        };
        let roof = solve_roof(&contour).unwrap();
        assert_eq!(roof.facets.len(), 6);
        assert!((roof.max_height - 1.0).abs() < 1e-6);
        assert!((plan_area(&roof.facets) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_clockwise_input_matches_ccw() {
        let ccw = RoofContour {
            ring: rect(10.0, 6.0),
            slopes_deg: vec![30.0, 60.0, 30.0, 60.0],
        };
        let mut cw_ring = ccw.ring.clone();
        cw_ring[1..].reverse();
        // Edge k of the reversed ring is edge n-1-k of the original.
        let cw = RoofContour {
            ring: cw_ring,
            slopes_deg: vec![60.0, 30.0, 60.0, 30.0],
        };
        let a = solve_roof(&ccw).unwrap();
        let b = solve_roof(&cw).unwrap();
        assert!((a.max_height - b.max_height).abs() < 1e-9);
        assert_eq!(a.facets.len(), b.facets.len());
    }

    #[test]
    fn test_flat_edge_is_rejected() {
        let contour = RoofContour {
            ring: rect(10.0, 6.0),
            slopes_deg: vec![0.0, 45.0, 45.0, 45.0],
        };
        let err = solve_roof(&contour).unwrap_err();
        assert!(matches!(err, MeshError::SkeletonFailure { .. }));
    }

    #[test]
    fn test_outward_normals() {
        let contour = RoofContour {
            ring: rect(8.0, 8.0),
            slopes_deg: vec![45.0; 4],
        };
        let roof = solve_roof(&contour).unwrap();
        for facet in &roof.facets {
            for tri in &facet.triangles {
                let a = facet.ring[tri[0] as usize];
                let b = facet.ring[tri[1] as usize];
                let c = facet.ring[tri[2] as usize];
                let normal = (b - a).cross(c - a);
                assert!(normal.y > 0.0, "roof triangles face upward");
            }
        }
    }
}
