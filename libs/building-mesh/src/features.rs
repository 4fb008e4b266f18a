//! # Edge Feature Layout
//!
//! Turns one edge of a level, given as a 3D wall quad, into positioned and
//! UV-mapped panels: walls, windows, doors, posts, gaps. A façade image on
//! the edge short-circuits the discrete features entirely and stretches a
//! single textured quad across the edge.
//!
//! Widths are authored either fixed (meters) or proportional (weights over
//! whatever length the fixed features leave). Wall panel UVs are in meters
//! so textures tile physically; façade UVs are normalized across the edge
//! and tile once per story vertically.

use config::constants::{DOOR_MATERIAL, EPSILON, VERTEX_MERGE_EPSILON, WINDOW_MATERIAL};
use glam::{DVec2, DVec3};

use building_plan::{Edge, EdgeFeature, FeatureKind, FeatureWidth};

use crate::batch::MeshBatcher;
use crate::materials::{MaterialCatalog, MaterialId};

/// One edge of a level as a 3D quad: two bottom corners, two top corners.
///
/// `a` is the edge's start vertex, `b` its end, in footprint order. The
/// top corners may coincide (a collapsed ridge edge); panels then emit as
/// gable triangles.
#[derive(Debug, Clone, Copy)]
pub struct WallQuad {
    /// Bottom corner at the edge start.
    pub bottom_a: DVec3,
    /// Bottom corner at the edge end.
    pub bottom_b: DVec3,
    /// Top corner above the edge start.
    pub top_a: DVec3,
    /// Top corner above the edge end.
    pub top_b: DVec3,
}

impl WallQuad {
    /// Bilinear point: `h` along the edge, `v` bottom to top.
    fn point(&self, h: f64, v: f64) -> DVec3 {
        let bottom = self.bottom_a.lerp(self.bottom_b, h);
        let top = self.top_a.lerp(self.top_b, h);
        bottom.lerp(top, v)
    }

    /// Length of the bottom edge in 3D.
    pub fn length(&self) -> f64 {
        self.bottom_a.distance(self.bottom_b)
    }

    /// Average panel height, used for meter-based vertical UVs.
    fn height(&self) -> f64 {
        (self.top_a.distance(self.bottom_a) + self.top_b.distance(self.bottom_b)) * 0.5
    }
}

/// Resolves authored feature widths against an edge length.
///
/// Fixed widths are taken as-is; the remaining length (clamped to zero
/// when fixed widths overrun the edge) is split across proportional
/// features by weight.
///
/// # Example
///
/// ```rust
/// use building_mesh::features::resolve_widths;
/// use building_plan::EdgeFeature;
///
/// let features = vec![
///     EdgeFeature::door(1.0, 0.8),
///     EdgeFeature::full_wall(),
///     EdgeFeature::full_wall(),
/// ];
/// let widths = resolve_widths(&features, 10.0);
/// assert_eq!(widths, vec![1.0, 4.5, 4.5]);
/// ```
pub fn resolve_widths(features: &[EdgeFeature], edge_length: f64) -> Vec<f64> {
    let fixed_sum: f64 = features
        .iter()
        .filter_map(|f| match f.width {
            FeatureWidth::Fixed(w) => Some(w),
            FeatureWidth::Proportional(_) => None,
        })
        .sum();
    let weight_sum: f64 = features
        .iter()
        .filter_map(|f| match f.width {
            FeatureWidth::Proportional(w) => Some(w),
            FeatureWidth::Fixed(_) => None,
        })
        .sum();
    let remaining = (edge_length - fixed_sum).max(0.0);

    features
        .iter()
        .map(|f| match f.width {
            FeatureWidth::Fixed(w) => w,
            FeatureWidth::Proportional(w) => {
                if weight_sum > EPSILON {
                    remaining * w / weight_sum
                } else {
                    0.0
                }
            }
        })
        .collect()
}

/// Looks up a material, degrading to the placeholder and recording the
/// name when the asset is missing.
pub(crate) fn resolve_material(
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    name: &str,
) -> MaterialId {
    match catalog.lookup(name) {
        Some(id) => id,
        None => {
            if !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
            catalog.placeholder()
        }
    }
}

/// Emits one panel of the quad; a collapsed top edge becomes a triangle.
#[allow(clippy::too_many_arguments)]
fn emit_panel(
    batcher: &mut MeshBatcher,
    material: MaterialId,
    quad: &WallQuad,
    h: [f64; 2],
    v: [f64; 2],
    u_m: [f64; 2],
    v_m: [f64; 2],
) {
    // Viewed from outside the building, the edge runs right to left, so
    // the front-facing corner order starts at the far end.
    let bl = quad.point(h[1], v[0]);
    let br = quad.point(h[0], v[0]);
    let tr = quad.point(h[0], v[1]);
    let tl = quad.point(h[1], v[1]);
    if bl.distance(br) < VERTEX_MERGE_EPSILON {
        return;
    }
    if tr.distance(tl) < VERTEX_MERGE_EPSILON {
        batcher.add_triangle(
            material,
            [bl, br, tr],
            [
                DVec2::new(u_m[1], v_m[0]),
                DVec2::new(u_m[0], v_m[0]),
                DVec2::new(u_m[0], v_m[1]),
            ],
        );
        return;
    }
    batcher.add_quad(material, [bl, br, tr, tl], [u_m[1], u_m[0]], v_m);
}

/// Lays out one edge: either the façade short-circuit or the feature walk.
///
/// `facade_tiles` is the vertical façade repeat count, one per story for
/// the uniform whole-level quad, 1 for per-story quads. Materials that are
/// not in the catalog degrade to the placeholder and their names are
/// appended to `missing`.
pub fn layout_edge(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    quad: &WallQuad,
    edge: &Edge,
    facade_tiles: f64,
) {
    let length = quad.length();
    if length < EPSILON {
        return;
    }

    // Façade wins over features: one stretched quad, normalized U,
    // one vertical tile per story.
    if let Some(facade) = &edge.facade {
        let material = resolve_material(catalog, missing, facade);
        emit_panel(
            batcher,
            material,
            quad,
            [0.0, 1.0],
            [0.0, 1.0],
            [0.0, 1.0],
            [0.0, facade_tiles],
        );
        return;
    }

    let wall_material = resolve_material(catalog, missing, &edge.material);
    if edge.features.is_empty() {
        // A bare edge is a single full panel (sloped roof planes land
        // here).
        emit_panel(
            batcher,
            wall_material,
            quad,
            [0.0, 1.0],
            [0.0, 1.0],
            [0.0, length],
            [0.0, quad.height()],
        );
        return;
    }

    let widths = resolve_widths(&edge.features, length);
    let height = quad.height();
    let mut cursor = 0.0;

    for (feature, &width) in edge.features.iter().zip(&widths) {
        let x0 = cursor;
        let x1 = (cursor + width).min(length);
        cursor += width;
        if x1 - x0 < EPSILON {
            continue;
        }
        let h = [x0 / length, x1 / length];
        let [vf1, vf2] = feature.vertical;

        match feature.kind {
            FeatureKind::Gap => {}
            FeatureKind::Wall | FeatureKind::Post => {
                emit_panel(
                    batcher,
                    wall_material,
                    quad,
                    h,
                    [0.0, 1.0],
                    [x0, x1],
                    [0.0, height],
                );
            }
            FeatureKind::Window => {
                let glazing = resolve_material(catalog, missing, WINDOW_MATERIAL);
                if vf1 > EPSILON {
                    emit_panel(
                        batcher,
                        wall_material,
                        quad,
                        h,
                        [0.0, vf1],
                        [x0, x1],
                        [0.0, vf1 * height],
                    );
                }
                emit_panel(
                    batcher,
                    glazing,
                    quad,
                    h,
                    [vf1, vf2],
                    [x0, x1],
                    [0.0, (vf2 - vf1) * height],
                );
                if vf2 < 1.0 - EPSILON {
                    emit_panel(
                        batcher,
                        wall_material,
                        quad,
                        h,
                        [vf2, 1.0],
                        [x0, x1],
                        [vf2 * height, height],
                    );
                }
            }
            FeatureKind::Door => {
                let door = resolve_material(catalog, missing, DOOR_MATERIAL);
                emit_panel(
                    batcher,
                    door,
                    quad,
                    h,
                    [0.0, vf2],
                    [x0, x1],
                    [0.0, vf2 * height],
                );
                if vf2 < 1.0 - EPSILON {
                    emit_panel(
                        batcher,
                        wall_material,
                        quad,
                        h,
                        [vf2, 1.0],
                        [x0, x1],
                        [vf2 * height, height],
                    );
                }
            }
        }
    }
}
