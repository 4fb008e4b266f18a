//! # Building Reconstruction
//!
//! The top-level driver: walks a finalized plan level by level, picks the
//! roof/wall strategy each level was tagged with, and accumulates all
//! emitted geometry into one material-batched mesh set.
//!
//! A reconstructor is a small state machine (`Unbuilt -> Built ->
//! Unbuilt`). Failed builds leave no partial geometry behind and retain
//! the failure message for the host to surface.

use std::sync::Mutex;

use glam::{DVec2, DVec3};
use rayon::prelude::*;

use building_plan::{BuildingPlan, LevelMeta, RoofStrategy};
use config::constants::EPSILON;

use crate::batch::{BatchKey, MeshBatch, MeshBatcher};
use crate::error::MeshError;
use crate::extrude::extrude_story;
use crate::features::{layout_edge, resolve_material, WallQuad};
use crate::materials::MaterialCatalog;
use crate::skeleton::{solve_roof, RoofContour};
use crate::terrain::TerrainSampler;
use crate::triangulate::triangulate_ring;

/// Lifecycle state of a reconstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// No geometry exists.
    Unbuilt,
    /// Geometry exists and is owned by the reconstructor.
    Built,
}

/// The output of a successful build.
#[derive(Debug, Clone)]
pub struct BuiltGeometry {
    /// One growable buffer per (material, primitive type).
    pub batches: Vec<(BatchKey, MeshBatch)>,
    /// Height of the highest point above the building base, in meters.
    pub max_height: f64,
    /// World-space origin: the anchor seated on the terrain, dropped to
    /// the lowest sampled footprint altitude.
    pub origin: DVec3,
    /// Names of materials/façades that degraded to the placeholder.
    pub missing_assets: Vec<String>,
}

impl BuiltGeometry {
    /// Total vertex count across all batches.
    pub fn total_vertices(&self) -> usize {
        self.batches.iter().map(|(_, b)| b.vertices.len()).sum()
    }

    /// Total triangle count across all batches.
    pub fn total_triangles(&self) -> usize {
        self.batches
            .iter()
            .filter(|((_, topo), _)| *topo == crate::batch::PrimitiveTopology::TriangleList)
            .map(|(_, b)| b.indices.len() / 3)
            .sum()
    }
}

/// Rebuilds one building from its plan.
///
/// # Example
///
/// ```rust
/// use building_mesh::reconstruct::BuildingReconstructor;
/// use building_mesh::materials::MaterialCatalog;
/// use building_mesh::terrain::FlatTerrain;
/// use building_plan::{BuildingPlan, Level};
/// use glam::DVec2;
///
/// let plan = BuildingPlan::new(
///     DVec2::ZERO,
///     vec![Level::prism(
///         vec![
///             DVec2::new(0.0, 0.0),
///             DVec2::new(8.0, 0.0),
///             DVec2::new(8.0, 5.0),
///             DVec2::new(0.0, 5.0),
///         ],
///         2,
///         3.0,
///         "brick",
///     )],
/// );
/// let mut catalog = MaterialCatalog::new();
/// catalog.get_or_create("brick");
/// let mut building = BuildingReconstructor::new(plan);
/// building
///     .create_geometry(&FlatTerrain::at(0.0), &catalog)
///     .unwrap();
/// assert!(building.geometry().unwrap().max_height > 5.9);
/// ```
#[derive(Debug)]
pub struct BuildingReconstructor {
    plan: BuildingPlan,
    state: BuildState,
    geometry: Option<BuiltGeometry>,
    last_error: Option<String>,
}

impl BuildingReconstructor {
    /// Wraps a plan; no geometry is built yet.
    pub fn new(plan: BuildingPlan) -> Self {
        Self {
            plan,
            state: BuildState::Unbuilt,
            geometry: None,
            last_error: None,
        }
    }

    /// The authored plan.
    pub fn plan(&self) -> &BuildingPlan {
        &self.plan
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The built geometry, if any.
    pub fn geometry(&self) -> Option<&BuiltGeometry> {
        self.geometry.as_ref()
    }

    /// Builds the full mesh set for the plan.
    ///
    /// Any failure aborts the whole build with no side effects: previous
    /// geometry (if any) is kept, the state does not change, and the
    /// rendered error is retained for [`Self::last_error`].
    pub fn create_geometry(
        &mut self,
        terrain: &dyn TerrainSampler,
        catalog: &MaterialCatalog,
    ) -> Result<(), MeshError> {
        match build(&self.plan, terrain, catalog) {
            Ok(geometry) => {
                self.geometry = Some(geometry);
                self.state = BuildState::Built;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Releases all mesh buffers.
    pub fn destroy_geometry(&mut self) {
        self.geometry = None;
        self.state = BuildState::Unbuilt;
    }

    /// Re-seats the building on updated terrain without regenerating any
    /// geometry. Does not change the lifecycle state.
    pub fn adjust_height(&mut self, terrain: &dyn TerrainSampler) -> Result<(), MeshError> {
        let Some(geometry) = self.geometry.as_mut() else {
            self.last_error = Some(MeshError::NotBuilt.to_string());
            return Err(MeshError::NotBuilt);
        };
        geometry.origin = seat_origin(&self.plan, terrain);
        Ok(())
    }
}

/// Anchor seated on the terrain surface, dropped to the lowest altitude
/// sampled under the base footprint so no wall corner floats.
fn seat_origin(plan: &BuildingPlan, terrain: &dyn TerrainSampler) -> DVec3 {
    let surface = terrain.surface_point(plan.anchor);
    let mut base = surface.y;
    if let Some(level) = plan.levels.first() {
        for &p in &level.footprint {
            base = base.min(terrain.altitude_at(plan.anchor + p));
        }
    }
    DVec3::new(surface.x, base, surface.z)
}

fn ring_at_height(ring: &[DVec2], height: f64) -> Vec<DVec3> {
    ring.iter().map(|p| DVec3::new(p.x, height, p.y)).collect()
}

/// Triangulated horizontal cap over a 3D ring.
fn emit_cap_ring(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    ring3d: &[DVec3],
    material: &str,
) -> Result<(), MeshError> {
    let plan_ring: Vec<DVec2> = ring3d.iter().map(|p| DVec2::new(p.x, p.z)).collect();
    let triangles = triangulate_ring(&plan_ring)?;
    // Counter-clockwise in plan maps to a downward normal in 3D; flip so
    // the cap faces the sky.
    let flipped: Vec<[u32; 3]> = triangles.iter().map(|t| [t[0], t[2], t[1]]).collect();
    let material = resolve_material(catalog, missing, material);
    batcher.add_triangulated(material, ring3d, &plan_ring, &flipped);
    Ok(())
}

/// Triangulated horizontal cap over a level footprint at the given height.
fn emit_cap(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    level: &LevelMeta,
    height: f64,
) -> Result<(), MeshError> {
    let ring3d = ring_at_height(&level.footprint, height);
    emit_cap_ring(batcher, catalog, missing, &ring3d, &level.edges[0].material)
}

fn build_uniform_level(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    level: &LevelMeta,
    base: f64,
) -> f64 {
    let n = level.footprint.len();
    let full_height = level.story_height * level.stories as f64;
    for i in 0..n {
        let a = level.footprint[i];
        let b = level.footprint[(i + 1) % n];
        let edge = &level.edges[i];
        if edge.facade.is_some() {
            // Single-quad-per-wall short-circuit: the façade spans every
            // story at once and tiles vertically per story.
            let quad = WallQuad {
                bottom_a: DVec3::new(a.x, base, a.y),
                bottom_b: DVec3::new(b.x, base, b.y),
                top_a: DVec3::new(a.x, base + full_height, a.y),
                top_b: DVec3::new(b.x, base + full_height, b.y),
            };
            layout_edge(batcher, catalog, missing, &quad, edge, level.stories as f64);
        } else {
            for story in 0..level.stories {
                let y0 = base + story as f64 * level.story_height;
                let y1 = y0 + level.story_height;
                let quad = WallQuad {
                    bottom_a: DVec3::new(a.x, y0, a.y),
                    bottom_b: DVec3::new(b.x, y0, b.y),
                    top_a: DVec3::new(a.x, y1, a.y),
                    top_b: DVec3::new(b.x, y1, b.y),
                };
                layout_edge(batcher, catalog, missing, &quad, edge, 1.0);
            }
        }
    }
    full_height
}

fn build_simple_sloped_level(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    level: &LevelMeta,
    base: f64,
) -> Result<(f64, bool, Vec<DVec3>), MeshError> {
    let mut ring = ring_at_height(&level.footprint, base);
    let mut rise_total = 0.0;
    let mut closed = false;

    for _ in 0..level.stories {
        let extrusion = extrude_story(&ring, &level.slopes_deg, level.story_height)?;
        let n = ring.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = WallQuad {
                bottom_a: ring[i],
                bottom_b: ring[j],
                top_a: extrusion.upper[i],
                top_b: extrusion.upper[j],
            };
            layout_edge(batcher, catalog, missing, &quad, &level.edges[i], 1.0);
        }
        rise_total += extrusion.rise;
        ring = extrusion.upper;
        if extrusion.closed {
            closed = true;
            break;
        }
    }
    Ok((rise_total, closed, ring))
}

fn build_skeleton_level(
    batcher: &mut MeshBatcher,
    catalog: &MaterialCatalog,
    missing: &mut Vec<String>,
    level: &LevelMeta,
    base: f64,
) -> Result<f64, MeshError> {
    let contour = RoofContour {
        ring: level.footprint.clone(),
        slopes_deg: level.slopes_deg.clone(),
    };
    let roof = solve_roof(&contour)?;
    for facet in &roof.facets {
        let material = resolve_material(catalog, missing, &level.edges[facet.edge].material);
        let ring: Vec<DVec3> = facet
            .ring
            .iter()
            .map(|p| DVec3::new(p.x, p.y + base, p.z))
            .collect();
        batcher.add_triangulated(material, &ring, &facet.flat, &facet.triangles);
    }
    Ok(roof.max_height)
}

fn build(
    plan: &BuildingPlan,
    terrain: &dyn TerrainSampler,
    catalog: &MaterialCatalog,
) -> Result<BuiltGeometry, MeshError> {
    let finalized = plan.finalize()?;
    let origin = seat_origin(plan, terrain);

    let mut batcher = MeshBatcher::new();
    let mut missing = Vec::new();
    let mut height = 0.0;
    let last = finalized.levels.len() - 1;

    for (index, level) in finalized.levels.iter().enumerate() {
        match level.strategy {
            RoofStrategy::Flat => {
                emit_cap(&mut batcher, catalog, &mut missing, level, height)?;
            }
            RoofStrategy::Uniform => {
                let rise =
                    build_uniform_level(&mut batcher, catalog, &mut missing, level, height);
                height += rise;
                if index == last {
                    emit_cap(&mut batcher, catalog, &mut missing, level, height)?;
                }
            }
            RoofStrategy::SimpleSloped => {
                let (rise, closed, top_ring) =
                    build_simple_sloped_level(&mut batcher, catalog, &mut missing, level, height)?;
                height += rise;
                if index == last && !closed && rise > EPSILON {
                    // An open sloped level ends on the inset upper ring,
                    // not on the footprint.
                    emit_cap_ring(
                        &mut batcher,
                        catalog,
                        &mut missing,
                        &top_ring,
                        &level.edges[0].material,
                    )?;
                }
            }
            RoofStrategy::Skeleton => {
                let rise =
                    build_skeleton_level(&mut batcher, catalog, &mut missing, level, height)?;
                height += rise;
            }
        }
    }

    Ok(BuiltGeometry {
        batches: batcher.into_batches(),
        max_height: height,
        origin,
        missing_assets: missing,
    })
}

/// Rebuilds a set of independent buildings on rayon worker threads.
///
/// Each building owns its batcher state; the shared catalog is cloned
/// under its lock per worker so the name lookups stay serialized.
///
/// Returns the number of buildings that rebuilt successfully; the rest
/// keep their failure in `last_error`.
pub fn rebuild_all<T>(
    buildings: &mut [BuildingReconstructor],
    terrain: &T,
    catalog: &Mutex<MaterialCatalog>,
) -> usize
where
    T: TerrainSampler + Sync,
{
    buildings
        .par_iter_mut()
        .map(|building| {
            let snapshot = catalog
                .lock()
                .expect("material catalog lock poisoned")
                .clone();
            building.create_geometry(terrain, &snapshot).is_ok() as usize
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;
    use building_plan::Level;

    fn square(side: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(side, 0.0),
            DVec2::new(side, side),
            DVec2::new(0.0, side),
        ]
    }

    fn catalog() -> MaterialCatalog {
        let mut catalog = MaterialCatalog::new();
        for name in ["brick", "tile", "window", "door"] {
            catalog.get_or_create(name);
        }
        catalog
    }

    #[test]
    fn test_state_machine_transitions() {
        let plan = BuildingPlan::new(DVec2::ZERO, vec![Level::prism(square(6.0), 1, 3.0, "brick")]);
        let mut building = BuildingReconstructor::new(plan);
        assert_eq!(building.state(), BuildState::Unbuilt);

        building
            .create_geometry(&FlatTerrain::at(0.0), &catalog())
            .unwrap();
        assert_eq!(building.state(), BuildState::Built);
        assert!(building.geometry().is_some());

        building.destroy_geometry();
        assert_eq!(building.state(), BuildState::Unbuilt);
        assert!(building.geometry().is_none());
    }

    #[test]
    fn test_adjust_height_moves_origin_only() {
        let plan = BuildingPlan::new(
            DVec2::new(100.0, 50.0),
            vec![Level::prism(square(6.0), 1, 3.0, "brick")],
        );
        let mut building = BuildingReconstructor::new(plan);
        assert!(building.adjust_height(&FlatTerrain::at(0.0)).is_err());

        building
            .create_geometry(&FlatTerrain::at(10.0), &catalog())
            .unwrap();
        let before = building.geometry().unwrap().total_vertices();
        building.adjust_height(&FlatTerrain::at(25.0)).unwrap();
        let geometry = building.geometry().unwrap();
        assert_eq!(geometry.origin.y, 25.0);
        assert_eq!(geometry.total_vertices(), before);
    }

    #[test]
    fn test_failed_build_keeps_no_geometry() {
        let bowtie = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(0.0, 4.0),
        ];
        let plan = BuildingPlan::new(DVec2::ZERO, vec![Level::prism(bowtie, 1, 3.0, "brick")]);
        let mut building = BuildingReconstructor::new(plan);
        let result = building.create_geometry(&FlatTerrain::at(0.0), &catalog());
        assert!(result.is_err());
        assert_eq!(building.state(), BuildState::Unbuilt);
        assert!(building.geometry().is_none());
        assert!(!building.last_error().unwrap().is_empty());
    }

    #[test]
    fn test_uniform_level_advances_by_story_height() {
        let plan = BuildingPlan::new(DVec2::ZERO, vec![Level::prism(square(6.0), 3, 2.5, "brick")]);
        let mut building = BuildingReconstructor::new(plan);
        building
            .create_geometry(&FlatTerrain::at(0.0), &catalog())
            .unwrap();
        let geometry = building.geometry().unwrap();
        assert!((geometry.max_height - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_materials_are_reported_not_fatal() {
        let plan = BuildingPlan::new(
            DVec2::ZERO,
            vec![Level::prism(square(6.0), 1, 3.0, "no-such-material")],
        );
        let mut building = BuildingReconstructor::new(plan);
        building
            .create_geometry(&FlatTerrain::at(0.0), &catalog())
            .unwrap();
        let geometry = building.geometry().unwrap();
        assert_eq!(geometry.missing_assets, vec!["no-such-material".to_string()]);
    }

    #[test]
    fn test_rebuild_all_parallel() {
        let mut buildings: Vec<BuildingReconstructor> = (0..8u32)
            .map(|i| {
                BuildingReconstructor::new(BuildingPlan::new(
                    DVec2::new(i as f64 * 20.0, 0.0),
                    vec![Level::prism(square(6.0), 1 + (i % 3), 3.0, "brick")],
                ))
            })
            .collect();
        let catalog = Mutex::new(catalog());
        let ok = rebuild_all(&mut buildings, &FlatTerrain::at(0.0), &catalog);
        assert_eq!(ok, 8);
        assert!(buildings.iter().all(|b| b.state() == BuildState::Built));
    }
}
