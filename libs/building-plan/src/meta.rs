//! # Finalized Plan Metadata
//!
//! Validation and the one-time computation of per-level metadata. The mesh
//! layer consumes [`FinalizedPlan`] only; the booleans of the source data
//! (horizontal / uniform / has-sloped-edges) collapse into a single
//! [`RoofStrategy`] tag here and are never re-derived downstream.

use config::constants::{MAX_STORIES, SLOPE_FLAT_SNAP_DEG, SLOPE_VERTICAL_SNAP_DEG};
use glam::DVec2;

use crate::error::PlanError;
use crate::plan::{BuildingPlan, Edge, Level};
use crate::validate::{check_simple, signed_area};

/// How a level's roof and walls are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofStrategy {
    /// All slopes 0: a horizontal cap, no rise.
    Flat,
    /// All slopes 90: vertical walls, façade short-circuit eligible.
    Uniform,
    /// Sloped with at most 4 edges: the analytic extruder.
    SimpleSloped,
    /// Sloped with more than 4 edges: the straight-skeleton solver.
    Skeleton,
}

/// Immutable metadata for one validated level.
///
/// The footprint is normalized to counter-clockwise winding in the ground
/// plane, the edge list permuted to match, and slopes clamped at the
/// near-degenerate ends of the range.
#[derive(Debug, Clone)]
pub struct LevelMeta {
    /// Normalized (counter-clockwise) footprint ring.
    pub footprint: Vec<DVec2>,
    /// Edges matching the normalized ring.
    pub edges: Vec<Edge>,
    /// Clamped slope per edge, in degrees.
    pub slopes_deg: Vec<f64>,
    /// Story count.
    pub stories: u32,
    /// Story height in meters.
    pub story_height: f64,
    /// Strategy tag, computed once.
    pub strategy: RoofStrategy,
    /// Plan-space length of each edge.
    pub edge_lengths: Vec<f64>,
    /// Total perimeter.
    pub perimeter: f64,
}

/// A fully validated plan, ready for reconstruction.
#[derive(Debug, Clone)]
pub struct FinalizedPlan {
    /// Earth-coordinate anchor of the building.
    pub anchor: DVec2,
    /// Finalized levels, ground up.
    pub levels: Vec<LevelMeta>,
}

impl BuildingPlan {
    /// Validates the plan and computes per-level metadata.
    ///
    /// Fails on the first invalid level with no partial state retained.
    ///
    /// # Errors
    ///
    /// See [`PlanError`] for the taxonomy; every variant names the level.
    pub fn finalize(&self) -> Result<FinalizedPlan, PlanError> {
        if self.levels.is_empty() {
            return Err(PlanError::EmptyPlan);
        }
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(i, level)| level.finalize(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FinalizedPlan {
            anchor: self.anchor,
            levels,
        })
    }
}

impl Level {
    /// Validates this level and computes its immutable metadata.
    pub fn finalize(&self, index: usize) -> Result<LevelMeta, PlanError> {
        check_simple(&self.footprint)
            .map_err(|reason| PlanError::invalid_footprint(index, reason))?;

        if self.edges.len() != self.footprint.len() {
            return Err(PlanError::EdgeCountMismatch {
                level: index,
                edges: self.edges.len(),
                vertices: self.footprint.len(),
            });
        }

        if self.stories == 0 || self.stories > MAX_STORIES {
            return Err(PlanError::BadStoryCount {
                level: index,
                stories: self.stories,
            });
        }

        for (e, edge) in self.edges.iter().enumerate() {
            if edge.slope_deg > 90 {
                return Err(PlanError::BadSlope {
                    level: index,
                    edge: e,
                    slope: edge.slope_deg,
                });
            }
            for feature in &edge.features {
                let [vf1, vf2] = feature.vertical;
                if !(0.0..=1.0).contains(&vf1) || !(0.0..=1.0).contains(&vf2) || vf1 > vf2 {
                    return Err(PlanError::BadFeatureExtent {
                        level: index,
                        edge: e,
                        vf1,
                        vf2,
                    });
                }
            }
        }

        let (footprint, edges) = normalize_winding(&self.footprint, &self.edges);
        let slopes_deg: Vec<f64> = edges.iter().map(|e| clamp_slope(e.slope_deg)).collect();

        let n = footprint.len();
        let edge_lengths: Vec<f64> = (0..n)
            .map(|i| footprint[i].distance(footprint[(i + 1) % n]))
            .collect();
        let perimeter = edge_lengths.iter().sum();

        let strategy = classify(&slopes_deg, n);

        Ok(LevelMeta {
            footprint,
            edges,
            slopes_deg,
            stories: self.stories,
            story_height: self.story_height,
            strategy,
            edge_lengths,
            perimeter,
        })
    }
}

/// Snaps near-degenerate authored slopes to exactly flat or vertical.
pub fn clamp_slope(slope_deg: u32) -> f64 {
    let s = slope_deg as f64;
    if s > SLOPE_VERTICAL_SNAP_DEG {
        90.0
    } else if s < SLOPE_FLAT_SNAP_DEG {
        0.0
    } else {
        s
    }
}

fn classify(slopes_deg: &[f64], edge_count: usize) -> RoofStrategy {
    let all_flat = slopes_deg.iter().all(|&s| s == 0.0);
    if all_flat {
        return RoofStrategy::Flat;
    }
    let all_vertical = slopes_deg.iter().all(|&s| s == 90.0);
    if all_vertical {
        return RoofStrategy::Uniform;
    }
    if edge_count <= 4 {
        RoofStrategy::SimpleSloped
    } else {
        RoofStrategy::Skeleton
    }
}

/// Normalizes a ring to counter-clockwise winding, keeping the first vertex.
///
/// Reversing the ring flips each edge's cursor direction; the edge list is
/// permuted to stay attached to the same physical wall and each edge's
/// feature order flips with it.
fn normalize_winding(ring: &[DVec2], edges: &[Edge]) -> (Vec<DVec2>, Vec<Edge>) {
    if signed_area(ring) >= 0.0 {
        return (ring.to_vec(), edges.to_vec());
    }
    let n = ring.len();
    let mut flipped_ring = Vec::with_capacity(n);
    flipped_ring.push(ring[0]);
    for i in (1..n).rev() {
        flipped_ring.push(ring[i]);
    }
    let mut flipped_edges = Vec::with_capacity(n);
    for k in 0..n {
        let mut edge = edges[n - 1 - k].clone();
        edge.features.reverse();
        flipped_edges.push(edge);
    }
    (flipped_ring, flipped_edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::EdgeFeature;

    fn square_cw() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 4.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(4.0, 0.0),
        ]
    }

    #[test]
    fn test_finalize_normalizes_winding() {
        let level = Level::prism(square_cw(), 1, 3.0, "brick");
        let meta = level.finalize(0).unwrap();
        assert!(signed_area(&meta.footprint) > 0.0);
        assert_eq!(meta.footprint[0], DVec2::new(0.0, 0.0));
    }

    #[test]
    fn test_winding_flip_keeps_edges_on_their_walls() {
        let mut level = Level::prism(square_cw(), 1, 3.0, "brick");
        // Mark the edge joining (0,0) -> (0,4), i.e. the x = 0 wall.
        level.edges[0].material = "marked".to_string();
        let meta = level.finalize(0).unwrap();
        // After the flip the x = 0 wall is the last edge: (0,4) -> (0,0).
        let marked = meta
            .edges
            .iter()
            .position(|e| e.material == "marked")
            .unwrap();
        let a = meta.footprint[marked];
        let b = meta.footprint[(marked + 1) % meta.footprint.len()];
        assert_eq!(a.x, 0.0);
        assert_eq!(b.x, 0.0);
    }

    #[test]
    fn test_winding_flip_reverses_feature_order() {
        let mut level = Level::prism(square_cw(), 1, 3.0, "brick");
        level.edges[1].features = vec![EdgeFeature::door(1.0, 0.8), EdgeFeature::full_wall()];
        let meta = level.finalize(0).unwrap();
        let flipped = meta
            .edges
            .iter()
            .find(|e| e.features.len() == 2)
            .unwrap();
        assert_eq!(flipped.features[0].kind, crate::plan::FeatureKind::Wall);
        assert_eq!(flipped.features[1].kind, crate::plan::FeatureKind::Door);
    }

    #[test]
    fn test_strategy_classification() {
        let square = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(0.0, 4.0),
        ];
        let uniform = Level::prism(square.clone(), 2, 3.0, "brick");
        assert_eq!(uniform.finalize(0).unwrap().strategy, RoofStrategy::Uniform);

        let hipped = Level::hipped(square.clone(), 3.0, 30, "tile");
        assert_eq!(
            hipped.finalize(0).unwrap().strategy,
            RoofStrategy::SimpleSloped
        );

        let flat = Level::hipped(square, 3.0, 0, "tar");
        assert_eq!(flat.finalize(0).unwrap().strategy, RoofStrategy::Flat);

        let hex: Vec<DVec2> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                DVec2::new(a.cos() * 5.0, a.sin() * 5.0)
            })
            .collect();
        let hex_roof = Level::hipped(hex, 3.0, 40, "tile");
        assert_eq!(
            hex_roof.finalize(0).unwrap().strategy,
            RoofStrategy::Skeleton
        );
    }

    #[test]
    fn test_slope_snapping() {
        assert_eq!(clamp_slope(90), 90.0);
        assert_eq!(clamp_slope(0), 0.0);
        assert_eq!(clamp_slope(45), 45.0);
        // Thresholds are strict: 89 stays, anything past it snaps.
        assert_eq!(clamp_slope(89), 89.0);
        assert_eq!(clamp_slope(1), 1.0);
    }

    #[test]
    fn test_finalize_rejects_bad_input() {
        let bowtie = Level::prism(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 4.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(0.0, 4.0),
            ],
            1,
            3.0,
            "brick",
        );
        assert!(matches!(
            bowtie.finalize(0),
            Err(PlanError::InvalidFootprint { level: 0, .. })
        ));

        let mut wrong_edges = Level::prism(square_cw(), 1, 3.0, "brick");
        wrong_edges.edges.pop();
        assert!(matches!(
            wrong_edges.finalize(0),
            Err(PlanError::EdgeCountMismatch { .. })
        ));

        let mut no_story = Level::prism(square_cw(), 1, 3.0, "brick");
        no_story.stories = 0;
        assert!(matches!(
            no_story.finalize(0),
            Err(PlanError::BadStoryCount { .. })
        ));
    }
}
