//! # Plan Types
//!
//! The authored data model: buildings, levels, edges, and edge features.
//! These types are plain serde-ready data; all validation lives in
//! [`crate::meta`] and [`crate::validate`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A complete parametric building description.
///
/// `anchor` is in earth coordinates; every footprint vertex is a local
/// offset from it in the ground plane. Levels stack bottom-up in list order.
///
/// # Example
///
/// ```rust
/// use building_plan::{BuildingPlan, Level};
/// use glam::DVec2;
///
/// let plan = BuildingPlan::new(
///     DVec2::new(1200.0, -340.0),
///     vec![Level::prism(
///         vec![
///             DVec2::new(0.0, 0.0),
///             DVec2::new(8.0, 0.0),
///             DVec2::new(8.0, 5.0),
///             DVec2::new(0.0, 5.0),
///         ],
///         1,
///         2.8,
///         "plaster",
///     )],
/// );
/// assert_eq!(plan.levels.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingPlan {
    /// Earth-coordinate anchor of the building.
    pub anchor: DVec2,
    /// Levels from the ground up.
    pub levels: Vec<Level>,
}

impl BuildingPlan {
    /// Creates a plan from an anchor and a level stack.
    pub fn new(anchor: DVec2, levels: Vec<Level>) -> Self {
        Self { anchor, levels }
    }
}

/// One vertical layer of a building.
///
/// The footprint is an ordered ring in the ground plane; edge *i* joins
/// vertex *i* to vertex *(i + 1) mod N*, so the edge list must be exactly as
/// long as the ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Footprint ring, local offsets from the building anchor.
    pub footprint: Vec<DVec2>,
    /// Number of stories stacked within this level.
    pub stories: u32,
    /// Height of one story in meters.
    pub story_height: f64,
    /// One edge per footprint vertex.
    pub edges: Vec<Edge>,
}

impl Level {
    /// Creates a level with one default wall edge per footprint vertex.
    ///
    /// All edges are vertical (slope 90), share `material`, and carry a
    /// single full-width wall feature. Convenient for plain box levels.
    pub fn prism(
        footprint: Vec<DVec2>,
        stories: u32,
        story_height: f64,
        material: &str,
    ) -> Self {
        let edges = footprint.iter().map(|_| Edge::wall(material)).collect();
        Self {
            footprint,
            stories,
            story_height,
            edges,
        }
    }

    /// Creates a level with the given slope on every edge.
    pub fn hipped(
        footprint: Vec<DVec2>,
        story_height: f64,
        slope_deg: u32,
        material: &str,
    ) -> Self {
        let edges = footprint
            .iter()
            .map(|_| Edge::sloped(slope_deg, material))
            .collect();
        Self {
            footprint,
            stories: 1,
            story_height,
            edges,
        }
    }
}

/// One footprint side with its own styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Roof slope in integer degrees, 0..=90. 90 is a vertical wall.
    pub slope_deg: u32,
    /// Material name for wall/roof surfaces of this edge.
    pub material: String,
    /// Optional façade image name. When set, it wins over `features`.
    pub facade: Option<String>,
    /// Ordered features, laid out left to right along the edge.
    pub features: Vec<EdgeFeature>,
}

impl Edge {
    /// A vertical wall edge with one full-width wall feature.
    pub fn wall(material: &str) -> Self {
        Self {
            slope_deg: 90,
            material: material.to_string(),
            facade: None,
            features: vec![EdgeFeature::full_wall()],
        }
    }

    /// A sloped roof edge with no discrete features.
    pub fn sloped(slope_deg: u32, material: &str) -> Self {
        Self {
            slope_deg,
            material: material.to_string(),
            facade: None,
            features: Vec::new(),
        }
    }

    /// A vertical wall edge textured by a façade image.
    pub fn facade(material: &str, facade: &str) -> Self {
        Self {
            slope_deg: 90,
            material: material.to_string(),
            facade: Some(facade.to_string()),
            features: Vec::new(),
        }
    }
}

/// Kind of a sub-span along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Plain wall panel.
    Wall,
    /// Window opening: wall below, glazing, wall above.
    Window,
    /// Door opening: door panel, wall above.
    Door,
    /// Narrow structural post.
    Post,
    /// Emits nothing; leaves the span open.
    Gap,
}

/// Width policy of a feature.
///
/// Fixed widths are in meters and consumed first; the remaining edge length
/// is distributed over proportional features by weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureWidth {
    /// Exact width in meters.
    Fixed(f64),
    /// Share of the remaining edge length, by weight.
    Proportional(f64),
}

/// A sub-span of an edge: what it is, how wide, and its vertical extent.
///
/// `vertical` is a `[vf1, vf2]` fraction pair of the story height,
/// `0.0 <= vf1 <= vf2 <= 1.0`. Windows use it for the glazing band, doors
/// for the door height; walls and posts span the full story regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeFeature {
    /// What this span is.
    pub kind: FeatureKind,
    /// How wide it is.
    pub width: FeatureWidth,
    /// Vertical extent as fractions of the story height.
    pub vertical: [f64; 2],
}

impl EdgeFeature {
    /// A proportional wall filling whatever width is left, weight 1.
    pub fn full_wall() -> Self {
        Self {
            kind: FeatureKind::Wall,
            width: FeatureWidth::Proportional(1.0),
            vertical: [0.0, 1.0],
        }
    }

    /// A window of fixed width with the glazing band at `[vf1, vf2]`.
    pub fn window(width: f64, vf1: f64, vf2: f64) -> Self {
        Self {
            kind: FeatureKind::Window,
            width: FeatureWidth::Fixed(width),
            vertical: [vf1, vf2],
        }
    }

    /// A door of fixed width reaching up to `vf2` of the story height.
    pub fn door(width: f64, vf2: f64) -> Self {
        Self {
            kind: FeatureKind::Door,
            width: FeatureWidth::Fixed(width),
            vertical: [0.0, vf2],
        }
    }

    /// A fixed-width structural post.
    pub fn post(width: f64) -> Self {
        Self {
            kind: FeatureKind::Post,
            width: FeatureWidth::Fixed(width),
            vertical: [0.0, 1.0],
        }
    }

    /// A fixed-width open gap.
    pub fn gap(width: f64) -> Self {
        Self {
            kind: FeatureKind::Gap,
            width: FeatureWidth::Fixed(width),
            vertical: [0.0, 1.0],
        }
    }
}
