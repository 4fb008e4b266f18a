//! # Building Plan Crate
//!
//! Typed building descriptions for the reconstruction pipeline. A plan is the
//! authored, immutable input for one build: an earth-coordinate anchor and a
//! stack of levels, each with its own footprint ring, story count/height, and
//! per-edge styling (slope, material, façade, feature list).
//!
//! ## Architecture
//!
//! ```text
//! archive parser (out of scope) → building-plan (validated) → building-mesh (geometry)
//! ```
//!
//! Plans are validated exactly once: [`BuildingPlan::finalize`] checks every
//! footprint, normalizes winding, clamps near-degenerate slopes, and computes
//! a [`RoofStrategy`] tag per level. The mesh layer only ever sees the
//! finalized [`LevelMeta`] form and never re-derives level flags.
//!
//! ## Usage
//!
//! ```rust
//! use building_plan::{BuildingPlan, Level, Edge};
//! use glam::DVec2;
//!
//! let level = Level::prism(
//!     vec![
//!         DVec2::new(0.0, 0.0),
//!         DVec2::new(10.0, 0.0),
//!         DVec2::new(10.0, 6.0),
//!         DVec2::new(0.0, 6.0),
//!     ],
//!     2,
//!     3.0,
//!     "brick",
//! );
//! let plan = BuildingPlan::new(DVec2::ZERO, vec![level]);
//! let finalized = plan.finalize().unwrap();
//! assert_eq!(finalized.levels.len(), 1);
//! ```

pub mod error;
pub mod meta;
pub mod plan;
pub mod validate;

pub use error::PlanError;
pub use meta::{FinalizedPlan, LevelMeta, RoofStrategy};
pub use plan::{BuildingPlan, Edge, EdgeFeature, FeatureKind, FeatureWidth, Level};
