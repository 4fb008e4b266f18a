//! # Building Mesh
//!
//! Geometry kernel for parametric building reconstruction. Converts
//! validated plans from `building-plan` into material-batched triangle
//! meshes.
//!
//! ## Architecture
//!
//! ```text
//! building-plan (FinalizedPlan) → building-mesh (BuiltGeometry)
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust with no native dependencies:
//! - **Triangulation**: Ear clipping over the ring's own vertices
//! - **Roofs**: Weighted straight skeleton (event-driven wavefront) for
//!   general contours; closed-form two-plane extrusion for simple ones
//! - **Walls**: Cursor-walk feature layout over per-edge wall quads
//! - **Batching**: One growable buffer per (material, primitive type)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use building_mesh::reconstruct::BuildingReconstructor;
//!
//! let mut building = BuildingReconstructor::new(plan);
//! building.create_geometry(&terrain, &catalog)?;
//! let geometry = building.geometry().unwrap();
//! ```

pub mod batch;
pub mod error;
pub mod extrude;
pub mod features;
pub mod materials;
pub mod reconstruct;
pub mod skeleton;
pub mod terrain;
pub mod triangulate;

pub use batch::{BatchKey, MeshBatch, MeshBatcher, MeshVertex, PrimitiveTopology};
pub use error::MeshError;
pub use materials::{MaterialCatalog, MaterialId};
pub use reconstruct::{rebuild_all, BuildState, BuildingReconstructor, BuiltGeometry};
pub use terrain::{FlatTerrain, TerrainSampler};
