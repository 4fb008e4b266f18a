//! # Mesh Errors
//!
//! Error types for building reconstruction.

use building_plan::PlanError;
use thiserror::Error;

/// Errors that can occur during reconstruction.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Plan validation failed; the whole build is aborted.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// The straight-skeleton solver produced no roof or a malformed facet loop.
    #[error("Skeleton failure: {message}")]
    SkeletonFailure { message: String },

    /// Operation requires built geometry but the building is unbuilt.
    #[error("Building has no geometry")]
    NotBuilt,
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a skeleton failure error.
    pub fn skeleton(message: impl Into<String>) -> Self {
        Self::SkeletonFailure {
            message: message.into(),
        }
    }
}
