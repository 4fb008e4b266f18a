//! # Plan Errors
//!
//! Error types for building plan validation.

use thiserror::Error;

/// Errors that can occur while finalizing a building plan.
///
/// Any of these aborts the whole build; no partial state is retained.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan has no levels.
    #[error("Building plan has no levels")]
    EmptyPlan,

    /// A level footprint is not a simple polygon.
    #[error("Invalid footprint on level {level}: {reason}")]
    InvalidFootprint { level: usize, reason: String },

    /// A level's edge list does not match its footprint ring.
    #[error("Level {level} has {edges} edges for {vertices} footprint vertices")]
    EdgeCountMismatch {
        level: usize,
        edges: usize,
        vertices: usize,
    },

    /// A level declares a story count outside the accepted range.
    #[error("Level {level} declares {stories} stories")]
    BadStoryCount { level: usize, stories: u32 },

    /// An authored slope is outside the 0..=90 degree range.
    #[error("Level {level}, edge {edge}: slope {slope} out of range 0..=90")]
    BadSlope {
        level: usize,
        edge: usize,
        slope: u32,
    },

    /// A feature's vertical extent is not an ordered fraction pair in [0, 1].
    #[error("Level {level}, edge {edge}: feature vertical extent [{vf1}, {vf2}] is malformed")]
    BadFeatureExtent {
        level: usize,
        edge: usize,
        vf1: f64,
        vf2: f64,
    },
}

impl PlanError {
    /// Creates an invalid footprint error.
    pub fn invalid_footprint(level: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFootprint {
            level,
            reason: reason.into(),
        }
    }
}
