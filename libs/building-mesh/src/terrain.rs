//! # Terrain Collaborator Contract
//!
//! Terrain height-field sampling and earth-to-world conversion live outside
//! this crate; the reconstructor consumes them through [`TerrainSampler`].
//! Queries are cheap and called per vertex without batching.

use glam::{DVec2, DVec3};

/// External terrain queries consumed during reconstruction.
pub trait TerrainSampler {
    /// Converts an earth-space 2D point to a 3D point on the terrain
    /// surface.
    fn surface_point(&self, earth: DVec2) -> DVec3;

    /// Terrain altitude at an earth-space 2D point.
    fn altitude_at(&self, earth: DVec2) -> f64;
}

/// Flat terrain at a fixed altitude. Primarily for tests and previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    /// Altitude of the whole terrain plane.
    pub altitude: f64,
}

impl FlatTerrain {
    /// Flat terrain at the given altitude.
    pub fn at(altitude: f64) -> Self {
        Self { altitude }
    }
}

impl TerrainSampler for FlatTerrain {
    fn surface_point(&self, earth: DVec2) -> DVec3 {
        DVec3::new(earth.x, self.altitude, earth.y)
    }

    fn altitude_at(&self, _earth: DVec2) -> f64 {
        self.altitude
    }
}
