//! # Material Mesh Batching
//!
//! Collapses the many small quads and facet fans a building produces into
//! one growable vertex/index buffer per (material, primitive type). All
//! upstream geometry is f64; vertices convert to f32 here, at the GPU
//! boundary.

use std::collections::HashMap;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::materials::MaterialId;

/// Primitive topology of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    /// Indexed triangle list.
    TriangleList,
    /// Indexed line list.
    LineList,
}

/// Key of one batch: which material, which primitive type.
pub type BatchKey = (MaterialId, PrimitiveTopology);

/// One GPU-ready vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    /// Position in building-local space.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl MeshVertex {
    fn new(position: DVec3, normal: DVec3, uv: DVec2) -> Self {
        Self {
            position: [position.x as f32, position.y as f32, position.z as f32],
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            uv: [uv.x as f32, uv.y as f32],
        }
    }
}

/// A growable vertex/index buffer for a single batch key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshBatch {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer, triples for triangle lists, pairs for line lists.
    pub indices: Vec<u32>,
}

impl MeshBatch {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of indexed primitives for the given topology.
    pub fn primitive_count(&self, topology: PrimitiveTopology) -> usize {
        match topology {
            PrimitiveTopology::TriangleList => self.indices.len() / 3,
            PrimitiveTopology::LineList => self.indices.len() / 2,
        }
    }
}

/// Accumulates all geometry of one building, keyed by material and topology.
///
/// New geometry appends to the batch for its key; there is no incremental
/// patching. Edits discard the whole batcher and rebuild.
///
/// # Example
///
/// ```rust
/// use building_mesh::batch::{MeshBatcher, PrimitiveTopology};
/// use building_mesh::materials::MaterialId;
/// use glam::DVec3;
///
/// let mut batcher = MeshBatcher::new();
/// batcher.add_quad(
///     MaterialId(0),
///     [
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(1.0, 0.0, 0.0),
///         DVec3::new(1.0, 1.0, 0.0),
///         DVec3::new(0.0, 1.0, 0.0),
///     ],
///     [0.0, 1.0],
///     [0.0, 1.0],
/// );
/// let batch = batcher
///     .batch(&(MaterialId(0), PrimitiveTopology::TriangleList))
///     .unwrap();
/// assert_eq!(batch.vertex_count(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshBatcher {
    batches: HashMap<BatchKey, MeshBatch>,
}

impl MeshBatcher {
    /// Creates an empty batcher.
    pub fn new() -> Self {
        Self::default()
    }

    fn batch_mut(&mut self, key: BatchKey) -> &mut MeshBatch {
        self.batches.entry(key).or_default()
    }

    /// Appends a quad as two triangles with a flat normal.
    ///
    /// Corners are counter-clockwise as seen from the front face:
    /// bottom-left, bottom-right, top-right, top-left. `u` and `v` give the
    /// texture span along the horizontal and vertical quad axes.
    pub fn add_quad(
        &mut self,
        material: MaterialId,
        corners: [DVec3; 4],
        u: [f64; 2],
        v: [f64; 2],
    ) {
        let [bl, br, tr, tl] = corners;
        let normal = (br - bl).cross(tl - bl).normalize_or_zero();
        let batch = self.batch_mut((material, PrimitiveTopology::TriangleList));
        let base = batch.vertices.len() as u32;
        batch.vertices.push(MeshVertex::new(bl, normal, DVec2::new(u[0], v[0])));
        batch.vertices.push(MeshVertex::new(br, normal, DVec2::new(u[1], v[0])));
        batch.vertices.push(MeshVertex::new(tr, normal, DVec2::new(u[1], v[1])));
        batch.vertices.push(MeshVertex::new(tl, normal, DVec2::new(u[0], v[1])));
        batch
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Appends a triangle with a flat normal.
    ///
    /// Corners counter-clockwise as seen from the front face; UVs in meters
    /// along the triangle's own plane axes.
    pub fn add_triangle(&mut self, material: MaterialId, corners: [DVec3; 3], uvs: [DVec2; 3]) {
        let [a, b, c] = corners;
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let batch = self.batch_mut((material, PrimitiveTopology::TriangleList));
        let base = batch.vertices.len() as u32;
        batch.vertices.push(MeshVertex::new(a, normal, uvs[0]));
        batch.vertices.push(MeshVertex::new(b, normal, uvs[1]));
        batch.vertices.push(MeshVertex::new(c, normal, uvs[2]));
        batch.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a pre-triangulated polygon ring sharing one facet normal.
    ///
    /// `triangles` index into `ring`; `uvs` must be parallel to `ring`.
    pub fn add_triangulated(
        &mut self,
        material: MaterialId,
        ring: &[DVec3],
        uvs: &[DVec2],
        triangles: &[[u32; 3]],
    ) {
        if triangles.is_empty() {
            return;
        }
        let [i0, i1, i2] = triangles[0];
        let normal = (ring[i1 as usize] - ring[i0 as usize])
            .cross(ring[i2 as usize] - ring[i0 as usize])
            .normalize_or_zero();
        let batch = self.batch_mut((material, PrimitiveTopology::TriangleList));
        let base = batch.vertices.len() as u32;
        for (p, uv) in ring.iter().zip(uvs) {
            batch.vertices.push(MeshVertex::new(*p, normal, *uv));
        }
        for tri in triangles {
            batch
                .indices
                .extend_from_slice(&[base + tri[0], base + tri[1], base + tri[2]]);
        }
    }

    /// Appends a line segment.
    pub fn add_line(&mut self, material: MaterialId, a: DVec3, b: DVec3) {
        let batch = self.batch_mut((material, PrimitiveTopology::LineList));
        let base = batch.vertices.len() as u32;
        batch.vertices.push(MeshVertex::new(a, DVec3::Y, DVec2::ZERO));
        batch.vertices.push(MeshVertex::new(b, DVec3::Y, DVec2::ZERO));
        batch.indices.extend_from_slice(&[base, base + 1]);
    }

    /// Returns the batch for a key, if any geometry was emitted for it.
    pub fn batch(&self, key: &BatchKey) -> Option<&MeshBatch> {
        self.batches.get(key)
    }

    /// Iterates all (key, batch) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&BatchKey, &MeshBatch)> {
        self.batches.iter()
    }

    /// Number of distinct batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Total vertex count across all batches.
    pub fn total_vertices(&self) -> usize {
        self.batches.values().map(|b| b.vertices.len()).sum()
    }

    /// Total triangle count across triangle-list batches.
    pub fn total_triangles(&self) -> usize {
        self.batches
            .iter()
            .filter(|((_, topo), _)| *topo == PrimitiveTopology::TriangleList)
            .map(|(_, b)| b.indices.len() / 3)
            .sum()
    }

    /// Consumes the batcher, yielding the final batch set.
    pub fn into_batches(self) -> Vec<(BatchKey, MeshBatch)> {
        self.batches.into_iter().collect()
    }
}
