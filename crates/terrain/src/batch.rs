//! Triangle accumulation for terrain meshes.
//!
//! Every builder emits flat-shaded triangles into a [`TriangleBuffer`]; each
//! buffer becomes one [`MeshBatch`] drawn with a single material of its
//! [`BatchSet`].

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::materials::{MaterialDescriptor, ATTRIBUTE_FLOW};

// ---------------------------------------------------------------------------
// Tints
// ---------------------------------------------------------------------------

/// Vertex tint of lit wall faces.
pub const LIGHT_SHADE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Vertex tint of walls facing away from the light.
pub const SHADOW_SHADE: [f32; 4] = [0.7, 0.7, 0.7, 1.0];
/// Tint of textured ground on a lit corner.
pub const TEXTURE_LIGHT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Tint of textured ground on a shadowed corner.
pub const TEXTURE_SHADOW: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

// ---------------------------------------------------------------------------
// MeshVertex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: [f32; 4],
    pub flow: Vec2,
}

impl MeshVertex {
    pub fn new(position: Vec3, uv: Vec2, color: [f32; 4]) -> Self {
        Self {
            position,
            uv,
            color,
            flow: Vec2::ZERO,
        }
    }

    pub fn with_flow(mut self, flow: Vec2) -> Self {
        self.flow = flow;
        self
    }
}

/// Face normal of a counter-clockwise triangle, `+Y` when degenerate.
pub(crate) fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y)
}

// ---------------------------------------------------------------------------
// TriangleBuffer
// ---------------------------------------------------------------------------

/// Unshared-vertex triangle list with per-vertex color, uv and flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBuffer {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,
    flow: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl TriangleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer with room for exactly `triangles` triangles.
    pub fn with_capacity(triangles: usize) -> Self {
        let verts = triangles * 3;
        Self {
            positions: Vec::with_capacity(verts),
            normals: Vec::with_capacity(verts),
            uvs: Vec::with_capacity(verts),
            colors: Vec::with_capacity(verts),
            flow: Vec::with_capacity(verts),
            indices: Vec::with_capacity(verts),
        }
    }

    pub fn push_triangle(&mut self, a: MeshVertex, b: MeshVertex, c: MeshVertex) {
        let n = face_normal(a.position, b.position, c.position).to_array();
        for v in [a, b, c] {
            self.indices.push(self.positions.len() as u32);
            self.positions.push(v.position.to_array());
            self.normals.push(n);
            self.uvs.push(v.uv.to_array());
            self.colors.push(v.color);
            self.flow.push(v.flow.to_array());
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.positions.capacity() / 3
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn flow(&self) -> &[[f32; 2]] {
        &self.flow
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex positions of every triangle in emission order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from_array(self.positions[tri[0] as usize]),
                Vec3::from_array(self.positions[tri[1] as usize]),
                Vec3::from_array(self.positions[tri[2] as usize]),
            ]
        })
    }

    pub fn to_mesh(&self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors.clone())
        .with_inserted_attribute(ATTRIBUTE_FLOW, self.flow.clone())
        .with_inserted_indices(Indices::U32(self.indices.clone()))
    }
}

/// One buffer per entry of `counts`, each sized for its triangle count.
pub fn allocate_buffers(counts: &[usize]) -> Vec<TriangleBuffer> {
    counts
        .iter()
        .map(|&n| TriangleBuffer::with_capacity(n))
        .collect()
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Geometry drawn with one material of the owning [`BatchSet`].
#[derive(Debug, Clone)]
pub struct MeshBatch {
    pub material: usize,
    pub geometry: TriangleBuffer,
}

/// Output of one builder pass: its material palette and the batches that
/// index into it.
#[derive(Debug, Clone, Default)]
pub struct BatchSet {
    pub materials: Vec<MaterialDescriptor>,
    pub batches: Vec<MeshBatch>,
}

impl BatchSet {
    /// Pairs each non-empty buffer with the material at the same index.
    pub fn from_buffers(materials: Vec<MaterialDescriptor>, buffers: Vec<TriangleBuffer>) -> Self {
        let batches = buffers
            .into_iter()
            .enumerate()
            .filter(|(_, geometry)| !geometry.is_empty())
            .map(|(material, geometry)| MeshBatch { material, geometry })
            .collect();
        Self { materials, batches }
    }

    pub fn triangle_count(&self) -> usize {
        self.batches.iter().map(|b| b.geometry.triangle_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn material_of(&self, batch: &MeshBatch) -> Option<&MaterialDescriptor> {
        self.materials.get(batch.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex::new(Vec3::new(x, y, z), Vec2::ZERO, [1.0; 4])
    }

    #[test]
    fn test_push_triangle_writes_unshared_vertices() {
        let mut buf = TriangleBuffer::with_capacity(2);
        buf.push_triangle(vertex(0.0, 0.0, 0.0), vertex(0.0, 0.0, 1.0), vertex(1.0, 0.0, 0.0));
        buf.push_triangle(vertex(1.0, 0.0, 0.0), vertex(0.0, 0.0, 1.0), vertex(1.0, 0.0, 1.0));
        assert_eq!(buf.triangle_count(), 2);
        assert_eq!(buf.positions().len(), 6);
        assert_eq!(buf.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(buf.capacity(), 2);
    }

    #[test]
    fn test_face_normal_points_up_for_ground_winding() {
        let n = face_normal(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(n, Vec3::Y);
        let degenerate = face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(degenerate, Vec3::Y);
    }

    #[test]
    fn test_to_mesh_has_all_attributes() {
        let mut buf = TriangleBuffer::new();
        buf.push_triangle(
            vertex(0.0, 0.0, 0.0),
            vertex(0.0, 0.0, 1.0),
            vertex(1.0, 0.0, 0.0).with_flow(Vec2::X),
        );
        let mesh = buf.to_mesh();
        assert_eq!(mesh.count_vertices(), 3);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
        assert!(mesh.attribute(ATTRIBUTE_FLOW).is_some());
        assert_eq!(buf.flow()[2], [1.0, 0.0]);
    }

    #[test]
    fn test_from_buffers_drops_empty_batches() {
        let mut used = TriangleBuffer::new();
        used.push_triangle(vertex(0.0, 0.0, 0.0), vertex(0.0, 0.0, 1.0), vertex(1.0, 0.0, 0.0));
        let set = BatchSet::from_buffers(
            vec![MaterialDescriptor::Flat, MaterialDescriptor::Flat],
            vec![TriangleBuffer::new(), used],
        );
        assert_eq!(set.batches.len(), 1);
        assert_eq!(set.batches[0].material, 1);
        assert_eq!(set.triangle_count(), 1);
    }
}
