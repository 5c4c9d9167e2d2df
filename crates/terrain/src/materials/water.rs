use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::mesh::{MeshVertexAttribute, MeshVertexBufferLayoutRef};
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
    VertexFormat,
};

/// Per-vertex water flow, world units per second along the tile axes.
pub const ATTRIBUTE_FLOW: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Flow", 871_204_553, VertexFormat::Float32x2);

pub(crate) const WATER_SHADER_PATH: &str = "embedded://terrain/materials/water.wgsl";

// ---------------------------------------------------------------------------
// AnimationClock
// ---------------------------------------------------------------------------

/// Seconds of animation time shared by every water material.
///
/// Clones share the same value.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationClock(Arc<AtomicU32>);

impl AnimationClock {
    pub fn seconds(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, seconds: f32) {
        self.0.store(seconds.to_bits(), Ordering::Relaxed);
    }
}

impl PartialEq for AnimationClock {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ---------------------------------------------------------------------------
// WaterMaterial
// ---------------------------------------------------------------------------

pub use uniforms::WaterUniforms;

// `ShaderType` derive emits module-level `check` fns that newer rustc reports as dead code.
#[allow(dead_code)]
mod uniforms {
    use bevy::render::render_resource::ShaderType;

    #[derive(ShaderType, Debug, Clone, Copy, Default)]
    pub struct WaterUniforms {
        pub time: f32,
        pub encode_range: f32,
        pub max_depth: f32,
        pub _pad: f32,
    }
}

/// Textured water scrolled along the per-vertex flow.
#[derive(Asset, AsBindGroup, TypePath, Debug, Clone)]
pub struct WaterMaterial {
    #[uniform(0)]
    pub params: WaterUniforms,
    #[texture(1)]
    #[sampler(2)]
    pub texture: Handle<Image>,
}

impl Material for WaterMaterial {
    fn vertex_shader() -> ShaderRef {
        WATER_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        WATER_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
            ATTRIBUTE_FLOW.at_shader_location(3),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn tick_animation_clock(time: Res<Time>, clock: Res<AnimationClock>) {
    clock.set(time.elapsed_secs());
}

pub fn sync_water_time(clock: Res<AnimationClock>, mut materials: ResMut<Assets<WaterMaterial>>) {
    if materials.is_empty() {
        return;
    }
    let seconds = clock.seconds();
    for (_, material) in materials.iter_mut() {
        material.params.time = seconds;
    }
}
