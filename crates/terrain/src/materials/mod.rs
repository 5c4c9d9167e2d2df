//! Material palettes for terrain passes and their Bevy asset counterparts.

mod registry;
mod water;

use bevy::prelude::*;

pub use registry::{
    wireframe_color, MaterialDescriptor, MaterialKind, MaterialRegistry, TextureLog,
    TextureSource,
};
pub use water::{
    sync_water_time, tick_animation_clock, AnimationClock, WaterMaterial, WaterUniforms,
    ATTRIBUTE_FLOW,
};

/// A descriptor turned into a material asset ready to put on an entity.
#[derive(Debug, Clone)]
pub enum MaterialSlot {
    Standard {
        material: Handle<StandardMaterial>,
        wireframe: bool,
    },
    Water(Handle<WaterMaterial>),
}

/// Creates the Bevy material asset described by `descriptor`.
pub fn instantiate(
    descriptor: &MaterialDescriptor,
    standard: &mut Assets<StandardMaterial>,
    water: &mut Assets<WaterMaterial>,
) -> MaterialSlot {
    let standard_slot = |material: StandardMaterial, wireframe: bool, assets: &mut Assets<StandardMaterial>| {
        MaterialSlot::Standard {
            material: assets.add(material),
            wireframe,
        }
    };

    match descriptor {
        MaterialDescriptor::Flat => standard_slot(
            StandardMaterial {
                perceptual_roughness: 0.9,
                ..default()
            },
            false,
            standard,
        ),
        MaterialDescriptor::Lambert { texture, .. } => standard_slot(
            StandardMaterial {
                base_color_texture: Some(texture.clone()),
                perceptual_roughness: 0.9,
                ..default()
            },
            false,
            standard,
        ),
        MaterialDescriptor::Basic { texture, .. } => standard_slot(
            StandardMaterial {
                base_color_texture: Some(texture.clone()),
                unlit: true,
                alpha_mode: AlphaMode::Mask(0.5),
                double_sided: true,
                cull_mode: None,
                ..default()
            },
            false,
            standard,
        ),
        MaterialDescriptor::Wireframe { color } => standard_slot(
            StandardMaterial {
                base_color: *color,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            },
            true,
            standard,
        ),
        MaterialDescriptor::Water {
            texture,
            clock,
            encode_range,
            max_depth,
            ..
        } => MaterialSlot::Water(water.add(WaterMaterial {
            params: WaterUniforms {
                time: clock.seconds(),
                encode_range: *encode_range,
                max_depth: *max_depth,
                _pad: 0.0,
            },
            texture: texture.clone(),
        })),
    }
}
