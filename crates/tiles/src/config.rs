use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tile::Level;

/// Height of one building story in world units. Level `n` sits at `n * WALL_HEIGHT`.
pub const WALL_HEIGHT: f32 = 2.0;
/// Extra height added to roof corners that sit on a ridge.
pub const ROOF_HEIGHT: f32 = 1.0;
/// Flow magnitude that maps to the full 127 step range of a color channel.
pub const WATER_ENCODE_RANGE: f32 = 2.0;
/// Depth that maps to a full blue channel. Deeper water is clamped.
pub const MAX_WATER_DEPTH: f32 = 3.0;
/// Texture id that switches a material to the animated water shader.
pub const WATER_TEXTURE: &str = "water.png";
/// Number of building stories above the ground level.
pub const UPPER_LEVELS: u8 = 3;
/// Multiplier applied to tile colors on shadowed vertices.
pub const SHADOW_FACTOR: f32 = 0.7;
/// Vertical offset of the collision overlay so it does not z-fight the ground.
pub const COLLISION_LIFT: f32 = 0.05;
pub const FLOOR_TEXTURE_PREFIX: &str = "buildings/floors/";
pub const BUILDING_TEXTURE_PREFIX: &str = "buildings/";

/// Tunables for a terrain build. Every field falls back to the constant of
/// the same name when missing from a settings file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub wall_height: f32,
    pub roof_height: f32,
    pub water_encode_range: f32,
    pub max_water_depth: f32,
    pub water_texture: String,
    pub upper_levels: u8,
    pub collision_lift: f32,
    pub floor_texture_prefix: String,
    pub building_texture_prefix: String,
    /// Attach the walkability override overlay together with the terrain.
    pub show_collision: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            wall_height: WALL_HEIGHT,
            roof_height: ROOF_HEIGHT,
            water_encode_range: WATER_ENCODE_RANGE,
            max_water_depth: MAX_WATER_DEPTH,
            water_texture: WATER_TEXTURE.to_string(),
            upper_levels: UPPER_LEVELS,
            collision_lift: COLLISION_LIFT,
            floor_texture_prefix: FLOOR_TEXTURE_PREFIX.to_string(),
            building_texture_prefix: BUILDING_TEXTURE_PREFIX.to_string(),
            show_collision: false,
        }
    }
}

impl TerrainSettings {
    /// Vertical offset of a building level above the ground elevation.
    pub fn level_offset(&self, level: Level) -> f32 {
        level.0 as f32 * self.wall_height
    }

    /// Ground level followed by every upper level, bottom to top.
    pub fn levels(&self) -> impl Iterator<Item = Level> {
        (0..=self.upper_levels).map(Level)
    }

    pub fn is_water_texture(&self, texture: &str) -> bool {
        texture == self.water_texture
    }
}
