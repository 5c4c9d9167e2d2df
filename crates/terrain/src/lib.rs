//! Terrain meshes for tile grids: ground floor, building levels, roofs and a
//! collision overlay, plus the Bevy glue that shows them.

use bevy::asset::embedded_asset;
use bevy::prelude::*;

pub mod batch;
pub mod build;
pub mod collision;
pub mod demo;
pub mod diagonal;
pub mod error;
pub mod floors;
pub mod ground;
pub mod materials;
pub mod roofs;
pub mod scene;
pub mod terrain_mesh;
pub mod walls;

pub use batch::{BatchSet, MeshBatch, MeshVertex, TriangleBuffer};
pub use build::{build, BuildContext, TerrainBuilder};
pub use error::{RejectedTerrain, TerrainError};
pub use materials::{AnimationClock, MaterialDescriptor, TextureLog, TextureSource, WaterMaterial};
pub use scene::{replace_terrain, toggle_active_roofs, ActiveTerrain, DisplayTree, WorldDisplay};
pub use terrain_mesh::{GroupKind, MeshGroup, PartLabel, TerrainMesh};

pub struct TerrainMeshPlugin;

impl Plugin for TerrainMeshPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "materials/water.wgsl");
        app.add_plugins(MaterialPlugin::<WaterMaterial>::default())
            .init_resource::<tiles::TerrainSettings>()
            .init_resource::<AnimationClock>()
            .init_resource::<ActiveTerrain>()
            .add_systems(
                Update,
                (materials::tick_animation_clock, materials::sync_water_time).chain(),
            );
    }
}
