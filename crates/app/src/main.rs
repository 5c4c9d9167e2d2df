//! Terrain viewer: builds a tile grid into meshes and shows it.
//!
//! Usage: terrain_viewer [GRID.json [CATALOGS.json]] [--settings FILE] [--size N]
//!
//! Keys: R toggles roofs, F5 rebuilds from the same source, WASD pans,
//! right-drag orbits, scroll zooms.

use bevy::pbr::wireframe::WireframePlugin;
use bevy::prelude::*;
use bevy::render::settings::{RenderCreation, WgpuFeatures, WgpuSettings};
use bevy::render::RenderPlugin;
use bevy::window::PresentMode;
use clap::Parser;

use terrain::{build, replace_terrain, toggle_active_roofs, AnimationClock, BuildContext, TerrainMeshPlugin};
use tiles::TerrainSettings;

mod camera;
mod source;

use camera::{CameraPlugin, OrbitCamera};
use source::MapSource;

fn main() {
    let source = MapSource::parse();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Terrain Viewer".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        present_mode: PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                })
                .set(RenderPlugin {
                    // Line polygon mode for the collision wireframe
                    render_creation: RenderCreation::Automatic(WgpuSettings {
                        features: WgpuFeatures::POLYGON_MODE_LINE,
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins((WireframePlugin, TerrainMeshPlugin, CameraPlugin))
        .insert_resource(source)
        .add_systems(Startup, (setup_lighting, build_terrain))
        .add_systems(Update, (toggle_roofs_on_key, rebuild_on_key))
        .run();
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
    ));
}

/// Loads the map, builds it and swaps it in as the active terrain.
fn build_terrain(world: &mut World) {
    let source = world.resource::<MapSource>().clone();
    let settings = source.load_settings(world.resource::<TerrainSettings>());
    world.insert_resource(settings.clone());

    let (grid, catalogs) = match source.load_map() {
        Ok(map) => map,
        Err(err) => {
            error!("Could not load map: {err}");
            return;
        }
    };
    let size = grid.size();

    let mut textures = world.resource::<AssetServer>().clone();
    let clock = world.resource::<AnimationClock>().clone();
    let mut ctx = BuildContext::new(&mut textures, clock, &settings);

    let terrain = match build(grid, &catalogs, &mut ctx) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("Terrain build failed: {err}");
            return;
        }
    };

    match replace_terrain(world, terrain) {
        Ok(previous) => {
            if previous.is_some() {
                info!("Replaced the previous terrain");
            }
            world.resource_mut::<OrbitCamera>().frame_grid(size);
        }
        Err(rejected) => error!("Could not show the new terrain: {rejected}"),
    }
}

fn toggle_roofs_on_key(world: &mut World) {
    if world.resource::<ButtonInput<KeyCode>>().just_pressed(KeyCode::KeyR) {
        toggle_active_roofs(world);
    }
}

fn rebuild_on_key(world: &mut World) {
    if world.resource::<ButtonInput<KeyCode>>().just_pressed(KeyCode::F5) {
        build_terrain(world);
    }
}
