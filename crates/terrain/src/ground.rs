//! Ground floor mesh: two textured triangles per visible cell.

use bevy::prelude::*;
use tiles::{DrawMode, TileGrid};

use crate::batch::{allocate_buffers, BatchSet, MeshVertex, TEXTURE_LIGHT, TEXTURE_SHADOW};
use crate::build::BuildContext;
use crate::diagonal::{split, Corner};
use crate::materials::MaterialKind;

/// Where a half takes its corner colors from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tint {
    /// Encoded water color of each corner tile.
    Water,
    /// Light or shadow color of each corner tile.
    Plain,
    /// Neutral tint so the texture shows through.
    Textured,
}

#[derive(Debug, Clone, Copy)]
struct HalfPlan {
    x: usize,
    y: usize,
    corners: [Corner; 3],
    material: usize,
    tint: Tint,
}

/// Builds the ground floor of every cell whose `draw` mode is not hidden.
pub fn build_ground(grid: &TileGrid, ctx: &mut BuildContext) -> BatchSet {
    let settings = ctx.settings;
    let mut registry = ctx.registry();

    let mut plans: Vec<HalfPlan> = Vec::with_capacity(grid.size() * grid.size() * 2);
    for (x, y) in grid.cells() {
        let tile = grid.tile(x, y);
        if tile.draw == DrawMode::Hidden {
            continue;
        }

        let halves = split(tile.orientation);
        let textures = [tile.texture1.as_deref(), tile.texture2.as_deref()];
        for (corners, texture) in halves.into_iter().zip(textures) {
            let material = registry.material_index(
                MaterialKind::Lambert,
                texture,
                &settings.floor_texture_prefix,
            );
            if material == 0 && tile.color.is_none() {
                continue;
            }
            let tint = match texture {
                Some(id) if settings.is_water_texture(id) => Tint::Water,
                Some(_) => Tint::Textured,
                None => Tint::Plain,
            };
            plans.push(HalfPlan {
                x,
                y,
                corners,
                material,
                tint,
            });
        }
    }

    let materials = registry.into_materials();
    let mut counts = vec![0usize; materials.len()];
    for plan in &plans {
        counts[plan.material] += 1;
    }
    let mut buffers = allocate_buffers(&counts);

    for plan in &plans {
        let cell = grid.tile(plan.x, plan.y);
        let height = cell.ground_height();
        let flow = cell.render.flow.unwrap_or(Vec2::ZERO);

        let [a, b, c] = plan.corners.map(|corner| {
            let (cx, cy) = corner.tile(plan.x, plan.y);
            let corner_tile = grid.tile(cx, cy);
            let color = match plan.tint {
                Tint::Water => corner_tile.render.water,
                Tint::Plain => corner_tile.render.shaded(corner_tile.shadow),
                Tint::Textured if corner_tile.shadow => TEXTURE_SHADOW,
                Tint::Textured => TEXTURE_LIGHT,
            };
            MeshVertex::new(corner.position(plan.x, plan.y, height), corner.uv(), color)
                .with_flow(flow)
        });
        buffers[plan.material].push_triangle(a, b, c);
    }

    debug!(
        "Ground floor: {} triangles in {} materials",
        plans.len(),
        materials.len()
    );
    BatchSet::from_buffers(materials, buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{AnimationClock, MaterialDescriptor, TextureLog};
    use tiles::{prepare_tiles, Orientation, TerrainSettings, TileDescriptor, WaterInfo};

    fn build(grid: &mut TileGrid) -> BatchSet {
        let settings = TerrainSettings::default();
        prepare_tiles(grid, &settings);
        let mut textures = TextureLog::default();
        let mut ctx = BuildContext::new(&mut textures, AnimationClock::default(), &settings);
        build_ground(grid, &mut ctx)
    }

    fn colored_grid(size: usize) -> TileGrid {
        let mut grid = TileGrid::new(size);
        for tile in grid.tiles_mut() {
            *tile = TileDescriptor::default().with_color(100, 150, 50);
        }
        grid
    }

    fn triangle_area([a, b, c]: [Vec3; 3]) -> f32 {
        (b - a).cross(c - a).length() / 2.0
    }

    #[test]
    fn test_hidden_cells_emit_nothing() {
        for orientation in [Orientation::DiagA, Orientation::DiagB] {
            let mut grid = TileGrid::new(2);
            for tile in grid.tiles_mut() {
                tile.orientation = orientation;
            }
            let set = build(&mut grid);
            assert_eq!(set.triangle_count(), 0);
            assert!(set.is_empty());
        }
    }

    #[test]
    fn test_drawn_cell_covers_one_unit() {
        for orientation in [Orientation::DiagA, Orientation::DiagB] {
            let mut grid = colored_grid(1);
            grid.tile_mut(0, 0).orientation = orientation;
            let set = build(&mut grid);
            assert_eq!(set.triangle_count(), 2);
            let area: f32 = set.batches[0].geometry.triangles().map(triangle_area).sum();
            assert!((area - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cell_is_flat_at_own_elevation() {
        let mut grid = colored_grid(1);
        grid.tile_mut(0, 0).elevation = Some(2.0);
        grid.tile_mut(1, 1).elevation = Some(5.0);
        let set = build(&mut grid);
        for p in set.batches[0].geometry.positions() {
            assert_eq!(p[1], 2.0);
        }
    }

    #[test]
    fn test_textured_halves_get_own_batches() {
        let mut grid = TileGrid::new(1);
        *grid.tile_mut(0, 0) =
            TileDescriptor::default().with_textures(Some("grass.png"), Some("dirt.png"));
        grid.tile_mut(1, 0).shadow = true;
        let set = build(&mut grid);

        assert_eq!(set.materials.len(), 3);
        assert_eq!(set.batches.len(), 2);
        assert_eq!(set.materials[1].path(), Some("buildings/floors/grass.png"));
        for batch in &set.batches {
            assert_eq!(batch.geometry.triangle_count(), 1);
            for color in batch.geometry.colors() {
                assert!(*color == TEXTURE_LIGHT || *color == TEXTURE_SHADOW);
            }
        }
        let shadowed = set
            .batches
            .iter()
            .flat_map(|b| b.geometry.colors())
            .filter(|c| **c == TEXTURE_SHADOW)
            .count();
        // (1, 0) is the top-right corner, shared by both DiagB halves.
        assert_eq!(shadowed, 2);
    }

    #[test]
    fn test_untextured_half_without_color_is_skipped() {
        let mut grid = TileGrid::new(1);
        *grid.tile_mut(0, 0) = TileDescriptor::default().with_textures(Some("sand.png"), None);
        let set = build(&mut grid);
        assert_eq!(set.triangle_count(), 1);
        assert_eq!(set.batches[0].material, 1);
    }

    #[test]
    fn test_water_half_uses_water_material_and_flow() {
        let mut grid = colored_grid(1);
        let tile = grid.tile_mut(0, 0);
        tile.texture1 = Some("water.png".into());
        tile.water = Some(WaterInfo {
            flow_x: 1.0,
            flow_y: 0.0,
            flow_speed: 1.0,
            depth: 1.5,
        });
        let set = build(&mut grid);

        let water = set
            .batches
            .iter()
            .find(|b| set.materials[b.material].is_water())
            .unwrap();
        assert_eq!(water.geometry.flow(), &[[1.0, 0.0]; 3]);
        // The origin corner carries the encoded water color.
        assert_eq!(water.geometry.colors()[0][2], 127.0 / 255.0);

        let plain = set.batches.iter().find(|b| b.material == 0).unwrap();
        assert!(matches!(set.materials[plain.material], MaterialDescriptor::Flat));
        assert_eq!(plain.geometry.flow(), &[[1.0, 0.0]; 3]);
    }
}
