use tiles::{Level, TileGrid};

use crate::batch::{allocate_buffers, BatchSet, MeshVertex};
use crate::build::BuildContext;
use crate::diagonal::{split, Corner};
use crate::materials::MaterialKind;

const FLOOR_TINT: [f32; 4] = [1.0; 4];

/// Building floors of one level. Untextured halves are never drawn.
pub fn build_floors(grid: &TileGrid, level: Level, ctx: &mut BuildContext) -> BatchSet {
    let settings = ctx.settings;
    let key = level.key();
    let offset = settings.level_offset(level);
    let mut registry = ctx.registry();

    let mut halves: Vec<(usize, usize, f32, [Corner; 3], usize)> = Vec::new();
    for (x, y, tile) in grid.iter() {
        let Some(floor) = tile.building(&key).and_then(|b| b.floor.as_ref()) else {
            continue;
        };
        let height = tile.ground_height() + offset;
        let textures = [floor.texture1.as_deref(), floor.texture2.as_deref()];
        for (corners, texture) in split(floor.orientation).into_iter().zip(textures) {
            let material = registry.material_index(
                MaterialKind::Basic,
                texture,
                &settings.floor_texture_prefix,
            );
            if material != 0 {
                halves.push((x, y, height, corners, material));
            }
        }
    }

    let materials = registry.into_materials();
    let mut counts = vec![0usize; materials.len()];
    for &(.., material) in &halves {
        counts[material] += 1;
    }
    let mut buffers = allocate_buffers(&counts);

    for &(x, y, height, corners, material) in &halves {
        let [a, b, c] = corners
            .map(|corner| MeshVertex::new(corner.position(x, y, height), corner.uv(), FLOOR_TINT));
        buffers[material].push_triangle(a, b, c);
    }

    BatchSet::from_buffers(materials, buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{AnimationClock, TextureLog};
    use tiles::{FloorPiece, Orientation, TerrainSettings};

    fn build(grid: &TileGrid, level: Level) -> (BatchSet, Vec<String>) {
        let settings = TerrainSettings::default();
        let mut textures = TextureLog::default();
        let mut ctx = BuildContext::new(&mut textures, AnimationClock::default(), &settings);
        let set = build_floors(grid, level, &mut ctx);
        (set, textures.requested)
    }

    #[test]
    fn test_floor_sits_at_level_offset() {
        let mut grid = TileGrid::new(2);
        grid.tile_mut(1, 1).elevation = Some(0.5);
        grid.tile_mut(1, 1).level_mut(Level(2)).floor = Some(FloorPiece {
            texture1: Some("wood.png".into()),
            texture2: Some("wood.png".into()),
            orientation: Orientation::DiagA,
        });
        let (set, requested) = build(&grid, Level(2));

        assert_eq!(requested, vec!["buildings/floors/wood.png"]);
        assert_eq!(set.batches.len(), 1);
        assert_eq!(set.triangle_count(), 2);
        for p in set.batches[0].geometry.positions() {
            assert_eq!(p[1], 4.5);
        }
    }

    #[test]
    fn test_untextured_half_is_omitted() {
        let mut grid = TileGrid::new(1);
        grid.tile_mut(0, 0).level_mut(Level(1)).floor = Some(FloorPiece {
            texture1: None,
            texture2: Some("tiles.png".into()),
            orientation: Orientation::DiagB,
        });
        let (set, _) = build(&grid, Level(1));
        assert_eq!(set.triangle_count(), 1);
        // Second DiagB half: top-right, bottom-left, bottom-right.
        assert_eq!(
            set.batches[0].geometry.uvs(),
            &[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn test_other_levels_ignored() {
        let mut grid = TileGrid::new(1);
        grid.tile_mut(0, 0).level_mut(Level(1)).floor = Some(FloorPiece {
            texture1: Some("a.png".into()),
            texture2: None,
            orientation: Orientation::DiagB,
        });
        let (set, requested) = build(&grid, Level(2));
        assert!(set.is_empty());
        assert!(requested.is_empty());
    }
}
