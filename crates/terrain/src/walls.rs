use std::collections::BTreeSet;

use bevy::prelude::*;
use tiles::{Level, TileGrid, WallCatalog, WallPosition, WallSegment};

use crate::batch::{allocate_buffers, BatchSet, MeshVertex, LIGHT_SHADE, SHADOW_SHADE};
use crate::build::BuildContext;
use crate::materials::MaterialKind;

/// Grid endpoints of a wall segment and its tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallSpan {
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub shade: [f32; 4],
}

/// Endpoints of `segment` placed on tile `(x, y)`, `None` when it would leave
/// the grid.
pub(crate) fn resolve_segment(size: usize, x: usize, y: usize, segment: &WallSegment) -> Option<WallSpan> {
    let (start, end, shade) = match segment.position {
        WallPosition::PlusX if x < size => ((x, y), (x + 1, y), LIGHT_SHADE),
        WallPosition::PlusY if y < size => ((x, y), (x, y + 1), SHADOW_SHADE),
        WallPosition::DiagA if x < size && y < size => ((x, y), (x + 1, y + 1), LIGHT_SHADE),
        WallPosition::DiagB if x < size && y < size => ((x + 1, y), (x, y + 1), SHADOW_SHADE),
        _ => return None,
    };
    Some(if segment.invert {
        WallSpan {
            start: end,
            end: start,
            shade,
        }
    } else {
        WallSpan { start, end, shade }
    })
}

struct WallPlan {
    span: WallSpan,
    material: usize,
}

/// Vertical wall quads of one level, one batch per wall texture.
pub fn build_walls(grid: &TileGrid, level: Level, catalog: &WallCatalog, ctx: &mut BuildContext) -> BatchSet {
    let settings = ctx.settings;
    let key = level.key();
    let mut registry = ctx.registry();

    let mut plans = Vec::new();
    let mut unknown: BTreeSet<&str> = BTreeSet::new();
    let mut skipped_edges = 0usize;

    for (x, y, tile) in grid.iter() {
        let Some(building) = tile.building(&key) else {
            continue;
        };
        for segment in &building.walls {
            let Some(wall_type) = catalog.get(&segment.wall_type) else {
                unknown.insert(segment.wall_type.as_str());
                continue;
            };
            if !wall_type.is_polygon() {
                continue;
            }
            let Some(span) = resolve_segment(grid.size(), x, y, segment) else {
                skipped_edges += 1;
                continue;
            };
            let material = registry.material_index(
                MaterialKind::Basic,
                wall_type.texture.as_deref(),
                &settings.building_texture_prefix,
            );
            plans.push(WallPlan { span, material });
        }
    }

    for name in &unknown {
        warn!("Unknown wall type '{}' on {}, skipping its segments", name, key);
    }
    if skipped_edges > 0 {
        debug!("{}: {} wall segments point outside the grid", key, skipped_edges);
    }

    let materials = registry.into_materials();
    let mut counts = vec![0usize; materials.len()];
    for plan in &plans {
        counts[plan.material] += 2;
    }
    let mut buffers = allocate_buffers(&counts);

    let base_offset = settings.level_offset(level);
    for plan in &plans {
        let WallSpan { start, end, shade } = plan.span;
        let point = |(gx, gy): (usize, usize), lift: f32| {
            Vec3::new(gx as f32, grid.elevation(gx, gy) + base_offset + lift, gy as f32)
        };
        let bottom_left = point(start, 0.0);
        let bottom_right = point(end, 0.0);
        let top_left = point(start, settings.wall_height);
        let top_right = point(end, settings.wall_height);

        let buf = &mut buffers[plan.material];
        buf.push_triangle(
            MeshVertex::new(bottom_left, Vec2::new(0.0, 0.0), shade),
            MeshVertex::new(bottom_right, Vec2::new(1.0, 0.0), shade),
            MeshVertex::new(top_left, Vec2::new(0.0, 1.0), shade),
        );
        buf.push_triangle(
            MeshVertex::new(top_right, Vec2::new(1.0, 1.0), shade),
            MeshVertex::new(bottom_right, Vec2::new(1.0, 0.0), shade),
            MeshVertex::new(top_left, Vec2::new(0.0, 1.0), shade),
        );
    }

    BatchSet::from_buffers(materials, buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{AnimationClock, TextureLog};
    use tiles::{TerrainSettings, WallType};

    fn segment(position: WallPosition, invert: bool) -> WallSegment {
        WallSegment {
            wall_type: "brick".into(),
            position,
            invert,
        }
    }

    fn catalog() -> WallCatalog {
        let mut walls = WallCatalog::new();
        walls.insert("brick".into(), WallType::polygon("brick.png"));
        walls.insert("stone".into(), WallType::polygon("stone.png"));
        walls.insert(
            "hedge".into(),
            WallType {
                kind: "sprite".into(),
                texture: Some("hedge.png".into()),
            },
        );
        walls
    }

    fn build(grid: &TileGrid, level: Level) -> BatchSet {
        let settings = TerrainSettings::default();
        let mut textures = TextureLog::default();
        let mut ctx = BuildContext::new(&mut textures, AnimationClock::default(), &settings);
        build_walls(grid, level, &catalog(), &mut ctx)
    }

    #[test]
    fn test_resolve_segment_positions() {
        let plusx = resolve_segment(4, 1, 2, &segment(WallPosition::PlusX, false)).unwrap();
        assert_eq!((plusx.start, plusx.end), ((1, 2), (2, 2)));
        assert_eq!(plusx.shade, LIGHT_SHADE);

        let plusy = resolve_segment(4, 1, 2, &segment(WallPosition::PlusY, false)).unwrap();
        assert_eq!((plusy.start, plusy.end), ((1, 2), (1, 3)));
        assert_eq!(plusy.shade, SHADOW_SHADE);

        let diagb = resolve_segment(4, 1, 2, &segment(WallPosition::DiagB, false)).unwrap();
        assert_eq!((diagb.start, diagb.end), ((2, 2), (1, 3)));

        let inverted = resolve_segment(4, 1, 2, &segment(WallPosition::DiagA, true)).unwrap();
        assert_eq!((inverted.start, inverted.end), ((2, 3), (1, 2)));
    }

    #[test]
    fn test_resolve_segment_skips_grid_edges() {
        assert!(resolve_segment(4, 4, 0, &segment(WallPosition::PlusX, false)).is_none());
        assert!(resolve_segment(4, 4, 0, &segment(WallPosition::PlusY, false)).is_some());
        assert!(resolve_segment(4, 0, 4, &segment(WallPosition::PlusY, false)).is_none());
        assert!(resolve_segment(4, 2, 4, &segment(WallPosition::DiagA, false)).is_none());
        assert!(resolve_segment(4, 4, 2, &segment(WallPosition::DiagB, false)).is_none());
    }

    #[test]
    fn test_walls_span_one_story() {
        let mut grid = TileGrid::new(2);
        grid.tile_mut(0, 0).elevation = Some(1.0);
        grid.tile_mut(1, 0).elevation = Some(1.5);
        grid.tile_mut(0, 0)
            .level_mut(Level(1))
            .walls
            .push(segment(WallPosition::PlusX, false));
        let set = build(&grid, Level(1));

        assert_eq!(set.triangle_count(), 2);
        let geometry = &set.batches[0].geometry;
        let ys: Vec<f32> = geometry.positions().iter().map(|p| p[1]).collect();
        // bottom-left, bottom-right, top-left / top-right, bottom-right, top-left
        assert_eq!(ys, vec![3.0, 3.5, 5.0, 5.5, 3.5, 5.0]);
        assert_eq!(
            geometry.uvs(),
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]
        );
    }

    #[test]
    fn test_walls_grouped_by_texture() {
        let mut grid = TileGrid::new(3);
        for x in 0..3 {
            let walls = &mut grid.tile_mut(x, 0).level_mut(Level::GROUND).walls;
            walls.push(segment(WallPosition::PlusX, false));
            walls.push(WallSegment {
                wall_type: "stone".into(),
                position: WallPosition::PlusY,
                invert: false,
            });
        }
        let set = build(&grid, Level::GROUND);
        assert_eq!(set.batches.len(), 2);
        assert!(set.batches.iter().all(|b| b.geometry.triangle_count() == 6));
        assert_eq!(set.materials[1].path(), Some("buildings/brick.png"));
    }

    #[test]
    fn test_unknown_and_non_polygon_walls_are_skipped() {
        let mut grid = TileGrid::new(2);
        let walls = &mut grid.tile_mut(0, 0).level_mut(Level::GROUND).walls;
        walls.push(WallSegment {
            wall_type: "missing".into(),
            position: WallPosition::PlusX,
            invert: false,
        });
        walls.push(WallSegment {
            wall_type: "hedge".into(),
            position: WallPosition::PlusX,
            invert: false,
        });
        let set = build(&grid, Level::GROUND);
        assert!(set.is_empty());
        assert_eq!(set.materials.len(), 1);
    }
}
