//! Procedural sample village used by the viewer and the benchmarks.

use tiles::{
    FloorPiece, Level, LevelCatalogs, Orientation, RoofPiece, RoofPosition, RoofType, TileDescriptor,
    TileGrid, WallPosition, WallSegment, WallType, WaterInfo,
};

/// A rectangular one-story house, `w` by `h` cells starting at `(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct House {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl House {
    fn fits(&self, size: usize) -> bool {
        self.w > 0 && self.h > 0 && self.x + self.w < size && self.y + self.h < size
    }
}

fn ground_tile(x: usize, y: usize) -> TileDescriptor {
    let (fx, fy) = (x as f32, y as f32);
    let elevation = 0.4 * (fx * 0.35).sin() + 0.3 * (fy * 0.25).cos();
    let texture2 = if (x * 7 + y * 3) % 5 == 0 { "dirt.png" } else { "grass.png" };
    let mut tile = TileDescriptor::default()
        .with_elevation(elevation)
        .with_color(96, 140, 72)
        .with_textures(Some("grass.png"), Some(texture2))
        .with_orientation(if (x + y) % 2 == 0 { Orientation::DiagA } else { Orientation::DiagB });
    tile.shadow = elevation < -0.2;
    tile
}

fn wall(position: WallPosition) -> WallSegment {
    WallSegment {
        wall_type: "brick".to_string(),
        position,
        invert: false,
    }
}

/// Adds walls, floor and a full roof for `house`.
pub fn place_house(grid: &mut TileGrid, house: House) {
    let House { x, y, w, h } = house;
    for cx in x..x + w {
        grid.tile_mut(cx, y).level_mut(Level::GROUND).walls.push(wall(WallPosition::PlusX));
        grid.tile_mut(cx, y + h).level_mut(Level::GROUND).walls.push(wall(WallPosition::PlusX));
    }
    for cy in y..y + h {
        grid.tile_mut(x, cy).level_mut(Level::GROUND).walls.push(wall(WallPosition::PlusY));
        grid.tile_mut(x + w, cy).level_mut(Level::GROUND).walls.push(wall(WallPosition::PlusY));
    }
    for cx in x..x + w {
        for cy in y..y + h {
            let tile = grid.tile_mut(cx, cy);
            let orientation = tile.orientation;
            tile.level_mut(Level::GROUND).floor = Some(FloorPiece {
                texture1: Some("wood.png".to_string()),
                texture2: Some("wood.png".to_string()),
                orientation,
            });
            tile.level_mut(Level(1)).roof = Some(RoofPiece {
                roof_type: "slate".to_string(),
                position: RoofPosition::Full,
            });
        }
    }
}

/// Grassy terrain with a river along `x = size / 2`, a fence on its east bank
/// and a few houses.
pub fn sample_grid(size: usize) -> TileGrid {
    let mut grid = TileGrid::new(size.max(4));
    let size = grid.size();
    let river = size / 2;

    for x in 0..=size {
        for y in 0..=size {
            *grid.tile_mut(x, y) = ground_tile(x, y);
        }
    }

    for y in 0..=size {
        let tile = grid.tile_mut(river, y);
        tile.texture1 = Some("water.png".to_string());
        tile.texture2 = Some("water.png".to_string());
        tile.elevation = Some(-0.5);
        tile.water = Some(WaterInfo {
            flow_x: 0.0,
            flow_y: 1.0,
            flow_speed: 0.6,
            depth: 1.0 + (y % 3) as f32 * 0.5,
        });
        if river > 0 {
            grid.tile_mut(river - 1, y).walkability_overriden = true;
        }
        if y < size {
            grid.tile_mut(river + 1, y).level_mut(Level::GROUND).walls.push(WallSegment {
                wall_type: "fence".to_string(),
                position: WallPosition::PlusY,
                invert: false,
            });
        }
    }

    for house in village_houses(size) {
        place_house(&mut grid, house);
    }
    grid
}

/// Houses laid out on both river banks.
pub fn village_houses(size: usize) -> Vec<House> {
    let river = size / 2;
    let mut houses = Vec::new();
    let mut y = 2;
    while y + 4 < size {
        for x in [2, river + 2] {
            let house = House { x, y, w: 3, h: 3 };
            if house.fits(size) && (house.x + house.w < river || house.x > river) {
                houses.push(house);
            }
        }
        y += 6;
    }
    houses
}

pub fn sample_catalogs() -> LevelCatalogs {
    let mut catalogs = LevelCatalogs::default();
    catalogs.walls.insert("brick".to_string(), WallType::polygon("brick.png"));
    catalogs.walls.insert(
        "fence".to_string(),
        WallType {
            kind: "sprite".to_string(),
            texture: Some("fence.png".to_string()),
        },
    );
    catalogs
        .roofs
        .insert("slate".to_string(), RoofType::new("slate_top.png", "slate_side.png"));
    catalogs
}
