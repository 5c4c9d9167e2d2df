use bevy::log::debug;

use crate::config::{TerrainSettings, SHADOW_FACTOR};
use crate::grid::TileGrid;
use crate::tile::{DrawMode, RenderAttributes};
use crate::water::encode_water;

/// Counts reported by [`prepare_tiles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareStats {
    pub tiles: usize,
    pub hidden: usize,
    pub water: usize,
}

/// Derives light, shadow and water colors for every descriptor and hides
/// tiles that have neither a color nor a texture.
pub fn prepare_tiles(grid: &mut TileGrid, settings: &TerrainSettings) -> PrepareStats {
    let mut stats = PrepareStats::default();

    for tile in grid.tiles_mut() {
        stats.tiles += 1;
        let mut render = RenderAttributes::default();

        if let Some(color) = tile.color {
            render.light = color.scaled(1.0);
            render.shadow = color.scaled(SHADOW_FACTOR);
        }

        if let Some(water) = &tile.water {
            let enc = encode_water(water, settings.water_encode_range, settings.max_water_depth);
            render.water = enc.color();
            render.flow = Some(enc.flow);
            stats.water += 1;
        }

        if tile.color.is_none() && !tile.has_texture() {
            tile.draw = DrawMode::Hidden;
        }
        if tile.draw == DrawMode::Hidden {
            stats.hidden += 1;
        }

        tile.render = render;
    }

    debug!(
        "Prepared {} tiles: {} hidden, {} with water",
        stats.tiles, stats.hidden, stats.water
    );
    stats
}
