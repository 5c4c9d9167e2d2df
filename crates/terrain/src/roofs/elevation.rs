use tiles::{RoofPosition, TileGrid};

fn roof_at(grid: &TileGrid, level_key: &str, x: usize, y: usize) -> Option<RoofPosition> {
    grid.get(x, y).and_then(|tile| tile.roof_position(level_key))
}

/// Whether the roof corner at grid vertex `(x, y)` sits on the ridge.
///
/// All four roof pieces meeting at the vertex have to cover it: the piece up
/// and left must be full or `br`, the one up `bl`, the one at the vertex
/// `tl`, the one left `tr`. On the first row and column the vertex's own
/// tile stands in for the missing neighbors. Lookups outside the grid count
/// as no roof.
pub fn should_be_elevated(grid: &TileGrid, level_key: &str, x: usize, y: usize) -> bool {
    let left = x.saturating_sub(1);
    let up = y.saturating_sub(1);

    let covers = |x: usize, y: usize, corner: RoofPosition| {
        matches!(roof_at(grid, level_key, x, y), Some(p) if p == RoofPosition::Full || p == corner)
    };

    covers(left, up, RoofPosition::Br)
        && covers(x, up, RoofPosition::Bl)
        && covers(x, y, RoofPosition::Tl)
        && covers(left, y, RoofPosition::Tr)
}
