use tiles::{TerrainSettings, TileGrid};

use crate::batch::{BatchSet, MeshBatch, MeshVertex, TriangleBuffer};
use crate::diagonal::split;
use crate::materials::{wireframe_color, MaterialDescriptor};

/// Palette slot of the overlay lines; slot 0 stays the flat material.
pub const COLLISION_MATERIAL: usize = 1;

/// Wireframe overlay of every cell with a walkability override.
pub fn build_collision(grid: &TileGrid, settings: &TerrainSettings) -> BatchSet {
    let cells: Vec<(usize, usize)> = grid
        .cells()
        .filter(|&(x, y)| grid.tile(x, y).walkability_overriden)
        .collect();

    let mut geometry = TriangleBuffer::with_capacity(cells.len() * 2);
    for &(x, y) in &cells {
        for corners in split(grid.tile(x, y).orientation) {
            let [a, b, c] = corners.map(|corner| {
                let (cx, cy) = corner.tile(x, y);
                let height = grid.elevation(cx, cy) + settings.collision_lift;
                MeshVertex::new(corner.position(x, y, height), corner.uv(), [1.0; 4])
            });
            geometry.push_triangle(a, b, c);
        }
    }

    let materials = vec![
        MaterialDescriptor::Flat,
        MaterialDescriptor::Wireframe {
            color: wireframe_color(),
        },
    ];
    let batches = if geometry.is_empty() {
        Vec::new()
    } else {
        vec![MeshBatch {
            material: COLLISION_MATERIAL,
            geometry,
        }]
    };
    BatchSet { materials, batches }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_overridden_cells() {
        let mut grid = TileGrid::new(3);
        grid.tile_mut(1, 1).walkability_overriden = true;
        grid.tile_mut(0, 2).walkability_overriden = true;
        // Boundary vertices never start a cell.
        grid.tile_mut(3, 3).walkability_overriden = true;
        let set = build_collision(&grid, &TerrainSettings::default());
        assert_eq!(set.triangle_count(), 4);
        assert_eq!(set.batches[0].material, COLLISION_MATERIAL);
        assert!(matches!(
            set.materials[COLLISION_MATERIAL],
            MaterialDescriptor::Wireframe { .. }
        ));
    }

    #[test]
    fn test_corners_follow_own_elevation() {
        let mut grid = TileGrid::new(1);
        grid.tile_mut(0, 0).walkability_overriden = true;
        grid.tile_mut(1, 1).elevation = Some(2.0);
        let set = build_collision(&grid, &TerrainSettings::default());
        let geometry = &set.batches[0].geometry;
        for (p, uv) in geometry.positions().iter().zip(geometry.uvs()) {
            let expected = if *uv == [1.0, 1.0] { 2.05 } else { 0.05 };
            assert!((p[1] - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_no_overrides_no_batches() {
        let set = build_collision(&TileGrid::new(2), &TerrainSettings::default());
        assert!(set.is_empty());
        assert_eq!(set.materials.len(), 2);
    }
}
