//! Terrain build entry points.

use bevy::prelude::*;
use tiles::{prepare_tiles, LevelCatalogs, RoofCatalog, TerrainSettings, TileGrid, WallCatalog};

use crate::collision::build_collision;
use crate::error::TerrainError;
use crate::floors::build_floors;
use crate::ground::build_ground;
use crate::materials::{AnimationClock, MaterialRegistry, TextureSource};
use crate::roofs::build_roofs;
use crate::terrain_mesh::{GroupKind, MeshGroup, PartLabel, TerrainMesh};
use crate::walls::build_walls;

/// Everything a build pass needs besides the grid.
pub struct BuildContext<'a> {
    pub textures: &'a mut dyn TextureSource,
    pub clock: AnimationClock,
    pub settings: &'a TerrainSettings,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        textures: &'a mut dyn TextureSource,
        clock: AnimationClock,
        settings: &'a TerrainSettings,
    ) -> Self {
        Self {
            textures,
            clock,
            settings,
        }
    }

    /// Fresh material palette for one builder pass.
    pub fn registry(&mut self) -> MaterialRegistry<'_> {
        MaterialRegistry::new(&mut *self.textures, self.clock.clone(), self.settings)
    }
}

/// Builds a [`TerrainMesh`] once both building catalogs are provided.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerrainBuilder<'c> {
    walls: Option<&'c WallCatalog>,
    roofs: Option<&'c RoofCatalog>,
}

impl<'c> TerrainBuilder<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_wall_definitions(mut self, walls: &'c WallCatalog) -> Self {
        self.walls = Some(walls);
        self
    }

    pub fn use_roof_definitions(mut self, roofs: &'c RoofCatalog) -> Self {
        self.roofs = Some(roofs);
        self
    }

    /// Prepares `grid` and builds every group from it.
    ///
    /// Level 0 floors, walls and roofs go into the always visible walls
    /// group, the upper levels into the roofs group.
    pub fn build(&self, mut grid: TileGrid, ctx: &mut BuildContext) -> Result<TerrainMesh, TerrainError> {
        let walls = self.walls.ok_or(TerrainError::MissingWallCatalog)?;
        let roofs = self.roofs.ok_or(TerrainError::MissingRoofCatalog)?;
        let settings = ctx.settings;

        let stats = prepare_tiles(&mut grid, settings);

        let mut ground = MeshGroup::new(GroupKind::Ground);
        ground.push(PartLabel::Ground, build_ground(&grid, ctx));

        let mut wall_group = MeshGroup::new(GroupKind::Walls);
        let mut roof_group = MeshGroup::new(GroupKind::Roofs);
        for level in settings.levels() {
            let group = if level.is_ground() {
                &mut wall_group
            } else {
                &mut roof_group
            };
            group.push(PartLabel::Floors(level), build_floors(&grid, level, ctx));
            group.push(PartLabel::Walls(level), build_walls(&grid, level, walls, ctx));
            group.push(PartLabel::Roofs(level), build_roofs(&grid, level, roofs, ctx));
        }

        let mut collision = MeshGroup::new(GroupKind::Collision);
        collision.push(PartLabel::Collision, build_collision(&grid, settings));

        info!(
            "Built {}x{} terrain: {} ground, {} wall, {} roof, {} collision triangles ({} hidden tiles, {} water tiles)",
            grid.size(),
            grid.size(),
            ground.triangle_count(),
            wall_group.triangle_count(),
            roof_group.triangle_count(),
            collision.triangle_count(),
            stats.hidden,
            stats.water,
        );

        Ok(TerrainMesh::new(
            grid,
            ground,
            collision,
            wall_group,
            roof_group,
            settings.show_collision,
        ))
    }
}

/// Builds a terrain with both catalogs from `catalogs`.
pub fn build(grid: TileGrid, catalogs: &LevelCatalogs, ctx: &mut BuildContext) -> Result<TerrainMesh, TerrainError> {
    TerrainBuilder::new()
        .use_wall_definitions(&catalogs.walls)
        .use_roof_definitions(&catalogs.roofs)
        .build(grid, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::TextureLog;

    #[test]
    fn test_missing_catalogs_fail() {
        let settings = TerrainSettings::default();
        let mut textures = TextureLog::default();
        let mut ctx = BuildContext::new(&mut textures, AnimationClock::default(), &settings);
        let walls = WallCatalog::new();
        let roofs = RoofCatalog::new();

        let err = TerrainBuilder::new()
            .use_roof_definitions(&roofs)
            .build(TileGrid::new(1), &mut ctx)
            .unwrap_err();
        assert_eq!(err, TerrainError::MissingWallCatalog);

        let err = TerrainBuilder::new()
            .use_wall_definitions(&walls)
            .build(TileGrid::new(1), &mut ctx)
            .unwrap_err();
        assert_eq!(err, TerrainError::MissingRoofCatalog);
    }

    #[test]
    fn test_levels_split_between_groups() {
        let settings = TerrainSettings::default();
        let mut textures = TextureLog::default();
        let mut ctx = BuildContext::new(&mut textures, AnimationClock::default(), &settings);
        let mesh = build(TileGrid::new(2), &LevelCatalogs::default(), &mut ctx).unwrap();

        assert_eq!(mesh.walls().parts.len(), 3);
        assert_eq!(mesh.roofs().parts.len(), 9);
        assert!(mesh.walls().part(PartLabel::Walls(tiles::Level(0))).is_some());
        assert!(mesh.roofs().part(PartLabel::Roofs(tiles::Level(3))).is_some());
        assert!(mesh.roofs().part(PartLabel::Floors(tiles::Level(0))).is_none());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(!mesh.is_attached());
    }
}
