//! Tile grid data for terrain building: descriptors, grids, building
//! catalogs, configuration and the per-vertex preparation pass.

pub mod catalog;
pub mod config;
pub mod grid;
pub mod loader;
pub mod prepare;
pub mod tile;
pub mod water;

pub use catalog::{LevelCatalogs, RoofCatalog, RoofType, WallCatalog, WallType};
pub use config::TerrainSettings;
pub use grid::{GridError, TileGrid};
pub use loader::LoadError;
pub use prepare::{prepare_tiles, PrepareStats};
pub use tile::{
    BuildingLevel, DrawMode, FloorPiece, Level, Orientation, RenderAttributes, Rgb8, RoofPiece,
    RoofPosition, TileDescriptor, WallPosition, WallSegment, WaterInfo,
};
