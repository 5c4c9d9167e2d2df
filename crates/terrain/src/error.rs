use thiserror::Error;

use crate::terrain_mesh::TerrainMesh;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    #[error("wall definitions missing")]
    MissingWallCatalog,
    #[error("roof definitions missing")]
    MissingRoofCatalog,
    #[error("terrain is already in a scene")]
    AlreadyAttached,
    #[error("terrain is not in a scene")]
    NotAttached,
}

/// A terrain that could not be made active, handed back to its owner so it
/// can still be detached.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RejectedTerrain {
    pub error: TerrainError,
    pub terrain: TerrainMesh,
}
