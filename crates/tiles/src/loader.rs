use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::catalog::LevelCatalogs;
use crate::config::TerrainSettings;
use crate::grid::TileGrid;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a grid from `{ "wSIZE": n, "tiles": [[..]] }`.
///
/// Shape errors surface as JSON errors carrying the [`crate::GridError`] message.
pub fn grid_from_json(json: &str) -> Result<TileGrid, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_grid(path: impl AsRef<Path>) -> Result<TileGrid, LoadError> {
    read_json(path.as_ref())
}

pub fn load_catalogs(path: impl AsRef<Path>) -> Result<LevelCatalogs, LoadError> {
    read_json(path.as_ref())
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<TerrainSettings, LoadError> {
    read_json(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_grid("/nonexistent/terrain/grid.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("grid.json"));
    }

    #[test]
    fn test_bad_shape_is_reported() {
        let err = grid_from_json(r#"{ "wSIZE": 1, "tiles": [[{}, {}]] }"#).unwrap_err();
        assert!(err.to_string().contains("expected 2 tile columns"));
    }
}
