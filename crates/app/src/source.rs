//! Where the viewer takes its map from: JSON files named on the command line
//! or the generated sample village.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use tiles::loader::{load_catalogs, load_grid, load_settings, LoadError};
use tiles::{LevelCatalogs, TerrainSettings, TileGrid};

const DEFAULT_DEMO_SIZE: u32 = 48;

/// Builds a tile grid into terrain meshes and shows it.
#[derive(Parser, Resource, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct MapSource {
    /// Tile grid JSON; the sample village is generated when omitted
    pub grid: Option<PathBuf>,
    /// Wall and roof catalogs JSON
    pub catalogs: Option<PathBuf>,
    /// Terrain settings JSON
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Edge length of the generated village when no grid file is given
    #[arg(long = "size", default_value_t = DEFAULT_DEMO_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub demo_size: u32,
}

impl MapSource {
    /// Grid and building catalogs, falling back to the sample village for
    /// whatever was not named.
    pub fn load_map(&self) -> Result<(TileGrid, LevelCatalogs), LoadError> {
        let grid = match &self.grid {
            Some(path) => {
                info!("Loading tile grid from {}", path.display());
                load_grid(path)?
            }
            None => {
                info!("No grid given, generating a {0}x{0} sample village", self.demo_size);
                terrain::demo::sample_grid(self.demo_size as usize)
            }
        };
        let catalogs = match &self.catalogs {
            Some(path) => load_catalogs(path)?,
            None => terrain::demo::sample_catalogs(),
        };
        Ok((grid, catalogs))
    }

    /// Settings from `--settings`, or `current` when none was given or the
    /// file could not be read.
    pub fn load_settings(&self, current: &TerrainSettings) -> TerrainSettings {
        match &self.settings {
            Some(path) => load_settings(path).unwrap_or_else(|err| {
                warn!("{err}, keeping current terrain settings");
                current.clone()
            }),
            None => current.clone(),
        }
    }
}
