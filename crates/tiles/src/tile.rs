use std::collections::BTreeMap;
use std::fmt;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Which diagonal splits a cell into its two triangles.
///
/// `DiagA` cuts from the top-left to the bottom-right corner, `DiagB` from the
/// top-right to the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    DiagA,
    #[default]
    DiagB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DrawMode {
    #[default]
    #[serde(rename = "blend")]
    Blend,
    /// Excluded from the ground floor mesh.
    #[serde(rename = "none")]
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `[0, 1]` and multiplied by `factor`, alpha 1.
    pub fn scaled(self, factor: f32) -> [f32; 4] {
        [
            factor * self.r as f32 / 255.0,
            factor * self.g as f32 / 255.0,
            factor * self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// Raw water parameters of a tile. Missing fields read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaterInfo {
    pub flow_x: f32,
    pub flow_y: f32,
    pub flow_speed: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallPosition {
    /// Edge towards the +x neighbor.
    PlusX,
    /// Edge towards the +y neighbor.
    PlusY,
    /// Diagonal from this tile to (x+1, y+1).
    DiagA,
    /// Diagonal from (x+1, y) to (x, y+1).
    DiagB,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSegment {
    #[serde(rename = "type")]
    pub wall_type: String,
    pub position: WallPosition,
    #[serde(default)]
    pub invert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofPosition {
    Full,
    Tl,
    Tr,
    Bl,
    Br,
    Empty,
}

/// Roof type name that marks a placeholder roof with no geometry.
pub const EMPTY_ROOF_TYPE: &str = "empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoofPiece {
    #[serde(rename = "type")]
    pub roof_type: String,
    pub position: RoofPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorPiece {
    pub texture1: Option<String>,
    pub texture2: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Everything a tile carries for one building story.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildingLevel {
    #[serde(default)]
    pub walls: Vec<WallSegment>,
    pub roof: Option<RoofPiece>,
    pub floor: Option<FloorPiece>,
}

/// A building story, 0 is the ground level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(pub u8);

impl Level {
    pub const GROUND: Level = Level(0);

    /// Key of this level in [`TileDescriptor::buildings`].
    pub fn key(self) -> String {
        format!("level{}", self.0)
    }

    pub fn is_ground(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.0)
    }
}

/// Render attributes derived from a descriptor by [`crate::prepare::prepare_tiles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderAttributes {
    pub light: [f32; 4],
    pub shadow: [f32; 4],
    /// Flow and depth packed into a color for the water shader.
    pub water: [f32; 4],
    /// Flow vector after normalization and speed scaling.
    pub flow: Option<Vec2>,
}

impl Default for RenderAttributes {
    fn default() -> Self {
        Self {
            light: [1.0; 4],
            shadow: [1.0; 4],
            water: [1.0; 4],
            flow: None,
        }
    }
}

impl RenderAttributes {
    pub fn shaded(&self, in_shadow: bool) -> [f32; 4] {
        if in_shadow {
            self.shadow
        } else {
            self.light
        }
    }
}

/// One grid vertex as produced by the map loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDescriptor {
    pub elevation: Option<f32>,
    /// Height reported by height queries instead of the interpolated terrain.
    #[serde(rename = "override")]
    pub elevation_override: Option<f32>,
    pub color: Option<Rgb8>,
    pub texture1: Option<String>,
    pub texture2: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub draw: DrawMode,
    #[serde(default)]
    pub shadow: bool,
    pub water: Option<WaterInfo>,
    #[serde(default)]
    pub walkability_overriden: bool,
    #[serde(default)]
    pub buildings: BTreeMap<String, BuildingLevel>,
    #[serde(skip)]
    pub render: RenderAttributes,
}

impl TileDescriptor {
    /// Elevation with a missing value read as 0.
    pub fn ground_height(&self) -> f32 {
        self.elevation.unwrap_or(0.0)
    }

    pub fn has_texture(&self) -> bool {
        self.texture1.is_some() || self.texture2.is_some()
    }

    pub fn building(&self, level_key: &str) -> Option<&BuildingLevel> {
        self.buildings.get(level_key)
    }

    pub fn roof_position(&self, level_key: &str) -> Option<RoofPosition> {
        self.building(level_key)
            .and_then(|b| b.roof.as_ref())
            .map(|roof| roof.position)
    }

    /// Builder-style helpers used by map generators and tests.
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = Some(Rgb8::new(r, g, b));
        self
    }

    pub fn with_textures(mut self, texture1: Option<&str>, texture2: Option<&str>) -> Self {
        self.texture1 = texture1.map(str::to_string);
        self.texture2 = texture2.map(str::to_string);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn level_mut(&mut self, level: Level) -> &mut BuildingLevel {
        self.buildings.entry(level.key()).or_default()
    }
}
