use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The only wall kind that produces geometry.
pub const POLYGON_WALL: &str = "polygon";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallType {
    #[serde(rename = "type")]
    pub kind: String,
    pub texture: Option<String>,
}

impl WallType {
    pub fn polygon(texture: &str) -> Self {
        Self {
            kind: POLYGON_WALL.to_string(),
            texture: Some(texture.to_string()),
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.kind == POLYGON_WALL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoofType {
    pub top: Option<String>,
    pub side: Option<String>,
}

impl RoofType {
    pub fn new(top: &str, side: &str) -> Self {
        Self {
            top: Some(top.to_string()),
            side: Some(side.to_string()),
        }
    }
}

pub type WallCatalog = HashMap<String, WallType>;
pub type RoofCatalog = HashMap<String, RoofType>;

/// Wall and roof type definitions referenced by name from building levels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCatalogs {
    pub walls: WallCatalog,
    pub roofs: RoofCatalog,
}
