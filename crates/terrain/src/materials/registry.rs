use std::collections::HashMap;

use bevy::prelude::*;
use tiles::TerrainSettings;

use super::water::AnimationClock;

/// Where textures come from. Building never decodes images itself, it only
/// asks for handles by path.
pub trait TextureSource {
    fn texture(&mut self, path: &str) -> Handle<Image>;
}

impl TextureSource for AssetServer {
    fn texture(&mut self, path: &str) -> Handle<Image> {
        self.load(path.to_string())
    }
}

/// Texture source that hands out default handles and remembers every
/// requested path. Used for headless builds.
#[derive(Debug, Default)]
pub struct TextureLog {
    pub requested: Vec<String>,
}

impl TextureSource for TextureLog {
    fn texture(&mut self, path: &str) -> Handle<Image> {
        self.requested.push(path.to_string());
        Handle::default()
    }
}

/// Shading family requested by a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit, vertex colored, front faces only, opaque.
    Lambert,
    /// Unlit, vertex colored, alpha cutoff 0.5, double sided.
    Basic,
    /// Fixed color, unlit, double sided, drawn as lines.
    Wireframe,
}

/// Render-agnostic description of one palette entry. Turned into Bevy
/// material assets when a group is attached to a world.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialDescriptor {
    /// Lit vertex colors without a texture, always palette slot 0.
    Flat,
    Lambert { path: String, texture: Handle<Image> },
    Basic { path: String, texture: Handle<Image> },
    Wireframe { color: Color },
    Water {
        path: String,
        texture: Handle<Image>,
        clock: AnimationClock,
        encode_range: f32,
        max_depth: f32,
    },
}

impl MaterialDescriptor {
    /// Full texture path, `None` for untextured entries.
    pub fn path(&self) -> Option<&str> {
        match self {
            MaterialDescriptor::Lambert { path, .. }
            | MaterialDescriptor::Basic { path, .. }
            | MaterialDescriptor::Water { path, .. } => Some(path),
            MaterialDescriptor::Flat | MaterialDescriptor::Wireframe { .. } => None,
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, MaterialDescriptor::Water { .. })
    }
}

/// Per-pass palette that maps texture ids to material indices.
///
/// Index 0 is always [`MaterialDescriptor::Flat`]. The first request for a
/// texture id fixes its material; later requests for the same id return the
/// same index regardless of kind or prefix.
pub struct MaterialRegistry<'a> {
    textures: &'a mut dyn TextureSource,
    clock: AnimationClock,
    settings: &'a TerrainSettings,
    materials: Vec<MaterialDescriptor>,
    by_texture: HashMap<String, usize>,
}

impl<'a> MaterialRegistry<'a> {
    pub fn new(
        textures: &'a mut dyn TextureSource,
        clock: AnimationClock,
        settings: &'a TerrainSettings,
    ) -> Self {
        Self {
            textures,
            clock,
            settings,
            materials: vec![MaterialDescriptor::Flat],
            by_texture: HashMap::new(),
        }
    }

    /// Index of the material for `texture`, 0 when there is none.
    pub fn material_index(&mut self, kind: MaterialKind, texture: Option<&str>, prefix: &str) -> usize {
        let Some(id) = texture else {
            return 0;
        };
        if let Some(&index) = self.by_texture.get(id) {
            return index;
        }

        let path = format!("{prefix}{id}");
        let handle = self.textures.texture(&path);
        let descriptor = if self.settings.is_water_texture(id) {
            MaterialDescriptor::Water {
                path,
                texture: handle,
                clock: self.clock.clone(),
                encode_range: self.settings.water_encode_range,
                max_depth: self.settings.max_water_depth,
            }
        } else {
            match kind {
                MaterialKind::Lambert => MaterialDescriptor::Lambert {
                    path,
                    texture: handle,
                },
                MaterialKind::Basic => MaterialDescriptor::Basic {
                    path,
                    texture: handle,
                },
                MaterialKind::Wireframe => MaterialDescriptor::Wireframe {
                    color: wireframe_color(),
                },
            }
        };

        let index = self.materials.len();
        self.materials.push(descriptor);
        self.by_texture.insert(id.to_string(), index);
        index
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn materials(&self) -> &[MaterialDescriptor] {
        &self.materials
    }

    pub fn into_materials(self) -> Vec<MaterialDescriptor> {
        self.materials
    }
}

/// Color of the collision overlay lines.
pub fn wireframe_color() -> Color {
    Color::srgb(1.0, 1.0, 0.0)
}
