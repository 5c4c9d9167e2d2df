use std::fmt;

use bevy::prelude::*;
use tiles::{Level, TileDescriptor, TileGrid};

use crate::batch::BatchSet;
use crate::error::TerrainError;
use crate::scene::DisplayTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Ground,
    Collision,
    /// Level 0 buildings, always visible.
    Walls,
    /// Upper levels, hidden while indoors.
    Roofs,
}

impl GroupKind {
    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Ground => "terrain-ground",
            GroupKind::Collision => "terrain-collision",
            GroupKind::Walls => "terrain-walls",
            GroupKind::Roofs => "terrain-roofs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartLabel {
    Ground,
    Collision,
    Floors(Level),
    Walls(Level),
    Roofs(Level),
}

impl fmt::Display for PartLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartLabel::Ground => write!(f, "ground"),
            PartLabel::Collision => write!(f, "collision"),
            PartLabel::Floors(level) => write!(f, "floors-{level}"),
            PartLabel::Walls(level) => write!(f, "walls-{level}"),
            PartLabel::Roofs(level) => write!(f, "roofs-{level}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeshPart {
    pub label: PartLabel,
    pub set: BatchSet,
}

/// Parts that are shown and hidden together.
#[derive(Debug, Clone)]
pub struct MeshGroup {
    pub kind: GroupKind,
    pub parts: Vec<MeshPart>,
}

impl MeshGroup {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, label: PartLabel, set: BatchSet) {
        self.parts.push(MeshPart { label, set });
    }

    pub fn part(&self, label: PartLabel) -> Option<&BatchSet> {
        self.parts.iter().find(|p| p.label == label).map(|p| &p.set)
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.set.triangle_count()).sum()
    }

    pub fn batch_count(&self) -> usize {
        self.parts.iter().map(|p| p.set.batches.len()).sum()
    }
}

/// Display handles of the groups currently attached.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    ground: Entity,
    collision: Option<Entity>,
    walls: Entity,
    roofs: Option<Entity>,
}

/// Built terrain: the prepared grid plus every mesh group.
///
/// The mesh is either detached or attached to exactly one display. Roofs
/// follow the indoor status; the collision overlay is attached only when
/// enabled at build time.
#[derive(Debug)]
pub struct TerrainMesh {
    grid: TileGrid,
    ground: MeshGroup,
    collision: MeshGroup,
    walls: MeshGroup,
    roofs: MeshGroup,
    show_roofs: bool,
    show_collision: bool,
    attached: Option<Attachment>,
}

impl TerrainMesh {
    pub(crate) fn new(
        grid: TileGrid,
        ground: MeshGroup,
        collision: MeshGroup,
        walls: MeshGroup,
        roofs: MeshGroup,
        show_collision: bool,
    ) -> Self {
        Self {
            grid,
            ground,
            collision,
            walls,
            roofs,
            show_roofs: true,
            show_collision,
            attached: None,
        }
    }

    pub fn add_to_scene(&mut self, display: &mut dyn DisplayTree) -> Result<(), TerrainError> {
        if self.attached.is_some() {
            return Err(TerrainError::AlreadyAttached);
        }
        let ground = display.add(&self.ground);
        let collision = self.show_collision.then(|| display.add(&self.collision));
        let walls = display.add(&self.walls);
        let roofs = self.show_roofs.then(|| display.add(&self.roofs));
        self.attached = Some(Attachment {
            ground,
            collision,
            walls,
            roofs,
        });
        Ok(())
    }

    pub fn remove_from_scene(&mut self, display: &mut dyn DisplayTree) -> Result<(), TerrainError> {
        let attachment = self.attached.take().ok_or(TerrainError::NotAttached)?;
        display.remove(attachment.ground);
        if let Some(collision) = attachment.collision {
            display.remove(collision);
        }
        display.remove(attachment.walls);
        if let Some(roofs) = attachment.roofs {
            display.remove(roofs);
        }
        Ok(())
    }

    /// Hides roofs indoors and shows them outdoors. Repeated calls with the
    /// same status do nothing.
    pub fn set_indoor_status(&mut self, indoors: bool, display: &mut dyn DisplayTree) {
        if indoors && self.show_roofs {
            if let Some(attachment) = self.attached.as_mut() {
                if let Some(roofs) = attachment.roofs.take() {
                    display.remove(roofs);
                }
            }
            self.show_roofs = false;
        } else if !indoors && !self.show_roofs {
            if let Some(attachment) = self.attached.as_mut() {
                attachment.roofs = Some(display.add(&self.roofs));
            }
            self.show_roofs = true;
        }
    }

    pub fn toggle_roofs(&mut self, display: &mut dyn DisplayTree) {
        let indoors = self.show_roofs;
        self.set_indoor_status(indoors, display);
    }

    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        self.grid.height_at(x, y)
    }

    pub fn tile_heights(&self, x: f32, y: f32) -> [f32; 4] {
        self.grid.tile_heights(x, y)
    }

    pub fn get_tile(&self, x: f32, y: f32) -> Option<&TileDescriptor> {
        self.grid.tile_at(x, y)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn ground(&self) -> &MeshGroup {
        &self.ground
    }

    pub fn collision(&self) -> &MeshGroup {
        &self.collision
    }

    pub fn walls(&self) -> &MeshGroup {
        &self.walls
    }

    pub fn roofs(&self) -> &MeshGroup {
        &self.roofs
    }

    pub fn roofs_visible(&self) -> bool {
        self.show_roofs
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.ground.triangle_count()
            + self.collision.triangle_count()
            + self.walls.triangle_count()
            + self.roofs.triangle_count()
    }
}
