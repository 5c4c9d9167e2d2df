//! Attaching terrain groups to a display.

use std::collections::HashMap;

use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;

use crate::error::{RejectedTerrain, TerrainError};
use crate::materials::{instantiate, MaterialDescriptor, MaterialSlot, WaterMaterial};
use crate::terrain_mesh::{GroupKind, MeshGroup, TerrainMesh};

/// Something mesh groups can be shown in.
pub trait DisplayTree {
    /// Shows `group` and returns the handle that removes it again.
    fn add(&mut self, group: &MeshGroup) -> Entity;
    fn remove(&mut self, entity: Entity);
}

/// Marks the root entity of an attached terrain group.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainGroupRoot(pub GroupKind);

/// [`DisplayTree`] over a Bevy world: one root entity per group with a mesh
/// child per batch.
pub struct WorldDisplay<'w> {
    world: &'w mut World,
}

impl<'w> WorldDisplay<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn material_slot(&mut self, descriptor: &MaterialDescriptor) -> MaterialSlot {
        self.world
            .resource_scope(|world, mut standard: Mut<Assets<StandardMaterial>>| {
                let mut water = world.resource_mut::<Assets<WaterMaterial>>();
                instantiate(descriptor, &mut standard, &mut water)
            })
    }
}

impl DisplayTree for WorldDisplay<'_> {
    fn add(&mut self, group: &MeshGroup) -> Entity {
        let root = self
            .world
            .spawn((
                Name::new(group.kind.label()),
                TerrainGroupRoot(group.kind),
                Transform::default(),
                Visibility::default(),
            ))
            .id();

        for part in &group.parts {
            let mut slots: HashMap<usize, MaterialSlot> = HashMap::new();
            for batch in &part.set.batches {
                let Some(descriptor) = part.set.material_of(batch) else {
                    warn!("{}: batch refers to missing material {}", part.label, batch.material);
                    continue;
                };
                let slot = match slots.get(&batch.material) {
                    Some(slot) => slot.clone(),
                    None => {
                        let slot = self.material_slot(descriptor);
                        slots.insert(batch.material, slot.clone());
                        slot
                    }
                };

                let mesh = self
                    .world
                    .resource_mut::<Assets<Mesh>>()
                    .add(batch.geometry.to_mesh());
                let name = Name::new(format!("{} #{}", part.label, batch.material));

                let child = match slot {
                    MaterialSlot::Standard {
                        material,
                        wireframe,
                    } => {
                        let mut entity =
                            self.world
                                .spawn((name, Mesh3d(mesh), MeshMaterial3d(material)));
                        if wireframe {
                            entity.insert(Wireframe);
                        }
                        entity.id()
                    }
                    MaterialSlot::Water(material) => self
                        .world
                        .spawn((name, Mesh3d(mesh), MeshMaterial3d(material)))
                        .id(),
                };
                self.world.entity_mut(root).add_child(child);
            }
        }

        root
    }

    fn remove(&mut self, entity: Entity) {
        if self.world.entities().contains(entity) {
            self.world.entity_mut(entity).despawn_recursive();
        }
    }
}

/// The terrain currently shown in the world.
#[derive(Resource, Default)]
pub struct ActiveTerrain {
    terrain: Option<TerrainMesh>,
}

impl ActiveTerrain {
    pub fn get(&self) -> Option<&TerrainMesh> {
        self.terrain.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut TerrainMesh> {
        self.terrain.as_mut()
    }

    /// Detaches the current terrain, attaches `terrain` and hands back the
    /// previous one. On failure the previous terrain stays active and
    /// `terrain` comes back inside the error, still attached if it was.
    pub fn replace(
        &mut self,
        mut terrain: TerrainMesh,
        display: &mut dyn DisplayTree,
    ) -> Result<Option<TerrainMesh>, RejectedTerrain> {
        if terrain.is_attached() {
            return Err(RejectedTerrain {
                error: TerrainError::AlreadyAttached,
                terrain,
            });
        }

        let mut previous = self.terrain.take();
        let was_attached = previous.as_ref().is_some_and(TerrainMesh::is_attached);
        if let Some(old) = previous.as_mut().filter(|old| old.is_attached()) {
            if let Err(error) = old.remove_from_scene(display) {
                self.terrain = previous;
                return Err(RejectedTerrain { error, terrain });
            }
        }

        if let Err(error) = terrain.add_to_scene(display) {
            if let Some(old) = previous.as_mut().filter(|_| was_attached) {
                if let Err(restore) = old.add_to_scene(display) {
                    warn!("Could not restore the previous terrain: {restore}");
                }
            }
            self.terrain = previous;
            return Err(RejectedTerrain { error, terrain });
        }

        self.terrain = Some(terrain);
        Ok(previous)
    }
}

/// Shows `terrain` in `world`, replacing the active terrain.
pub fn replace_terrain(world: &mut World, terrain: TerrainMesh) -> Result<Option<TerrainMesh>, RejectedTerrain> {
    world.resource_scope(|world, mut active: Mut<ActiveTerrain>| {
        active.replace(terrain, &mut WorldDisplay::new(world))
    })
}

/// Flips roof visibility of the active terrain, if any.
pub fn toggle_active_roofs(world: &mut World) {
    world.resource_scope(|world, mut active: Mut<ActiveTerrain>| {
        if let Some(terrain) = active.get_mut() {
            terrain.toggle_roofs(&mut WorldDisplay::new(world));
            info!("Roofs {}", if terrain.roofs_visible() { "shown" } else { "hidden" });
        }
    });
}
