//! Roof geometry for building levels.

mod cases;
mod elevation;

use std::collections::BTreeSet;

use bevy::prelude::*;
use tiles::{Level, RoofCatalog, RoofPosition, TileGrid};

use crate::batch::{allocate_buffers, BatchSet, MeshBatch, MeshVertex, LIGHT_SHADE};
use crate::build::BuildContext;
use crate::materials::MaterialKind;

pub use cases::{
    corner_cap, corner_mask, full_roof_facets, is_flipped, RoofFacet, RoofSurface,
    FULL_ROOF_CASES,
};
pub use elevation::should_be_elevated;

struct FacetPlan {
    corners: [Vec3; 4],
    facet: RoofFacet,
    material: usize,
}

/// Roof facets of one level: all top surfaces first, then all slopes.
pub fn build_roofs(grid: &TileGrid, level: Level, catalog: &RoofCatalog, ctx: &mut BuildContext) -> BatchSet {
    let settings = ctx.settings;
    let key = level.key();
    let offset = settings.level_offset(level);
    let mut registry = ctx.registry();

    let mut plans = Vec::new();
    let mut unknown: BTreeSet<&str> = BTreeSet::new();
    let mut omitted = 0usize;

    for (x, y, tile) in grid.iter() {
        let Some(roof) = tile.building(&key).and_then(|b| b.roof.as_ref()) else {
            continue;
        };
        if roof.roof_type == tiles::tile::EMPTY_ROOF_TYPE || roof.position == RoofPosition::Empty {
            continue;
        }
        let Some(roof_type) = catalog.get(&roof.roof_type) else {
            unknown.insert(roof.roof_type.as_str());
            continue;
        };

        let base = tile.ground_height() + offset;
        let vertices = [(x, y), (x + 1, y), (x + 1, y + 1), (x, y + 1)];
        let raised = vertices.map(|(vx, vy)| should_be_elevated(grid, &key, vx, vy));
        let corners: [Vec3; 4] = std::array::from_fn(|i| {
            let (vx, vy) = vertices[i];
            let lift = if raised[i] { settings.roof_height } else { 0.0 };
            Vec3::new(vx as f32, base + lift, vy as f32)
        });

        let top = registry.material_index(
            MaterialKind::Basic,
            roof_type.top.as_deref(),
            &settings.building_texture_prefix,
        );
        let side = registry.material_index(
            MaterialKind::Basic,
            roof_type.side.as_deref(),
            &settings.building_texture_prefix,
        );

        let facets = match roof.position {
            RoofPosition::Full => full_roof_facets(corner_mask(raised)),
            position => [corner_cap(position), None],
        };
        if roof.position == RoofPosition::Full {
            omitted += facets.iter().filter(|f| f.is_none()).count();
        }
        for facet in facets.into_iter().flatten() {
            let material = match facet.surface {
                RoofSurface::Top => top,
                RoofSurface::Side => side,
            };
            plans.push(FacetPlan {
                corners,
                facet,
                material,
            });
        }
    }

    for name in &unknown {
        warn!("Unknown roof type '{}' on {}, skipping", name, key);
    }
    if omitted > 0 {
        warn!("{}: {} roof triangles have no matching case and were left out", key, omitted);
    }

    let materials = registry.into_materials();
    let mut top_counts = vec![0usize; materials.len()];
    let mut side_counts = vec![0usize; materials.len()];
    for plan in &plans {
        match plan.facet.surface {
            RoofSurface::Top => top_counts[plan.material] += 1,
            RoofSurface::Side => side_counts[plan.material] += 1,
        }
    }
    let mut top_buffers = allocate_buffers(&top_counts);
    let mut side_buffers = allocate_buffers(&side_counts);

    for plan in &plans {
        let buffers = match plan.facet.surface {
            RoofSurface::Top => &mut top_buffers,
            RoofSurface::Side => &mut side_buffers,
        };
        let [a, b, c] = std::array::from_fn(|i| {
            MeshVertex::new(
                plan.corners[plan.facet.corners[i]],
                plan.facet.uvs[i],
                LIGHT_SHADE,
            )
        });
        buffers[plan.material].push_triangle(a, b, c);
    }

    let batches = top_buffers
        .into_iter()
        .enumerate()
        .chain(side_buffers.into_iter().enumerate())
        .filter(|(_, geometry)| !geometry.is_empty())
        .map(|(material, geometry)| MeshBatch { material, geometry })
        .collect();
    BatchSet { materials, batches }
}
