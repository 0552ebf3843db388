//! Spatial partitioning for range queries.
//!
//! A uniform grid of 32 px cells, rebuilt from scratch once per tick after
//! movement has settled. Entities are inserted over their full tile-sized
//! AABB so a body straddling a cell boundary is found from either side.
//! Tile collision never consults this index; it serves proximity queries
//! (interaction prompts, trigger areas) for the embedding client.

use crate::components::Position;
use crate::map::TILE_SIZE;
use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Grid cell size in pixels. Four tiles per cell edge keeps typical
/// interaction queries to a handful of cells.
pub const CELL_SIZE: f32 = 32.0;

/// Grid-based spatial index resource.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    pub cell_size: f32,
    cells: HashMap<(i32, i32), Vec<Entity>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size, cells: HashMap::new() }
    }

    #[inline]
    fn cell_of(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Drop all entries. Called at the top of every rebuild.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Insert an entity over the rectangle `(x, y, w, h)`, registering it
    /// in every cell the rectangle touches.
    pub fn insert_rect(&mut self, entity: Entity, x: f32, y: f32, w: f32, h: f32) {
        let cx0 = self.cell_of(x);
        let cy0 = self.cell_of(y);
        let cx1 = self.cell_of(x + w - 1.0);
        let cy1 = self.cell_of(y + h - 1.0);
        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                self.cells.entry((cx, cy)).or_default().push(entity);
            }
        }
    }

    /// All entities whose registered AABB touches any cell overlapped by
    /// the query rectangle. Deduplicated; order unspecified.
    pub fn query_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<Entity> {
        let cx0 = self.cell_of(x);
        let cy0 = self.cell_of(y);
        let cx1 = self.cell_of(x + w - 1.0);
        let cy1 = self.cell_of(y + h - 1.0);
        let mut results = Vec::new();
        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                if let Some(entries) = self.cells.get(&(cx, cy)) {
                    for &e in entries {
                        if !results.contains(&e) {
                            results.push(e);
                        }
                    }
                }
            }
        }
        results
    }

    /// All entities within `radius` of a point, by registered-cell overlap
    /// of the radius' bounding square.
    pub fn query_radius(&self, x: f32, y: f32, radius: f32) -> Vec<Entity> {
        self.query_rect(x - radius, y - radius, radius * 2.0, radius * 2.0)
    }

    /// Total registered entries across cells (an entity spanning N cells
    /// counts N times).
    pub fn entry_count(&self) -> usize {
        self.cells.values().map(|v| v.len()).sum()
    }
}

/// System that rebuilds the spatial index from every positioned entity.
/// Runs after movement so queries made between ticks see settled positions.
pub fn spatial_index_system(mut grid: ResMut<SpatialGrid>, query: Query<(Entity, &Position)>) {
    grid.clear();
    for (entity, pos) in query.iter() {
        grid.insert_rect(entity, pos.x, pos.y, TILE_SIZE, TILE_SIZE);
    }
}
