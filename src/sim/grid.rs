//! Uniform-grid broad phase
//!
//! Rebuilt from scratch every tick. Each entity is registered in every cell
//! its bounding box touches; candidates found through the cells are then
//! filtered with an exact AABB test. The grid covers exactly the world
//! rectangle, so an entity that lands in no cell is out of bounds.

use std::collections::HashMap;

use glam::Vec2;

use super::entity::{Aabb, Entity, EntityId, EntityKind};
use crate::consts::MAX_GRID_CELLS;

/// Snapshot of an entity as seen by the grid at rebuild time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub id: EntityId,
    pub kind: EntityKind,
    pub aabb: Aabb,
}

/// Inclusive cell index range
#[derive(Debug, Clone, Copy)]
struct CellRange {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    bounds: Aabb,
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Entry indices per cell, row-major
    cells: Vec<Vec<usize>>,
    entries: Vec<GridEntry>,
    by_id: HashMap<EntityId, usize>,
}

impl CollisionGrid {
    /// Grid covering `bounds`, or `None` when the bounds are not finite or
    /// would need more than `MAX_GRID_CELLS` cells
    pub fn new(bounds: Aabb, cell_size: f32) -> Option<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0)
            || !(bounds.min.is_finite() && bounds.max.is_finite())
        {
            return None;
        }
        // Saturating casts; oversized counts fail the cap below
        let cols = ((bounds.width() / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height() / cell_size).ceil() as usize).max(1);
        let count = cols.checked_mul(rows).filter(|&n| n <= MAX_GRID_CELLS)?;
        Some(Self {
            bounds,
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); count],
            entries: Vec::new(),
            by_id: HashMap::new(),
        })
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid dimensions in cells (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Number of entities currently registered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.entries.clear();
        self.by_id.clear();
    }

    /// Clear and reinsert every entity
    pub fn rebuild<'a>(&mut self, entities: impl IntoIterator<Item = &'a Entity>) {
        self.clear();
        for entity in entities {
            self.insert(entity);
        }
    }

    /// Register one entity; returns false if its box lies outside the grid
    pub fn insert(&mut self, entity: &Entity) -> bool {
        let aabb = entity.aabb();
        let Some(range) = self.cell_range(&aabb) else {
            return false;
        };

        let index = self.entries.len();
        self.entries.push(GridEntry {
            id: entity.id,
            kind: entity.kind,
            aabb,
        });
        self.by_id.insert(entity.id, index);

        for y in range.y0..=range.y1 {
            for x in range.x0..=range.x1 {
                self.cells[y * self.cols + x].push(index);
            }
        }
        true
    }

    /// Whether the entity was placed in at least one cell on the last rebuild
    pub fn contains(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Every other registered entity whose box overlaps this entity's box,
    /// sorted by id
    pub fn query(&self, entity: &Entity) -> Vec<GridEntry> {
        let mut hits = self.query_aabb(&entity.aabb());
        hits.retain(|e| e.id != entity.id);
        hits
    }

    /// Every registered entity whose box overlaps `aabb`, sorted by id
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<GridEntry> {
        let Some(range) = self.cell_range(aabb) else {
            return Vec::new();
        };

        let mut seen: Vec<usize> = Vec::new();
        for y in range.y0..=range.y1 {
            for x in range.x0..=range.x1 {
                seen.extend_from_slice(&self.cells[y * self.cols + x]);
            }
        }
        seen.sort_unstable();
        seen.dedup();

        let mut hits: Vec<GridEntry> = seen
            .into_iter()
            .map(|i| self.entries[i])
            .filter(|e| e.aabb.overlaps(aabb))
            .collect();
        hits.sort_by_key(|e| e.id);
        hits
    }

    /// Cells covered by `aabb`, or None if it misses the grid entirely
    fn cell_range(&self, aabb: &Aabb) -> Option<CellRange> {
        if !aabb.overlaps(&self.bounds) {
            return None;
        }
        let lo = self.cell_of(aabb.min);
        let hi = self.cell_of(aabb.max);
        Some(CellRange {
            x0: lo.0,
            x1: hi.0,
            y0: lo.1,
            y1: hi.1,
        })
    }

    fn cell_of(&self, point: Vec2) -> (usize, usize) {
        let local = (point - self.bounds.min) / self.cell_size;
        let x = (local.x.floor().max(0.0) as usize).min(self.cols - 1);
        let y = (local.y.floor().max(0.0) as usize).min(self.rows - 1);
        (x, y)
    }
}
