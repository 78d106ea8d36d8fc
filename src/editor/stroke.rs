//! Copy-on-write brush strokes
//!
//! A stroke starts from an immutable level snapshot. The snapshot itself is
//! copied (cheaply, the arrays stay shared) on the first write that really
//! changes a value, and each array is cloned at most once, on its own first
//! change. Committing a stroke that changed nothing hands back the very
//! same snapshot.

use std::sync::Arc;

use super::brush::brush_cells;
use super::tool::{CellWrite, PaintTarget};
use crate::simulation::LevelData;

/// One pointer-down to pointer-up edit in progress
#[derive(Debug, Clone)]
pub struct Stroke {
    base: Arc<LevelData>,
    working: Option<LevelData>,
    cells_changed: usize,
}

impl Stroke {
    pub fn begin(base: Arc<LevelData>) -> Self {
        Self {
            base,
            working: None,
            cells_changed: 0,
        }
    }

    /// Level as it looks with the stroke applied so far
    pub fn level(&self) -> &LevelData {
        self.working.as_ref().unwrap_or(self.base.as_ref())
    }

    pub fn cells_changed(&self) -> usize {
        self.cells_changed
    }

    /// Apply a square brush centred on `(cx, cy)`; returns cells changed
    pub fn apply_brush(&mut self, cx: i32, cy: i32, size: usize, write: CellWrite) -> usize {
        let (width, height) = (self.base.width, self.base.height);
        let mut changed = 0;
        for (gx, gy) in brush_cells(cx, cy, size, width, height) {
            if self.write_cell(write.target, gy * width + gx, write.value) {
                changed += 1;
            }
        }
        self.cells_changed += changed;
        changed
    }

    fn current_value(&self, target: PaintTarget, index: usize) -> Option<u32> {
        let level = self.level();
        match target {
            PaintTarget::Layer(layer) => level
                .layers
                .get(layer)
                .and_then(|layer| layer.data.get(index).copied()),
            PaintTarget::Drivable => level.drivable.get(index).map(|code| u32::from(*code)),
            PaintTarget::Walkable => level.walkable.get(index).map(|flag| u32::from(*flag)),
        }
    }

    fn write_cell(&mut self, target: PaintTarget, index: usize, value: u32) -> bool {
        match self.current_value(target, index) {
            Some(current) if current != value => {}
            _ => return false,
        }

        let working = self
            .working
            .get_or_insert_with(|| self.base.as_ref().clone());

        // make_mut copies an array only while it is still shared with the base
        match target {
            PaintTarget::Layer(layer) => {
                if let Some(layer) = working.layers.get_mut(layer) {
                    Arc::make_mut(&mut layer.data)[index] = value;
                }
            }
            PaintTarget::Drivable => Arc::make_mut(&mut working.drivable)[index] = value as u8,
            PaintTarget::Walkable => Arc::make_mut(&mut working.walkable)[index] = value as u8,
        }
        true
    }

    /// Finish the stroke, producing the next snapshot
    pub fn commit(self) -> Arc<LevelData> {
        match self.working {
            Some(level) => Arc::new(level),
            None => self.base,
        }
    }
}
