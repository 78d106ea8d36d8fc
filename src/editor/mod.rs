//! Level editor paint engine
//!
//! The editor owns the current level snapshot and turns pointer input into
//! new snapshots. It has no notion of a window: callers translate their
//! pointer events into grid cells and feed them in.
//!
//! Pointer handling is a two-state machine. Pointer-down starts a stroke
//! and paints the cell under the cursor; each move while drawing paints
//! every cell on the line from the previously recorded cell; pointer-up or
//! leaving the surface commits the stroke as one snapshot.

mod brush;
mod line;
mod stroke;
mod tool;

use log::{debug, info, warn};
use std::sync::Arc;

pub use brush::{brush_cells, brush_origin, MAX_BRUSH_SIZE};
pub use line::bresenham_line;
pub use stroke::Stroke;
pub use tool::{cell_write, CellWrite, PaintTarget, Tool};

use crate::persistence::LevelStore;
use crate::render::SpriteAtlas;
use crate::simulation::{Direction, Facing, LevelData};

/// Which pointer button started a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints the selected value
    Primary,
    /// Erases
    Secondary,
    /// Ignored
    Other,
}

/// Pointer state machine
#[derive(Debug, Default)]
enum PointerState {
    #[default]
    Idle,
    Drawing {
        erase: bool,
        last_cell: Option<(i32, i32)>,
        stroke: Stroke,
    },
}

/// Interactive level editor
#[derive(Debug)]
pub struct Editor {
    level: Arc<LevelData>,
    pointer: PointerState,
    tool: Tool,
    selected_tile: u32,
    active_layer: usize,
    brush_size: usize,
    last_direction: Direction,
    hover: Option<(i32, i32)>,
    unsaved: bool,
    save_failed: bool,
    pub show_grid: bool,
    pub show_overlays: bool,
}

impl Editor {
    /// Start editing `level`, or a blank default level when there is none.
    /// Missing archetypes are filled in with the defaults.
    pub fn new(level: Option<LevelData>) -> Self {
        let level = match level {
            Some(level) => level.with_default_entity_configs(),
            None => {
                info!("No level data available, starting from a blank level");
                LevelData::editor_default()
            }
        };

        Self {
            level: Arc::new(level),
            pointer: PointerState::Idle,
            tool: Tool::Paint,
            selected_tile: 1,
            active_layer: 0,
            brush_size: 1,
            last_direction: Direction::Up,
            hover: None,
            unsaved: false,
            save_failed: false,
            show_grid: true,
            show_overlays: true,
        }
    }

    /// Level as currently displayed, including an in-progress stroke
    pub fn level(&self) -> &LevelData {
        match &self.pointer {
            PointerState::Drawing { stroke, .. } => stroke.level(),
            PointerState::Idle => &self.level,
        }
    }

    /// Last committed snapshot
    pub fn snapshot(&self) -> Arc<LevelData> {
        Arc::clone(&self.level)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools; an open stroke is committed first
    pub fn set_tool(&mut self, tool: Tool) {
        self.finish_stroke();
        self.tool = tool;
    }

    pub fn selected_tile(&self) -> u32 {
        self.selected_tile
    }

    pub fn select_tile(&mut self, tile_id: u32) {
        self.selected_tile = tile_id;
    }

    /// Select the atlas tile at palette column/row; false when out of range
    pub fn select_palette_cell(&mut self, column: u32, row: u32) -> bool {
        match SpriteAtlas::default().tile_at(column, row) {
            Some(tile) => {
                self.selected_tile = tile;
                true
            }
            None => false,
        }
    }

    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, index: usize) -> bool {
        if index >= self.level.layers.len() {
            return false;
        }
        self.active_layer = index;
        true
    }

    pub fn brush_size(&self) -> usize {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: usize) {
        self.brush_size = size.clamp(1, MAX_BRUSH_SIZE);
    }

    /// One wheel notch: scrolling down shrinks the brush, up grows it
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.set_brush_size(self.brush_size.saturating_sub(1));
        } else if delta_y < 0.0 {
            self.set_brush_size(self.brush_size + 1);
        }
    }

    /// Direction written by the drivable tool on the next application
    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn hover(&self) -> Option<(i32, i32)> {
        self.hover
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.pointer, PointerState::Drawing { .. })
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Pointer pressed over `cell`
    pub fn pointer_down(&mut self, cell: (i32, i32), button: PointerButton) {
        if !self.tool.paints_grid() || button == PointerButton::Other {
            return;
        }
        self.finish_stroke();
        self.pointer = PointerState::Drawing {
            erase: button == PointerButton::Secondary,
            last_cell: None,
            stroke: Stroke::begin(Arc::clone(&self.level)),
        };
        self.interact(cell);
    }

    /// Pointer moved over `cell`
    pub fn pointer_move(&mut self, cell: (i32, i32)) {
        if !self.tool.paints_grid() {
            return;
        }
        self.interact(cell);
    }

    /// Pointer released
    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    /// Pointer left the drawing surface
    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
        self.hover = None;
    }

    fn interact(&mut self, cell: (i32, i32)) {
        self.hover = Some(cell);
        if !self.level.in_bounds(cell.0, cell.1) {
            return;
        }

        let (tool, layer, tile, size) = (
            self.tool,
            self.active_layer,
            self.selected_tile,
            self.brush_size,
        );
        let PointerState::Drawing {
            erase,
            last_cell,
            stroke,
        } = &mut self.pointer
        else {
            return;
        };

        let mut direction = self.last_direction;
        match *last_cell {
            Some(last) => {
                if let Some(dragged) = Direction::from_drag(cell.0 - last.0, cell.1 - last.1) {
                    direction = dragged;
                    self.last_direction = dragged;
                }
                if let Some(write) = cell_write(tool, layer, tile, *erase, direction) {
                    for (gx, gy) in bresenham_line(last, cell) {
                        stroke.apply_brush(gx, gy, size, write);
                    }
                }
            }
            None => {
                if let Some(write) = cell_write(tool, layer, tile, *erase, direction) {
                    stroke.apply_brush(cell.0, cell.1, size, write);
                }
            }
        }
        *last_cell = Some(cell);
    }

    fn finish_stroke(&mut self) {
        if let PointerState::Drawing { stroke, .. } = std::mem::take(&mut self.pointer) {
            let changed = stroke.cells_changed();
            let next = stroke.commit();
            if !Arc::ptr_eq(&next, &self.level) {
                debug!("Stroke committed: {} cells changed", changed);
                self.level = next;
                self.unsaved = true;
            }
        }
    }

    /// Write the selected tile into one slot of an archetype's sprite train
    pub fn set_entity_tile(&mut self, config: usize, facing: Facing, slot: usize) -> bool {
        let tile = self.selected_tile;
        let current = self
            .level
            .entity_configs()
            .get(config)
            .and_then(|archetype| archetype.tiles(facing).get(slot).copied());
        match current {
            Some(current) if current != tile => {}
            _ => return false,
        }

        self.finish_stroke();
        let mut next = self.level.as_ref().clone();
        if let Some(archetype) = next
            .entity_configs
            .as_mut()
            .and_then(|configs| configs.get_mut(config))
        {
            archetype.tiles_mut(facing)[slot] = tile;
        }
        self.level = Arc::new(next);
        self.unsaved = true;
        true
    }

    /// Persist the committed snapshot. On failure the edits stay in memory
    /// so the save can be retried.
    pub fn save(&mut self, store: &dyn LevelStore) -> bool {
        self.finish_stroke();
        let saved = store.save(&self.level);
        if saved {
            self.unsaved = false;
        } else {
            warn!("Level not saved; edits are kept in memory");
        }
        self.save_failed = !saved;
        saved
    }

    /// Notice for the last failed save; stays until dismissed or a save succeeds
    pub fn save_notice(&self) -> Option<&'static str> {
        self.save_failed.then_some("SAVE FAILED: edits are kept in memory")
    }

    pub fn dismiss_save_notice(&mut self) {
        self.save_failed = false;
    }
}
