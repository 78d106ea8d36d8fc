//! Sprite atlas addressing

use super::Rect;
use crate::simulation::{EMPTY_TILE, TILEMAP_COLS, TILEMAP_ROWS, TILE_SIZE};

/// A fixed-column sprite sheet of square tiles.
///
/// Tile id `t` lives at sheet index `t - 1`; id 0 is never drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteAtlas {
    pub columns: u32,
    pub rows: u32,
    pub tile_size: u32,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self {
            columns: TILEMAP_COLS,
            rows: TILEMAP_ROWS,
            tile_size: TILE_SIZE,
        }
    }
}

impl SpriteAtlas {
    /// Column and row of a tile id in the sheet
    pub fn cell(&self, tile_id: u32) -> Option<(u32, u32)> {
        if tile_id == EMPTY_TILE || self.columns == 0 {
            return None;
        }
        let sheet_index = tile_id - 1;
        Some((sheet_index % self.columns, sheet_index / self.columns))
    }

    /// Source rectangle of a tile id in sheet pixels
    pub fn source_rect(&self, tile_id: u32) -> Option<Rect> {
        let (column, row) = self.cell(tile_id)?;
        let size = self.tile_size as f32;
        Some(Rect::new(
            column as f32 * size,
            row as f32 * size,
            size,
            size,
        ))
    }

    /// Tile id shown at a palette column/row
    pub fn tile_at(&self, column: u32, row: u32) -> Option<u32> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row * self.columns + column + 1)
    }
}
