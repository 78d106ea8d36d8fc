//! Core types for the city simulation
//!
//! These are standalone types that don't depend on Bevy.

use super::level::Direction;

/// A unique identifier for simulation entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub usize);

/// A 2D position in canvas pixels (x to the right, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Grid cell containing this position for a given rendered tile size
    pub fn cell(&self, tile_px: f32) -> (i32, i32) {
        (
            (self.x / tile_px).floor() as i32,
            (self.y / tile_px).floor() as i32,
        )
    }

    /// Pixel centre of a grid cell
    pub fn cell_center(gx: i32, gy: i32, tile_px: f32) -> Position {
        Position {
            x: gx as f32 * tile_px + tile_px / 2.0,
            y: gy as f32 * tile_px + tile_px / 2.0,
        }
    }
}

/// Grid-aligned travel heading; each component is -1, 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const ZERO: Heading = Heading { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// True when moving in `direction` would turn straight back
    pub fn is_reversed_by(&self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        dx == -self.dx && dy == -self.dy
    }
}

impl From<Direction> for Heading {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Heading { dx, dy }
    }
}

/// Source tile size in the sprite atlas, in pixels
pub const TILE_SIZE: u32 = 8;

/// Upscale factor from atlas pixels to canvas pixels
pub const SCALE: u32 = 3;

/// Rendered tile size in canvas pixels
pub const ACTUAL_TILE_SIZE: f32 = (TILE_SIZE * SCALE) as f32;

/// Columns in the sprite atlas
pub const TILEMAP_COLS: u32 = 24;

/// Rows in the sprite atlas
pub const TILEMAP_ROWS: u32 = 15;

/// Look-ahead distance for vehicles, in tiles
pub const LOOK_AHEAD_TILES: f32 = 1.5;

/// Number of car placement attempts per session
pub const CAR_SPAWN_ATTEMPTS: usize = 40;

/// Number of pedestrians per session
pub const PEDESTRIAN_COUNT: usize = 50;

/// First id handed out to pedestrians
pub const PEDESTRIAN_ID_BASE: usize = 1000;

/// Fraction of a tile used for pedestrian scatter (full width of the spread)
pub const PEDESTRIAN_SCATTER: f32 = 0.5;
