//! Level data shared by the simulation and the editor
//!
//! A level is a fixed-size grid. Every per-cell array (tile layers, the
//! drivable direction mask and the walkable mask) has exactly
//! `width * height` entries, indexed row-major: index `i` is cell
//! `(i % width, i / width)`.
//!
//! The arrays sit behind `Arc` so that an edited snapshot shares every
//! array it did not touch with the snapshot it came from.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Tile id reserved for "no tile" on every layer and mask
pub const EMPTY_TILE: u32 = 0;

/// Default dimensions used when the editor has nothing to load
pub const DEFAULT_LEVEL_WIDTH: usize = 40;
pub const DEFAULT_LEVEL_HEIGHT: usize = 30;

/// Largest tile size a level may declare, in source pixels
pub const MAX_TILE_SIZE: u32 = 256;

/// Errors raised when validating level structure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level dimensions must be non-zero (got {width}x{height})")]
    ZeroSized { width: usize, height: usize },
    #[error("tile size must be non-zero")]
    ZeroTileSize,
    #[error("level of {width}x{height} cells is too large")]
    TooLarge { width: usize, height: usize },
    #[error("tile size {0} exceeds the maximum of {max}", max = MAX_TILE_SIZE)]
    TileSizeTooLarge(u32),
    #[error("{array} has {actual} cells, expected {expected}")]
    LengthMismatch {
        array: String,
        expected: usize,
        actual: usize,
    },
    #[error("drivable cell {index} has invalid direction code {code}")]
    InvalidDirection { index: usize, code: u8 },
    #[error("walkable cell {index} has non-boolean value {value}")]
    InvalidWalkable { index: usize, value: u8 },
}

/// One cardinal direction, encoded on the drivable mask as 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Fixed enumeration order used for candidate moves
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn code(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Right => 2,
            Direction::Down => 3,
            Direction::Left => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            1 => Some(Direction::Up),
            2 => Some(Direction::Right),
            3 => Some(Direction::Down),
            4 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Grid delta, y pointing down
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Direction of the dominant axis of a grid delta.
    /// Horizontal wins only when strictly larger; returns None for (0, 0).
    pub fn from_drag(dx: i32, dy: i32) -> Option<Direction> {
        if dx == 0 && dy == 0 {
            None
        } else if dx.abs() > dy.abs() {
            Some(if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if dy > 0 {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Which directional sprite sequence of an archetype to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Right,
    Left,
    Up,
    Down,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Right, Facing::Left, Facing::Up, Facing::Down];

    pub fn name(self) -> &'static str {
        match self {
            Facing::Right => "right",
            Facing::Left => "left",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }
}

/// Kind of multi-tile agent an archetype describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeKind {
    Car,
    Train,
}

/// A named sprite train per travel direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: ArchetypeKind,
    pub right: Vec<u32>,
    pub left: Vec<u32>,
    pub up: Vec<u32>,
    pub down: Vec<u32>,
}

impl EntityConfig {
    /// Archetype with `slots` empty tiles in every direction
    pub fn empty(id: u32, kind: ArchetypeKind, slots: usize) -> Self {
        Self {
            id,
            kind,
            right: vec![EMPTY_TILE; slots],
            left: vec![EMPTY_TILE; slots],
            up: vec![EMPTY_TILE; slots],
            down: vec![EMPTY_TILE; slots],
        }
    }

    pub fn tiles(&self, facing: Facing) -> &[u32] {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
            Facing::Up => &self.up,
            Facing::Down => &self.down,
        }
    }

    pub fn tiles_mut(&mut self, facing: Facing) -> &mut Vec<u32> {
        match facing {
            Facing::Right => &mut self.right,
            Facing::Left => &mut self.left,
            Facing::Up => &mut self.up,
            Facing::Down => &mut self.down,
        }
    }
}

/// Archetypes installed by the editor when a level has none
pub fn default_entity_configs() -> Vec<EntityConfig> {
    vec![
        EntityConfig::empty(0, ArchetypeKind::Car, 2),
        EntityConfig::empty(1, ArchetypeKind::Car, 2),
        EntityConfig::empty(2, ArchetypeKind::Car, 2),
        EntityConfig::empty(3, ArchetypeKind::Train, 4),
    ]
}

/// A named full-grid array of tile ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub data: Arc<Vec<u32>>,
}

impl TileLayer {
    pub fn blank(name: impl Into<String>, cells: usize) -> Self {
        Self {
            name: name.into(),
            data: Arc::new(vec![EMPTY_TILE; cells]),
        }
    }
}

/// Which per-cell mask an entity navigates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    Drivable,
    Walkable,
}

/// Canonical level snapshot, shaped exactly like the persisted JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    pub layers: Vec<TileLayer>,
    pub drivable: Arc<Vec<u8>>,
    pub walkable: Arc<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_configs: Option<Vec<EntityConfig>>,
}

impl LevelData {
    /// Empty level with the given named layers and no archetypes
    pub fn blank(width: usize, height: usize, tile_size: u32, layer_names: &[&str]) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            tile_size,
            layers: layer_names
                .iter()
                .map(|name| TileLayer::blank(*name, cells))
                .collect(),
            drivable: Arc::new(vec![0; cells]),
            walkable: Arc::new(vec![0; cells]),
            entity_configs: None,
        }
    }

    /// Level the editor starts from when nothing could be loaded
    pub fn editor_default() -> Self {
        let mut level = Self::blank(
            DEFAULT_LEVEL_WIDTH,
            DEFAULT_LEVEL_HEIGHT,
            super::types::TILE_SIZE,
            &["Ground", "Objects"],
        );
        level.entity_configs = Some(default_entity_configs());
        level
    }

    /// Small sample city: a clockwise one-way ring road between two rings
    /// of sidewalk, on a 20x15 grid
    pub fn demo_city() -> Self {
        let (width, height) = (20, 15);
        let mut level = Self::blank(width, height, super::types::TILE_SIZE, &["Ground", "Objects"]);
        level.layers[0].data = Arc::new(vec![1; width * height]);
        level.entity_configs = Some(default_entity_configs());

        let (left, right, top, bottom) = (2, 17, 2, 12);
        let mut drivable = vec![0u8; width * height];
        let mut walkable = vec![0u8; width * height];

        for x in left..right {
            drivable[top * width + x] = Direction::Right.code();
        }
        for y in top..bottom {
            drivable[y * width + right] = Direction::Down.code();
        }
        for x in left + 1..=right {
            drivable[bottom * width + x] = Direction::Left.code();
        }
        for y in top + 1..=bottom {
            drivable[y * width + left] = Direction::Up.code();
        }

        // Sidewalks just outside and just inside the road
        for (l, r, t, b) in [
            (left - 1, right + 1, top - 1, bottom + 1),
            (left + 1, right - 1, top + 1, bottom - 1),
        ] {
            for x in l..=r {
                walkable[t * width + x] = 1;
                walkable[b * width + x] = 1;
            }
            for y in t..=b {
                walkable[y * width + l] = 1;
                walkable[y * width + r] = 1;
            }
        }

        level.drivable = Arc::new(drivable);
        level.walkable = Arc::new(walkable);
        level
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Array index of an in-bounds cell
    pub fn index(&self, gx: i32, gy: i32) -> Option<usize> {
        if gx < 0 || gy < 0 {
            return None;
        }
        let (x, y) = (gx as usize, gy as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Cell of an array index
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        self.index(gx, gy).is_some()
    }

    pub fn mask(&self, kind: MaskKind) -> &[u8] {
        match kind {
            MaskKind::Drivable => &self.drivable,
            MaskKind::Walkable => &self.walkable,
        }
    }

    /// Mask value at a cell, 0 when off-grid
    pub fn mask_at(&self, kind: MaskKind, gx: i32, gy: i32) -> u8 {
        self.index(gx, gy)
            .and_then(|i| self.mask(kind).get(i).copied())
            .unwrap_or(0)
    }

    pub fn entity_configs(&self) -> &[EntityConfig] {
        self.entity_configs.as_deref().unwrap_or(&[])
    }

    /// Ensure archetypes exist, installing the defaults if absent
    pub fn with_default_entity_configs(mut self) -> Self {
        if self.entity_configs.is_none() {
            self.entity_configs = Some(default_entity_configs());
        }
        self
    }

    /// Check the structural invariants every consumer relies on
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::ZeroSized {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_size == 0 {
            return Err(LevelError::ZeroTileSize);
        }
        if self.tile_size > MAX_TILE_SIZE {
            return Err(LevelError::TileSizeTooLarge(self.tile_size));
        }

        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(LevelError::TooLarge {
                width: self.width,
                height: self.height,
            })?;
        let check = |array: &str, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(LevelError::LengthMismatch {
                    array: array.to_string(),
                    expected,
                    actual,
                })
            }
        };

        for layer in &self.layers {
            check(&format!("layer '{}'", layer.name), layer.data.len())?;
        }
        check("drivable", self.drivable.len())?;
        check("walkable", self.walkable.len())?;

        if let Some((index, &code)) = self.drivable.iter().enumerate().find(|(_, c)| **c > 4) {
            return Err(LevelError::InvalidDirection { index, code });
        }
        if let Some((index, &value)) = self.walkable.iter().enumerate().find(|(_, v)| **v > 1) {
            return Err(LevelError::InvalidWalkable { index, value });
        }

        Ok(())
    }
}
