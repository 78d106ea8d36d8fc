//! Standalone city simulation module
//!
//! This module contains the level data model and all the agent logic. It
//! runs independently of the Bevy game engine and can be driven from the
//! console or from tests.

pub mod collision;
mod config;
mod entity;
pub mod level;
pub mod motion;
mod spawn;
mod types;
mod world;

pub use config::SimConfig;
pub use entity::{EntityColor, EntityKind, SimEntity};
pub use level::{
    default_entity_configs, ArchetypeKind, Direction, EntityConfig, Facing, LevelData, LevelError,
    MaskKind, TileLayer, DEFAULT_LEVEL_HEIGHT, DEFAULT_LEVEL_WIDTH, EMPTY_TILE, MAX_TILE_SIZE,
};
pub use motion::StepOutcome;
pub use spawn::{spawn_cars, spawn_pedestrians};
pub use types::{
    EntityId, Heading, Position, ACTUAL_TILE_SIZE, CAR_SPAWN_ATTEMPTS, LOOK_AHEAD_TILES,
    PEDESTRIAN_COUNT, PEDESTRIAN_ID_BASE, SCALE, TILEMAP_COLS, TILEMAP_ROWS, TILE_SIZE,
};
pub use world::{SimStats, SimWorld};
