//! Session spawning of cars and pedestrians
//!
//! Entities are placed once when a world is created and then live for the
//! whole session.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::ops::Range;

use super::config::SimConfig;
use super::entity::{EntityColor, EntityKind, SimEntity};
use super::level::{ArchetypeKind, LevelData};
use super::types::{EntityId, Position, PEDESTRIAN_ID_BASE, PEDESTRIAN_SCATTER};

/// Uniform sample that tolerates an empty range
fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.start < range.end {
        rng.random_range(range.clone())
    } else {
        range.start
    }
}

/// Top-left pixel of every cell whose mask value passes `accept`
fn spawn_points(mask: &[u8], width: usize, tile_px: f32, accept: impl Fn(u8) -> bool) -> Vec<Position> {
    mask.iter()
        .enumerate()
        .filter(|(_, value)| accept(**value))
        .map(|(index, _)| {
            Position::new(
                (index % width) as f32 * tile_px,
                (index / width) as f32 * tile_px,
            )
        })
        .collect()
}

/// Place cars on drivable cells using the level's car archetypes
pub fn spawn_cars<R: Rng + ?Sized>(
    level: &LevelData,
    config: &SimConfig,
    tile_px: f32,
    rng: &mut R,
) -> Vec<SimEntity> {
    let archetypes: Vec<usize> = level
        .entity_configs()
        .iter()
        .enumerate()
        .filter(|(_, archetype)| archetype.kind == ArchetypeKind::Car)
        .map(|(index, _)| index)
        .collect();
    if archetypes.is_empty() {
        return Vec::new();
    }

    let points = spawn_points(&level.drivable, level.width, tile_px, |code| code > 0);
    let mut cars: Vec<SimEntity> = Vec::new();

    for attempt in 0..config.car_spawn_attempts {
        let (Some(spawn), Some(archetype)) = (points.choose(rng), archetypes.choose(rng)) else {
            break;
        };

        if cars
            .iter()
            .any(|car| car.position.distance(spawn) < tile_px)
        {
            debug!("Car spawn attempt {} rejected: too close to another car", attempt);
            continue;
        }

        let position = Position::new(spawn.x + tile_px / 2.0, spawn.y + tile_px / 2.0);
        let speed = sample(rng, &config.car_speed);
        let color = EntityColor::hsl(rng.random_range(0.0..360.0), 0.85, 0.6);
        cars.push(SimEntity::new(
            EntityId(attempt),
            EntityKind::Car,
            position,
            speed,
            Some(*archetype),
            color,
        ));
    }

    cars
}

/// Scatter pedestrians over walkable cells
pub fn spawn_pedestrians<R: Rng + ?Sized>(
    level: &LevelData,
    config: &SimConfig,
    tile_px: f32,
    rng: &mut R,
) -> Vec<SimEntity> {
    let points = spawn_points(&level.walkable, level.width, tile_px, |flag| flag == 1);
    if points.is_empty() {
        return Vec::new();
    }

    let mut pedestrians = Vec::with_capacity(config.pedestrian_count);
    for i in 0..config.pedestrian_count {
        let Some(spawn) = points.choose(rng) else {
            break;
        };
        let offset_x = (rng.random::<f32>() - 0.5) * tile_px * PEDESTRIAN_SCATTER;
        let offset_y = (rng.random::<f32>() - 0.5) * tile_px * PEDESTRIAN_SCATTER;
        let position = Position::new(
            spawn.x + tile_px / 2.0 + offset_x,
            spawn.y + tile_px / 2.0 + offset_y,
        );
        let speed = sample(rng, &config.pedestrian_speed);
        let color = EntityColor::hsl(rng.random_range(0.0..360.0), 0.6, 0.7);
        pedestrians.push(SimEntity::new(
            EntityId(PEDESTRIAN_ID_BASE + i),
            EntityKind::Pedestrian,
            position,
            speed,
            None,
            color,
        ));
    }

    pedestrians
}
