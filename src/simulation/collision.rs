//! Look-ahead yielding between vehicles
//!
//! A moving car projects a point a fixed distance ahead along its heading.
//! If any other car sits within one tile of that point the car holds still
//! for the tick. There is no right of way; whichever car is checked first
//! with a clear road moves first.

use super::entity::SimEntity;
use super::types::{Position, LOOK_AHEAD_TILES};

/// Point projected ahead of a car, or None when it has no heading
pub fn look_ahead_point(car: &SimEntity, tile_px: f32) -> Option<Position> {
    if car.heading.is_zero() {
        return None;
    }
    let reach = tile_px * LOOK_AHEAD_TILES;
    Some(Position::new(
        car.position.x + car.heading.dx as f32 * reach,
        car.position.y + car.heading.dy as f32 * reach,
    ))
}

/// Whether the car at `index` must hold still this tick
pub fn is_blocked(cars: &[SimEntity], index: usize, tile_px: f32) -> bool {
    let Some(car) = cars.get(index) else {
        return false;
    };
    let Some(ahead) = look_ahead_point(car, tile_px) else {
        return false;
    };

    cars.iter()
        .enumerate()
        .filter(|(other_index, _)| *other_index != index)
        .any(|(_, other)| ahead.distance(&other.position) < tile_px)
}
