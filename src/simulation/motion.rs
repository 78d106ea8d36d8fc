//! Per-tick movement and tile-boundary decisions
//!
//! An entity is either travelling toward its target or has arrived. On
//! arrival it looks at the tile it occupies, builds the orthogonal moves it
//! is allowed to make and picks one. Decisions are purely local: there is
//! no route, only the next tile.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::entity::{EntityKind, SimEntity};
use super::level::{Direction, LevelData};
use super::types::{Heading, Position, PEDESTRIAN_SCATTER};

/// What happened to an entity during one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved toward the target without reaching it
    Travelling,
    /// Reached the target and picked the next tile
    Decided(Direction),
    /// Reached the target but no neighbour is enterable
    Stalled,
}

/// Moves an entity of `kind` may consider from cell `(gx, gy)`.
///
/// Cars on a tile carrying a direction code may only leave in that
/// direction. Every surviving move must land on an in-bounds neighbour
/// whose mask value is non-zero. Order follows [`Direction::ALL`].
pub fn candidate_moves(level: &LevelData, kind: EntityKind, gx: i32, gy: i32) -> Vec<Direction> {
    let mask = kind.mask();
    let forced = match kind {
        EntityKind::Car => Direction::from_code(level.mask_at(mask, gx, gy)),
        EntityKind::Pedestrian => None,
    };

    Direction::ALL
        .into_iter()
        .filter(|direction| forced.map_or(true, |only| only == *direction))
        .filter(|direction| {
            let (dx, dy) = direction.delta();
            level.mask_at(mask, gx + dx, gy + dy) > 0
        })
        .collect()
}

/// Pick one of `candidates` for `entity`.
///
/// Pedestrians and cars without a heading choose uniformly. Moving cars
/// avoid turning back unless that is the only way out, in which case the
/// first candidate in enumeration order is taken.
pub fn choose_move<R: Rng + ?Sized>(
    entity: &SimEntity,
    candidates: &[Direction],
    rng: &mut R,
) -> Option<Direction> {
    match entity.kind {
        EntityKind::Pedestrian => candidates.choose(rng).copied(),
        EntityKind::Car if entity.heading.is_zero() => candidates.choose(rng).copied(),
        EntityKind::Car => {
            let forward: Vec<Direction> = candidates
                .iter()
                .copied()
                .filter(|direction| !entity.heading.is_reversed_by(*direction))
                .collect();
            forward
                .choose(rng)
                .copied()
                .or_else(|| candidates.first().copied())
        }
    }
}

/// Decide the next target for an entity that has arrived at its target
pub fn decide<R: Rng + ?Sized>(
    entity: &mut SimEntity,
    level: &LevelData,
    tile_px: f32,
    rng: &mut R,
) -> StepOutcome {
    let (gx, gy) = entity.position.cell(tile_px);
    let candidates = candidate_moves(level, entity.kind, gx, gy);

    let Some(direction) = choose_move(entity, &candidates, rng) else {
        entity.target = entity.position;
        return StepOutcome::Stalled;
    };

    let (dx, dy) = direction.delta();
    let mut target = Position::cell_center(gx + dx, gy + dy, tile_px);
    if entity.is_pedestrian() {
        target.x += (rng.random::<f32>() - 0.5) * tile_px * PEDESTRIAN_SCATTER;
        target.y += (rng.random::<f32>() - 0.5) * tile_px * PEDESTRIAN_SCATTER;
    }

    entity.target = target;
    entity.heading = Heading::from(direction);
    StepOutcome::Decided(direction)
}

/// Advance an entity by one tick.
///
/// Moves `speed` pixels toward the target. When less than one step
/// remains the entity snaps onto the target and decides again within the
/// same tick; the unused part of the step is dropped.
pub fn step<R: Rng + ?Sized>(
    entity: &mut SimEntity,
    level: &LevelData,
    tile_px: f32,
    rng: &mut R,
) -> StepOutcome {
    let dx = entity.target.x - entity.position.x;
    let dy = entity.target.y - entity.position.y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist < entity.speed || dist == 0.0 {
        entity.position = entity.target;
        return decide(entity, level, tile_px, rng);
    }

    entity.position.x += dx / dist * entity.speed;
    entity.position.y += dy / dist * entity.speed;
    StepOutcome::Travelling
}
