//! Agent movement, decisions and vehicle yielding

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use city_sim::simulation::collision::{is_blocked, look_ahead_point};
use city_sim::simulation::motion::{candidate_moves, choose_move, decide, step};
use city_sim::simulation::{
    Direction, EntityKind, Heading, LevelData, MaskKind, Position, SimConfig, SimWorld, StepOutcome,
};

const TILE: f32 = 24.0;

fn level_with(width: usize, height: usize, drivable: Vec<u8>, walkable: Vec<u8>) -> Arc<LevelData> {
    let mut level = LevelData::blank(width, height, 8, &["Ground"]).with_default_entity_configs();
    level.drivable = Arc::new(drivable);
    level.walkable = Arc::new(walkable);
    assert!(level.validate().is_ok());
    Arc::new(level)
}

fn neighbour_centres(gx: i32, gy: i32) -> Vec<Position> {
    Direction::ALL
        .iter()
        .map(|direction| {
            let (dx, dy) = direction.delta();
            Position::cell_center(gx + dx, gy + dy, TILE)
        })
        .collect()
}

#[test]
fn test_every_array_shares_cell_indexing() {
    let level = LevelData::demo_city();
    for i in 0..level.cell_count() {
        let (x, y) = level.cell(i);
        assert_eq!((x, y), (i % level.width, i / level.width));
        assert_eq!(level.index(x as i32, y as i32), Some(i));
        assert_eq!(level.mask_at(MaskKind::Drivable, x as i32, y as i32), level.drivable[i]);
        assert_eq!(level.mask_at(MaskKind::Walkable, x as i32, y as i32), level.walkable[i]);
    }
}

#[test]
fn test_direction_code_allows_exactly_one_move() {
    // Plus-shaped 3x3 road with the centre tagged
    for direction in Direction::ALL {
        let mut drivable = vec![0, 1, 0, 1, 0, 1, 0, 1, 0];
        drivable[4] = direction.code();
        let level = level_with(3, 3, drivable, vec![0; 9]);
        assert_eq!(candidate_moves(&level, EntityKind::Car, 1, 1), vec![direction]);
    }
}

#[test]
fn test_untagged_tile_allows_all_open_neighbours() {
    let level = level_with(3, 3, vec![0, 1, 0, 1, 0, 1, 0, 1, 0], vec![0; 9]);
    assert_eq!(candidate_moves(&level, EntityKind::Car, 1, 1), Direction::ALL.to_vec());

    // Corner cell: off-grid neighbours are never candidates
    let level = level_with(2, 2, vec![0, 1, 1, 0], vec![0; 4]);
    assert_eq!(
        candidate_moves(&level, EntityKind::Car, 0, 0),
        vec![Direction::Right, Direction::Down]
    );
}

#[test]
fn test_pedestrians_ignore_direction_codes() {
    let level = level_with(3, 1, vec![2, 4, 2], vec![1, 1, 1]);
    assert_eq!(
        candidate_moves(&level, EntityKind::Pedestrian, 1, 0),
        vec![Direction::Right, Direction::Left]
    );
    assert_eq!(
        candidate_moves(&level, EntityKind::Car, 1, 0),
        vec![Direction::Left]
    );
}

#[test]
fn test_fresh_car_on_small_map_targets_a_neighbour_centre() {
    for seed in 0..20 {
        let level = level_with(2, 2, vec![1; 4], vec![0; 4]);
        let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), seed);
        world.add_car(1, 1, 1.0, Some(0));
        assert_eq!(world.cars[0].heading, Heading::ZERO);

        world.tick();

        let car = &world.cars[0];
        assert!(
            neighbour_centres(1, 1).contains(&car.target),
            "seed {}: target {:?}",
            seed,
            car.target
        );
        let level = world.level.as_ref();
        let (gx, gy) = car.target.cell(TILE);
        assert!(level.mask_at(MaskKind::Drivable, gx, gy) > 0);
    }
}

#[test]
fn test_untagged_fresh_car_picks_any_open_neighbour() {
    let level = level_with(3, 3, vec![0, 1, 0, 1, 0, 1, 0, 1, 0], vec![0; 9]);
    let mut rng = StdRng::seed_from_u64(11);
    let mut seen = Vec::new();
    for _ in 0..200 {
        let mut world = SimWorld::empty_with_seed(Arc::clone(&level), SimConfig::default(), 0);
        world.add_car(1, 1, 1.0, None);
        let car = &mut world.cars[0];
        if let StepOutcome::Decided(direction) = decide(car, &level, TILE, &mut rng) {
            if !seen.contains(&direction) {
                seen.push(direction);
            }
        }
    }
    assert_eq!(seen.len(), 4, "saw only {:?}", seen);
}

#[test]
fn test_moving_car_does_not_turn_back() {
    let level = level_with(3, 1, vec![0, 0, 0], vec![0; 3]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 0);
    world.add_car(1, 0, 1.0, None);
    let mut car = world.cars[0].clone();
    car.heading = Heading::from(Direction::Right);

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let choice = choose_move(&car, &[Direction::Right, Direction::Left], &mut rng);
        assert_eq!(choice, Some(Direction::Right));
    }

    // Dead end: reversing is the only way out
    assert_eq!(choose_move(&car, &[Direction::Left], &mut rng), Some(Direction::Left));
    assert_eq!(choose_move(&car, &[], &mut rng), None);
}

#[test]
fn test_enclosed_entity_stalls_in_place() {
    let level = level_with(3, 3, vec![0; 9], vec![0, 0, 0, 0, 1, 0, 0, 0, 0]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 4);
    world.add_pedestrian(1, 1, 0.3);
    let start = world.pedestrians[0].position;

    for _ in 0..10 {
        world.tick();
        assert_eq!(world.stats.stalled_last_tick, 1);
    }
    assert_eq!(world.pedestrians[0].position, start);
    assert_eq!(world.pedestrians[0].target, start);
}

#[test]
fn test_step_moves_by_speed_then_snaps() {
    let level = level_with(3, 1, vec![2, 2, 2], vec![0; 3]);
    let mut world = SimWorld::empty_with_seed(Arc::clone(&level), SimConfig::default(), 0);
    world.add_car(0, 0, 10.0, None);
    let mut car = world.cars[0].clone();
    let mut rng = StdRng::seed_from_u64(0);

    // Resting on its target: decides immediately
    assert_eq!(step(&mut car, &level, TILE, &mut rng), StepOutcome::Decided(Direction::Right));
    assert_eq!(car.target, Position::cell_center(1, 0, TILE));

    assert_eq!(step(&mut car, &level, TILE, &mut rng), StepOutcome::Travelling);
    assert_eq!(car.position, Position::new(22.0, 12.0));
    assert_eq!(step(&mut car, &level, TILE, &mut rng), StepOutcome::Travelling);
    assert_eq!(car.position, Position::new(32.0, 12.0));

    // 4px left with speed 10: snap, leftover dropped, next leg chosen
    assert_eq!(step(&mut car, &level, TILE, &mut rng), StepOutcome::Decided(Direction::Right));
    assert_eq!(car.position, Position::cell_center(1, 0, TILE));
    assert_eq!(car.target, Position::cell_center(2, 0, TILE));
}

#[test]
fn test_pedestrian_targets_are_scattered_near_centres() {
    let level = level_with(5, 5, vec![0; 25], vec![1; 25]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 8);
    world.add_pedestrian(2, 2, 0.3);
    world.tick();

    let pedestrian = &world.pedestrians[0];
    let nearest = neighbour_centres(2, 2)
        .into_iter()
        .map(|centre| (centre.x - pedestrian.target.x).abs().max((centre.y - pedestrian.target.y).abs()))
        .fold(f32::INFINITY, f32::min);
    assert!(nearest <= TILE * 0.25, "scatter too wide: {}", nearest);
}

#[test]
fn test_trailing_car_yields_to_leading_car() {
    let level = level_with(6, 1, vec![2; 6], vec![0; 6]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 0);
    world.add_car(1, 0, 1.0, None);
    world.add_car(2, 0, 1.0, None);
    for car in world.cars.iter_mut() {
        car.heading = Heading::from(Direction::Right);
        car.target = Position::new(car.position.x + TILE, car.position.y);
    }

    let ahead = look_ahead_point(&world.cars[0], TILE).unwrap();
    assert_eq!(ahead, Position::new(36.0 + 36.0, 12.0));
    assert!(is_blocked(&world.cars, 0, TILE));
    assert!(!is_blocked(&world.cars, 1, TILE));

    let (trailing, leading) = (world.cars[0].position, world.cars[1].position);
    world.tick();
    assert_eq!(world.cars[0].position, trailing);
    assert_ne!(world.cars[1].position, leading);
    assert_eq!(world.stats.blocked_last_tick, 1);
}

#[test]
fn test_stationary_cars_never_block() {
    let level = level_with(2, 1, vec![2, 4], vec![0; 2]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 0);
    world.add_car(0, 0, 1.0, None);
    world.add_car(1, 0, 1.0, None);
    assert!(look_ahead_point(&world.cars[0], TILE).is_none());
    assert!(!is_blocked(&world.cars, 0, TILE));
    assert!(!is_blocked(&world.cars, 1, TILE));
}

#[test]
fn test_pedestrians_do_not_collide() {
    let level = level_with(3, 1, vec![0; 3], vec![1; 3]);
    let mut world = SimWorld::empty_with_seed(level, SimConfig::default(), 2);
    world.add_pedestrian(1, 0, 0.5);
    world.add_pedestrian(1, 0, 0.5);
    for _ in 0..5 {
        world.tick();
    }
    assert_eq!(world.stats.blocked_last_tick, 0);
    assert_ne!(world.pedestrians[0].position, Position::cell_center(1, 0, TILE));
}

#[test]
fn test_demo_city_cars_stay_on_the_road() {
    let level = Arc::new(LevelData::demo_city());
    let mut world = SimWorld::new_with_seed(Arc::clone(&level), SimConfig::default(), 42);
    assert!(!world.cars.is_empty());
    assert_eq!(world.pedestrians.len(), 50);

    for _ in 0..500 {
        world.tick();
        for car in &world.cars {
            let (gx, gy) = car.target.cell(TILE);
            assert!(level.mask_at(MaskKind::Drivable, gx, gy) > 0, "car {:?} left the road", car.id);
        }
    }
    assert!(world.stats.decisions > 0);
}

#[test]
fn test_seeded_worlds_are_reproducible() {
    let level = Arc::new(LevelData::demo_city());
    let mut a = SimWorld::new_with_seed(Arc::clone(&level), SimConfig::default(), 99);
    let mut b = SimWorld::new_with_seed(level, SimConfig::default(), 99);
    for _ in 0..100 {
        a.tick();
        b.tick();
    }
    assert_eq!(a.cars, b.cars);
    assert_eq!(a.pedestrians, b.pedestrians);
}
