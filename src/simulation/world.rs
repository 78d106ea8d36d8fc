//! Main simulation world that ties everything together
//!
//! This is the entry point for running the city simulation without any
//! Bevy dependencies. One call to [`SimWorld::tick`] is one animation frame.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

use super::collision;
use super::config::SimConfig;
use super::entity::{EntityColor, EntityKind, SimEntity};
use super::level::LevelData;
use super::motion::{self, StepOutcome};
use super::spawn;
use super::types::{EntityId, Position};

/// Running counters for a simulation session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    pub cars: usize,
    pub pedestrians: usize,
    /// Cars held back by the look-ahead check on the last tick
    pub blocked_last_tick: usize,
    /// Entities that arrived somewhere with no way out on the last tick
    pub stalled_last_tick: usize,
    /// Tile-boundary decisions taken over the whole session
    pub decisions: u64,
}

impl SimStats {
    fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Travelling => {}
            StepOutcome::Decided(_) => self.decisions += 1,
            StepOutcome::Stalled => self.stalled_last_tick += 1,
        }
    }
}

/// The main simulation world
pub struct SimWorld {
    /// Immutable level snapshot this session runs on
    pub level: Arc<LevelData>,

    /// All cars, in collision resolution order
    pub cars: Vec<SimEntity>,

    /// All pedestrians
    pub pedestrians: Vec<SimEntity>,

    pub config: SimConfig,

    pub stats: SimStats,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(level: Arc<LevelData>, config: SimConfig, rng: Option<StdRng>) -> Self {
        Self {
            level,
            cars: Vec::new(),
            pedestrians: Vec::new(),
            config,
            stats: SimStats::default(),
            rng,
        }
    }

    /// Create a world and spawn its session entities
    pub fn new(level: Arc<LevelData>, config: SimConfig) -> Self {
        let mut world = Self::new_internal(level, config, None);
        world.spawn_entities();
        world
    }

    /// Create a world with a seeded RNG for reproducible simulations
    pub fn new_with_seed(level: Arc<LevelData>, config: SimConfig, seed: u64) -> Self {
        let mut world = Self::new_internal(level, config, Some(StdRng::seed_from_u64(seed)));
        world.spawn_entities();
        world
    }

    /// Create a seeded world with no entities, for hand-placed scenarios
    pub fn empty_with_seed(level: Arc<LevelData>, config: SimConfig, seed: u64) -> Self {
        Self::new_internal(level, config, Some(StdRng::seed_from_u64(seed)))
    }

    /// Rendered tile size in canvas pixels
    pub fn tile_px(&self) -> f32 {
        self.config.tile_px(self.level.tile_size)
    }

    /// Place the session's cars and pedestrians
    fn spawn_entities(&mut self) {
        let tile_px = self.tile_px();
        let mut thread_rng = rand::rng();
        let rng: &mut dyn RngCore = match &mut self.rng {
            Some(rng) => rng,
            None => &mut thread_rng,
        };

        self.cars = spawn::spawn_cars(&self.level, &self.config, tile_px, rng);
        self.pedestrians = spawn::spawn_pedestrians(&self.level, &self.config, tile_px, rng);
        self.stats.cars = self.cars.len();
        self.stats.pedestrians = self.pedestrians.len();

        info!(
            "Spawned {} cars and {} pedestrians on a {}x{} level",
            self.cars.len(),
            self.pedestrians.len(),
            self.level.width,
            self.level.height
        );
    }

    /// Place a car at the centre of a cell
    pub fn add_car(&mut self, gx: i32, gy: i32, speed: f32, archetype: Option<usize>) -> EntityId {
        let id = EntityId(self.cars.len());
        let position = Position::cell_center(gx, gy, self.tile_px());
        self.cars.push(SimEntity::new(
            id,
            EntityKind::Car,
            position,
            speed,
            archetype,
            EntityColor::hsl(0.0, 0.85, 0.6),
        ));
        self.stats.cars = self.cars.len();
        id
    }

    /// Place a pedestrian at the centre of a cell
    pub fn add_pedestrian(&mut self, gx: i32, gy: i32, speed: f32) -> EntityId {
        let id = EntityId(super::types::PEDESTRIAN_ID_BASE + self.pedestrians.len());
        let position = Position::cell_center(gx, gy, self.tile_px());
        self.pedestrians.push(SimEntity::new(
            id,
            EntityKind::Pedestrian,
            position,
            speed,
            None,
            EntityColor::hsl(200.0, 0.6, 0.7),
        ));
        self.stats.pedestrians = self.pedestrians.len();
        id
    }

    /// Main simulation tick: yield checks and movement for cars, then pedestrians
    pub fn tick(&mut self) {
        let tile_px = self.tile_px();
        let mut thread_rng = rand::rng();
        let rng: &mut dyn RngCore = match &mut self.rng {
            Some(rng) => rng,
            None => &mut thread_rng,
        };

        self.stats.ticks += 1;
        self.stats.blocked_last_tick = 0;
        self.stats.stalled_last_tick = 0;

        // Positions update in place, so later cars see earlier cars' new positions
        for index in 0..self.cars.len() {
            if collision::is_blocked(&self.cars, index, tile_px) {
                self.stats.blocked_last_tick += 1;
                continue;
            }
            let outcome = motion::step(&mut self.cars[index], &self.level, tile_px, rng);
            self.stats.record(outcome);
        }

        for pedestrian in self.pedestrians.iter_mut() {
            let outcome = motion::step(pedestrian, &self.level, tile_px, rng);
            self.stats.record(outcome);
        }

        debug!(
            "Tick {}: {} cars blocked, {} entities stalled",
            self.stats.ticks, self.stats.blocked_last_tick, self.stats.stalled_last_tick
        );
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== City Simulation Summary ===");
        println!("Ticks: {}", self.stats.ticks);
        println!(
            "Level: {}x{} tiles, {} layers",
            self.level.width,
            self.level.height,
            self.level.layers.len()
        );
        println!(
            "Cars: {}, Pedestrians: {}",
            self.cars.len(),
            self.pedestrians.len()
        );
        println!(
            "Blocked last tick: {}, Stalled last tick: {}, Decisions: {}",
            self.stats.blocked_last_tick, self.stats.stalled_last_tick, self.stats.decisions
        );

        if !self.cars.is_empty() {
            println!("--- Cars ---");
            for car in &self.cars {
                let (gx, gy) = car.position.cell(self.tile_px());
                println!(
                    "  Car {}: speed={:.2}, position=({:.1}, {:.1}), cell=({}, {}), heading=({}, {})",
                    car.id.0,
                    car.speed,
                    car.position.x,
                    car.position.y,
                    gx,
                    gy,
                    car.heading.dx,
                    car.heading.dy
                );
            }
        }
    }
}
