//! Runtime tuning for a simulation session

use std::ops::Range;

use super::types::{CAR_SPAWN_ATTEMPTS, PEDESTRIAN_COUNT, SCALE};

/// Tunable parameters for spawning and rendering scale
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Upscale from level tile size to canvas pixels
    pub scale: u32,
    /// Car placement attempts; attempts too close to an earlier car are dropped
    pub car_spawn_attempts: usize,
    pub pedestrian_count: usize,
    /// Pixels per tick
    pub car_speed: Range<f32>,
    /// Pixels per tick
    pub pedestrian_speed: Range<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scale: SCALE,
            car_spawn_attempts: CAR_SPAWN_ATTEMPTS,
            pedestrian_count: PEDESTRIAN_COUNT,
            car_speed: 0.5..2.0,
            pedestrian_speed: 0.2..0.5,
        }
    }
}

impl SimConfig {
    /// Rendered tile size in canvas pixels for a level's tile size
    pub fn tile_px(&self, level_tile_size: u32) -> f32 {
        level_tile_size.saturating_mul(self.scale.max(1)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{ACTUAL_TILE_SIZE, MAX_TILE_SIZE, TILE_SIZE};

    #[test]
    fn default_scale_matches_rendered_tile_size() {
        let config = SimConfig::default();
        assert_eq!(config.tile_px(TILE_SIZE), ACTUAL_TILE_SIZE);
        assert_eq!(config.tile_px(16), 48.0);
        assert_eq!(config.tile_px(MAX_TILE_SIZE), (MAX_TILE_SIZE * SCALE) as f32);
    }

    #[test]
    fn tile_px_saturates() {
        assert_eq!(SimConfig::default().tile_px(u32::MAX), u32::MAX as f32);
    }
}
