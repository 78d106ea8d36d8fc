//! Runtime agents: cars and pedestrians
//!
//! Entities are plain value records stored densely in the world's arrays
//! and updated in place each tick. They are never persisted.

use super::level::MaskKind;
use super::types::{EntityId, Heading, Position};

/// What kind of agent this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Follows the drivable mask, honours direction codes and yields to cars ahead
    Car,
    /// Wanders the walkable mask, ignores direction codes and collisions
    Pedestrian,
}

impl EntityKind {
    /// The mask this kind of agent navigates on
    pub fn mask(self) -> MaskKind {
        match self {
            EntityKind::Car => MaskKind::Drivable,
            EntityKind::Pedestrian => MaskKind::Walkable,
        }
    }
}

/// Cosmetic colour in HSL (hue in degrees, saturation/lightness in 0..=1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl EntityColor {
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to 8-bit RGB
    pub fn to_rgb(&self) -> [u8; 3] {
        let c = (1.0 - (2.0 * self.lightness - 1.0).abs()) * self.saturation;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.lightness - c / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}

/// A moving agent in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub target: Position,
    pub heading: Heading,
    /// Pixels travelled per tick
    pub speed: f32,
    /// Index into the level's archetype list (cars only)
    pub archetype: Option<usize>,
    pub color: EntityColor,
}

impl SimEntity {
    /// A freshly spawned agent resting at `position` with no heading
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        position: Position,
        speed: f32,
        archetype: Option<usize>,
        color: EntityColor,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            target: position,
            heading: Heading::ZERO,
            speed,
            archetype,
            color,
        }
    }

    pub fn is_pedestrian(&self) -> bool {
        self.kind == EntityKind::Pedestrian
    }
}
