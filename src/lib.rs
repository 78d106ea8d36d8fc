//! City Simulation Library
//!
//! A grid-based city micro-simulation of cars and pedestrians, plus the
//! tile-map editor that authors its levels. Everything runs headless; the
//! Bevy front end is behind the `ui` feature.

pub mod editor;
pub mod persistence;
pub mod render;
pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
