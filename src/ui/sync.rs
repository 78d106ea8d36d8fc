//! Systems that advance the simulation and mirror it onto the canvas

use bevy::prelude::*;

use super::canvas::Canvas;
use super::components::{HudText, SimWorldResource, ViewSettings};
use crate::render;

/// Startup system: size the canvas to the level and add the HUD
pub fn setup_viewer(mut commands: Commands, mut images: ResMut<Assets<Image>>, sim_world: Res<SimWorldResource>) {
    let world = &sim_world.0;
    let canvas = Canvas::spawn(
        &mut commands,
        &mut images,
        (world.level.width, world.level.height),
        world.tile_px(),
    );
    commands.insert_resource(canvas);
    super::spawn_hud(&mut commands);
}

/// One simulation tick per fixed step
pub fn tick_simulation(settings: Res<ViewSettings>, mut sim_world: ResMut<SimWorldResource>) {
    if !settings.paused {
        sim_world.0.tick();
    }
}

/// Redraw the frame from the current simulation state
pub fn draw_world(
    sim_world: Res<SimWorldResource>,
    settings: Res<ViewSettings>,
    canvas: Option<ResMut<Canvas>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(mut canvas) = canvas else {
        return;
    };
    let canvas = &mut *canvas;
    render::draw_simulation(&mut canvas.surface, &sim_world.0, &canvas.atlas, settings.show_debug);
    canvas.upload(&mut images);
}

pub fn update_viewer_hud(
    sim_world: Res<SimWorldResource>,
    settings: Res<ViewSettings>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = hud.single_mut() else {
        return;
    };
    let stats = &sim_world.0.stats;
    **text = format!(
        "Tick {}{}\nCars: {}  Pedestrians: {}\nBlocked: {}  Debug overlay: {}\n[Space] pause  [D] debug  [Esc] quit",
        stats.ticks,
        if settings.paused { " (paused)" } else { "" },
        stats.cars,
        stats.pedestrians,
        stats.blocked_last_tick,
        if settings.show_debug { "on" } else { "off" },
    );
}
