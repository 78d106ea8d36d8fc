//! UI module that shows the simulation and hosts the editor using Bevy
//!
//! This module is purely a front end. All simulation and editing logic is
//! in the headless modules; frames are drawn by the software renderer and
//! shown as one nearest-filtered sprite.

mod canvas;
mod components;
mod editing;
mod input;
mod sync;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::sync::Arc;

pub use components::{EditorResource, EntitySlot, SimWorldResource, ViewSettings};

use crate::editor::Editor;
use crate::persistence::FileLevelStore;
use crate::simulation::{LevelData, SimConfig, SimWorld};
use components::HudText;
use editing::{draw_editor, setup_editor, update_editor_hud};
use input::{handle_editor_keys, handle_editor_pointer, handle_editor_wheel, handle_input, handle_viewer_keys};
use sync::{draw_world, setup_viewer, tick_simulation, update_viewer_hud};

/// Animation frames per second; one simulation tick per frame
const FRAME_RATE: f64 = 60.0;

/// Plugin for the simulation viewer; expects a [`SimWorldResource`]
pub struct CityViewerPlugin;

impl Plugin for CityViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewSettings>()
            .insert_resource(Time::<Fixed>::from_hz(FRAME_RATE))
            .add_systems(Startup, setup_viewer)
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    handle_input,
                    handle_viewer_keys,
                    draw_world,
                    update_viewer_hud,
                ),
            );
    }
}

/// Plugin for the level editor; expects an [`EditorResource`]
pub struct CityEditorPlugin;

impl Plugin for CityEditorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_editor).add_systems(
            Update,
            (
                handle_input,
                handle_editor_keys,
                handle_editor_wheel,
                handle_editor_pointer,
                draw_editor.after(handle_editor_pointer),
                update_editor_hud,
            ),
        );
    }
}

fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn default_plugins(title: &str) -> impl PluginGroup {
    DefaultPlugins
        .set(LogPlugin {
            filter: "warn,city_sim=debug".to_string(),
            level: bevy::log::Level::DEBUG,
            ..default()
        })
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: title.into(),
                resolution: (1280, 800).into(),
                ..default()
            }),
            ..default()
        })
        .set(ImagePlugin::default_nearest())
}

/// Open the simulation viewer on a level
pub fn run_viewer(level: Arc<LevelData>, seed: Option<u64>) {
    println!("Starting City Sim viewer...");
    println!("  Space - Pause / resume");
    println!("  D     - Toggle drivable/walkable overlay");
    println!("  ESC   - Exit");

    let world = match seed {
        Some(seed) => SimWorld::new_with_seed(level, SimConfig::default(), seed),
        None => SimWorld::new(level, SimConfig::default()),
    };

    App::new()
        .add_plugins(default_plugins("City Sim"))
        .insert_resource(SimWorldResource(world))
        .add_plugins(CityViewerPlugin)
        .run();
}

/// Open the editor on the level stored at `store`; starts blank when the
/// file does not exist and refuses to start when it exists but is unreadable
pub fn run_editor(store: FileLevelStore) -> anyhow::Result<()> {
    println!("Starting City Sim editor on {}...", store.path().display());

    let level = store.load_for_editing()?;
    let state = EditorResource {
        editor: Editor::new(level),
        store,
        entity_slot: EntitySlot::default(),
    };

    App::new()
        .add_plugins(default_plugins("City Sim - Editor"))
        .insert_resource(state)
        .add_plugins(CityEditorPlugin)
        .run();
    Ok(())
}
