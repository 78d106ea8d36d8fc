//! Input handling systems

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use log::warn;

use super::canvas::Canvas;
use super::components::{EditorResource, MainCamera, ViewSettings};
use crate::editor::{PointerButton, Tool};
use crate::simulation::{Facing, TILEMAP_COLS, TILEMAP_ROWS};

/// Handle basic keyboard input
pub fn handle_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

/// Viewer toggles
pub fn handle_viewer_keys(keyboard: Res<ButtonInput<KeyCode>>, mut settings: ResMut<ViewSettings>) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        settings.show_debug = !settings.show_debug;
    }
    if keyboard.just_pressed(KeyCode::Space) {
        settings.paused = !settings.paused;
    }
}

/// Feed mouse buttons and cursor movement into the editor's pointer machine
pub fn handle_editor_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    canvas: Option<Res<Canvas>>,
    mut state: ResMut<EditorResource>,
) {
    let Some(canvas) = canvas else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let editor = &mut state.editor;
    if editor.save_notice().is_some() {
        return;
    }

    let Some(cell) = canvas.cursor_cell(window, camera, camera_transform) else {
        if editor.hover().is_some() || editor.is_drawing() {
            editor.pointer_leave();
        }
        return;
    };

    if mouse.just_pressed(MouseButton::Left) {
        editor.pointer_down(cell, PointerButton::Primary);
    } else if mouse.just_pressed(MouseButton::Right) {
        editor.pointer_down(cell, PointerButton::Secondary);
    } else if editor.hover() != Some(cell) {
        editor.pointer_move(cell);
    }

    if mouse.just_released(MouseButton::Left) || mouse.just_released(MouseButton::Right) {
        editor.pointer_up();
    }
}

/// Mouse wheel resizes the brush
pub fn handle_editor_wheel(mut wheel: MessageReader<MouseWheel>, mut state: ResMut<EditorResource>) {
    let blocked = state.editor.save_notice().is_some();
    for event in wheel.read() {
        if blocked {
            continue;
        }
        // Bevy reports scrolling up as positive
        state.editor.wheel(-event.y);
    }
}

fn next_facing(facing: Facing) -> Facing {
    let index = Facing::ALL.iter().position(|f| *f == facing).unwrap_or(0);
    Facing::ALL[(index + 1) % Facing::ALL.len()]
}

/// Tool, palette, layer and archetype hotkeys
pub fn handle_editor_keys(keyboard: Res<ButtonInput<KeyCode>>, mut state: ResMut<EditorResource>) {
    let state = &mut *state;
    let editor = &mut state.editor;
    let control = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    // A failed save blocks editing until dismissed or retried
    if editor.save_notice().is_some() {
        if keyboard.just_pressed(KeyCode::Enter) {
            editor.dismiss_save_notice();
        } else if control && keyboard.just_pressed(KeyCode::KeyS) {
            editor.save(&state.store);
        }
        return;
    }

    let tool_keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
    for (key, tool) in tool_keys.into_iter().zip(Tool::ALL) {
        if keyboard.just_pressed(key) {
            editor.set_tool(tool);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyG) {
        editor.show_grid = !editor.show_grid;
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        editor.show_overlays = !editor.show_overlays;
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        let layers = editor.level().layers.len().max(1);
        editor.set_active_layer((editor.active_layer() + 1) % layers);
    }

    let tile_count = TILEMAP_COLS * TILEMAP_ROWS;
    if keyboard.just_pressed(KeyCode::BracketRight) {
        editor.select_tile(editor.selected_tile() % tile_count + 1);
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        let previous = if editor.selected_tile() <= 1 {
            tile_count
        } else {
            editor.selected_tile() - 1
        };
        editor.select_tile(previous);
    }

    if editor.tool() == Tool::Entities {
        let configs = editor.level().entity_configs().len().max(1);
        let slot = &mut state.entity_slot;
        if keyboard.just_pressed(KeyCode::KeyC) {
            slot.config = (slot.config + 1) % configs;
            slot.slot = 0;
        }
        if keyboard.just_pressed(KeyCode::KeyF) {
            slot.facing = next_facing(slot.facing);
        }
        if keyboard.just_pressed(KeyCode::ArrowRight) {
            slot.slot += 1;
        }
        if keyboard.just_pressed(KeyCode::ArrowLeft) {
            slot.slot = slot.slot.saturating_sub(1);
        }
        if keyboard.just_pressed(KeyCode::Enter) {
            editor.set_entity_tile(slot.config, slot.facing, slot.slot);
        }
    }

    if control && keyboard.just_pressed(KeyCode::KeyS) && !editor.save(&state.store) {
        warn!("Save to {} failed", state.store.path().display());
    }
}
