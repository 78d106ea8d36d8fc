//! Editor window systems

use bevy::prelude::*;

use super::canvas::Canvas;
use super::components::{EditorResource, HudText};
use crate::render;
use crate::simulation::SimConfig;

pub fn setup_editor(mut commands: Commands, mut images: ResMut<Assets<Image>>, state: Res<EditorResource>) {
    let level = state.editor.level();
    let tile_px = SimConfig::default().tile_px(level.tile_size);
    let canvas = Canvas::spawn(&mut commands, &mut images, (level.width, level.height), tile_px);
    commands.insert_resource(canvas);
    super::spawn_hud(&mut commands);
}

pub fn draw_editor(state: Res<EditorResource>, canvas: Option<ResMut<Canvas>>, mut images: ResMut<Assets<Image>>) {
    let Some(mut canvas) = canvas else {
        return;
    };
    let canvas = &mut *canvas;
    let tile_px = canvas.tile_px;
    render::draw_editor(&mut canvas.surface, &state.editor, &canvas.atlas, tile_px);
    canvas.upload(&mut images);
}

pub fn update_editor_hud(state: Res<EditorResource>, mut hud: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = hud.single_mut() else {
        return;
    };
    let editor = &state.editor;
    let level = editor.level();
    let layer = level
        .layers
        .get(editor.active_layer())
        .map(|layer| layer.name.as_str())
        .unwrap_or("-");
    let slot = state.entity_slot;

    let notice = editor
        .save_notice()
        .map(|notice| format!("{}  [Enter] dismiss  [Ctrl+S] retry\n", notice))
        .unwrap_or_default();

    **text = format!(
        "{}Tool: {} [1-4]  Layer: {} [Tab]  Tile: {} [ / ]  Brush: {} [wheel]\n\
         Direction: {:?}  Archetype #{} {} slot {} [C/F/arrows, Enter]\n\
         {}[Ctrl+S] save  [G] grid  [O] overlays  [Esc] quit",
        notice,
        editor.tool().name(),
        layer,
        editor.selected_tile(),
        editor.brush_size(),
        editor.last_direction(),
        slot.config,
        slot.facing.name(),
        slot.slot,
        if editor.has_unsaved_changes() { "* unsaved  " } else { "" },
    );
}
