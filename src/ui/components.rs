//! UI components and resources linking Bevy to the headless state

use bevy::prelude::*;

use crate::editor::Editor;
use crate::persistence::FileLevelStore;
use crate::simulation::{Facing, SimWorld};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

/// Viewer toggles
#[derive(Resource, Default)]
pub struct ViewSettings {
    pub show_debug: bool,
    pub paused: bool,
}

/// Archetype slot the entities tool writes into
#[derive(Debug, Clone, Copy)]
pub struct EntitySlot {
    pub config: usize,
    pub facing: Facing,
    pub slot: usize,
}

impl Default for EntitySlot {
    fn default() -> Self {
        Self {
            config: 0,
            facing: Facing::Right,
            slot: 0,
        }
    }
}

/// Resource wrapper for the editor and where it saves to
#[derive(Resource)]
pub struct EditorResource {
    pub editor: Editor,
    pub store: FileLevelStore,
    pub entity_slot: EntitySlot,
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for the status text in the corner
#[derive(Component)]
pub struct HudText;
