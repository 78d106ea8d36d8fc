//! Bevy texture fed from the software renderer
//!
//! Frames are drawn by the headless renderer into an [`ImageSurface`] and
//! the pixels are copied into a single sprite texture every frame. The
//! canvas is centred on the world origin, so canvas pixel `(0, 0)` is the
//! top-left corner of the sprite.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use log::{info, warn};
use std::path::Path;

use super::components::MainCamera;
use crate::render::raster::ImageSurface;
use crate::render::SpriteAtlas;
use crate::simulation::Position;

/// Sprite sheet looked up next to the level file
pub const ATLAS_PATH: &str = "assets/city/tilemap.png";

#[derive(Resource)]
pub struct Canvas {
    pub surface: ImageSurface,
    pub atlas: SpriteAtlas,
    pub tile_px: f32,
    pub width: u32,
    pub height: u32,
    handle: Handle<Image>,
}

impl Canvas {
    /// Allocate the texture and spawn the sprite and camera showing it
    pub fn spawn(commands: &mut Commands, images: &mut Assets<Image>, grid: (usize, usize), tile_px: f32) -> Self {
        let width = (grid.0 as f32 * tile_px) as u32;
        let height = (grid.1 as f32 * tile_px) as u32;

        let mut surface = ImageSurface::new(width, height);
        let atlas_path = Path::new(ATLAS_PATH);
        if atlas_path.is_file() {
            match surface.load_atlas(atlas_path) {
                Ok(()) => info!("Loaded sprite sheet from {}", ATLAS_PATH),
                Err(err) => warn!("{:#}", err),
            }
        } else {
            warn!("No sprite sheet at {}, drawing placeholder tiles", ATLAS_PATH);
        }

        let image = Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            surface.image().as_raw().clone(),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );
        let handle = images.add(image);

        commands.spawn((MainCamera, Camera2d));
        commands.spawn((Sprite::from_image(handle.clone()), Transform::default()));

        Self {
            surface,
            atlas: SpriteAtlas::default(),
            tile_px,
            width,
            height,
            handle,
        }
    }

    /// Copy the surface pixels into the texture
    pub fn upload(&self, images: &mut Assets<Image>) {
        if let Some(image) = images.get_mut(&self.handle) {
            image.data = Some(self.surface.image().as_raw().clone());
        }
    }

    /// Grid cell under the cursor, which may lie off the grid
    pub fn cursor_cell(&self, window: &Window, camera: &Camera, transform: &GlobalTransform) -> Option<(i32, i32)> {
        let cursor = window.cursor_position()?;
        let world = camera.viewport_to_world_2d(transform, cursor).ok()?;
        let canvas = Position::new(
            world.x + self.width as f32 / 2.0,
            self.height as f32 / 2.0 - world.y,
        );
        Some(canvas.cell(self.tile_px))
    }
}
