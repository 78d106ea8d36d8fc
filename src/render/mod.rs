//! Rendering contract
//!
//! Frames are described as calls on a [`Surface`]: sprite blits out of the
//! tile atlas plus a handful of flat shapes for agents and overlays. Any 2D
//! backend that can do those satisfies the contract. This module builds the
//! simulation and editor frames; backends live in submodules and in the
//! optional Bevy front end.

pub mod ascii;
mod atlas;
pub mod raster;

pub use atlas::SpriteAtlas;

use crate::editor::{brush_origin, Editor, Tool};
use crate::simulation::{Direction, Facing, LevelData, Position, SimEntity, SimWorld};

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Colour with straight alpha in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
}

pub const SIM_BACKGROUND: Rgba = Rgba::opaque(0x18, 0x18, 0x1b);
pub const EDITOR_BACKGROUND: Rgba = Rgba::opaque(0x11, 0x11, 0x11);
pub const GRID_LINE: Rgba = Rgba::opaque(0x22, 0x22, 0x22);
pub const DEBUG_DRIVABLE: Rgba = Rgba::new(0, 255, 100, 0.15);
pub const DEBUG_WALKABLE: Rgba = Rgba::new(0, 100, 255, 0.15);
pub const OVERLAY_WALKABLE: Rgba = Rgba::new(0, 100, 255, 0.4);
pub const OVERLAY_ARROW: Rgba = Rgba::new(255, 255, 255, 0.8);

/// Overlay tint for a drivable direction code in the editor
pub fn direction_tint(direction: Direction) -> Rgba {
    match direction {
        Direction::Up => Rgba::new(0, 255, 100, 0.4),
        Direction::Right => Rgba::new(255, 165, 0, 0.4),
        Direction::Down => Rgba::new(0, 100, 255, 0.4),
        Direction::Left => Rgba::new(255, 0, 100, 0.4),
    }
}

/// A 2D drawing target
pub trait Surface {
    fn clear(&mut self, color: Rgba);

    /// Copy `source` from the atlas, scaled into `dest`
    fn draw_sprite(&mut self, source: Rect, dest: Rect);

    fn fill_rect(&mut self, dest: Rect, color: Rgba);

    fn stroke_rect(&mut self, dest: Rect, color: Rgba, line_width: f32);

    fn fill_circle(&mut self, center: Position, radius: f32, color: Rgba);

    fn fill_triangle(&mut self, points: [Position; 3], color: Rgba);

    fn line(&mut self, from: Position, to: Position, color: Rgba, line_width: f32);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Sprite { source: Rect, dest: Rect },
    FillRect { dest: Rect, color: Rgba },
    StrokeRect { dest: Rect, color: Rgba, line_width: f32 },
    Circle { center: Position, radius: f32, color: Rgba },
    Triangle { points: [Position; 3], color: Rgba },
    Line { from: Position, to: Position, color: Rgba, line_width: f32 },
}

/// Surface that records calls instead of drawing them
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> impl Iterator<Item = (&Rect, &Rect)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { source, dest } => Some((source, dest)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, source: Rect, dest: Rect) {
        self.commands.push(DrawCommand::Sprite { source, dest });
    }

    fn fill_rect(&mut self, dest: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { dest, color });
    }

    fn stroke_rect(&mut self, dest: Rect, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            dest,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Position, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_triangle(&mut self, points: [Position; 3], color: Rgba) {
        self.commands.push(DrawCommand::Triangle { points, color });
    }

    fn line(&mut self, from: Position, to: Position, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }
}

fn cell_rect(level: &LevelData, index: usize, tile_px: f32) -> Rect {
    let (x, y) = level.cell(index);
    Rect::new(x as f32 * tile_px, y as f32 * tile_px, tile_px, tile_px)
}

fn draw_layer(surface: &mut dyn Surface, level: &LevelData, layer: usize, atlas: &SpriteAtlas, tile_px: f32) {
    let Some(layer) = level.layers.get(layer) else {
        return;
    };
    for (index, tile_id) in layer.data.iter().enumerate() {
        if let Some(source) = atlas.source_rect(*tile_id) {
            surface.draw_sprite(source, cell_rect(level, index, tile_px));
        }
    }
}

/// Archetype sprite sequence a car shows for its heading
pub fn car_facing(car: &SimEntity) -> (Facing, bool) {
    let vertical = car.heading.dy.abs() > car.heading.dx.abs();
    let facing = if vertical {
        if car.heading.dy > 0 {
            Facing::Down
        } else {
            Facing::Up
        }
    } else if car.heading.dx < 0 {
        Facing::Left
    } else {
        Facing::Right
    };
    (facing, vertical)
}

/// Draw a car's multi-tile sprite train centred on its position
fn draw_car(surface: &mut dyn Surface, car: &SimEntity, level: &LevelData, atlas: &SpriteAtlas, tile_px: f32) {
    let Some(archetype) = car.archetype.and_then(|i| level.entity_configs().get(i)) else {
        return;
    };
    let (facing, vertical) = car_facing(car);
    let tiles = archetype.tiles(facing);
    if tiles.iter().all(|tile| *tile == 0) {
        return;
    }

    let length = tiles.len() as f32 * tile_px;
    let (start_x, start_y) = if vertical {
        (car.position.x - tile_px / 2.0, car.position.y - length / 2.0)
    } else {
        (car.position.x - length / 2.0, car.position.y - tile_px / 2.0)
    };

    for (slot, tile_id) in tiles.iter().enumerate() {
        let Some(source) = atlas.source_rect(*tile_id) else {
            continue;
        };
        let along = slot as f32 * tile_px;
        let dest = if vertical {
            Rect::new(start_x, start_y + along, tile_px, tile_px)
        } else {
            Rect::new(start_x + along, start_y, tile_px, tile_px)
        };
        surface.draw_sprite(source, dest);
    }
}

fn draw_pedestrian(surface: &mut dyn Surface, pedestrian: &SimEntity, radius: f32) {
    let [r, g, b] = pedestrian.color.to_rgb();
    surface.fill_circle(pedestrian.position, radius, Rgba::WHITE);
    surface.fill_circle(pedestrian.position, radius * 0.6, Rgba::opaque(r, g, b));
}

/// Draw one simulation frame.
///
/// Stacking order: ground layer, cars, pedestrians, remaining layers, then
/// the optional debug overlay of both masks.
pub fn draw_simulation(surface: &mut dyn Surface, world: &SimWorld, atlas: &SpriteAtlas, show_debug: bool) {
    let level = world.level.as_ref();
    let tile_px = world.tile_px();

    surface.clear(SIM_BACKGROUND);
    draw_layer(surface, level, 0, atlas, tile_px);

    for car in &world.cars {
        draw_car(surface, car, level, atlas, tile_px);
    }
    let radius = world.config.scale as f32;
    for pedestrian in &world.pedestrians {
        draw_pedestrian(surface, pedestrian, radius);
    }

    for layer in 1..level.layers.len() {
        draw_layer(surface, level, layer, atlas, tile_px);
    }

    if show_debug {
        for (index, _) in level.drivable.iter().enumerate().filter(|(_, code)| **code > 0) {
            surface.fill_rect(cell_rect(level, index, tile_px), DEBUG_DRIVABLE);
        }
        for (index, _) in level.walkable.iter().enumerate().filter(|(_, flag)| **flag > 0) {
            surface.fill_rect(cell_rect(level, index, tile_px), DEBUG_WALKABLE);
        }
    }
}

fn draw_arrow(surface: &mut dyn Surface, center: Position, direction: Direction) {
    const SIZE: f32 = 4.0;
    let (cx, cy) = (center.x, center.y);
    let p = Position::new;
    let points = match direction {
        Direction::Up => [p(cx, cy - SIZE), p(cx - SIZE, cy + SIZE), p(cx + SIZE, cy + SIZE)],
        Direction::Right => [p(cx + SIZE, cy), p(cx - SIZE, cy - SIZE), p(cx - SIZE, cy + SIZE)],
        Direction::Down => [p(cx, cy + SIZE), p(cx - SIZE, cy - SIZE), p(cx + SIZE, cy - SIZE)],
        Direction::Left => [p(cx - SIZE, cy), p(cx + SIZE, cy - SIZE), p(cx + SIZE, cy + SIZE)],
    };
    surface.fill_triangle(points, OVERLAY_ARROW);
}

/// Draw the editor canvas for the editor's current view
pub fn draw_editor(surface: &mut dyn Surface, editor: &Editor, atlas: &SpriteAtlas, tile_px: f32) {
    let level = editor.level();
    let (width_px, height_px) = (level.width as f32 * tile_px, level.height as f32 * tile_px);

    surface.clear(EDITOR_BACKGROUND);

    if editor.show_grid {
        for x in 0..=level.width {
            let px = x as f32 * tile_px;
            surface.line(Position::new(px, 0.0), Position::new(px, height_px), GRID_LINE, 1.0);
        }
        for y in 0..=level.height {
            let py = y as f32 * tile_px;
            surface.line(Position::new(0.0, py), Position::new(width_px, py), GRID_LINE, 1.0);
        }
    }

    for layer in 0..level.layers.len() {
        draw_layer(surface, level, layer, atlas, tile_px);
    }

    if editor.show_overlays {
        match editor.tool() {
            Tool::Drivable => {
                for (index, code) in level.drivable.iter().enumerate() {
                    let Some(direction) = Direction::from_code(*code) else {
                        continue;
                    };
                    let rect = cell_rect(level, index, tile_px);
                    surface.fill_rect(rect, direction_tint(direction));
                    let center = Position::new(rect.x + tile_px / 2.0, rect.y + tile_px / 2.0);
                    draw_arrow(surface, center, direction);
                }
            }
            Tool::Walkable => {
                for (index, _) in level.walkable.iter().enumerate().filter(|(_, flag)| **flag > 0) {
                    let rect = cell_rect(level, index, tile_px);
                    surface.fill_rect(
                        Rect::new(rect.x + 2.0, rect.y + 2.0, tile_px - 4.0, tile_px - 4.0),
                        OVERLAY_WALKABLE,
                    );
                }
            }
            Tool::Paint | Tool::Entities => {}
        }
    }

    if let Some((hx, hy)) = editor.hover() {
        let (ox, oy) = brush_origin(hx, hy, editor.brush_size());
        let size = editor.brush_size() as f32 * tile_px;
        let cursor = Rect::new(ox as f32 * tile_px, oy as f32 * tile_px, size, size);
        surface.stroke_rect(cursor, Rgba::WHITE, 2.0);
        surface.stroke_rect(
            Rect::new(cursor.x - 1.0, cursor.y - 1.0, size + 2.0, size + 2.0),
            Rgba::new(0, 0, 0, 0.5),
            1.0,
        );
    }
}
