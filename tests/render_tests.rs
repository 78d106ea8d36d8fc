//! Frames produced for the drawing surface

use std::sync::Arc;

use city_sim::editor::{Editor, PointerButton, Tool};
use city_sim::render::{
    car_facing, direction_tint, draw_editor, draw_simulation, DrawCommand, DrawList, Rect, Rgba, SpriteAtlas,
    DEBUG_DRIVABLE, DEBUG_WALKABLE,
};
use city_sim::simulation::{Direction, Facing, Heading, LevelData, SimConfig, SimWorld};

const TILE: f32 = 24.0;

fn sprite_dests(list: &DrawList) -> Vec<Rect> {
    list.sprites().map(|(_, dest)| *dest).collect()
}

fn world_on(level: LevelData) -> SimWorld {
    SimWorld::empty_with_seed(Arc::new(level), SimConfig::default(), 0)
}

#[test]
fn test_layers_draw_in_order_and_skip_empty_tiles() {
    let mut level = LevelData::blank(2, 1, 8, &["Ground", "Objects"]);
    level.layers[0].data = Arc::new(vec![1, 2]);
    level.layers[1].data = Arc::new(vec![0, 30]);
    let world = world_on(level);

    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);

    assert!(matches!(list.commands[0], DrawCommand::Clear(_)));
    let sprites: Vec<(Rect, Rect)> = list.sprites().map(|(s, d)| (*s, *d)).collect();
    assert_eq!(
        sprites,
        vec![
            (Rect::new(0.0, 0.0, 8.0, 8.0), Rect::new(0.0, 0.0, TILE, TILE)),
            (Rect::new(8.0, 0.0, 8.0, 8.0), Rect::new(TILE, 0.0, TILE, TILE)),
            (Rect::new(40.0, 8.0, 8.0, 8.0), Rect::new(TILE, 0.0, TILE, TILE)),
        ]
    );
}

#[test]
fn test_car_sprite_train_follows_heading() {
    let mut level = LevelData::blank(6, 6, 8, &["Ground"]).with_default_entity_configs();
    if let Some(configs) = level.entity_configs.as_mut() {
        configs[0].right = vec![10, 11];
        configs[0].down = vec![12, 0];
    }
    let mut world = world_on(level);
    world.add_car(2, 2, 1.0, Some(0));
    let centre = world.cars[0].position;

    // No heading yet: faces right, laid out horizontally around the centre
    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);
    assert_eq!(
        sprite_dests(&list),
        vec![
            Rect::new(centre.x - TILE, centre.y - TILE / 2.0, TILE, TILE),
            Rect::new(centre.x, centre.y - TILE / 2.0, TILE, TILE),
        ]
    );

    // Heading down: vertical train, empty slots skipped
    world.cars[0].heading = Heading::from(Direction::Down);
    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);
    assert_eq!(
        sprite_dests(&list),
        vec![Rect::new(centre.x - TILE / 2.0, centre.y - TILE, TILE, TILE)]
    );
}

#[test]
fn test_cars_without_sprites_are_not_drawn() {
    let level = LevelData::blank(3, 3, 8, &["Ground"]).with_default_entity_configs();
    let mut world = world_on(level);
    world.add_car(1, 1, 1.0, Some(1));
    world.add_car(0, 0, 1.0, None);

    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);
    assert_eq!(list.sprites().count(), 0);
}

#[test]
fn test_car_facing_uses_dominant_axis() {
    let level = LevelData::blank(3, 3, 8, &[]);
    let mut world = world_on(level);
    world.add_car(1, 1, 1.0, None);
    let car = &mut world.cars[0];

    for (heading, expected) in [
        (Heading::new(1, 0), (Facing::Right, false)),
        (Heading::new(-1, 0), (Facing::Left, false)),
        (Heading::new(0, -1), (Facing::Up, true)),
        (Heading::new(0, 1), (Facing::Down, true)),
        (Heading::ZERO, (Facing::Right, false)),
    ] {
        car.heading = heading;
        assert_eq!(car_facing(car), expected);
    }
}

#[test]
fn test_pedestrians_are_two_dots() {
    let mut level = LevelData::blank(3, 3, 8, &[]);
    level.walkable = Arc::new(vec![1; 9]);
    let mut world = world_on(level);
    world.add_pedestrian(1, 1, 0.3);

    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);
    let circles: Vec<(f32, Rgba)> = list
        .commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Circle { radius, color, .. } => Some((*radius, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(circles.len(), 2);
    assert_eq!(circles[0], (3.0, Rgba::WHITE));
    assert!((circles[1].0 - 1.8).abs() < 1e-5);
}

#[test]
fn test_debug_overlay_tints_both_masks() {
    let mut level = LevelData::blank(2, 2, 8, &[]);
    level.drivable = Arc::new(vec![2, 0, 0, 0]);
    level.walkable = Arc::new(vec![0, 1, 1, 0]);
    let world = world_on(level);

    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), true);
    let fills: Vec<(Rect, Rgba)> = list
        .commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillRect { dest, color } => Some((*dest, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(
        fills,
        vec![
            (Rect::new(0.0, 0.0, TILE, TILE), DEBUG_DRIVABLE),
            (Rect::new(TILE, 0.0, TILE, TILE), DEBUG_WALKABLE),
            (Rect::new(0.0, TILE, TILE, TILE), DEBUG_WALKABLE),
        ]
    );

    let mut list = DrawList::new();
    draw_simulation(&mut list, &world, &SpriteAtlas::default(), false);
    assert!(!list.commands.iter().any(|c| matches!(c, DrawCommand::FillRect { .. })));
}

#[test]
fn test_editor_frame_shows_grid_overlay_and_cursor() {
    let mut editor = Editor::new(Some(LevelData::blank(3, 2, 8, &["Ground"])));
    editor.set_tool(Tool::Drivable);
    editor.set_brush_size(3);
    editor.pointer_down((1, 1), PointerButton::Primary);
    editor.pointer_up();

    let mut list = DrawList::new();
    draw_editor(&mut list, &editor, &SpriteAtlas::default(), TILE);

    let lines = list.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
    assert_eq!(lines, 4 + 3);

    // Brush covered all six cells with the default Up code
    let tints = list
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == direction_tint(Direction::Up)))
        .count();
    assert_eq!(tints, 6);
    let arrows = list.commands.iter().filter(|c| matches!(c, DrawCommand::Triangle { .. })).count();
    assert_eq!(arrows, 6);

    let cursor = list.commands.iter().find_map(|c| match c {
        DrawCommand::StrokeRect { dest, line_width, .. } if *line_width == 2.0 => Some(*dest),
        _ => None,
    });
    assert_eq!(cursor, Some(Rect::new(0.0, 0.0, 3.0 * TILE, 3.0 * TILE)));
}

#[test]
fn test_editor_overlays_can_be_hidden() {
    let mut editor = Editor::new(Some(LevelData::blank(2, 2, 8, &["Ground"])));
    editor.set_tool(Tool::Walkable);
    editor.pointer_down((0, 0), PointerButton::Primary);
    editor.pointer_leave();
    editor.show_grid = false;

    let mut list = DrawList::new();
    draw_editor(&mut list, &editor, &SpriteAtlas::default(), TILE);
    let insets: Vec<Rect> = list
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillRect { dest, .. } => Some(*dest),
            _ => None,
        })
        .collect();
    assert_eq!(insets, vec![Rect::new(2.0, 2.0, TILE - 4.0, TILE - 4.0)]);
    assert!(!list.commands.iter().any(|c| matches!(c, DrawCommand::Line { .. })));

    editor.show_overlays = false;
    let mut list = DrawList::new();
    draw_editor(&mut list, &editor, &SpriteAtlas::default(), TILE);
    assert_eq!(list.commands.len(), 1);
}
