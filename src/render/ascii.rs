//! Text rendering of a running simulation for the console

use crate::simulation::{Direction, SimWorld};

/// Legend printed under every map
pub const LEGEND: &str = "Legend: ^>v<=Drivable (direction), .=Walkable, C=Car, p=Pedestrian";

/// Character grid of the level masks with entities on top
pub fn map_grid(world: &SimWorld) -> Vec<Vec<char>> {
    let level = world.level.as_ref();
    let mut grid = vec![vec![' '; level.width]; level.height];

    for (index, (code, walkable)) in level.drivable.iter().zip(level.walkable.iter()).enumerate() {
        let (x, y) = level.cell(index);
        grid[y][x] = match Direction::from_code(*code) {
            Some(Direction::Up) => '^',
            Some(Direction::Right) => '>',
            Some(Direction::Down) => 'v',
            Some(Direction::Left) => '<',
            None if *walkable > 0 => '.',
            None => ' ',
        };
    }

    let tile_px = world.tile_px();
    let mut plot = |gx: i32, gy: i32, symbol: char| {
        if let Some(index) = level.index(gx, gy) {
            let (x, y) = level.cell(index);
            // Cars win over pedestrians sharing a cell
            if grid[y][x] != 'C' {
                grid[y][x] = symbol;
            }
        }
    };

    for pedestrian in &world.pedestrians {
        let (gx, gy) = pedestrian.position.cell(tile_px);
        plot(gx, gy, 'p');
    }
    for car in &world.cars {
        let (gx, gy) = car.position.cell(tile_px);
        plot(gx, gy, 'C');
    }

    grid
}

/// The map as printable text, one row per line
pub fn render_map(world: &SimWorld) -> String {
    let mut out = String::new();
    for row in map_grid(world) {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Print the map with a header and legend
pub fn draw_map(world: &SimWorld) {
    println!("\n=== City Map (tick {}) ===", world.stats.ticks);
    println!("{}", LEGEND);
    println!();
    print!("{}", render_map(world));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{LevelData, SimConfig};
    use std::sync::Arc;

    #[test]
    fn masks_and_entities_are_drawn() {
        let mut level = LevelData::blank(3, 2, 8, &["Ground"]);
        level.drivable = Arc::new(vec![2, 2, 3, 0, 0, 0]);
        level.walkable = Arc::new(vec![0, 0, 0, 1, 1, 0]);
        let mut world = SimWorld::empty_with_seed(Arc::new(level), SimConfig::default(), 1);
        world.add_car(0, 0, 1.0, None);
        world.add_pedestrian(1, 1, 0.3);

        assert_eq!(render_map(&world), "C>v\n.p\n");
    }
}
