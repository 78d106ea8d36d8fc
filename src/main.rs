use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use city_sim::editor::{Editor, PointerButton, Tool, MAX_BRUSH_SIZE};
use city_sim::persistence::{FileLevelStore, LevelStore, DEFAULT_LEVEL_PATH};
use city_sim::render::{self, ascii, raster::ImageSurface, SpriteAtlas};
use city_sim::simulation::{LevelData, SimConfig, SimWorld, DEFAULT_LEVEL_HEIGHT, DEFAULT_LEVEL_WIDTH, TILE_SIZE};

#[derive(Parser)]
#[command(name = "city_sim")]
#[command(about = "Grid city simulation and level editor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation headless and report what happened
    Simulate {
        /// Level file to run; ignored with --demo
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        level: PathBuf,

        /// Use the built-in sample city instead of a level file
        #[arg(long)]
        demo: bool,

        /// Number of simulation ticks (animation frames) to run
        #[arg(long, default_value = "600")]
        ticks: u64,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Car placement attempts
        #[arg(long)]
        cars: Option<usize>,

        /// Number of pedestrians
        #[arg(long)]
        pedestrians: Option<usize>,

        /// Print the ASCII map every N ticks (0 = only at the start and end)
        #[arg(long, default_value = "0")]
        map_every: u64,

        /// Write the final frame as a PNG
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Sprite sheet used for the snapshot
        #[arg(long)]
        atlas: Option<PathBuf>,

        /// Tint drivable and walkable cells in the snapshot
        #[arg(long)]
        debug_overlay: bool,
    },

    /// Write a new level file
    New {
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        out: PathBuf,

        #[arg(long, default_value_t = DEFAULT_LEVEL_WIDTH)]
        width: usize,

        #[arg(long, default_value_t = DEFAULT_LEVEL_HEIGHT)]
        height: usize,

        /// Write the built-in sample city instead of a blank level
        #[arg(long)]
        demo: bool,
    },

    /// Validate a level file and print what it contains
    Inspect {
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        level: PathBuf,
    },

    /// Apply one brush stroke to a level file and save it
    Paint {
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        level: PathBuf,

        #[arg(long, value_enum, default_value = "paint")]
        tool: ToolArg,

        /// Tile id for the paint tool
        #[arg(long, default_value = "1")]
        tile: u32,

        /// Layer index for the paint tool
        #[arg(long, default_value = "0")]
        layer: usize,

        #[arg(long, default_value = "1")]
        brush: usize,

        /// Erase instead of paint
        #[arg(long)]
        erase: bool,

        /// Stroke path as grid cells `x,y`; the first is the press point
        #[arg(long = "at", value_parser = parse_cell, required = true, num_args = 1..)]
        points: Vec<(i32, i32)>,
    },

    /// Watch the simulation in a window
    #[cfg(feature = "ui")]
    View {
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        level: PathBuf,

        #[arg(long)]
        demo: bool,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Open the level editor in a window
    #[cfg(feature = "ui")]
    Edit {
        #[arg(long, default_value = DEFAULT_LEVEL_PATH)]
        level: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ToolArg {
    Paint,
    Drivable,
    Walkable,
}

impl From<ToolArg> for Tool {
    fn from(tool: ToolArg) -> Self {
        match tool {
            ToolArg::Paint => Tool::Paint,
            ToolArg::Drivable => Tool::Drivable,
            ToolArg::Walkable => Tool::Walkable,
        }
    }
}

fn parse_cell(value: &str) -> Result<(i32, i32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", value, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", value, e))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The Bevy front end installs its own log subscriber
    #[cfg(feature = "ui")]
    let windowed = matches!(cli.command, Command::View { .. } | Command::Edit { .. });
    #[cfg(not(feature = "ui"))]
    let windowed = false;
    if !windowed {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,city_sim=info")).init();
    }

    match cli.command {
        Command::Simulate {
            level,
            demo,
            ticks,
            seed,
            cars,
            pedestrians,
            map_every,
            snapshot,
            atlas,
            debug_overlay,
        } => {
            let level = load_sim_level(&level, demo)?;
            let mut config = SimConfig::default();
            if let Some(cars) = cars {
                config.car_spawn_attempts = cars;
            }
            if let Some(pedestrians) = pedestrians {
                config.pedestrian_count = pedestrians;
            }
            let world = run_headless(level, config, seed, ticks, map_every)?;
            if let Some(path) = snapshot {
                write_snapshot(&world, &path, atlas.as_deref(), debug_overlay)?;
            }
        }
        Command::New {
            out,
            width,
            height,
            demo,
        } => {
            let level = if demo {
                LevelData::demo_city()
            } else {
                if width == 0 || height == 0 {
                    bail!("Level dimensions must be non-zero");
                }
                LevelData::blank(width, height, TILE_SIZE, &["Ground", "Objects"]).with_default_entity_configs()
            };
            if !FileLevelStore::new(&out).save(&level) {
                bail!("Could not write {}", out.display());
            }
            println!("Wrote {}x{} level to {}", level.width, level.height, out.display());
        }
        Command::Inspect { level } => {
            let level = FileLevelStore::new(&level).load()?;
            print_level(&level);
        }
        Command::Paint {
            level,
            tool,
            tile,
            layer,
            brush,
            erase,
            points,
        } => paint(&level, tool.into(), tile, layer, brush, erase, &points)?,
        #[cfg(feature = "ui")]
        Command::View { level, demo, seed } => {
            let level = load_sim_level(&level, demo)?;
            city_sim::ui::run_viewer(level, seed);
        }
        #[cfg(feature = "ui")]
        Command::Edit { level } => {
            let store = FileLevelStore::new(level);
            city_sim::ui::run_editor(store)?;
        }
    }

    Ok(())
}

fn load_sim_level(path: &Path, demo: bool) -> Result<Arc<LevelData>> {
    if demo {
        info!("Using the built-in sample city");
        return Ok(Arc::new(LevelData::demo_city()));
    }
    let level = FileLevelStore::new(path)
        .load()
        .context("No level to simulate (pass --demo to use the sample city)")?;
    Ok(Arc::new(level))
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(
    level: Arc<LevelData>,
    config: SimConfig,
    seed: Option<u64>,
    ticks: u64,
    map_every: u64,
) -> Result<SimWorld> {
    println!("Running city simulation in headless mode...");
    println!("Ticks: {}, Seed: {:?}", ticks, seed);
    println!();

    let mut world = match seed {
        Some(seed) => SimWorld::new_with_seed(level, config, seed),
        None => SimWorld::new(level, config),
    };
    if world.cars.is_empty() && world.pedestrians.is_empty() {
        warn!("Level has no drivable or walkable cells; nothing will move");
    }

    println!("Initial state:");
    world.print_summary();
    ascii::draw_map(&world);

    for tick in 1..=ticks {
        world.tick();
        if map_every > 0 && tick % map_every == 0 && tick < ticks {
            println!("--- After tick {} ---", tick);
            world.print_summary();
            ascii::draw_map(&world);
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    ascii::draw_map(&world);

    let stats = &world.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", stats.ticks);
    info!("Cars: {}", stats.cars);
    info!("Pedestrians: {}", stats.pedestrians);
    info!("Cars blocked on last tick: {}", stats.blocked_last_tick);
    info!("Entities stalled on last tick: {}", stats.stalled_last_tick);
    info!("Routing decisions: {}", stats.decisions);

    Ok(world)
}

fn write_snapshot(world: &SimWorld, path: &Path, atlas_path: Option<&Path>, debug_overlay: bool) -> Result<()> {
    let tile_px = world.tile_px();
    let width = (world.level.width as f32 * tile_px) as u32;
    let height = (world.level.height as f32 * tile_px) as u32;

    let mut surface = ImageSurface::new(width, height);
    if let Some(atlas_path) = atlas_path {
        surface.load_atlas(atlas_path)?;
    }
    render::draw_simulation(&mut surface, world, &SpriteAtlas::default(), debug_overlay);
    surface.save_png(path)?;
    info!("Wrote {}x{} snapshot to {}", width, height, path.display());
    Ok(())
}

fn print_level(level: &LevelData) {
    println!("=== Level ===");
    println!("Size: {}x{} tiles, tile size {}px", level.width, level.height, level.tile_size);
    for (index, layer) in level.layers.iter().enumerate() {
        let painted = layer.data.iter().filter(|tile| **tile != 0).count();
        println!("  Layer {} '{}': {} painted cells", index, layer.name, painted);
    }
    let drivable = level.drivable.iter().filter(|code| **code > 0).count();
    let walkable = level.walkable.iter().filter(|flag| **flag > 0).count();
    println!("Drivable cells: {}", drivable);
    println!("Walkable cells: {}", walkable);
    println!("Archetypes:");
    for archetype in level.entity_configs() {
        println!(
            "  #{} {:?}: {} slots right, {} left, {} up, {} down",
            archetype.id,
            archetype.kind,
            archetype.right.len(),
            archetype.left.len(),
            archetype.up.len(),
            archetype.down.len()
        );
    }
}

fn paint(
    path: &Path,
    tool: Tool,
    tile: u32,
    layer: usize,
    brush: usize,
    erase: bool,
    points: &[(i32, i32)],
) -> Result<()> {
    let store = FileLevelStore::new(path);
    let level = store.load_for_editing()?;

    let mut editor = Editor::new(level);
    editor.set_tool(tool);
    editor.select_tile(tile);
    if brush > MAX_BRUSH_SIZE {
        warn!("Brush size {} clamped to {}", brush, MAX_BRUSH_SIZE);
    }
    editor.set_brush_size(brush);
    if !editor.set_active_layer(layer) {
        bail!("Level has no layer {}", layer);
    }

    let button = if erase {
        PointerButton::Secondary
    } else {
        PointerButton::Primary
    };
    let Some((first, rest)) = points.split_first() else {
        bail!("No stroke points given");
    };
    editor.pointer_down(*first, button);
    for point in rest {
        editor.pointer_move(*point);
    }
    editor.pointer_up();

    if !editor.has_unsaved_changes() {
        println!("Stroke changed nothing; {} left untouched", path.display());
        return Ok(());
    }
    if !editor.save(&store) {
        bail!("Could not save {}", path.display());
    }
    println!("Saved stroke to {}", path.display());
    Ok(())
}
