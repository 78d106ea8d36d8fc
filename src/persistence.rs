//! Loading and saving level JSON
//!
//! Saves overwrite the destination wholesale with pretty-printed JSON. There
//! is no merging or versioning; the last write wins.

use anyhow::{Context, Result};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::simulation::LevelData;

/// Default location of the level document, relative to the working directory
pub const DEFAULT_LEVEL_PATH: &str = "assets/city/data.json";

/// Where level snapshots are read from and written to
pub trait LevelStore {
    /// Read and validate the stored level
    fn load(&self) -> Result<LevelData>;

    /// Replace the stored level. Returns false on any failure; the cause is
    /// logged rather than returned.
    fn save(&self, level: &LevelData) -> bool;
}

/// A level stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileLevelStore {
    path: PathBuf,
}

impl FileLevelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Level to open in the editor: `None` when no file exists yet, an
    /// error when a file exists but cannot be loaded so it is never
    /// replaced by a blank level.
    pub fn load_for_editing(&self) -> Result<Option<LevelData>> {
        if !self.exists() {
            info!("{} does not exist yet", self.path.display());
            return Ok(None);
        }
        self.load().map(Some)
    }

    fn write(&self, level: &LevelData) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(level).context("Failed to serialize level")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl LevelStore for FileLevelStore {
    fn load(&self) -> Result<LevelData> {
        let result = parse_level_file(&self.path);
        match &result {
            Ok(level) => info!(
                "Loaded {}x{} level with {} layers from {}",
                level.width,
                level.height,
                level.layers.len(),
                self.path.display()
            ),
            Err(err) => error!("Failed to load level data: {:#}", err),
        }
        result
    }

    fn save(&self, level: &LevelData) -> bool {
        match self.write(level) {
            Ok(()) => {
                info!("Saved level to {}", self.path.display());
                true
            }
            Err(err) => {
                error!("Failed to save level data: {:#}", err);
                false
            }
        }
    }
}

fn parse_level_file(path: &Path) -> Result<LevelData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_level(&content).with_context(|| format!("Invalid level in {}", path.display()))
}

/// Parse and validate a level JSON document
pub fn parse_level(json: &str) -> Result<LevelData> {
    let level: LevelData = serde_json::from_str(json).context("Failed to parse level JSON")?;
    level.validate()?;
    Ok(level)
}
