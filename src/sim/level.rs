//! Level grids and where they come from
//!
//! A level is a grid of cell codes, row 0 at the top of the playfield.
//! Only `'1'`, `'2'` and `'3'` place bricks; every other symbol is empty.

use std::fs;
use std::path::{Path, PathBuf};

use super::state::{Brick, BrickTier};
use crate::consts::*;
use crate::error::{ConfigError, Result};

/// A parsed level: rows of cell codes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelGrid {
    pub rows: Vec<Vec<char>>,
}

impl LevelGrid {
    pub fn new(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    /// One row per line, one cell per character, surrounding whitespace trimmed
    pub fn from_text(text: &str) -> Self {
        Self {
            rows: text.lines().map(|line| line.trim().chars().collect()).collect(),
        }
    }

    /// Number of brick cells in the grid
    pub fn brick_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&code| BrickTier::from_code(code).is_some())
            .count()
    }

    /// Reject grids that would place bricks outside the playfield
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.rows.len() > GRID_ROWS {
            return Err(ConfigError::malformed_level(
                index,
                format!("{} rows, at most {GRID_ROWS} fit", self.rows.len()),
            ));
        }
        if let Some((row, cells)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() > GRID_COLUMNS)
        {
            return Err(ConfigError::malformed_level(
                index,
                format!("row {row} has {} cells, at most {GRID_COLUMNS} fit", cells.len()),
            ));
        }
        Ok(())
    }

    /// Place one brick per brick cell on the uniform grid
    pub fn bricks(&self) -> Vec<Brick> {
        let mut bricks = Vec::with_capacity(self.brick_count());
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, &code) in cells.iter().enumerate() {
                let Some(tier) = BrickTier::from_code(code) else {
                    continue;
                };
                let left = col as f32 * BRICK_WIDTH;
                let top = PLAYFIELD_HEIGHT - (row as f32 + 1.0) * BRICK_HEIGHT;
                bricks.push(Brick::new(tier, left, top));
            }
        }
        bricks
    }
}

/// Supplies level grids by index
pub trait LevelSource {
    fn level_count(&self) -> usize;

    fn load(&self, index: usize) -> Result<LevelGrid>;

    /// Load every level up front, stopping at the first unreadable one
    fn load_all(&self) -> Result<Vec<LevelGrid>> {
        (0..self.level_count()).map(|index| self.load(index)).collect()
    }
}

/// Levels held in memory
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    pub levels: Vec<LevelGrid>,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelGrid>) -> Self {
        Self { levels }
    }

    /// Parse each text block as one level
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            levels: texts.into_iter().map(LevelGrid::from_text).collect(),
        }
    }
}

impl LevelSource for LevelSet {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, index: usize) -> Result<LevelGrid> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(ConfigError::MissingLevel {
                index,
                count: self.levels.len(),
            })
    }
}

/// Levels stored as `level1.txt`, `level2.txt`, ... in a directory
#[derive(Debug, Clone)]
pub struct LevelDir {
    paths: Vec<PathBuf>,
}

impl LevelDir {
    /// Collect consecutive level files, stopping at the first gap
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let paths: Vec<PathBuf> = (1..)
            .map(|n| dir.join(format!("level{n}.txt")))
            .take_while(|path| path.is_file())
            .collect();

        if paths.is_empty() {
            return Err(ConfigError::NoLevels(dir.display().to_string()));
        }
        log::info!("Found {} level files in {}", paths.len(), dir.display());
        Ok(Self { paths })
    }
}

impl LevelSource for LevelDir {
    fn level_count(&self) -> usize {
        self.paths.len()
    }

    fn load(&self, index: usize) -> Result<LevelGrid> {
        let path = self.paths.get(index).ok_or(ConfigError::MissingLevel {
            index,
            count: self.paths.len(),
        })?;
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Ok(LevelGrid::from_text(&text))
    }
}
