//! Tile-map parsing.
//!
//! A map is a text file with one line per grid row and one character per
//! cell.  The alphabet is:
//!
//! | char | cell          |
//! |------|---------------|
//! | `0`  | empty         |
//! | `1`  | wall          |
//! | `3`  | player spawn  |
//! | `5`  | animal        |
//!
//! Commas and whitespace are separators: they are skipped and do not occupy a
//! column, so both `1110` and `1,1,1,0` describe the same row.  Any other
//! character is an error.

use std::path::Path;

use glam::Vec2;

use crate::error::{GameError, MapFormatError};
use crate::world::EntityKind;

// ── Cell ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    PlayerSpawn,
    Animal,
}

impl Cell {
    /// Decode one map character.  Returns `None` for separators and for
    /// characters outside the alphabet; use [`is_separator`] to tell them apart.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Cell::Empty),
            '1' => Some(Cell::Wall),
            '3' => Some(Cell::PlayerSpawn),
            '5' => Some(Cell::Animal),
            _ => None,
        }
    }

    /// Entity spawned for this cell, if any.
    pub fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Cell::Empty => None,
            Cell::Wall => Some(EntityKind::Wall),
            Cell::PlayerSpawn => Some(EntityKind::Player),
            Cell::Animal => Some(EntityKind::Animal),
        }
    }
}

pub fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

// ── Coordinate transform ─────────────────────────────────────────────────────

/// World position of grid cell `(row, column)`.
///
/// Columns map to `x = column * stride`.  Rows are counted from the top of
/// the file but map to *increasing* world Y: row 0 sits at `y = stride`,
/// row 1 at `2 * stride`, and so on, so the last line of the file is drawn
/// highest on screen.
pub fn grid_to_world(row: usize, column: usize, stride: f32) -> Vec2 {
    Vec2::new(column as f32 * stride, (row + 1) as f32 * stride)
}

// ── Placement / MapLayout ────────────────────────────────────────────────────

/// One entity to create at setup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub kind: EntityKind,
    pub row: usize,
    pub column: usize,
    pub position: Vec2,
}

/// Parsed map: every placement in file order plus the player spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    placements: Vec<Placement>,
    player: usize,
    rows: usize,
    columns: usize,
}

impl MapLayout {
    /// All placements in row-major file order, the player included.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn player(&self) -> &Placement {
        &self.placements[self.player]
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.kind == kind)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse an ordered sequence of rows into placements.
pub fn parse_rows<S: AsRef<str>>(rows: &[S], stride: f32) -> Result<MapLayout, MapFormatError> {
    if rows.is_empty() {
        return Err(MapFormatError::Empty);
    }

    let mut placements = Vec::new();
    let mut players = Vec::new();
    let mut expected: Option<usize> = None;

    for (row, line) in rows.iter().enumerate() {
        let mut column = 0usize;
        for c in line.as_ref().chars() {
            if is_separator(c) {
                continue;
            }
            let cell = Cell::from_char(c)
                .ok_or(MapFormatError::UnknownCell { row, column, cell: c })?;

            if let Some(kind) = cell.entity_kind() {
                if kind == EntityKind::Player {
                    players.push(placements.len());
                }
                placements.push(Placement {
                    kind,
                    row,
                    column,
                    position: grid_to_world(row, column, stride),
                });
            }
            column += 1;
        }

        match expected {
            None => expected = Some(column),
            Some(n) if n != column => {
                return Err(MapFormatError::RaggedRow { row, expected: n, found: column });
            }
            Some(_) => {}
        }
    }

    if players.len() != 1 {
        return Err(MapFormatError::PlayerCount { found: players.len() });
    }

    Ok(MapLayout {
        placements,
        player: players[0],
        rows: rows.len(),
        columns: expected.unwrap_or(0),
    })
}

/// Parse a whole map file's text.  Blank lines at the end of the file are
/// ignored; a blank line between rows is an empty row and fails as ragged.
pub fn parse_str(text: &str, stride: f32) -> Result<MapLayout, MapFormatError> {
    let mut rows: Vec<&str> = text.lines().collect();
    while rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }
    parse_rows(&rows, stride)
}

/// Read and parse the map at `path`.
pub fn load<P: AsRef<Path>>(path: P, stride: f32) -> Result<MapLayout, GameError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| GameError::asset(path, e))?;
    let layout = parse_str(&text, stride)?;
    tracing::info!(
        rows = layout.rows(),
        columns = layout.columns(),
        entities = layout.placements().len(),
        "loaded map '{}'",
        path.display()
    );
    Ok(layout)
}
