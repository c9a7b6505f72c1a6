use std::fmt;
use std::path::{Path, PathBuf};

// ── MapFormatError ───────────────────────────────────────────────────────────

/// Structural problems in a tile map.  All of them are fatal at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapFormatError {
    /// The map contains no rows at all.
    Empty,
    /// The map must contain exactly one player spawn (`'3'`).
    PlayerCount { found: usize },
    /// A row has a different number of cells than the first row.
    RaggedRow { row: usize, expected: usize, found: usize },
    /// A character outside the map alphabet and not a separator.
    UnknownCell { row: usize, column: usize, cell: char },
}

impl fmt::Display for MapFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapFormatError::Empty => write!(f, "map has no rows"),
            MapFormatError::PlayerCount { found } => {
                write!(f, "expected exactly one player spawn, found {found}")
            }
            MapFormatError::RaggedRow { row, expected, found } => write!(
                f,
                "row {row} has {found} cells, expected {expected}"
            ),
            MapFormatError::UnknownCell { row, column, cell } => write!(
                f,
                "unrecognised cell {cell:?} at row {row}, column {column}"
            ),
        }
    }
}

impl std::error::Error for MapFormatError {}

// ── GameError ────────────────────────────────────────────────────────────────

/// Everything that can stop the game from starting or keep it from running.
///
/// There is no recovery path for any of these; `main` logs the error and
/// exits.
#[derive(Debug)]
pub enum GameError {
    /// Missing or undecodable image, sound, or map file.
    AssetLoad { path: PathBuf, reason: String },
    /// The map file was readable but structurally invalid.
    MapFormat(MapFormatError),
    /// `farmgame.json` exists but could not be read or parsed.
    Config { path: PathBuf, reason: String },
    /// GPU adapter, device, or surface failure.
    Render(String),
    /// Window or event-loop failure.
    Platform(String),
}

impl GameError {
    pub fn asset(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        GameError::AssetLoad { path: path.as_ref().to_path_buf(), reason: reason.to_string() }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset '{}': {reason}", path.display())
            }
            GameError::MapFormat(e) => write!(f, "invalid map: {e}"),
            GameError::Config { path, reason } => {
                write!(f, "invalid config '{}': {reason}", path.display())
            }
            GameError::Render(msg) => write!(f, "render error: {msg}"),
            GameError::Platform(msg) => write!(f, "platform error: {msg}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::MapFormat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MapFormatError> for GameError {
    fn from(e: MapFormatError) -> Self {
        GameError::MapFormat(e)
    }
}

impl From<winit::error::EventLoopError> for GameError {
    fn from(e: winit::error::EventLoopError) -> Self {
        GameError::Platform(e.to_string())
    }
}
