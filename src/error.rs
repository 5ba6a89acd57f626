use thiserror::Error;

/// A maze layout that breaks one of the load-time preconditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout is empty")]
    Empty,

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at ({col}, {row})")]
    UnknownGlyph { glyph: char, col: usize, row: usize },

    #[error("marker {0:?} is missing")]
    MissingMarker(char),

    #[error("marker {0:?} appears more than once")]
    DuplicateMarker(char),

    #[error("tunnel on row {row} has no partner on the opposite edge")]
    UnpairedTunnel { row: usize },

    #[error("ghost house is not sealed off from the corridors")]
    HouseNotSealed,

    #[error("ghost house centre cannot be reached through the door")]
    HouseUnreachable,

    #[error("consumable at ({col}, {row}) cannot be reached from the player spawn")]
    UnreachableConsumable { col: i32, row: i32 },

    #[error("maze has no pellets")]
    NoPellets,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
