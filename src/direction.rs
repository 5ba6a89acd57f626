use std::fmt;

/// Facing of an actor on the grid.
///
/// The discriminants are load-bearing: they index per-direction tables and
/// `reverse` relies on opposite directions differing only in bit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Order in which equally good moves are preferred by the pursuers.
    pub const PRIORITY: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Direction {
        Direction::ALL[idx & 3]
    }

    pub fn reverse(self) -> Direction {
        Direction::from_index(self.index() ^ 2)
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
            Direction::North => "NORTH",
        };
        f.write_str(name)
    }
}
