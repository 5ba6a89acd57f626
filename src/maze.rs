use std::collections::VecDeque;

use log::debug;

use crate::direction::Direction;
use crate::error::MazeError;

/// Width and height of one tile in world units.
pub const TILE_SIZE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(self, dir: Direction, tiles: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            col: self.col + dx * tiles,
            row: self.row + dy * tiles,
        }
    }

    pub fn neighbor(self, dir: Direction) -> Self {
        self.offset(dir, 1)
    }

    pub fn distance_sq(self, other: TileCoord) -> i32 {
        let dx = self.col - other.col;
        let dy = self.row - other.row;
        dx * dx + dy * dy
    }

    /// World position of an actor centred on this tile.
    pub fn origin(self) -> WorldPos {
        WorldPos::new(self.col * TILE_SIZE, self.row * TILE_SIZE)
    }
}

/// Continuous position in world units.
///
/// An actor is drawn as a tile-sized box whose top-left corner is this
/// position, so the actor is centred on a tile exactly when both
/// coordinates are multiples of [`TILE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
}

impl WorldPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile holding the actor's centre point.
    pub fn tile(self) -> TileCoord {
        TileCoord::new(
            (self.x + TILE_SIZE / 2).div_euclid(TILE_SIZE),
            (self.y + TILE_SIZE / 2).div_euclid(TILE_SIZE),
        )
    }

    /// Signed offset from the centre of the containing tile.
    pub fn offset_in_tile(self) -> (i32, i32) {
        let origin = self.tile().origin();
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn is_centered(self) -> bool {
        self.offset_in_tile() == (0, 0)
    }

    pub fn step(self, dir: Direction, units: i32) -> WorldPos {
        let (dx, dy) = dir.delta();
        WorldPos::new(self.x + dx * units, self.y + dy * units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Wall,
    /// Open floor that started the level with a consumable on it.
    Corridor,
    Tunnel,
    Door,
    /// Open floor that never carries consumables (house interior, spawns).
    Empty,
}

/// Who is asking to move, which decides how the house door behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    Player,
    Ghost,
    GhostThroughDoor,
}

impl Structure {
    pub fn is_passable(self, passage: Passage) -> bool {
        match self {
            Structure::Wall => false,
            Structure::Door => passage == Passage::GhostThroughDoor,
            Structure::Corridor | Structure::Tunnel | Structure::Empty => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumable {
    Pellet,
    PowerPellet,
}

impl Consumable {
    pub fn points(self) -> u32 {
        match self {
            Consumable::Pellet => 10,
            Consumable::PowerPellet => 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub structure: Structure,
    pub content: Option<Consumable>,
}

impl Tile {
    const WALL: Tile = Tile {
        structure: Structure::Wall,
        content: None,
    };
    const TUNNEL: Tile = Tile {
        structure: Structure::Tunnel,
        content: None,
    };
}

/// Fixed tiles the rest of the game navigates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmarks {
    pub pacman_spawn: TileCoord,
    /// Corridor tile just outside the house door.
    pub house_entrance: TileCoord,
    pub house_center: TileCoord,
    pub house_left: TileCoord,
    pub house_right: TileCoord,
    pub fruit: TileCoord,
}

const MARKERS: [char; 6] = ['P', 'E', 'H', 'L', 'R', 'F'];

#[derive(Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    initial: Vec<Option<Consumable>>,
    tunnel_rows: Vec<bool>,
    house: Vec<bool>,
    landmarks: Landmarks,
    total: usize,
    remaining: usize,
}

impl Maze {
    /// Builds a maze from text rows.
    ///
    /// Glyphs: `#` wall, `.` pellet, `o` power pellet, ` ` empty floor,
    /// `T` tunnel, `-` house door. Markers (each exactly once, all empty
    /// floor): `P` player spawn, `E` house entrance, `H` house centre,
    /// `L`/`R` left and right house bays, `F` fruit spot.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Maze, MazeError> {
        let first = rows.first().ok_or(MazeError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut markers: [Option<TileCoord>; 6] = [None; 6];
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let (structure, content) = match glyph {
                    '#' => (Structure::Wall, None),
                    '.' => (Structure::Corridor, Some(Consumable::Pellet)),
                    'o' => (Structure::Corridor, Some(Consumable::PowerPellet)),
                    ' ' => (Structure::Empty, None),
                    'T' => (Structure::Tunnel, None),
                    '-' => (Structure::Door, None),
                    marker => {
                        let slot = MARKERS
                            .iter()
                            .position(|m| *m == marker)
                            .ok_or(MazeError::UnknownGlyph { glyph, col, row })?;
                        if markers[slot].is_some() {
                            return Err(MazeError::DuplicateMarker(marker));
                        }
                        markers[slot] = Some(TileCoord::new(col as i32, row as i32));
                        (Structure::Empty, None)
                    }
                };
                tiles.push(Tile { structure, content });
            }
        }

        let mut found = [TileCoord::new(0, 0); 6];
        for (slot, marker) in markers.iter().enumerate() {
            found[slot] = marker.ok_or(MazeError::MissingMarker(MARKERS[slot]))?;
        }
        let landmarks = Landmarks {
            pacman_spawn: found[0],
            house_entrance: found[1],
            house_center: found[2],
            house_left: found[3],
            house_right: found[4],
            fruit: found[5],
        };

        let height = rows.len();
        let mut tunnel_rows = vec![false; height];
        for (row, paired) in tunnel_rows.iter_mut().enumerate() {
            let left = tiles[row * width].structure == Structure::Tunnel;
            let right = tiles[row * width + width - 1].structure == Structure::Tunnel;
            if left != right {
                return Err(MazeError::UnpairedTunnel { row });
            }
            *paired = left;
        }

        let initial: Vec<Option<Consumable>> = tiles.iter().map(|t| t.content).collect();
        let total = initial.iter().filter(|c| c.is_some()).count();
        let mut maze = Maze {
            width: width as i32,
            height: height as i32,
            tiles,
            initial,
            tunnel_rows,
            house: Vec::new(),
            landmarks,
            total,
            remaining: total,
        };
        maze.validate()?;
        debug!(
            "maze loaded: {}x{} tiles, {} consumables",
            maze.width, maze.height, maze.total
        );
        Ok(maze)
    }

    fn validate(&mut self) -> Result<(), MazeError> {
        if self.total == 0 {
            return Err(MazeError::NoPellets);
        }

        let marks = self.landmarks;
        let house = self.flood(marks.house_center, Passage::Ghost);
        let leaks = [marks.house_entrance, marks.pacman_spawn]
            .iter()
            .any(|t| self.index_of(*t).map_or(false, |idx| house[idx]));
        if leaks {
            return Err(MazeError::HouseNotSealed);
        }
        let bays_inside = [marks.house_left, marks.house_right]
            .iter()
            .all(|t| self.index_of(*t).map_or(false, |idx| house[idx]));
        if !bays_inside {
            return Err(MazeError::HouseNotSealed);
        }

        let through_door = self.flood(marks.house_entrance, Passage::GhostThroughDoor);
        if !self
            .index_of(marks.house_center)
            .map_or(false, |idx| through_door[idx])
        {
            return Err(MazeError::HouseUnreachable);
        }

        let reachable = self.flood(marks.pacman_spawn, Passage::Player);
        for (idx, tile) in self.tiles.iter().enumerate() {
            if tile.content.is_some() && !reachable[idx] {
                return Err(MazeError::UnreachableConsumable {
                    col: idx as i32 % self.width,
                    row: idx as i32 / self.width,
                });
            }
        }

        self.house = house;
        Ok(())
    }

    fn flood(&self, start: TileCoord, passage: Passage) -> Vec<bool> {
        let mut seen = vec![false; self.tiles.len()];
        let Some(start_idx) = self.index_of(start) else {
            return seen;
        };
        let mut q = VecDeque::new();
        seen[start_idx] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for dir in Direction::ALL {
                let next = self.wrap_tile(pos.neighbor(dir));
                if !self.tile_at(next).structure.is_passable(passage) {
                    continue;
                }
                let Some(idx) = self.index_of(next) else {
                    continue;
                };
                if seen[idx] {
                    continue;
                }
                seen[idx] = true;
                q.push_back(next);
            }
        }
        seen
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    fn index_of(&self, t: TileCoord) -> Option<usize> {
        if t.col < 0 || t.row < 0 || t.col >= self.width || t.row >= self.height {
            return None;
        }
        Some((t.row * self.width + t.col) as usize)
    }

    pub fn is_tunnel_row(&self, row: i32) -> bool {
        row >= 0 && row < self.height && self.tunnel_rows[row as usize]
    }

    /// Tile at `t`. Coordinates off the grid are walls, except beyond the
    /// ends of a tunnel row, which are tunnel.
    pub fn tile_at(&self, t: TileCoord) -> Tile {
        match self.index_of(t) {
            Some(idx) => self.tiles[idx],
            None if self.is_tunnel_row(t.row) => Tile::TUNNEL,
            None => Tile::WALL,
        }
    }

    pub fn structure_at(&self, t: TileCoord) -> Structure {
        self.tile_at(t).structure
    }

    pub fn content_at(&self, t: TileCoord) -> Option<Consumable> {
        self.tile_at(t).content
    }

    pub fn is_in_house(&self, t: TileCoord) -> bool {
        self.index_of(t).map_or(false, |idx| self.house[idx])
    }

    /// Whether an actor at `from` may take one step towards `dir`.
    ///
    /// The tile checked is the one the actor's leading edge would enter,
    /// which keeps a tile-centred actor from clipping into wall corners.
    pub fn can_move(&self, from: WorldPos, dir: Direction, passage: Passage) -> bool {
        self.structure_at(leading_tile(from, dir))
            .is_passable(passage)
    }

    /// Removes the consumable at `t`, if any. Consuming an empty tile is a no-op.
    pub fn consume(&mut self, t: TileCoord) -> Option<Consumable> {
        let idx = self.index_of(t)?;
        let eaten = self.tiles[idx].content.take();
        if eaten.is_some() {
            self.remaining -= 1;
        }
        eaten
    }

    pub fn pellets_left(&self) -> usize {
        self.remaining
    }

    pub fn pellets_eaten(&self) -> usize {
        self.total - self.remaining
    }

    pub fn total_pellets(&self) -> usize {
        self.total
    }

    /// Puts every consumable back for a new level.
    pub fn reset(&mut self) {
        for (tile, content) in self.tiles.iter_mut().zip(&self.initial) {
            tile.content = *content;
        }
        self.remaining = self.total;
    }

    /// Brings a position that slid off either end of a tunnel row back
    /// onto the grid, keeping its sub-tile offset.
    pub fn wrap(&self, pos: WorldPos) -> WorldPos {
        let span = self.width * TILE_SIZE;
        let col = pos.tile().col;
        if col < 0 {
            WorldPos::new(pos.x + span, pos.y)
        } else if col >= self.width {
            WorldPos::new(pos.x - span, pos.y)
        } else {
            pos
        }
    }

    fn wrap_tile(&self, t: TileCoord) -> TileCoord {
        if self.is_tunnel_row(t.row) {
            TileCoord::new(t.col.rem_euclid(self.width), t.row)
        } else {
            t
        }
    }
}

/// Tile entered by the leading edge of an actor at `pos` moving one unit
/// towards `dir`.
pub fn leading_tile(pos: WorldPos, dir: Direction) -> TileCoord {
    let centre = pos.tile();
    match dir {
        Direction::East => TileCoord::new((pos.x + TILE_SIZE).div_euclid(TILE_SIZE), centre.row),
        Direction::West => TileCoord::new((pos.x - 1).div_euclid(TILE_SIZE), centre.row),
        Direction::South => TileCoord::new(centre.col, (pos.y + TILE_SIZE).div_euclid(TILE_SIZE)),
        Direction::North => TileCoord::new(centre.col, (pos.y - 1).div_euclid(TILE_SIZE)),
    }
}
