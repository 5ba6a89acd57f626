use crate::direction::Direction;
use crate::maze::{Maze, Passage, TileCoord, WorldPos};

/// Fixed-point denominator for [`Speed`].
pub const SPEED_SCALE: u32 = 256;

/// 100% speed: 1.25 world units per tick.
const FULL_SPEED: u32 = 320;

/// World units per tick, scaled by [`SPEED_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(pub u32);

impl Speed {
    pub const fn percent(p: u32) -> Speed {
        Speed(FULL_SPEED * p / 100)
    }

    pub const fn units_per_tick(units: u32) -> Speed {
        Speed(units * SPEED_SCALE)
    }
}

/// Outcome of one [`Motion::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub moved: u32,
    /// The actor sits on a tile centre with a wall ahead.
    pub blocked: bool,
}

/// Grid-snapped movement shared by the player and the ghosts.
///
/// Direction changes are only accepted at a decision point (the actor is
/// centred on its tile); the one exception is [`Motion::reverse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motion {
    pos: WorldPos,
    dir: Direction,
    carry: u32,
}

impl Motion {
    pub fn new(pos: WorldPos, dir: Direction) -> Self {
        Self { pos, dir, carry: 0 }
    }

    pub fn position(&self) -> WorldPos {
        self.pos
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn tile(&self) -> TileCoord {
        self.pos.tile()
    }

    pub fn at_decision_point(&self) -> bool {
        self.pos.is_centered()
    }

    pub fn place(&mut self, pos: WorldPos, dir: Direction) {
        self.pos = pos;
        self.dir = dir;
        self.carry = 0;
    }

    /// Adopts `dir` if the actor is at a decision point.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if !self.at_decision_point() {
            return false;
        }
        self.dir = dir;
        true
    }

    /// Forced about-face, allowed anywhere inside a tile.
    pub fn reverse(&mut self) {
        self.dir = self.dir.reverse();
    }

    /// Whole world units this tick may cover; the fraction carries over.
    pub fn budget(&mut self, speed: Speed) -> u32 {
        let total = self.carry + speed.0;
        self.carry = total % SPEED_SCALE;
        total / SPEED_SCALE
    }

    /// Moves up to `units` along the current direction.
    ///
    /// Stops early on reaching the next tile centre so the caller can take a
    /// decision there, or on a tile centre whose way ahead is closed; the
    /// actor is never pushed past the boundary of an open tile.
    pub fn advance(&mut self, maze: &Maze, units: u32, passage: Passage) -> Advance {
        let mut moved = 0;
        while moved < units {
            if moved > 0 && self.at_decision_point() {
                break;
            }
            if !maze.can_move(self.pos, self.dir, passage) {
                return Advance {
                    moved,
                    blocked: true,
                };
            }
            self.pos = maze.wrap(self.pos.step(self.dir, 1));
            moved += 1;
        }
        Advance {
            moved,
            blocked: false,
        }
    }
}
