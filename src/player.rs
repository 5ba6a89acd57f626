use crate::actor::{Motion, Speed};
use crate::direction::Direction;
use crate::input::InputSource;
use crate::maze::{Consumable, Maze, Passage, TileCoord, WorldPos};

/// Frames in the death animation.
pub const DYING_FRAMES: u32 = 12;

/// The player actor.
#[derive(Debug, Clone)]
pub struct Pacman {
    motion: Motion,
    desired: Option<Direction>,
    dying_frame: Option<u32>,
    spawn: WorldPos,
}

impl Pacman {
    pub fn new(spawn: TileCoord) -> Self {
        let spawn = spawn.origin();
        Self {
            motion: Motion::new(spawn, Direction::West),
            desired: None,
            dying_frame: None,
            spawn,
        }
    }

    pub fn reset(&mut self) {
        self.motion.place(self.spawn, Direction::West);
        self.desired = None;
        self.dying_frame = None;
    }

    pub fn position(&self) -> WorldPos {
        self.motion.position()
    }

    pub fn direction(&self) -> Direction {
        self.motion.direction()
    }

    pub fn tile(&self) -> TileCoord {
        self.motion.tile()
    }

    pub fn desired_direction(&self) -> Option<Direction> {
        self.desired
    }

    /// Buffers a turn to be tried at the next decision point.
    pub fn set_desired_direction(&mut self, dir: Direction) {
        self.desired = Some(dir);
    }

    pub fn handle_input(&mut self, input: &impl InputSource) {
        if let Some(dir) = Direction::PRIORITY
            .into_iter()
            .find(|dir| input.is_requested(*dir))
        {
            self.set_desired_direction(dir);
        }
    }

    /// Moves for one tick and eats whatever lies on the tile it ends on.
    pub fn update(&mut self, maze: &mut Maze, speed: Speed) -> Option<Consumable> {
        if self.is_dying() {
            return None;
        }
        let mut units = self.motion.budget(speed);
        while units > 0 {
            if self.motion.at_decision_point() {
                self.take_buffered_turn(maze);
            }
            let adv = self.motion.advance(maze, units, Passage::Player);
            units -= adv.moved;
            if adv.blocked {
                break;
            }
        }
        maze.consume(self.motion.tile())
    }

    fn take_buffered_turn(&mut self, maze: &Maze) {
        if let Some(dir) = self.desired {
            if maze.can_move(self.motion.position(), dir, Passage::Player) && self.motion.turn(dir) {
                self.desired = None;
            }
        }
    }

    pub fn start_dying(&mut self) {
        self.dying_frame = Some(0);
        self.desired = None;
    }

    pub fn is_dying(&self) -> bool {
        self.dying_frame.is_some()
    }

    pub fn dying_frame(&self) -> Option<u32> {
        self.dying_frame
    }

    /// Steps the death animation. Returns false once it has run out.
    pub fn inc_dying(&mut self) -> bool {
        match self.dying_frame {
            Some(frame) if frame + 1 < DYING_FRAMES => {
                self.dying_frame = Some(frame + 1);
                true
            }
            _ => false,
        }
    }
}
