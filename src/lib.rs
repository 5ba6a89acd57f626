//! Arcade maze-chase game core: the tile maze, grid-snapped actor motion,
//! the player, four ghost personalities and the round state machine that
//! ties them together, plus a small terminal front end.

pub mod actor;
pub mod config;
pub mod direction;
pub mod error;
pub mod events;
pub mod fruit;
pub mod ghost;
pub mod input;
pub mod level;
pub mod maze;
pub mod player;
pub mod render;
pub mod round;
pub mod schedule;

#[cfg(test)]
mod testing;

pub use config::{RoundConfig, Settings};
pub use direction::Direction;
pub use error::{GameError, MazeError};
pub use events::Cue;
pub use ghost::{Ghost, MotionState, Personality};
pub use maze::{Maze, TileCoord, WorldPos};
pub use player::Pacman;
pub use round::{Phase, Round};
