use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::direction::Direction;

/// Answers "is this direction being asked for right now".
pub trait InputSource {
    fn is_requested(&self, dir: Direction) -> bool;
}

/// A single requested direction, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requested(pub Option<Direction>);

impl InputSource for Requested {
    fn is_requested(&self, dir: Direction) -> bool {
        self.0 == Some(dir)
    }
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::North),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::South),
        KeyCode::Left | KeyCode::Char('h') => Some(Direction::West),
        KeyCode::Right | KeyCode::Char('l') => Some(Direction::East),
        _ => None,
    }
}

/// Terminals only report presses and auto-repeats, never releases, so a
/// direction key counts as held for `hold` after it was last seen.
#[derive(Debug, Clone)]
pub struct HeldKeys {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Direction>,
    hold: Duration,
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            last_seen: [None; 4],
            last_pressed: None,
            hold,
        }
    }

    pub fn press(&mut self, dir: Direction, at: Instant) {
        self.last_seen[dir.index()] = Some(at);
        self.last_pressed = Some(dir);
    }

    /// The most recent direction still held at `now`, favouring the last
    /// key pressed.
    pub fn active(&self, now: Instant) -> Option<Direction> {
        let held = |t: Instant| now.saturating_duration_since(t) <= self.hold;
        if let Some(dir) = self.last_pressed {
            if self.last_seen[dir.index()].map_or(false, held) {
                return Some(dir);
            }
        }
        let mut best: Option<(Direction, Instant)> = None;
        for dir in Direction::ALL {
            if let Some(t) = self.last_seen[dir.index()] {
                if !held(t) {
                    continue;
                }
                match best {
                    Some((_, bt)) if t <= bt => {}
                    _ => best = Some((dir, t)),
                }
            }
        }
        best.map(|(dir, _)| dir)
    }

    pub fn requested(&self, now: Instant) -> Requested {
        Requested(self.active(now))
    }
}
