//! Play time, the scatter/chase alternation driven from it, and the pacer
//! that feeds fixed ticks into the game from the wall clock.
//!
//! Every timer in the game compares against [`PlayClock::now`], so pausing
//! the clock freezes all of them at once and frame jitter never accumulates.

use std::time::{Duration, Instant};

/// Most ticks [`TickPacer::due`] hands out at once before it gives up
/// catching up with the wall clock.
const MAX_CATCH_UP: u32 = 5;

/// Targeting mode shared by every ghost that is out roaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalMode {
    Scatter,
    Chase,
}

/// Milliseconds of unpaused play.
#[derive(Debug, Clone, Default)]
pub struct PlayClock {
    now: u64,
    paused: bool,
}

impl PlayClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn advance(&mut self, ms: u64) {
        if !self.paused {
            self.now += ms;
        }
    }

    pub fn reset(&mut self) {
        self.now = 0;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

#[derive(Debug, Clone)]
pub struct ModeSchedule {
    phases: [u64; 7],
    elapsed: u64,
    last_seen: u64,
}

impl ModeSchedule {
    pub fn new(phases: [u64; 7]) -> Self {
        Self {
            phases,
            elapsed: 0,
            last_seen: 0,
        }
    }

    /// Starts over from the first scatter phase.
    pub fn restart(&mut self, now: u64, phases: [u64; 7]) {
        self.phases = phases;
        self.elapsed = 0;
        self.last_seen = now;
    }

    pub fn mode(&self) -> GlobalMode {
        let mut end = 0;
        for (idx, len) in self.phases.iter().enumerate() {
            end += len;
            if self.elapsed < end {
                return if idx % 2 == 0 {
                    GlobalMode::Scatter
                } else {
                    GlobalMode::Chase
                };
            }
        }
        GlobalMode::Chase
    }

    /// Catches the schedule up to `now`. Time spent `frozen` (ghosts
    /// frightened) does not count. Returns the new mode on a switch.
    pub fn update(&mut self, now: u64, frozen: bool) -> Option<GlobalMode> {
        let before = self.mode();
        let dt = now.saturating_sub(self.last_seen);
        self.last_seen = now;
        if !frozen {
            self.elapsed += dt;
        }
        let after = self.mode();
        (after != before).then_some(after)
    }
}

/// Turns wall time into a whole number of fixed-length ticks. The leftover
/// carries into the next call, so the tick rate does not drift with frame
/// timing.
#[derive(Debug, Clone)]
pub struct TickPacer {
    step: Duration,
    next: Instant,
}

impl TickPacer {
    pub fn new(step: Duration, start: Instant) -> Self {
        Self {
            step,
            next: start + step,
        }
    }

    /// Ticks that fell due up to `now`. After a long stall the backlog is
    /// dropped rather than replayed.
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut ticks = 0;
        while now >= self.next {
            ticks += 1;
            self.next += self.step;
            if ticks == MAX_CATCH_UP {
                if now >= self.next {
                    self.next = now + self.step;
                }
                break;
            }
        }
        ticks
    }
}
