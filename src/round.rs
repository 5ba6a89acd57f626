//! The outer state machine: READY, play, dying and game over.
//!
//! [`Round::tick`] is the only writer of game state. Everything the front
//! end needs to draw or play is read back through accessors afterwards.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RoundConfig;
use crate::error::MazeError;
use crate::events::Cue;
use crate::fruit::BonusFruit;
use crate::ghost::{ActorSnapshot, Ghost, GhostContext, MotionState, Personality};
use crate::input::InputSource;
use crate::level::{rules_for, LevelRules, CLASSIC_LAYOUT};
use crate::maze::{Consumable, Maze, TileCoord};
use crate::player::Pacman;
use crate::schedule::{GlobalMode, ModeSchedule, PlayClock};

const FIRST_READY_MS: u64 = 4_500;
const READY_MS: u64 = 2_000;
const DYING_FRAME_MS: u64 = 75;
/// Actors hold still this long while a capture score is on screen.
const CAPTURE_PAUSE_MS: u64 = 750;
const CAPTURE_POINTS: [u32; 4] = [200, 400, 800, 1600];
const EXTRA_LIFE_AT: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    InGame,
    Dying,
    GameOver,
}

pub struct Round {
    maze: Maze,
    pacman: Pacman,
    ghosts: [Ghost; 4],
    fruit: BonusFruit,
    clock: PlayClock,
    schedule: ModeSchedule,
    rules: LevelRules,
    rng: StdRng,
    config: RoundConfig,
    phase: Phase,
    phase_until: u64,
    first_life: bool,
    level: u32,
    score: u32,
    high_score: u32,
    lives: u32,
    extra_life_awarded: bool,
    captures: usize,
    frozen_until: u64,
    points_display: Option<(TileCoord, u32)>,
    cues: Vec<Cue>,
}

impl Round {
    pub fn new(maze: Maze, config: RoundConfig) -> Self {
        let rules = rules_for(1);
        let pacman = Pacman::new(maze.landmarks().pacman_spawn);
        let ghosts = Personality::ROSTER.map(|p| Ghost::new(p, &maze));
        let fruit = BonusFruit::new(rules.fruit, maze.landmarks().fruit);
        let mut round = Self {
            pacman,
            ghosts,
            fruit,
            clock: PlayClock::new(),
            schedule: ModeSchedule::new(rules.schedule),
            rng: StdRng::seed_from_u64(config.seed),
            lives: config.lives,
            rules,
            maze,
            config,
            phase: Phase::Ready,
            phase_until: 0,
            first_life: true,
            level: 1,
            score: 0,
            high_score: 0,
            extra_life_awarded: false,
            captures: 0,
            frozen_until: 0,
            points_display: None,
            cues: Vec::new(),
        };
        round.enter_ready();
        round
    }

    /// A round on the arcade board.
    pub fn classic(config: RoundConfig) -> Result<Self, MazeError> {
        Ok(Self::new(Maze::parse(CLASSIC_LAYOUT)?, config))
    }

    /// Starts a fresh game on the same board, keeping the high score.
    pub fn restart(&mut self) {
        info!("new game");
        self.level = 1;
        self.score = 0;
        self.lives = self.config.lives;
        self.extra_life_awarded = false;
        self.first_life = true;
        self.load_level();
        self.enter_ready();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pacman(&self) -> &Pacman {
        &self.pacman
    }

    pub fn ghosts(&self) -> &[Ghost; 4] {
        &self.ghosts
    }

    /// Direct access for scripted setups and debugging.
    pub fn ghost_mut(&mut self, who: Personality) -> &mut Ghost {
        &mut self.ghosts[who.index()]
    }

    pub fn fruit(&self) -> &BonusFruit {
        &self.fruit
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn mode(&self) -> GlobalMode {
        self.schedule.mode()
    }

    /// Capture score to show, and where, while the capture pause lasts.
    pub fn points_display(&self) -> Option<(TileCoord, u32)> {
        self.points_display
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn toggle_pause(&mut self) {
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        debug!("paused: {}", paused);
    }

    /// Sound cues queued since the last call.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Debug hook: clears the level without eating anything.
    pub fn skip_level(&mut self) {
        if matches!(self.phase, Phase::Ready | Phase::InGame) {
            self.level_cleared();
        }
    }

    /// Debug hook: kills the player on the spot.
    pub fn force_death(&mut self) {
        if self.phase == Phase::InGame {
            self.start_dying();
        }
    }

    pub fn tick(&mut self, input: &impl InputSource) {
        if self.clock.is_paused() {
            return;
        }
        self.clock.advance(self.config.tick_ms);
        match self.phase {
            Phase::Ready => self.tick_ready(),
            Phase::InGame => self.tick_in_game(input),
            Phase::Dying => self.tick_dying(),
            Phase::GameOver => {}
        }
    }

    fn tick_ready(&mut self) {
        if self.clock.now() < self.phase_until {
            return;
        }
        self.clock.reset();
        self.schedule.restart(0, self.rules.schedule);
        for ghost in &mut self.ghosts {
            ghost.reset(0);
        }
        self.first_life = false;
        self.phase = Phase::InGame;
        debug!("level {} play starts", self.level);
    }

    fn tick_in_game(&mut self, input: &impl InputSource) {
        let now = self.clock.now();
        if now < self.frozen_until {
            return;
        }
        self.points_display = None;

        let pacman_before = self.pacman.tile();
        self.pacman.handle_input(input);
        let speed = if self.any_frightened() {
            self.rules.pacman_frightened_speed
        } else {
            self.rules.pacman_speed
        };
        if let Some(eaten) = self.pacman.update(&mut self.maze, speed) {
            self.on_eaten(eaten, now);
            if self.maze.pellets_left() == 0 {
                self.level_cleared();
                return;
            }
        }
        self.fruit.update(now);
        if let Some(points) = self.fruit.try_collect(self.pacman.tile()) {
            debug!("fruit eaten for {}", points);
            self.add_score(points);
            self.cues.push(Cue::FruitEaten);
        }

        if let Some(mode) = self.schedule.update(now, self.any_frightened()) {
            debug!("global mode now {:?}", mode);
            for ghost in &mut self.ghosts {
                ghost.on_mode_switch();
            }
        }

        let ctx = GhostContext {
            now,
            mode: self.schedule.mode(),
            rules: &self.rules,
            pacman: ActorSnapshot {
                tile: self.pacman.tile(),
                direction: self.pacman.direction(),
            },
            ghosts: std::array::from_fn(|idx| self.ghosts[idx].snapshot()),
        };
        let ghosts_before = ctx.ghosts;
        for ghost in &mut self.ghosts {
            ghost.update(&self.maze, &ctx, &mut self.rng);
        }

        self.resolve_collisions(now, pacman_before, &ghosts_before);
    }

    fn on_eaten(&mut self, eaten: Consumable, now: u64) {
        self.add_score(eaten.points());
        match eaten {
            Consumable::Pellet => self.cues.push(Cue::Chomp),
            Consumable::PowerPellet => {
                debug!("power pellet, ghosts frightened for {} ms", self.rules.frightened_ms);
                self.captures = 0;
                for ghost in &mut self.ghosts {
                    ghost.frighten(now, self.rules.frightened_ms);
                }
                self.cues.push(Cue::PowerPelletEaten);
            }
        }
        self.fruit.on_pellets_eaten(self.maze.pellets_eaten(), now);
    }

    /// Contact is a shared tile after movement, or the two actors having
    /// swapped tiles during this tick.
    fn resolve_collisions(&mut self, now: u64, pacman_before: TileCoord, ghosts_before: &[ActorSnapshot; 4]) {
        let tile = self.pacman.tile();
        for idx in 0..self.ghosts.len() {
            let ghost_tile = self.ghosts[idx].tile();
            let swapped = ghost_tile == pacman_before && ghosts_before[idx].tile == tile;
            if ghost_tile != tile && !swapped {
                continue;
            }
            match self.ghosts[idx].state() {
                MotionState::Frightened => {
                    let points = CAPTURE_POINTS[self.captures.min(CAPTURE_POINTS.len() - 1)];
                    self.captures += 1;
                    self.ghosts[idx].capture();
                    self.add_score(points);
                    self.frozen_until = now + CAPTURE_PAUSE_MS;
                    self.points_display = Some((tile, points));
                    self.cues.push(Cue::GhostEaten);
                }
                MotionState::Eyes | MotionState::EyesEnteringBox => {}
                _ if self.config.god_mode => {}
                _ => {
                    info!(
                        "caught by {} at {:?}",
                        self.ghosts[idx].personality().name(),
                        tile
                    );
                    self.start_dying();
                    return;
                }
            }
        }
    }

    fn start_dying(&mut self) {
        self.pacman.start_dying();
        self.fruit.hide();
        self.points_display = None;
        self.phase = Phase::Dying;
        self.phase_until = self.clock.now() + DYING_FRAME_MS;
        self.cues.push(Cue::Death);
    }

    fn tick_dying(&mut self) {
        if self.clock.now() < self.phase_until {
            return;
        }
        if self.pacman.inc_dying() {
            self.phase_until += DYING_FRAME_MS;
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            info!("game over, score {}", self.score);
            self.phase = Phase::GameOver;
            return;
        }
        debug!("{} lives left", self.lives);
        self.reset_actors();
        self.enter_ready();
    }

    fn level_cleared(&mut self) {
        info!("level {} cleared, score {}", self.level, self.score);
        self.cues.push(Cue::RoundClear);
        self.level += 1;
        self.load_level();
        self.enter_ready();
    }

    fn load_level(&mut self) {
        self.rules = rules_for(self.level);
        self.maze.reset();
        self.fruit.reset(self.rules.fruit);
        self.reset_actors();
    }

    fn reset_actors(&mut self) {
        let now = self.clock.now();
        self.pacman.reset();
        for ghost in &mut self.ghosts {
            ghost.reset(now);
        }
        self.fruit.hide();
        self.captures = 0;
        self.frozen_until = 0;
        self.points_display = None;
    }

    fn enter_ready(&mut self) {
        let wait = if self.first_life {
            self.cues.push(Cue::Opening);
            FIRST_READY_MS
        } else {
            READY_MS
        };
        self.phase = Phase::Ready;
        self.phase_until = self.clock.now() + wait;
    }

    fn any_frightened(&self) -> bool {
        self.ghosts
            .iter()
            .any(|g| g.state() == MotionState::Frightened)
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        if !self.extra_life_awarded && self.score >= EXTRA_LIFE_AT {
            self.extra_life_awarded = true;
            self.lives += 1;
            info!("extra life at {}", self.score);
            self.cues.push(Cue::ExtraLife);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Speed;
    use crate::direction::Direction;
    use crate::input::Requested;
    use crate::maze::WorldPos;
    use crate::testing::small_maze;

    fn round(lives: u32) -> Round {
        Round::new(
            small_maze(),
            RoundConfig {
                lives,
                ..RoundConfig::default()
            },
        )
    }

    fn tick_until(round: &mut Round, phase: Phase, max: usize) {
        for _ in 0..max {
            if round.phase() == phase {
                return;
            }
            round.tick(&Requested(None));
        }
        assert_eq!(round.phase(), phase);
    }

    fn snapshots(round: &Round) -> [ActorSnapshot; 4] {
        std::array::from_fn(|idx| round.ghosts[idx].snapshot())
    }

    #[test]
    fn ready_is_longer_on_the_first_life() {
        let mut round = round(3);
        assert_eq!(round.drain_cues(), vec![Cue::Opening]);
        let ticks = FIRST_READY_MS.div_ceil(16) as usize;
        for _ in 0..ticks - 1 {
            round.tick(&Requested(None));
        }
        assert_eq!(round.phase(), Phase::Ready);
        round.tick(&Requested(None));
        assert_eq!(round.phase(), Phase::InGame);
        assert_eq!(round.now(), 0);
    }

    #[test]
    fn eating_scores_and_queues_cues() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        round.drain_cues();
        // West of the spawn: four pellets, then the power pellet in the corner.
        for _ in 0..60 {
            round.tick(&Requested(None));
        }
        assert_eq!(round.score(), 4 * 10 + 50);
        let cues = round.drain_cues();
        assert_eq!(cues.iter().filter(|c| **c == Cue::Chomp).count(), 4);
        assert!(cues.contains(&Cue::PowerPelletEaten));
        assert!(round.drain_cues().is_empty());
        assert_eq!(round.high_score(), round.score());
    }

    #[test]
    fn capture_chain_doubles_and_pauses() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        let now = round.now();
        let tile = round.pacman.tile();
        for idx in 0..2 {
            round.ghosts[idx].frighten(now, 6000);
            round.ghosts[idx].place(tile, Direction::West);
        }
        let before = snapshots(&round);
        round.resolve_collisions(now, tile, &before);
        assert_eq!(round.score(), 200 + 400);
        assert_eq!(round.points_display(), Some((tile, 400)));
        assert!(round.ghosts[0].is_harmless() && round.ghosts[1].is_harmless());
        assert_eq!(round.phase(), Phase::InGame);

        let pos = round.pacman.position();
        round.tick(&Requested(Some(Direction::East)));
        assert_eq!(round.pacman.position(), pos);
    }

    #[test]
    fn god_mode_ignores_roaming_ghosts() {
        let mut round = Round::new(
            small_maze(),
            RoundConfig {
                god_mode: true,
                ..RoundConfig::default()
            },
        );
        tick_until(&mut round, Phase::InGame, 400);
        let tile = round.pacman.tile();
        round.ghosts[0].place(tile, Direction::West);
        let before = snapshots(&round);
        round.resolve_collisions(round.now(), tile, &before);
        assert_eq!(round.phase(), Phase::InGame);
    }

    #[test]
    fn head_on_meeting_is_caught_whatever_the_parity() {
        // The player walks west along the top corridor while Blinky comes
        // east towards it. Depending on the gap the two either share a tile
        // or swap tiles within a single tick.
        for wait in 0..16 {
            let mut round = round(3);
            tick_until(&mut round, Phase::InGame, 400);
            while round.ghosts[0].state() != MotionState::Scatter {
                round.tick(&Requested(None));
            }
            for _ in 0..wait {
                round.tick(&Requested(None));
            }
            round.ghosts[0].place(TileCoord::new(2, 1), Direction::East);
            for _ in 0..40 {
                round.tick(&Requested(None));
                if round.phase() != Phase::InGame {
                    break;
                }
                let (pac, ghost) = (round.pacman.position().x, round.ghosts[0].position().x);
                assert!(pac >= ghost, "walked through Blinky after waiting {} ticks", wait);
            }
            assert_eq!(round.phase(), Phase::Dying, "no contact after waiting {} ticks", wait);
        }
    }

    #[test]
    fn swapping_tiles_with_a_frightened_ghost_captures_it() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        let now = round.now();
        let (west, east) = (round.pacman.tile(), TileCoord::new(7, 1));
        assert_eq!(west, TileCoord::new(6, 1));
        round.ghosts[1].frighten(now, 6000);
        round.ghosts[1].place(east, Direction::East);
        let mut before = snapshots(&round);
        before[1].tile = west;
        // The player came from the east tile, the ghost from the west one.
        round.resolve_collisions(now, east, &before);
        assert!(round.ghosts[1].is_harmless());
        assert_eq!(round.score(), 200);
        assert_eq!(round.phase(), Phase::InGame);
    }

    #[test]
    fn flank_reads_the_chaser_from_before_the_tick() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        let now = round.now();
        round.schedule.restart(now, [0; 7]);
        assert_eq!(round.mode(), GlobalMode::Chase);
        round.rules.ghost_speed = Speed::units_per_tick(1);
        // Blinky sits one unit short of the (9,7)/(10,7) boundary, Inky on
        // a centre where it must pick a direction this tick.
        round.ghosts[0].set_roaming(WorldPos::new(9 * 8 + 3, 7 * 8), Direction::East, MotionState::Chase);
        round.ghosts[2].set_roaming(TileCoord::new(3, 7).origin(), Direction::East, MotionState::Chase);
        assert_eq!(round.ghosts[0].tile(), TileCoord::new(9, 7));

        round.tick(&Requested(None));
        assert_eq!(round.ghosts[0].tile(), TileCoord::new(10, 7));
        assert_eq!(round.pacman.tile(), TileCoord::new(6, 1));
        assert_eq!(round.pacman.direction(), Direction::West);
        // Pivot (4,1) reflected through Blinky's old tile (9,7), not (10,7).
        assert_eq!(round.ghosts[2].last_target(), Some(TileCoord::new(-1, -5)));
    }

    #[test]
    fn death_costs_a_life_and_returns_to_ready() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        round.force_death();
        assert_eq!(round.phase(), Phase::Dying);
        tick_until(&mut round, Phase::Ready, 200);
        assert_eq!(round.lives(), 2);
        assert_eq!(round.pacman().tile(), round.maze().landmarks().pacman_spawn);
        // The second READY is the short one.
        let ticks = READY_MS.div_ceil(16) as usize;
        tick_until(&mut round, Phase::InGame, ticks);
    }

    #[test]
    fn skipping_a_level_restores_the_maze() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        for _ in 0..30 {
            round.tick(&Requested(None));
        }
        assert!(round.maze().pellets_eaten() > 0);
        round.drain_cues();
        round.skip_level();
        assert_eq!(round.level(), 2);
        assert_eq!(round.phase(), Phase::Ready);
        assert_eq!(round.maze().pellets_left(), round.maze().total_pellets());
        assert_eq!(round.drain_cues(), vec![Cue::RoundClear]);
    }

    #[test]
    fn extra_life_once() {
        let mut round = round(3);
        round.add_score(9_990);
        assert_eq!(round.lives(), 3);
        round.add_score(10);
        assert_eq!(round.lives(), 4);
        round.add_score(20_000);
        assert_eq!(round.lives(), 4);
        assert!(round.drain_cues().contains(&Cue::ExtraLife));
    }

    #[test]
    fn pause_freezes_everything() {
        let mut round = round(3);
        tick_until(&mut round, Phase::InGame, 400);
        round.toggle_pause();
        let (now, pos) = (round.now(), round.pacman().position());
        for _ in 0..50 {
            round.tick(&Requested(None));
        }
        assert_eq!(round.now(), now);
        assert_eq!(round.pacman().position(), pos);
        round.toggle_pause();
        round.tick(&Requested(None));
        assert!(round.now() > now);
    }

    #[test]
    fn restart_keeps_the_high_score() {
        let mut round = round(1);
        tick_until(&mut round, Phase::InGame, 400);
        for _ in 0..30 {
            round.tick(&Requested(None));
        }
        round.force_death();
        tick_until(&mut round, Phase::GameOver, 200);
        let best = round.high_score();
        assert!(best > 0);
        round.restart();
        assert_eq!((round.score(), round.lives(), round.level()), (0, 1, 1));
        assert_eq!(round.high_score(), best);
        assert_eq!(round.phase(), Phase::Ready);
    }
}
