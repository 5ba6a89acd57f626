//! Pursuer behaviour: the per-ghost motion state machine, the four
//! targeting personalities and the direction choice made at every
//! decision point.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actor::{Motion, Speed};
use crate::direction::Direction;
use crate::level::LevelRules;
use crate::maze::{Maze, Passage, Structure, TileCoord, WorldPos};
use crate::schedule::GlobalMode;

/// Tiles ahead of the player the ambusher aims for.
const AMBUSH_LEAD: i32 = 4;
/// Tiles ahead of the player the flanker reflects its partner through.
const FLANK_PIVOT_LEAD: i32 = 2;
/// The patrol ghost only chases while at least 8 tiles away.
const PATROL_CHASE_DISTANCE_SQ: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    DirectChase,
    Ambush,
    Flank,
    PatrolRandom,
}

impl Personality {
    /// Roster order; also the index into [`GhostContext::ghosts`].
    pub const ROSTER: [Personality; 4] = [
        Personality::DirectChase,
        Personality::Ambush,
        Personality::Flank,
        Personality::PatrolRandom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Personality::DirectChase => "Blinky",
            Personality::Ambush => "Pinky",
            Personality::Flank => "Inky",
            Personality::PatrolRandom => "Clyde",
        }
    }

    pub fn release_delay_ms(self) -> u64 {
        match self {
            Personality::DirectChase => 0,
            Personality::Ambush => 1000,
            Personality::Flank => 4000,
            Personality::PatrolRandom => 8000,
        }
    }

    /// Scatter corner, just outside the maze like the arcade's.
    pub fn home_corner(self, maze: &Maze) -> TileCoord {
        let (w, h) = (maze.width(), maze.height());
        match self {
            Personality::DirectChase => TileCoord::new(w - 3, -3),
            Personality::Ambush => TileCoord::new(2, -3),
            Personality::Flank => TileCoord::new(w - 1, h),
            Personality::PatrolRandom => TileCoord::new(0, h),
        }
    }

    fn spawn(self, maze: &Maze) -> (TileCoord, Direction) {
        let marks = maze.landmarks();
        match self {
            Personality::DirectChase => (marks.house_entrance, Direction::West),
            Personality::Ambush => (marks.house_center, Direction::South),
            Personality::Flank => (marks.house_left, Direction::North),
            Personality::PatrolRandom => (marks.house_right, Direction::North),
        }
    }

    /// Where this personality heads while chasing.
    pub fn chase_target(
        self,
        own: TileCoord,
        home: TileCoord,
        pacman: ActorSnapshot,
        ghosts: &[ActorSnapshot; 4],
    ) -> TileCoord {
        match self {
            Personality::DirectChase => pacman.tile,
            Personality::Ambush => pacman.tile.offset(pacman.direction, AMBUSH_LEAD),
            Personality::Flank => {
                let pivot = pacman.tile.offset(pacman.direction, FLANK_PIVOT_LEAD);
                let partner = ghosts[Personality::DirectChase.index()].tile;
                TileCoord::new(2 * pivot.col - partner.col, 2 * pivot.row - partner.row)
            }
            Personality::PatrolRandom => {
                if own.distance_sq(pacman.tile) >= PATROL_CHASE_DISTANCE_SQ {
                    pacman.tile
                } else {
                    home
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    InBox,
    LeavingBox,
    Scatter,
    Chase,
    Frightened,
    /// Captured, heading back to the house entrance.
    Eyes,
    EyesEnteringBox,
}

impl From<GlobalMode> for MotionState {
    fn from(mode: GlobalMode) -> Self {
        match mode {
            GlobalMode::Scatter => MotionState::Scatter,
            GlobalMode::Chase => MotionState::Chase,
        }
    }
}

/// Where an actor stood when the tick began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSnapshot {
    pub tile: TileCoord,
    pub direction: Direction,
}

/// Read-only world state handed to each ghost for one tick.
///
/// The snapshots are taken before any ghost moves, so a ghost reading
/// another never sees a half-updated position.
#[derive(Debug, Clone)]
pub struct GhostContext<'a> {
    pub now: u64,
    pub mode: GlobalMode,
    pub rules: &'a LevelRules,
    pub pacman: ActorSnapshot,
    pub ghosts: [ActorSnapshot; 4],
}

#[derive(Debug, Clone)]
pub struct Ghost {
    personality: Personality,
    motion: Motion,
    state: MotionState,
    spawn: WorldPos,
    spawn_dir: Direction,
    home: TileCoord,
    release_at: u64,
    released: bool,
    frightened_until: u64,
    reverse_pending: bool,
    last_target: Option<TileCoord>,
}

impl Ghost {
    pub fn new(personality: Personality, maze: &Maze) -> Self {
        let (tile, dir) = personality.spawn(maze);
        let spawn = tile.origin();
        Self {
            personality,
            motion: Motion::new(spawn, dir),
            state: MotionState::InBox,
            spawn,
            spawn_dir: dir,
            home: personality.home_corner(maze),
            release_at: personality.release_delay_ms(),
            released: false,
            frightened_until: 0,
            reverse_pending: false,
            last_target: None,
        }
    }

    /// Back to the house, release timer counting from `now`.
    pub fn reset(&mut self, now: u64) {
        self.motion.place(self.spawn, self.spawn_dir);
        self.state = MotionState::InBox;
        self.release_at = now + self.personality.release_delay_ms();
        self.released = false;
        self.frightened_until = 0;
        self.reverse_pending = false;
        self.last_target = None;
    }

    /// Centres the ghost on `tile` facing `dir`, keeping its state.
    pub fn place(&mut self, tile: TileCoord, dir: Direction) {
        self.motion.place(tile.origin(), dir);
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn state(&self) -> MotionState {
        self.state
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

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            tile: self.tile(),
            direction: self.direction(),
        }
    }

    /// Time left before a frightened ghost recovers.
    pub fn frightened_remaining(&self, now: u64) -> Option<u64> {
        (self.state == MotionState::Frightened).then(|| self.frightened_until.saturating_sub(now))
    }

    /// Eyes cannot hurt the player nor be eaten again.
    pub fn is_harmless(&self) -> bool {
        matches!(self.state, MotionState::Eyes | MotionState::EyesEnteringBox)
    }

    /// Power pellet eaten: turn around on the spot and flee for `duration_ms`.
    pub fn frighten(&mut self, now: u64, duration_ms: u64) {
        if self.is_harmless() {
            return;
        }
        self.motion.reverse();
        self.reverse_pending = false;
        if duration_ms == 0 {
            return;
        }
        self.state = MotionState::Frightened;
        self.frightened_until = now + duration_ms;
    }

    /// Eaten by the player.
    pub fn capture(&mut self) {
        self.state = MotionState::Eyes;
        self.frightened_until = 0;
        self.motion.reverse();
        debug!("{} captured at {:?}", self.personality.name(), self.tile());
    }

    /// The global scatter/chase mode flipped; roaming ghosts turn back at
    /// their next decision point.
    pub fn on_mode_switch(&mut self) {
        if matches!(self.state, MotionState::Scatter | MotionState::Chase) {
            self.reverse_pending = true;
        }
    }

    /// Tile this ghost steers towards, or `None` when it is not steering
    /// by target (fleeing at random, or scripted inside the house).
    pub fn target_tile(&self, maze: &Maze, ctx: &GhostContext<'_>) -> Option<TileCoord> {
        match self.state {
            MotionState::Scatter => Some(self.home),
            MotionState::Chase => Some(self.personality.chase_target(
                self.tile(),
                self.home,
                ctx.pacman,
                &ctx.ghosts,
            )),
            MotionState::Eyes | MotionState::EyesEnteringBox => {
                Some(maze.landmarks().house_entrance)
            }
            MotionState::Frightened | MotionState::InBox | MotionState::LeavingBox => None,
        }
    }

    /// Target steered towards at the most recent targeted decision.
    pub fn last_target(&self) -> Option<TileCoord> {
        self.last_target
    }

    pub fn update(&mut self, maze: &Maze, ctx: &GhostContext<'_>, rng: &mut impl Rng) {
        self.update_timers(maze, ctx);
        let mut units = self.motion.budget(self.speed(maze, ctx.rules));
        while units > 0 {
            if self.motion.at_decision_point() {
                self.decide(maze, ctx, rng);
            }
            let adv = self.motion.advance(maze, units, self.passage(maze));
            units -= adv.moved;
            if adv.blocked {
                break;
            }
        }
    }

    fn update_timers(&mut self, maze: &Maze, ctx: &GhostContext<'_>) {
        if !self.released && ctx.now >= self.release_at {
            self.released = true;
        }
        match self.state {
            MotionState::InBox if self.released => {
                debug!("{} released", self.personality.name());
                self.state = MotionState::LeavingBox;
            }
            MotionState::Frightened if ctx.now >= self.frightened_until => {
                self.state = self.recovered_state(maze, ctx.mode);
                trace!("{} recovers into {:?}", self.personality.name(), self.state);
            }
            MotionState::Scatter | MotionState::Chase => self.state = ctx.mode.into(),
            _ => {}
        }
    }

    fn recovered_state(&self, maze: &Maze, mode: GlobalMode) -> MotionState {
        if !self.in_house(maze) {
            mode.into()
        } else if self.released {
            MotionState::LeavingBox
        } else {
            MotionState::InBox
        }
    }

    fn in_house(&self, maze: &Maze) -> bool {
        let tile = self.tile();
        maze.is_in_house(tile) || maze.structure_at(tile) == Structure::Door
    }

    fn passage(&self, maze: &Maze) -> Passage {
        match self.state {
            MotionState::LeavingBox | MotionState::EyesEnteringBox => Passage::GhostThroughDoor,
            MotionState::Frightened if self.released && self.in_house(maze) => {
                Passage::GhostThroughDoor
            }
            _ => Passage::Ghost,
        }
    }

    fn speed(&self, maze: &Maze, rules: &LevelRules) -> Speed {
        match self.state {
            MotionState::Eyes | MotionState::EyesEnteringBox => rules.eyes_speed,
            MotionState::InBox | MotionState::LeavingBox => rules.ghost_frightened_speed,
            _ if maze.structure_at(self.tile()) == Structure::Tunnel => rules.ghost_tunnel_speed,
            MotionState::Frightened => rules.ghost_frightened_speed,
            MotionState::Scatter | MotionState::Chase => rules.ghost_speed,
        }
    }

    fn decide(&mut self, maze: &Maze, ctx: &GhostContext<'_>, rng: &mut impl Rng) {
        let tile = self.tile();
        let heading = self.direction();
        match self.state {
            MotionState::InBox => self.bob(maze),
            MotionState::LeavingBox => self.leave_house(maze, ctx.mode),
            MotionState::Frightened if self.in_house(maze) => {
                if self.released {
                    self.leave_house(maze, ctx.mode);
                } else {
                    self.bob(maze);
                }
            }
            MotionState::Frightened => {
                let dir = random_direction(maze, tile, heading, Passage::Ghost, rng);
                self.motion.turn(dir);
            }
            MotionState::Scatter | MotionState::Chase if self.reverse_pending => {
                self.reverse_pending = false;
                self.motion.turn(heading.reverse());
            }
            MotionState::Eyes if tile == maze.landmarks().house_entrance => {
                self.state = MotionState::EyesEnteringBox;
                self.enter_house(maze, ctx.mode);
            }
            MotionState::EyesEnteringBox => self.enter_house(maze, ctx.mode),
            MotionState::Scatter | MotionState::Chase | MotionState::Eyes => {
                if let Some(target) = self.target_tile(maze, ctx) {
                    let dir = choose_direction(maze, tile, heading, target, Passage::Ghost);
                    trace!("{} at {:?} heads {} for {:?}", self.personality.name(), tile, dir, target);
                    self.last_target = Some(target);
                    self.motion.turn(dir);
                }
            }
        }
    }

    /// Paces up and down while waiting for release.
    fn bob(&mut self, maze: &Maze) {
        let mut dir = self.direction();
        if dir.is_horizontal() {
            dir = Direction::North;
        }
        let pos = self.position();
        if !maze.can_move(pos, dir, Passage::Ghost) && maze.can_move(pos, dir.reverse(), Passage::Ghost) {
            dir = dir.reverse();
        }
        self.motion.turn(dir);
    }

    /// Lines up under the door, then walks out through it.
    fn leave_house(&mut self, maze: &Maze, mode: GlobalMode) {
        let tile = self.tile();
        let entrance = maze.landmarks().house_entrance;
        if tile == entrance {
            if self.state == MotionState::LeavingBox {
                self.state = mode.into();
                debug!("{} is out, {:?}", self.personality.name(), self.state);
            }
            let pos = self.position();
            let dir = if maze.can_move(pos, Direction::West, Passage::Ghost) {
                Direction::West
            } else {
                Direction::East
            };
            self.motion.turn(dir);
            return;
        }
        let dir = if tile.col < entrance.col {
            Direction::East
        } else if tile.col > entrance.col {
            Direction::West
        } else {
            Direction::North
        };
        self.motion.turn(dir);
    }

    /// Drops through the door to the house centre, then revives.
    fn enter_house(&mut self, maze: &Maze, mode: GlobalMode) {
        let tile = self.tile();
        let centre = maze.landmarks().house_center;
        if tile == centre {
            debug!("{} revived", self.personality.name());
            self.state = MotionState::LeavingBox;
            self.released = true;
            self.leave_house(maze, mode);
            return;
        }
        let dir = if tile.row < centre.row {
            Direction::South
        } else if tile.col < centre.col {
            Direction::East
        } else {
            Direction::West
        };
        self.motion.turn(dir);
    }
}

fn open_directions(maze: &Maze, tile: TileCoord, heading: Direction, passage: Passage) -> Vec<Direction> {
    let from = tile.origin();
    Direction::PRIORITY
        .into_iter()
        .filter(|dir| *dir != heading.reverse() && maze.can_move(from, *dir, passage))
        .collect()
}

/// Picks the move from `tile` that lands closest to `target`.
///
/// Turning back is excluded unless nothing else is open. Equal distances
/// go to the earlier entry of [`Direction::PRIORITY`].
pub fn choose_direction(
    maze: &Maze,
    tile: TileCoord,
    heading: Direction,
    target: TileCoord,
    passage: Passage,
) -> Direction {
    let mut best: Option<(i32, Direction)> = None;
    for dir in open_directions(maze, tile, heading, passage) {
        let dist = tile.neighbor(dir).distance_sq(target);
        if best.map_or(true, |(best_dist, _)| dist < best_dist) {
            best = Some((dist, dir));
        }
    }
    best.map_or(heading.reverse(), |(_, dir)| dir)
}

/// A random open move from `tile` that does not turn back, if there is one.
pub fn random_direction(
    maze: &Maze,
    tile: TileCoord,
    heading: Direction,
    passage: Passage,
    rng: &mut impl Rng,
) -> Direction {
    open_directions(maze, tile, heading, passage)
        .choose(rng)
        .copied()
        .unwrap_or(heading.reverse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::rules_for;
    use crate::testing::small_maze;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snap(col: i32, row: i32, direction: Direction) -> ActorSnapshot {
        ActorSnapshot {
            tile: TileCoord::new(col, row),
            direction,
        }
    }

    fn context(rules: &LevelRules, now: u64, mode: GlobalMode, pacman: ActorSnapshot) -> GhostContext<'_> {
        GhostContext {
            now,
            mode,
            rules,
            pacman,
            ghosts: [snap(6, 3, Direction::West); 4],
        }
    }

    impl Ghost {
        /// Drops a released ghost anywhere, mid-tile included, in `state`.
        pub(crate) fn set_roaming(&mut self, pos: WorldPos, dir: Direction, state: MotionState) {
            self.motion.place(pos, dir);
            self.state = state;
            self.released = true;
        }
    }

    fn out_roaming(personality: Personality, maze: &Maze, at: TileCoord, dir: Direction, state: MotionState) -> Ghost {
        let mut ghost = Ghost::new(personality, maze);
        ghost.set_roaming(at.origin(), dir, state);
        ghost
    }

    #[test]
    fn heads_straight_for_a_target_below() {
        let maze = small_maze();
        // (3,3): wall north, open south, east and west.
        let dir = choose_direction(&maze, TileCoord::new(3, 3), Direction::South, TileCoord::new(3, 5), Passage::Ghost);
        assert_eq!(dir, Direction::South);
    }

    #[test]
    fn ties_prefer_west_over_east() {
        let maze = small_maze();
        // From the entrance both sideways moves are equally far from a target
        // straight below, and the door is shut.
        let entrance = maze.landmarks().house_entrance;
        let dir = choose_direction(&maze, entrance, Direction::North, TileCoord::new(6, 10), Passage::Ghost);
        assert_eq!(dir, Direction::West);
    }

    #[test]
    fn turns_back_only_when_boxed_in() {
        let maze = small_maze();
        // The left bay of the house is closed on every side but east.
        let bay = maze.landmarks().house_left;
        let dir = choose_direction(&maze, bay, Direction::West, TileCoord::new(0, 0), Passage::Ghost);
        assert_eq!(dir, Direction::East);
        // In the corner the only way on is east, even with the target behind.
        let dir = choose_direction(&maze, TileCoord::new(1, 1), Direction::North, TileCoord::new(1, 8), Passage::Ghost);
        assert_eq!(dir, Direction::East);
    }

    #[test]
    fn random_choice_never_turns_back() {
        let maze = small_maze();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let dir = random_direction(&maze, TileCoord::new(3, 3), Direction::East, Passage::Ghost, &mut rng);
            assert!(matches!(dir, Direction::East | Direction::South));
        }
    }

    #[test]
    fn personality_targets() {
        let pac = snap(10, 10, Direction::East);
        let mut ghosts = [snap(0, 0, Direction::West); 4];
        ghosts[Personality::DirectChase.index()] = snap(8, 12, Direction::North);
        let home = TileCoord::new(0, 31);

        let own = TileCoord::new(1, 1);
        assert_eq!(Personality::DirectChase.chase_target(own, home, pac, &ghosts), TileCoord::new(10, 10));
        assert_eq!(Personality::Ambush.chase_target(own, home, pac, &ghosts), TileCoord::new(14, 10));
        assert_eq!(Personality::Flank.chase_target(own, home, pac, &ghosts), TileCoord::new(16, 8));
        assert_eq!(Personality::PatrolRandom.chase_target(own, home, pac, &ghosts), TileCoord::new(10, 10));
        let close = TileCoord::new(12, 12);
        assert_eq!(Personality::PatrolRandom.chase_target(close, home, pac, &ghosts), home);
    }

    #[test]
    fn state_overrides_personality_target() {
        let maze = small_maze();
        let rules = rules_for(1);
        let ctx = context(&rules, 0, GlobalMode::Chase, snap(3, 7, Direction::East));
        let mut ghost = out_roaming(Personality::Ambush, &maze, TileCoord::new(3, 3), Direction::East, MotionState::Scatter);
        assert_eq!(ghost.target_tile(&maze, &ctx), Some(Personality::Ambush.home_corner(&maze)));
        ghost.state = MotionState::Chase;
        assert_eq!(ghost.target_tile(&maze, &ctx), Some(TileCoord::new(7, 7)));
        ghost.state = MotionState::Frightened;
        assert_eq!(ghost.target_tile(&maze, &ctx), None);
        ghost.state = MotionState::Eyes;
        assert_eq!(ghost.target_tile(&maze, &ctx), Some(maze.landmarks().house_entrance));
    }

    #[test]
    fn frighten_reverses_immediately_but_not_eyes() {
        let maze = small_maze();
        let mut ghost = out_roaming(Personality::DirectChase, &maze, TileCoord::new(3, 3), Direction::East, MotionState::Chase);
        // Three units into the tile: reversal does not wait for the centre.
        ghost.motion.place(WorldPos::new(3 * 8 + 3, 3 * 8), Direction::East);
        ghost.frighten(100, 6000);
        assert_eq!(ghost.state(), MotionState::Frightened);
        assert_eq!(ghost.direction(), Direction::West);
        assert_eq!(ghost.frightened_remaining(1100), Some(5000));

        let mut eyes = out_roaming(Personality::Flank, &maze, TileCoord::new(3, 3), Direction::East, MotionState::Eyes);
        eyes.frighten(100, 6000);
        assert_eq!(eyes.state(), MotionState::Eyes);
        assert_eq!(eyes.direction(), Direction::East);
    }

    #[test]
    fn recovers_into_the_current_global_mode() {
        let maze = small_maze();
        let rules = rules_for(1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ghost = out_roaming(Personality::DirectChase, &maze, TileCoord::new(3, 3), Direction::East, MotionState::Scatter);
        ghost.frighten(0, 1000);
        let ctx = context(&rules, 999, GlobalMode::Chase, snap(6, 1, Direction::West));
        ghost.update(&maze, &ctx, &mut rng);
        assert_eq!(ghost.state(), MotionState::Frightened);
        let ctx = context(&rules, 1000, GlobalMode::Chase, snap(6, 1, Direction::West));
        ghost.update(&maze, &ctx, &mut rng);
        assert_eq!(ghost.state(), MotionState::Chase);
    }

    #[test]
    fn released_ghost_walks_out_of_the_house() {
        let maze = small_maze();
        let rules = rules_for(1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ghost = Ghost::new(Personality::Flank, &maze);
        let mut now = 0;
        while now < Personality::Flank.release_delay_ms() {
            let ctx = context(&rules, now, GlobalMode::Scatter, snap(6, 1, Direction::West));
            ghost.update(&maze, &ctx, &mut rng);
            assert_eq!(ghost.state(), MotionState::InBox);
            assert_eq!(ghost.tile(), maze.landmarks().house_left);
            now += 16;
        }
        for _ in 0..200 {
            let ctx = context(&rules, now, GlobalMode::Scatter, snap(6, 1, Direction::West));
            ghost.update(&maze, &ctx, &mut rng);
            now += 16;
            if ghost.state() == MotionState::Scatter {
                break;
            }
            assert_eq!(ghost.state(), MotionState::LeavingBox);
        }
        assert_eq!(ghost.state(), MotionState::Scatter);
        assert!(!maze.is_in_house(ghost.tile()));
    }

    #[test]
    fn eyes_return_home_and_come_back_out() {
        let maze = small_maze();
        let rules = rules_for(1);
        let mut rng = StdRng::seed_from_u64(3);
        let mut ghost = out_roaming(Personality::PatrolRandom, &maze, TileCoord::new(1, 7), Direction::West, MotionState::Frightened);
        ghost.frightened_until = 10_000;
        ghost.capture();
        assert_eq!(ghost.state(), MotionState::Eyes);
        assert_eq!(ghost.direction(), Direction::East);

        let mut seen = Vec::new();
        let mut now = 0;
        for _ in 0..400 {
            let ctx = context(&rules, now, GlobalMode::Chase, snap(6, 1, Direction::West));
            ghost.update(&maze, &ctx, &mut rng);
            now += 16;
            if seen.last() != Some(&ghost.state()) {
                seen.push(ghost.state());
            }
            if ghost.state() == MotionState::Chase {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                MotionState::Eyes,
                MotionState::EyesEnteringBox,
                MotionState::LeavingBox,
                MotionState::Chase
            ]
        );
    }

    #[test]
    fn mode_switch_reverses_at_the_next_decision_point() {
        let maze = small_maze();
        let rules = rules_for(1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ghost = out_roaming(Personality::DirectChase, &maze, TileCoord::new(9, 7), Direction::West, MotionState::Scatter);
        ghost.motion.place(WorldPos::new(9 * 8 - 3, 7 * 8), Direction::West);
        ghost.on_mode_switch();
        assert_eq!(ghost.direction(), Direction::West);
        let mut now = 0;
        while !ghost.motion.at_decision_point() {
            let ctx = context(&rules, now, GlobalMode::Chase, snap(6, 1, Direction::West));
            ghost.update(&maze, &ctx, &mut rng);
            now += 16;
            assert_eq!(ghost.direction(), Direction::West);
        }
        let ctx = context(&rules, now, GlobalMode::Chase, snap(6, 1, Direction::West));
        ghost.update(&maze, &ctx, &mut rng);
        ghost.update(&maze, &ctx, &mut rng);
        assert_eq!(ghost.direction(), Direction::East);
    }

    proptest! {
        #[test]
        fn turns_only_at_decision_points(
            seed in any::<u64>(),
            pac_cols in prop::collection::vec(1i32..12, 300),
            switches in prop::collection::vec(any::<bool>(), 300),
        ) {
            let maze = small_maze();
            let rules = rules_for(1);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ghosts: Vec<Ghost> = Personality::ROSTER.iter().map(|p| Ghost::new(*p, &maze)).collect();
            let mut mode = GlobalMode::Scatter;
            for (tick, (col, switch)) in pac_cols.iter().zip(&switches).enumerate() {
                if *switch && tick % 50 == 0 {
                    mode = if mode == GlobalMode::Scatter { GlobalMode::Chase } else { GlobalMode::Scatter };
                    for g in &mut ghosts {
                        g.on_mode_switch();
                    }
                }
                let snaps = [ghosts[0].snapshot(), ghosts[1].snapshot(), ghosts[2].snapshot(), ghosts[3].snapshot()];
                let ctx = GhostContext {
                    now: tick as u64 * 16,
                    mode,
                    rules: &rules,
                    pacman: snap(*col, 7, Direction::East),
                    ghosts: snaps,
                };
                for g in &mut ghosts {
                    let before = (g.position(), g.direction());
                    g.update(&maze, &ctx, &mut rng);
                    if g.direction() != before.1 {
                        prop_assert!(before.0.is_centered());
                    }
                    prop_assert_ne!(maze.structure_at(g.tile()), Structure::Wall);
                }
            }
        }
    }
}
