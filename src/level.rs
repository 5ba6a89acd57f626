use crate::actor::Speed;
use crate::fruit::FruitKind;

/// The arcade board, 28 x 31 tiles. See [`crate::maze::Maze::parse`] for glyphs.
pub const CLASSIC_LAYOUT: &[&str] = &[
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##    E     ##.######",
    "######.## ###--### ##.######",
    "######.## #      # ##.######",
    "TTTTTT.   #L H R #   .TTTTTT",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##    F     ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Frightened time in seconds for levels 1..=18; later levels get none.
const FRIGHTENED_SECS: [u64; 18] = [6, 5, 4, 3, 2, 5, 2, 2, 1, 5, 2, 1, 1, 3, 1, 1, 0, 1];

const FRUIT_ORDER: [FruitKind; 13] = [
    FruitKind::Cherry,
    FruitKind::Strawberry,
    FruitKind::Peach,
    FruitKind::Peach,
    FruitKind::Apple,
    FruitKind::Apple,
    FruitKind::Grapes,
    FruitKind::Grapes,
    FruitKind::Galaxian,
    FruitKind::Galaxian,
    FruitKind::Bell,
    FruitKind::Bell,
    FruitKind::Key,
];

/// Difficulty knobs for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRules {
    pub pacman_speed: Speed,
    pub pacman_frightened_speed: Speed,
    pub ghost_speed: Speed,
    pub ghost_tunnel_speed: Speed,
    pub ghost_frightened_speed: Speed,
    pub eyes_speed: Speed,
    pub frightened_ms: u64,
    /// Scatter, chase, scatter, ... in milliseconds of play time. Chase
    /// continues indefinitely once the list runs out.
    pub schedule: [u64; 7],
    pub fruit: FruitKind,
}

pub fn rules_for(level: u32) -> LevelRules {
    let level = level.max(1);
    let (pac, pac_fright, ghost, tunnel, fright) = match level {
        1 => (80, 90, 75, 40, 50),
        2..=4 => (90, 95, 85, 45, 55),
        5..=20 => (100, 100, 95, 50, 60),
        _ => (90, 90, 95, 50, 60),
    };
    let schedule = match level {
        1 => [7000, 20000, 7000, 20000, 5000, 20000, 5000],
        2..=4 => [7000, 20000, 7000, 20000, 5000, 1_033_000, 17],
        _ => [5000, 20000, 5000, 20000, 5000, 1_037_000, 17],
    };
    let idx = (level - 1) as usize;
    LevelRules {
        pacman_speed: Speed::percent(pac),
        pacman_frightened_speed: Speed::percent(pac_fright),
        ghost_speed: Speed::percent(ghost),
        ghost_tunnel_speed: Speed::percent(tunnel),
        ghost_frightened_speed: Speed::percent(fright),
        eyes_speed: Speed::percent(160),
        frightened_ms: FRIGHTENED_SECS.get(idx).copied().unwrap_or(0) * 1000,
        schedule,
        fruit: FRUIT_ORDER[idx.min(FRUIT_ORDER.len() - 1)],
    }
}
