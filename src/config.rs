use rand::Rng;

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 120;
const DEFAULT_LIVES: u32 = 3;

/// Knobs read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub lives: u32,
    /// Seed for frightened wandering; random when unset.
    pub seed: Option<u64>,
    pub god_mode: bool,
    /// Enables the level-skip and suicide hotkeys.
    pub debug_keys: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            lives: DEFAULT_LIVES,
            seed: None,
            god_mode: false,
            debug_keys: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Values that are missing, fail
    /// to parse or are zero fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };
        let flag = |key: &str| {
            lookup(key).map_or(false, |v| {
                matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
            })
        };
        let defaults = Self::default();
        Self {
            tick_ms: number("PACMAN_TICK_MS").unwrap_or(defaults.tick_ms),
            render_fps: number("PACMAN_FPS").unwrap_or(defaults.render_fps),
            lives: number("PACMAN_LIVES")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.lives),
            seed: lookup("PACMAN_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
            god_mode: flag("PACMAN_GOD_MODE"),
            debug_keys: flag("PACMAN_DEBUG"),
        }
    }

    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            lives: self.lives,
            god_mode: self.god_mode,
            seed: self.seed.unwrap_or_else(|| rand::thread_rng().gen()),
            tick_ms: self.tick_ms,
        }
    }
}

/// What a [`crate::round::Round`] needs to know about the game it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub lives: u32,
    /// Collisions with roaming ghosts are ignored.
    pub god_mode: bool,
    pub seed: u64,
    /// Play time that passes per tick, in milliseconds.
    pub tick_ms: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            god_mode: false,
            seed: 0,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}
