use log::debug;

use crate::maze::TileCoord;

/// Pellets eaten at which the bonus shows up.
const SPAWN_AFTER: [usize; 2] = [70, 170];
const LIFETIME_MS: u64 = 9_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitKind {
    Cherry,
    Strawberry,
    Peach,
    Bell,
    Apple,
    Grapes,
    Galaxian,
    Key,
}

impl FruitKind {
    pub fn points(self) -> u32 {
        match self {
            FruitKind::Cherry => 100,
            FruitKind::Strawberry => 300,
            FruitKind::Peach => 500,
            FruitKind::Apple => 700,
            FruitKind::Grapes => 1000,
            FruitKind::Galaxian => 2000,
            FruitKind::Bell => 3000,
            FruitKind::Key => 5000,
        }
    }
}

/// The bonus item that appears below the ghost house twice per level.
#[derive(Debug, Clone)]
pub struct BonusFruit {
    kind: FruitKind,
    tile: TileCoord,
    shown_until: Option<u64>,
    spawned: usize,
}

impl BonusFruit {
    pub fn new(kind: FruitKind, tile: TileCoord) -> Self {
        Self {
            kind,
            tile,
            shown_until: None,
            spawned: 0,
        }
    }

    /// Fresh level: nothing shown, both appearances available again.
    pub fn reset(&mut self, kind: FruitKind) {
        self.kind = kind;
        self.shown_until = None;
        self.spawned = 0;
    }

    /// Hides the fruit without giving back its appearance (life lost).
    pub fn hide(&mut self) {
        self.shown_until = None;
    }

    pub fn kind(&self) -> FruitKind {
        self.kind
    }

    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    pub fn is_visible(&self) -> bool {
        self.shown_until.is_some()
    }

    pub fn on_pellets_eaten(&mut self, eaten: usize, now: u64) -> bool {
        let Some(&threshold) = SPAWN_AFTER.get(self.spawned) else {
            return false;
        };
        if eaten < threshold {
            return false;
        }
        self.spawned += 1;
        self.shown_until = Some(now + LIFETIME_MS);
        debug!("{:?} appears at {:?}", self.kind, self.tile);
        true
    }

    pub fn update(&mut self, now: u64) {
        if let Some(until) = self.shown_until {
            if now >= until {
                self.shown_until = None;
            }
        }
    }

    /// Points for eating the fruit if it is showing on `tile`.
    pub fn try_collect(&mut self, tile: TileCoord) -> Option<u32> {
        if !self.is_visible() || tile != self.tile {
            return None;
        }
        self.shown_until = None;
        Some(self.kind.points())
    }
}
