use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::fruit::FruitKind;
use crate::ghost::{Ghost, MotionState, Personality};
use crate::maze::{Consumable, Structure, TileCoord};
use crate::player::DYING_FRAMES;
use crate::round::{Phase, Round};

/// Terminal columns per maze tile.
const CELL_W: usize = 2;
/// Frightened ghosts start flashing with this much time left.
const FLASH_FROM_MS: u64 = 2_000;
const FLASH_PERIOD_MS: u64 = 250;
/// The mouth opens wider until the player bursts.
const DYING_GLYPHS: [&str; 4] = ["◕", "◑", "◔", "✷"];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Glyph {
    Player,
    Dying(usize),
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Pellet,
    Power,
    Door,
    Fruit(FruitKind),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Redraws only the cells that changed since the previous frame.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

pub fn render(stdout: &mut Stdout, round: &Round, renderer: &mut Renderer) -> io::Result<()> {
    let width = round.maze().width() as usize;
    let height = round.maze().height() as usize;
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(round);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..height {
        for x in 0..width {
            let cell = cell_for(round, TileCoord::new(x as i32, y as i32));
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }

    let banner = banner_for(round).unwrap_or_default().to_string();
    if renderer.needs_full || banner != renderer.last_banner {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + height as u16))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        let pad = (needed_w as usize).saturating_sub(banner.len()) / 2;
        stdout.queue(MoveTo(renderer.origin_x + pad as u16, renderer.origin_y + height as u16))?;
        stdout.queue(SetForegroundColor(Color::Yellow))?;
        stdout.queue(Print(&banner))?;
        stdout.queue(ResetColor)?;
        renderer.last_banner = banner;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn hud_line(round: &Round) -> String {
    let mut hud = format!(
        "Score: {}  High: {}  Lives: {}  Level: {}",
        round.score(),
        round.high_score(),
        round.lives(),
        round.level()
    );
    if let Some((_, points)) = round.points_display() {
        hud.push_str(&format!("  +{}", points));
    }
    hud
}

fn banner_for(round: &Round) -> Option<&'static str> {
    if round.is_paused() {
        return Some("PAUSED (Enter to resume)");
    }
    match round.phase() {
        Phase::Ready => Some("READY!"),
        Phase::GameOver => Some("GAME OVER (Enter to play again, q to quit)"),
        Phase::InGame | Phase::Dying => None,
    }
}

fn cell_for(round: &Round, tile: TileCoord) -> Cell {
    let pacman = round.pacman();
    if pacman.tile() == tile {
        if let Some(frame) = pacman.dying_frame() {
            return Cell {
                glyph: Glyph::Dying(dying_stage(frame)),
                color: Color::Yellow,
            };
        }
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    // Ghosts vanish while the player dies.
    if round.phase() != Phase::Dying {
        if let Some(ghost) = round.ghosts().iter().find(|g| g.tile() == tile) {
            return ghost_cell(ghost, round.now());
        }
    }
    let fruit = round.fruit();
    if fruit.is_visible() && fruit.tile() == tile {
        return Cell {
            glyph: Glyph::Fruit(fruit.kind()),
            color: Color::Red,
        };
    }
    let maze = round.maze();
    match (maze.structure_at(tile), maze.content_at(tile)) {
        (Structure::Wall, _) => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        (Structure::Door, _) => Cell {
            glyph: Glyph::Door,
            color: Color::Magenta,
        },
        (_, Some(Consumable::Pellet)) => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        (_, Some(Consumable::PowerPellet)) => Cell {
            glyph: Glyph::Power,
            color: Color::White,
        },
        (_, None) => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
    }
}

fn dying_stage(frame: u32) -> usize {
    let stage = frame as usize * DYING_GLYPHS.len() / DYING_FRAMES as usize;
    stage.min(DYING_GLYPHS.len() - 1)
}

fn fruit_text(kind: FruitKind) -> &'static str {
    match kind {
        FruitKind::Cherry => "🍒",
        FruitKind::Strawberry => "🍓",
        FruitKind::Peach => "🍑",
        FruitKind::Apple => "🍎",
        FruitKind::Grapes => "🍇",
        FruitKind::Galaxian => "🚀",
        FruitKind::Bell => "🔔",
        FruitKind::Key => "🔑",
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Player => "ᗧ",
        Glyph::Dying(stage) => DYING_GLYPHS[stage.min(DYING_GLYPHS.len() - 1)],
        Glyph::Ghost => "ᗣ",
        Glyph::Frightened => "ᗣ",
        Glyph::Eyes => "ⵔⵔ",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Pellet => "· ",
        Glyph::Power => "● ",
        Glyph::Door => "══",
        Glyph::Fruit(kind) => fruit_text(kind),
    }
}

fn ghost_cell(ghost: &Ghost, now: u64) -> Cell {
    match ghost.state() {
        MotionState::Eyes | MotionState::EyesEnteringBox => Cell {
            glyph: Glyph::Eyes,
            color: Color::White,
        },
        MotionState::Frightened => {
            let left = ghost.frightened_remaining(now).unwrap_or(0);
            let flash = left < FLASH_FROM_MS && (left / FLASH_PERIOD_MS) % 2 == 0;
            Cell {
                glyph: Glyph::Frightened,
                color: if flash { Color::White } else { Color::Blue },
            }
        }
        _ => Cell {
            glyph: Glyph::Ghost,
            color: match ghost.personality() {
                Personality::DirectChase => Color::Red,
                Personality::Ambush => Color::Magenta,
                Personality::Flank => Color::Cyan,
                Personality::PatrolRandom => Color::DarkYellow,
            },
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = glyph_text(cell.glyph);
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
