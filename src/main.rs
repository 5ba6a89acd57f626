use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{info, trace};

use maze_chase::input::{direction_for, HeldKeys};
use maze_chase::render::{render, Renderer};
use maze_chase::schedule::TickPacer;
use maze_chase::{GameError, Phase, Round, Settings};

const INPUT_HOLD_MS: u64 = 160;

fn main() -> Result<(), GameError> {
    env_logger::init();
    let settings = Settings::from_env();
    info!("starting with {:?}", settings);
    let mut round = Round::classic(settings.round_config())?;

    let result = {
        let mut term = Terminal::enter(io::stdout())?;
        run(&mut term.out, &mut round, &settings)
    };
    info!("score {}, high score {}", round.score(), round.high_score());
    Ok(result?)
}

/// Raw mode on the alternate screen, undone on drop whatever happened.
struct Terminal<W: Write> {
    out: W,
    raw: bool,
}

impl<W: Write> Terminal<W> {
    fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut term = Terminal { out, raw: true };
        term.setup()?;
        Ok(term)
    }

    fn setup(&mut self) -> io::Result<()> {
        self.out.execute(EnterAlternateScreen)?;
        self.out.execute(Hide)?;
        Ok(())
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = self.out.execute(Show);
        let _ = self.out.execute(LeaveAlternateScreen);
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

fn run(stdout: &mut Stdout, round: &mut Round, settings: &Settings) -> io::Result<()> {
    let maze = round.maze();
    let mut renderer = Renderer::new(maze.width() as usize, maze.height() as usize);
    let mut keys = HeldKeys::new(Duration::from_millis(INPUT_HOLD_MS));
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut pacer = TickPacer::new(Duration::from_millis(settings.tick_ms), Instant::now());

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter if round.phase() == Phase::GameOver => round.restart(),
                KeyCode::Enter => round.toggle_pause(),
                KeyCode::Char('n') if settings.debug_keys => round.skip_level(),
                KeyCode::Char('x') if settings.debug_keys => round.force_death(),
                code => {
                    if let Some(dir) = direction_for(code) {
                        keys.press(dir, Instant::now());
                    }
                }
            }
        }

        let now = Instant::now();
        for _ in 0..pacer.due(now) {
            round.tick(&keys.requested(now));
        }
        // No sound output in the terminal; cues only go to the log.
        for cue in round.drain_cues() {
            trace!("cue {:?}", cue);
        }
        render(stdout, round, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
