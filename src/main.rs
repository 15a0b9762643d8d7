//! Blockfall terminal runner.
//!
//! Reads settings, opens the persistent store, then runs the frame loop:
//! feed the frame timestamp to the engine, render, and apply key presses
//! until the player quits.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use blockfall::config;
use blockfall::core::{shared, GameState, SharedStore};
use blockfall::input::{map_key, KeyCommand};
use blockfall::persist::{default_data_dir, JsonFileStore};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

const FRAME_MS: u64 = 16;
const LOG_FILE_NAME: &str = "blockfall.log";

type Game = GameState<SharedStore<JsonFileStore>>;

/// Falling-block puzzle game for the terminal
#[derive(Parser)]
#[command(name = "blockfall", version, about, long_about = None)]
struct Cli {
    /// Seed for the piece sequence (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Settings file (defaults to <config dir>/blockfall/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where stats, history and the log are kept
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Restore terminal state - called on panic
fn restore_terminal() {
    use crossterm::{
        cursor, execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Log to a file; stdout belongs to the game.
fn init_logging(data_dir: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    let log_file =
        fs::create_dir_all(data_dir).and_then(|_| File::create(data_dir.join(LOG_FILE_NAME)));
    match log_file {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(io::sink).init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load_settings(cli.config.as_deref())?;
    let data_dir = cli
        .data_dir
        .or_else(default_data_dir)
        .unwrap_or_else(|| PathBuf::from(".blockfall"));
    init_logging(&data_dir);

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, data_dir = %data_dir.display(), "starting blockfall");

    let store = shared(JsonFileStore::in_dir(&data_dir));
    let mut game = GameState::with_store(settings, seed, store)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let mut term = TerminalRenderer::stdout();
    let entered = term.enter().context("failed to set up terminal");
    let result = entered.and_then(|()| run(&mut term, &mut game));

    // Always try to restore terminal state.
    let restored = term.leave();
    info!(score = game.score(), "exiting");
    result.and(restored)
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let view = GameView::default();
    let epoch = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let frame_start = Instant::now();
        game.frame(epoch.elapsed().as_millis() as u64);
        if let Some(lock) = game.take_last_event() {
            if lock.lines_cleared > 0 {
                debug!(
                    lines = lock.lines_cleared,
                    points = lock.line_clear_points,
                    "lines cleared"
                );
            }
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Drain input until the next frame is due.
        let mut timeout = frame.saturating_sub(frame_start.elapsed());
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match map_key(key) {
                    Some(KeyCommand::Quit) => return Ok(()),
                    Some(KeyCommand::ToggleTheme) => {
                        let theme = game.toggle_theme();
                        debug!(dark = theme.is_dark(), "theme toggled");
                    }
                    Some(KeyCommand::Game(action)) => {
                        game.apply_action(action);
                    }
                    None => {}
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
            timeout = Duration::ZERO;
        }
    }
}
