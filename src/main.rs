use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use twin_snake::config::{GameConfig, Model};
use twin_snake::controls::{self, ControlEvent};
use twin_snake::game::GameSession;
use twin_snake::input::{GameInput, Steer};
use twin_snake::renderer::{self, HudInfo, Viewport};
use twin_snake::score::{load_high_score, save_high_score};
use twin_snake::terminal_runtime::{restore_terminal, ScreenGuard};

/// Longest wait for input between two frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "twin-snake", version, about = "Snake with a pointer-following trail or a classic grid chain")]
struct Cli {
    /// Body model to play when no config file is given.
    #[arg(long, value_enum, default_value_t = ModelArg::Chain)]
    model: ModelArg,

    /// JSON config file selecting the model and its tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Load the high score on start and save it after every game over.
    #[arg(long = "keep-high-score")]
    keep_high_score: bool,

    /// Write logs to this file (filtered by `RUST_LOG`, default `info`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Continuous trail that follows the mouse pointer.
    Trail,
    /// Grid chain steered with arrows or WASD.
    Chain,
}

impl From<ModelArg> for Model {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Trail => Self::Trail,
            ModelArg::Chain => Self::Chain,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => GameConfig::load(path).map_err(io::Error::other)?,
        None => GameConfig::for_model(cli.model.into()),
    };
    let model = config.model();

    let session = match cli.seed {
        Some(seed) => GameSession::new_with_seed(config, seed),
        None => GameSession::new(config),
    }
    .map_err(io::Error::other)?;

    let session = if cli.keep_high_score {
        let saved = load_high_score(model).unwrap_or_else(|error| {
            eprintln!("Ignoring unreadable high score file: {error}");
            tracing::warn!(%error, "high score file unreadable");
            0
        });
        session.with_high_score(saved)
    } else {
        session
    };

    install_panic_hook();

    let high_score = run(session, cli.keep_high_score)?;
    println!("Thanks for playing! High score: {high_score}");
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(mut session: GameSession, keep_high_score: bool) -> io::Result<u32> {
    let mut screen = ScreenGuard::acquire()?;
    let viewport = Viewport::for_config(session.config());
    let model = session.config().model();

    let mut reference_high_score = session.high_score();
    let mut last_tick = Instant::now();
    let mut was_game_over = false;

    loop {
        let snapshot = session.snapshot();
        let hud = HudInfo {
            reference_high_score,
            last_collision: session.last_collision(),
            is_start_screen: session.tick_count() == 0 && !snapshot.game_over && !snapshot.paused,
        };
        let frame_area = screen
            .terminal()
            .draw(|frame| renderer::render(frame, &snapshot, viewport, hud))?
            .area;

        if let Some(event) = controls::poll_event(FRAME_INTERVAL)? {
            match event {
                ControlEvent::Game(GameInput::Quit) => break,
                ControlEvent::Game(GameInput::Reset) => {
                    session.reset();
                    reference_high_score = session.high_score();
                    last_tick = Instant::now();
                }
                ControlEvent::Game(input) => session.apply_input(input),
                ControlEvent::Pointer { column, row } => {
                    let field = renderer::play_field(frame_area);
                    if let Some(point) = viewport.to_world(field, column, row) {
                        session.update(Steer::Toward(point));
                    }
                }
            }
        }

        if session
            .tick_delay()
            .is_some_and(|delay| last_tick.elapsed() >= delay)
        {
            session.update(Steer::Coast);
            last_tick = Instant::now();
        }

        let is_game_over = session.is_game_over();
        if is_game_over && !was_game_over && keep_high_score {
            persist_high_score(model, session.high_score());
        }
        was_game_over = is_game_over;
    }

    let high_score = session.high_score().max(session.score());
    if keep_high_score {
        persist_high_score(model, high_score);
    }
    Ok(high_score)
}

fn persist_high_score(model: Model, high_score: u32) {
    if let Err(error) = save_high_score(model, high_score) {
        tracing::warn!(%error, "failed to save high score");
    }
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
