//! Brickfall entry point
//!
//! Runs a headless session driven by a simple autopilot: the paddle chases
//! the lowest ball and stuck balls are launched right away.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use brickfall::sim::{GameEvent, GameSession, Intent, LevelDir, SessionOutcome, TickInput, tick};
use brickfall::{ConfigError, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding level1.txt, level2.txt, ...
    #[arg(short, long, default_value = "levels")]
    levels: PathBuf,

    /// Settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(short, long, default_value_t = 20_000)]
    ticks: u64,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Headless game instance
struct Game {
    session: GameSession,
    hz: f64,
}

impl Game {
    fn new(args: &Args) -> Result<Self> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if args.seed.is_some() {
            settings.seed = args.seed;
        }

        let levels = LevelDir::open(&args.levels)?;
        let session = GameSession::from_source(&levels, settings)?;
        Ok(Self {
            session,
            hz: f64::from(args.hz.max(1)),
        })
    }

    /// Session time of a frame
    fn time_at(&self, frame: u64) -> f64 {
        frame as f64 / self.hz
    }

    /// Pick this frame's intents from the current state
    fn autopilot(&self) -> TickInput {
        let level = &self.session.level;
        let paddle = &level.paddle;
        let mut input = TickInput::default();

        if level.balls.iter().any(|ball| ball.stuck) {
            input.intents.push(Intent::Launch);
        }

        let target = level
            .balls
            .iter()
            .filter(|ball| !ball.stuck)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map_or(paddle.pos.x, |ball| ball.pos.x);

        let wanted = if target > paddle.pos.x + paddle.speed {
            1
        } else if target < paddle.pos.x - paddle.speed {
            -1
        } else {
            0
        };
        match (paddle.move_dir, wanted) {
            (current, wanted) if current == wanted => {}
            (_, 1) => input.intents.push(Intent::MoveRightStart),
            (_, -1) => input.intents.push(Intent::MoveLeftStart),
            (1, _) => input.intents.push(Intent::MoveRightStop),
            _ => input.intents.push(Intent::MoveLeftStop),
        }
        input
    }

    /// Run until the session ends or the tick budget runs out
    fn run(&mut self, max_ticks: u64) -> Option<SessionOutcome> {
        for frame in 0..max_ticks {
            let input = self.autopilot();
            let now = self.time_at(frame);
            let outcome = tick(&mut self.session, &input, now);

            for event in self.session.drain_events() {
                match event {
                    GameEvent::LevelAdvanced { level_index } => {
                        log::info!("Level {} reached at tick {frame}", level_index + 1)
                    }
                    event => log::debug!("tick {frame}: {event:?}"),
                }
            }
            if outcome.is_some() {
                return outcome;
            }
        }
        None
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut game = Game::new(args)?;
    log::info!(
        "Brickfall starting: {} levels, {} ticks at {} Hz",
        game.session.level_count(),
        args.ticks,
        args.hz
    );

    let outcome = game.run(args.ticks);
    let code = match outcome {
        Some(SessionOutcome::AllLevelsCleared) => {
            log::info!("All levels cleared after {} ticks", game.session.time_ticks);
            ExitCode::SUCCESS
        }
        Some(SessionOutcome::AllBallsLost) => {
            log::info!(
                "All balls lost on level {} after {} ticks",
                game.session.level_index + 1,
                game.session.time_ticks
            );
            ExitCode::from(1)
        }
        None => {
            log::info!("Tick limit reached on level {}", game.session.level_index + 1);
            ExitCode::SUCCESS
        }
    };

    if args.json {
        let now = game.time_at(game.session.time_ticks);
        let snapshot = game.session.snapshot(now);
        let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
        println!("{json}");
    }
    Ok(code)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
