use std::io::BufRead;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use starflight_app::cli::{AppError, Args};
use starflight_app::core::config::SimConfig;
use starflight_app::core::input::InputEvent;
use starflight_app::state::{AppState, GameLoopCommand};

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.json_logs);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "starflight failed");
            eprintln!("starflight: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, ticks = ?args.ticks, "starting simulation");

    let state = AppState::new();
    let game_loop = state.start(config, args.ticks)?;
    let commands = state.sender()?;

    // Input thread: JSON input events, one per line. EOF ends an open-ended run.
    let bounded = args.ticks.is_some();
    std::thread::Builder::new()
        .name("starflight-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let command = match line {
                    "quit" => GameLoopCommand::Shutdown,
                    _ => match serde_json::from_str::<InputEvent>(line) {
                        Ok(event) => GameLoopCommand::Input(event),
                        Err(e) => {
                            warn!(%line, error = %e, "ignoring malformed input");
                            continue;
                        }
                    },
                };
                if commands.send(command).is_err() {
                    return;
                }
            }
            if !bounded {
                let _ = commands.send(GameLoopCommand::Shutdown);
            }
        })?;

    if game_loop.join().is_err() {
        return Err(AppError::LoopStopped);
    }
    if let Some(snapshot) = state.latest_snapshot() {
        info!(
            tick = snapshot.time.tick,
            ships = snapshot.ships.len(),
            projectiles = snapshot.projectiles.len(),
            "simulation finished"
        );
    }
    Ok(())
}
