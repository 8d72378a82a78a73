//! Game loop thread. Runs the simulation engine at 60Hz.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Input events arrive via `mpsc` channel and are folded into one
//! `InputSnapshot` per tick. Snapshots are stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::info;

use starflight_core::config::SimConfig;
use starflight_core::constants::{DT, TICK_RATE};
use starflight_core::input::InputTracker;
use starflight_core::state::SimSnapshot;
use starflight_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Wall-clock duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. With `max_ticks` the
/// loop stops on its own after that many ticks.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    max_ticks: Option<u64>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("starflight-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot, max_ticks);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, or the tick limit.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
    max_ticks: Option<u64>,
) {
    let mut engine = SimulationEngine::with_sol_system(config);
    let mut input = InputTracker::new();
    let mut next_tick_time = Instant::now();
    info!(entities = engine.roster().len(), "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(event)) => input.apply(event),
                Ok(GameLoopCommand::Shutdown) => {
                    info!(tick = engine.time().tick, "game loop shutting down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick(DT, input.snapshot());
        let tick = snapshot.time.tick;

        // 3. HUD readout once per simulated second
        if tick % u64::from(TICK_RATE) == 0 {
            log_hud(&snapshot);
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if max_ticks.is_some_and(|max| tick >= max) {
            info!(tick, "tick limit reached");
            return;
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset
            next_tick_time = now;
        }
    }
}

fn log_hud(snapshot: &SimSnapshot) {
    let hud = &snapshot.hud;
    info!(
        t = snapshot.time.elapsed_secs.round(),
        speed_kmh = hud.speed_kmh.round(),
        fuel_percent = (hud.fuel_percent * 10.0).round() / 10.0,
        health = hud.health,
        low_fuel = hud.low_fuel,
        target = ?hud.targeted_planet.as_ref().map(|p| &p.name),
        autopilot = ?hud.autopilot.phase,
        status = ?hud.status_message,
        "hud"
    );
}
