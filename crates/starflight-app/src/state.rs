//! Runner state shared between the input side and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use starflight_core::config::SimConfig;
use starflight_core::input::InputEvent;
use starflight_core::state::SimSnapshot;

use crate::cli::AppError;
use crate::game_loop;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A pilot input edge, folded into the next tick's snapshot.
    Input(InputEvent),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running (or not yet started) simulation.
pub struct AppState {
    /// `None` before `start`.
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop. Fails if it is already running.
    pub fn start(
        &self,
        config: SimConfig,
        max_ticks: Option<u64>,
    ) -> Result<JoinHandle<()>, AppError> {
        let mut tx_lock = self
            .command_tx
            .lock()
            .map_err(|_| AppError::LoopStopped)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }
        let (tx, handle) =
            game_loop::spawn_game_loop(config, self.latest_snapshot.clone(), max_ticks)?;
        *tx_lock = Some(tx);
        Ok(handle)
    }

    /// Sender for an input thread.
    pub fn sender(&self) -> Result<mpsc::Sender<GameLoopCommand>, AppError> {
        let tx_lock = self
            .command_tx
            .lock()
            .map_err(|_| AppError::LoopStopped)?;
        tx_lock.clone().ok_or(AppError::NotStarted)
    }

    pub fn send_input(&self, event: InputEvent) -> Result<(), AppError> {
        self.sender()?
            .send(GameLoopCommand::Input(event))
            .map_err(|_| AppError::LoopStopped)
    }

    /// Ask the loop to stop. Harmless if it already has.
    pub fn shutdown(&self) {
        if let Ok(tx) = self.sender() {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
    }

    /// Latest snapshot for polling.
    pub fn latest_snapshot(&self) -> Option<SimSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|lock| lock.clone())
    }
}
