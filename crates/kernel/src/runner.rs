//! Timer-driven simulation: a dedicated thread owns the [`Zoo`] and steps it on
//! a fixed interval until told to stop.
//!
//! Commands go in over one channel and tick reports come out over another. The
//! thread hands the zoo back when it exits, so shutdown is a join, never a
//! detached timer.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use zoo_common::SimulationConfig;

use crate::animal::LifeEvent;
use crate::zoo::Zoo;

/// Errors from driving the simulation thread.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation thread panicked")]
    ThreadPanicked,
    #[error("simulation already stopped")]
    AlreadyStopped,
}

/// Commands accepted by the simulation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    Paused,
    Stopped,
}

/// Timer settings for a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// End the run on its own after this many ticks.
    pub max_ticks: Option<u64>,
    /// End the run on its own once every animal is dead.
    pub stop_when_extinct: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_ticks: None,
            stop_when_extinct: false,
        }
    }
}

impl From<&SimulationConfig> for RunConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms.max(1)),
            ..Self::default()
        }
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<LifeEvent>,
    /// Animals still alive after this tick.
    pub alive: usize,
}

/// Handle for controlling the simulation thread.
pub struct SimulationHandle {
    thread: Option<JoinHandle<Zoo>>,
    command_tx: Sender<SimCommand>,
    report_rx: Receiver<TickReport>,
    state: SimState,
}

impl SimulationHandle {
    /// Move `zoo` onto a new thread and start ticking.
    pub fn spawn(zoo: Zoo, config: RunConfig) -> Result<Self, SimError> {
        let (command_tx, command_rx) = mpsc::channel();
        let (report_tx, report_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("zoo-sim".into())
            .spawn(move || run_simulation(zoo, config, command_rx, report_tx))?;

        Ok(Self {
            thread: Some(thread),
            command_tx,
            report_rx,
            state: SimState::Running,
        })
    }

    /// Current state. A run that ended on its own (`max_ticks` or
    /// `stop_when_extinct`) reports `Stopped` even before it is joined.
    pub fn state(&self) -> SimState {
        if self.is_finished() {
            SimState::Stopped
        } else {
            self.state
        }
    }

    /// True once the thread has exited, whether stopped or finished on its own.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Send a command to the simulation.
    pub fn send(&mut self, command: SimCommand) {
        if self.state() == SimState::Stopped {
            return;
        }
        match command {
            SimCommand::Pause => self.state = SimState::Paused,
            SimCommand::Resume => self.state = SimState::Running,
            SimCommand::Stop => self.state = SimState::Stopped,
        }
        // Thread may already have exited on max_ticks/extinction.
        let _ = self.command_tx.send(command);
    }

    pub fn pause(&mut self) {
        self.send(SimCommand::Pause);
    }

    pub fn resume(&mut self) {
        self.send(SimCommand::Resume);
    }

    /// Drain every report queued so far without blocking.
    pub fn try_reports(&self) -> Vec<TickReport> {
        let mut reports = Vec::new();
        loop {
            match self.report_rx.try_recv() {
                Ok(report) => reports.push(report),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        reports
    }

    /// Wait up to `timeout` for the next report.
    pub fn recv_report(&self, timeout: Duration) -> Option<TickReport> {
        self.report_rx.recv_timeout(timeout).ok()
    }

    /// Block until the next report. `None` once the thread has exited and the
    /// queue is empty.
    pub fn next_report(&self) -> Option<TickReport> {
        self.report_rx.recv().ok()
    }

    /// Stop ticking, join the thread and return the final zoo.
    ///
    /// Once this returns no further reports can be produced; reports queued
    /// before the stop remain readable.
    pub fn stop(&mut self) -> Result<Zoo, SimError> {
        self.send(SimCommand::Stop);
        self.join()
    }

    /// Join a run that ends on its own (`max_ticks` or `stop_when_extinct`).
    /// Blocks forever if neither is set and nobody calls [`stop`](Self::stop).
    pub fn wait(&mut self) -> Result<Zoo, SimError> {
        let zoo = self.join()?;
        self.state = SimState::Stopped;
        Ok(zoo)
    }

    fn join(&mut self) -> Result<Zoo, SimError> {
        let thread = self.thread.take().ok_or(SimError::AlreadyStopped)?;
        let zoo = thread.join().map_err(|_| SimError::ThreadPanicked)?;
        tracing::info!(tick = zoo.tick(), alive = zoo.alive_count(), "simulation stopped");
        Ok(zoo)
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.stop();
        }
    }
}

fn run_simulation(
    mut zoo: Zoo,
    config: RunConfig,
    command_rx: Receiver<SimCommand>,
    report_tx: Sender<TickReport>,
) -> Zoo {
    let _span = tracing::info_span!("simulation", zoo = %zoo.name()).entered();
    tracing::info!(interval_ms = config.interval.as_millis() as u64, "life has started");

    let mut ticks_run: u64 = 0;
    let mut paused = false;
    let mut next_tick = Instant::now() + config.interval;

    loop {
        if config.max_ticks.is_some_and(|max| ticks_run >= max) {
            tracing::info!(ticks_run, "tick limit reached");
            break;
        }
        if config.stop_when_extinct && zoo.is_extinct() {
            tracing::info!(tick = zoo.tick(), "every animal is dead");
            break;
        }

        let command = if paused {
            match command_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        } else {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match command_rx.recv_timeout(wait) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        };

        match command {
            Some(SimCommand::Stop) => break,
            Some(SimCommand::Pause) => {
                tracing::debug!(tick = zoo.tick(), "paused");
                paused = true;
                continue;
            }
            Some(SimCommand::Resume) => {
                if paused {
                    tracing::debug!(tick = zoo.tick(), "resumed");
                    paused = false;
                    next_tick = Instant::now() + config.interval;
                }
                continue;
            }
            None => {}
        }

        let events = zoo.step();
        ticks_run += 1;
        next_tick += config.interval;
        // Fell behind: skip missed ticks rather than bursting.
        let now = Instant::now();
        if next_tick < now {
            next_tick = now + config.interval;
        }

        let report = TickReport {
            tick: zoo.tick(),
            alive: zoo.alive_count(),
            events,
        };
        if report_tx.send(report).is_err() {
            tracing::trace!("report receiver gone");
        }
    }

    zoo
}
