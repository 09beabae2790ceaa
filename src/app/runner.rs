//! The simulation thread.

use crate::app::input::CommandSlot;
use crate::app::shutdown::ShutdownManager;
use anyhow::Result;
use serpens_core::SimulationHandle;
use std::sync::mpsc::{SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Fixed-rate schedule that never catches up.
///
/// After an overrun the next tick is due immediately and the schedule is
/// re-anchored to that moment, so a slow tick costs simulation rate instead
/// of producing a burst of back-to-back ticks.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start,
        }
    }

    /// Time left until the next tick is due.
    pub fn wait_time(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Schedules the tick after the one that just finished at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.period;
        if self.next < now {
            self.next = now;
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next
    }
}

/// Drives [`serpens_core::Simulation::tick`] at a fixed cadence.
pub struct Runner {
    handle: SimulationHandle,
    commands: CommandSlot,
    shutdown: ShutdownManager,
    period: Duration,
    max_ticks: Option<u64>,
}

impl Runner {
    pub fn new(
        handle: SimulationHandle,
        commands: CommandSlot,
        shutdown: ShutdownManager,
        period: Duration,
    ) -> Self {
        Self {
            handle,
            commands,
            shutdown,
            period,
            max_ticks: None,
        }
    }

    /// Stops after `n` ticks; zero means run until shutdown.
    pub fn with_max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = (n > 0).then_some(n);
        self
    }

    /// Starts the simulation thread. Each finished tick sends its number on
    /// `frames` unless the reader is still behind.
    ///
    /// The thread returns the number of ticks run. A fatal error requests
    /// shutdown for everyone before it is returned.
    pub fn spawn(self, frames: SyncSender<u64>) -> Result<JoinHandle<Result<u64>>> {
        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || {
                let result = self.run_loop(&frames);
                match &result {
                    Ok(ticks) => tracing::info!(ticks, "Simulation thread finished"),
                    Err(e) => tracing::error!(error = %e, "Simulation thread stopped"),
                }
                self.shutdown.request_shutdown();
                result
            })?;
        Ok(handle)
    }

    fn run_loop(&self, frames: &SyncSender<u64>) -> Result<u64> {
        let mut cadence = Cadence::new(self.period, Instant::now());
        let mut ticks = 0;
        while !self.shutdown.is_shutdown_requested() {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            let wait = cadence.wait_time(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }

            let command = self.commands.take();
            {
                let mut sim = self.handle.lock()?;
                sim.tick(command)?;
            }
            ticks += 1;

            match frames.try_send(ticks) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
            cadence.advance(Instant::now());
        }
        Ok(ticks)
    }
}
