//! Runtime counters and logging setup.
//!
//! Counters are atomics so the reporting thread can read them while the
//! simulation thread writes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// How often, in ticks, a summary line is logged.
pub const SUMMARY_INTERVAL: u64 = 1000;

pub struct Metrics {
    tick_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    population: AtomicU64,
    nibbles: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            population: AtomicU64::new(0),
            nibbles: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, population: usize, nibbles: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.population.store(population as u64, Ordering::Relaxed);
        self.nibbles.store(nibbles as u64, Ordering::Relaxed);

        if tick % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                tick,
                population,
                nibbles,
                births = self.births(),
                deaths = self.deaths(),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_births(&self, n: usize) {
        self.births.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_deaths(&self, n: usize) {
        self.deaths.fetch_add(n as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn nibbles(&self) -> u64 {
        self.nibbles.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average ticks per wall-clock second so far.
    #[must_use]
    pub fn ticks_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.tick_count() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default
/// `info` level. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
