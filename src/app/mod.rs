pub mod input;
pub mod report;
pub mod runner;
pub mod shutdown;

pub use input::CommandSlot;
pub use report::StatusReport;
pub use runner::{Cadence, Runner};
pub use shutdown::ShutdownManager;

use anyhow::{Context, Result};
use serpens_core::config::AppConfig;
use serpens_core::{Simulation, SimulationHandle};
use std::path::Path;
use std::sync::mpsc::{sync_channel, RecvTimeoutError};
use std::time::Duration;

/// Loads `path`, falling back to defaults when the file does not exist.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Validates `config` and renders it as TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    config.validate()?;
    Ok(toml::to_string_pretty(config)?)
}

/// How the headless runner reports and when it stops.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many ticks; zero runs until quit.
    pub max_ticks: u64,
    /// Ticks between two status reports; zero disables them.
    pub report_every: u64,
    /// Print status reports as JSON lines on stdout.
    pub json: bool,
    /// Read key commands from stdin.
    pub read_stdin: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            report_every: 1000,
            json: false,
            read_stdin: true,
        }
    }
}

/// The headless application: the simulation thread plus a main thread that
/// plays the rendering collaborator.
pub struct App {
    pub config: AppConfig,
    pub options: RunOptions,
    handle: SimulationHandle,
    commands: CommandSlot,
    shutdown: ShutdownManager,
}

impl App {
    pub fn new(config: AppConfig, options: RunOptions) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            fingerprint = %config.fingerprint(),
            population = config.evolution.population_size,
            seed = ?config.world.seed,
            "Configuration loaded"
        );
        let handle = SimulationHandle::new(Simulation::new(config.clone()));
        Ok(Self {
            config,
            options,
            handle,
            commands: CommandSlot::new(),
            shutdown: ShutdownManager::new(),
        })
    }

    pub fn handle(&self) -> SimulationHandle {
        self.handle.clone()
    }

    /// Sender side of the command slot.
    pub fn commands(&self) -> CommandSlot {
        self.commands.clone()
    }

    pub fn shutdown(&self) -> ShutdownManager {
        self.shutdown.clone()
    }

    /// Runs until quit, the tick limit, or a fatal simulation error.
    /// Returns the number of ticks simulated.
    pub fn run(&mut self) -> Result<u64> {
        if self.options.read_stdin {
            input::spawn_stdin_reader(self.commands.clone(), self.shutdown.clone());
            tracing::info!("Keys: space = single mode, a/b = pause/resume, c/d = stats, q = quit");
        }

        let (frames_tx, frames_rx) = sync_channel(1);
        let runner = Runner::new(
            self.handle.clone(),
            self.commands.clone(),
            self.shutdown.clone(),
            Duration::from_millis(self.config.target_tick_ms),
        )
        .with_max_ticks(self.options.max_ticks);
        let sim_thread = runner.spawn(frames_tx)?;

        let mut last_report = 0;
        loop {
            match frames_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(tick) => {
                    if self.options.report_every > 0
                        && tick >= last_report + self.options.report_every
                    {
                        self.report(tick)?;
                        last_report = tick;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.shutdown.is_shutdown_requested() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let ticks = sim_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked"))??;
        self.report(ticks)?;
        let tps = self.handle.lock()?.metrics.ticks_per_second();
        tracing::info!(ticks, ticks_per_second = tps, "Run complete");
        Ok(ticks)
    }

    /// Captures a snapshot under the population lock and emits one status line.
    pub fn report(&self, tick: u64) -> Result<StatusReport> {
        let snapshot = self.handle.snapshot()?;
        let status = StatusReport::from_snapshot(tick, &snapshot);
        if self.options.json {
            println!("{}", status.to_json()?);
        } else {
            status.log();
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpens_core::config::WorldConfig;

    fn quick_config() -> AppConfig {
        AppConfig {
            world: WorldConfig {
                seed: Some(21),
                ..Default::default()
            },
            target_tick_ms: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config("definitely/not/here.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_render_config_round_trips() {
        let config = quick_config();
        let text = render_config(&config).unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_render_config_rejects_invalid_config() {
        let mut config = quick_config();
        config.evolution.population_size = 0;
        assert!(render_config(&config).is_err());
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        let mut config = quick_config();
        config.evolution.population_size = 0;
        assert!(App::new(config, RunOptions::default()).is_err());
    }

    #[test]
    fn test_app_runs_fixed_number_of_ticks() {
        let options = RunOptions {
            max_ticks: 20,
            report_every: 5,
            json: false,
            read_stdin: false,
        };
        let mut app = App::new(quick_config(), options).unwrap();
        let ticks = app.run().unwrap();
        assert_eq!(ticks, 20);
        let snap = app.handle().snapshot().unwrap();
        assert_eq!(snap.clock, 160);
        assert!(app.shutdown().is_shutdown_requested());
    }
}
