//! Periodic status lines for the headless runner.

use serde::Serialize;
use serpens_core::SimulationSnapshot;

/// Condensed view of a snapshot for logs and JSON output.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub tick: u64,
    pub clock: u64,
    pub generation: f64,
    pub population: usize,
    pub alive: usize,
    pub nibbles: usize,
    pub best_score: f64,
    pub current_max_fitness: f64,
    pub mutation_rate: f64,
    pub longest: usize,
    pub paused: bool,
    pub single_mode: bool,
    pub timeline_len: usize,
}

impl StatusReport {
    pub fn from_snapshot(tick: u64, snap: &SimulationSnapshot) -> Self {
        Self {
            tick,
            clock: snap.clock,
            generation: snap.generation,
            population: snap.snakes.len(),
            alive: snap.alive(),
            nibbles: snap.nibbles.len(),
            best_score: snap.best_score,
            current_max_fitness: snap.current_max_fitness,
            mutation_rate: snap.mutation_rate,
            longest: snap
                .snakes
                .iter()
                .map(|s| s.segments.len())
                .max()
                .unwrap_or(0),
            paused: snap.paused,
            single_mode: snap.single_mode,
            timeline_len: snap.timeline.len(),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            tick = self.tick,
            t = self.clock / 1000,
            generation = self.generation as u64,
            alive = self.alive,
            population = self.population,
            nibbles = self.nibbles,
            best = self.best_score,
            max_fitness = self.current_max_fitness,
            mutation = self.mutation_rate,
            longest = self.longest,
            paused = self.paused,
            single = self.single_mode,
            "Status"
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
