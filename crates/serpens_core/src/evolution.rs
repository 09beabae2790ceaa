//! The generational loop.
//!
//! [`Simulation`] owns the world, the live population and every statistic.
//! One call to [`Simulation::tick`] is one step of the fixed-cadence loop; the
//! caller is expected to hold the population lock for its whole duration.

use crate::config::{AppConfig, CrossoverKind};
use crate::error::{Result, SimError};
use crate::genome::DnaLogic;
use crate::metrics::Metrics;
use crate::snake::{SnakeLogic, SnakeTick};
use crate::stats::FitnessTimeline;
use crate::world::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serpens_data::{Command, Dna, Snake};
use std::time::Instant;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub paused: bool,
    /// A fresh generation was seeded at the start of the tick.
    pub seeded: bool,
    pub deaths: usize,
    pub births: usize,
    /// Fully faded snakes removed at the end of the tick.
    pub removed: usize,
    /// Single-agent mode ended and the backed-up population came back.
    pub restored: bool,
}

pub struct Simulation {
    pub config: AppConfig,
    pub world: World,
    pub snakes: Vec<Snake>,
    backup: Vec<Snake>,
    pub best_dna: Option<Dna>,
    pub best_score: f64,
    pub timeline: FitnessTimeline,
    /// Peak fitness since the last timeline sample.
    pub current_max_fitness: f64,
    /// Fractional generation counter, advanced per replacement birth.
    pub generation: f64,
    pub mutation_rate: f64,
    pub paused: bool,
    pub single_mode: bool,
    pub show_stats: bool,
    last_sample: u64,
    surface: (f64, f64),
    rng: ChaCha8Rng,
    pub metrics: Metrics,
}

impl Simulation {
    /// Builds an empty simulation; the first tick seeds the population.
    ///
    /// The generator is seeded from `config.world.seed` when present.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            world: World::new(&config.world),
            surface: (config.world.width, config.world.height),
            config,
            snakes: Vec::new(),
            backup: Vec::new(),
            best_dna: None,
            best_score: 0.0,
            timeline: FitnessTimeline::new(),
            current_max_fitness: 0.0,
            generation: 0.0,
            mutation_rate: 0.02,
            paused: false,
            single_mode: false,
            show_stats: false,
            last_sample: 0,
            rng,
            metrics: Metrics::new(),
        }
    }

    /// Size the arena will be resized to on the next world update.
    pub fn set_surface(&mut self, width: f64, height: f64) {
        self.surface = (width, height);
    }

    #[must_use]
    pub fn surface(&self) -> (f64, f64) {
        self.surface
    }

    /// Snakes set aside while single-agent mode is active.
    #[must_use]
    pub fn backup(&self) -> &[Snake] {
        &self.backup
    }

    /// Runs one step of the loop with the latest external command.
    pub fn tick(&mut self, command: Command) -> Result<TickReport> {
        let started = Instant::now();
        let mut report = TickReport::default();
        self.apply_command(command)?;

        if self.snakes.is_empty() {
            self.first_generation(self.config.evolution.population_size)?;
            self.world.new_nibble(self.config.world.initial_nibbles, &mut self.rng)?;
            report.seeded = true;
        }

        if self.paused {
            report.paused = true;
            self.preview()?;
        } else {
            self.step(&mut report)?;
        }

        self.metrics
            .record_tick(started.elapsed(), self.snakes.len(), self.world.nibble_count()?);
        Ok(report)
    }

    fn apply_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::None => {}
            Command::Pause => self.paused = true,
            Command::Resume => self.paused = false,
            Command::ShowStats => self.show_stats = true,
            Command::HideStats => self.show_stats = false,
            Command::ToggleSingleMode => {
                if self.single_mode {
                    self.exit_single_mode();
                } else {
                    self.enter_single_mode()?;
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, report: &mut TickReport) -> Result<()> {
        let (width, height) = self.surface;
        self.world.update(width, height)?;
        self.sample_timeline()?;

        for snake in &mut self.snakes {
            if snake.update(&self.world, &self.config, &mut self.rng)? == SnakeTick::Died {
                report.deaths += 1;
            }
            let fitness = snake.fitness();
            if fitness > self.current_max_fitness {
                self.current_max_fitness = fitness;
            }
            if fitness > self.best_score {
                self.best_score = fitness;
                self.best_dna = Some(snake.dna.clone());
            }
        }
        self.metrics.record_deaths(report.deaths);

        if report.deaths > 0 && self.single_mode {
            self.exit_single_mode();
            report.restored = true;
        } else {
            let step = 1.0 / self.config.evolution.population_size as f64;
            for _ in 0..report.deaths {
                self.new_snake()?;
                self.generation += step;
            }
            report.births = report.deaths;
            self.metrics.record_births(report.births);
        }

        let before = self.snakes.len();
        self.snakes.retain(|s| !s.is_faded());
        report.removed = before - self.snakes.len();
        Ok(())
    }

    fn sample_timeline(&mut self) -> Result<()> {
        let interval = self.config.evolution.timeline_interval;
        if self.world.clock.saturating_sub(self.last_sample) > interval && !self.single_mode {
            let capacity = (self.world.width / 2.0).max(1.0) as usize;
            self.timeline.push(self.current_max_fitness, capacity)?;
            self.current_max_fitness = 0.0;
            self.last_sample = self.world.clock;
        }
        Ok(())
    }

    /// Re-runs the first snake's perception and brain so a paused display
    /// still shows live activations.
    pub fn preview(&mut self) -> Result<f64> {
        let snake = self.snakes.first_mut().ok_or(SimError::EmptyPopulation)?;
        snake.brain(&self.world, &self.config)
    }

    /// Replaces the population with `n` random snakes and clears the world.
    pub fn first_generation(&mut self, n: usize) -> Result<()> {
        self.snakes.clear();
        for _ in 0..n {
            let snake = Snake::spawn_with_rng(None, &self.world, &self.config, &mut self.rng)?;
            self.snakes.push(snake);
        }
        self.world.reset()?;
        tracing::info!(population = n, generation = self.generation, "Seeded generation");
        Ok(())
    }

    /// Fitness-proportionate pool of population indices.
    ///
    /// Each snake appears `scale × fitness / max_fitness` times, with the
    /// maximum floored at 1. When every weight rounds to zero each snake
    /// appears once.
    #[must_use]
    pub fn mating_pool(&self) -> Vec<usize> {
        let max = self
            .snakes
            .iter()
            .map(SnakeLogic::fitness)
            .fold(0.0, f64::max)
            .max(1.0);
        let scale = self.config.evolution.mating_pool_scale;
        let mut pool = Vec::new();
        for (i, snake) in self.snakes.iter().enumerate() {
            let amount = (snake.fitness() * scale / max) as usize;
            pool.extend(std::iter::repeat(i).take(amount));
        }
        if pool.is_empty() {
            pool.extend(0..self.snakes.len());
        }
        pool
    }

    /// Breeds one child from two fitness-weighted picks and appends it.
    pub fn new_snake(&mut self) -> Result<()> {
        self.mutation_rate =
            self.config.evolution.mutation_pressure / self.current_max_fitness.max(1.0);
        let pool = self.mating_pool();
        if pool.is_empty() {
            return Err(SimError::EmptyPopulation);
        }
        let a = pool[self.rng.gen_range(0..pool.len())];
        let b = pool[self.rng.gen_range(0..pool.len())];
        let (parent_a, parent_b) = (&self.snakes[a].dna, &self.snakes[b].dna);
        let rate = self.mutation_rate;
        let child = match self.config.evolution.crossover {
            CrossoverKind::Noise => parent_a.crossover_noise(parent_b, rate, &mut self.rng),
            CrossoverKind::Bitwise => parent_a.crossover_bitwise(parent_b, rate, &mut self.rng),
            CrossoverKind::Bytewise => parent_a.crossover_bytewise(parent_b, rate, &mut self.rng),
        };
        let snake = Snake::spawn_with_rng(Some(child), &self.world, &self.config, &mut self.rng)?;
        tracing::debug!(parent_a = a, parent_b = b, rate, "Snake born");
        self.snakes.push(snake);
        Ok(())
    }

    /// Sets the population aside and replays the best genome found so far
    /// (a random one before any has been recorded).
    pub fn enter_single_mode(&mut self) -> Result<()> {
        if self.single_mode {
            return Ok(());
        }
        let snake = Snake::spawn_with_rng(
            self.best_dna.clone(),
            &self.world,
            &self.config,
            &mut self.rng,
        )?;
        self.single_mode = true;
        self.show_stats = false;
        self.backup = std::mem::take(&mut self.snakes);
        self.snakes.push(snake);
        tracing::info!(best_score = self.best_score, backed_up = self.backup.len(), "Entered single mode");
        Ok(())
    }

    /// Discards the replayed snake and restores the backup verbatim.
    pub fn exit_single_mode(&mut self) {
        if !self.single_mode {
            return;
        }
        self.single_mode = false;
        self.snakes = std::mem::take(&mut self.backup);
        tracing::info!(population = self.snakes.len(), "Left single mode");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn seeded(seed: u64) -> Simulation {
        Simulation::new(AppConfig {
            world: WorldConfig {
                width: 600.0,
                height: 400.0,
                seed: Some(seed),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_first_tick_seeds_population() {
        let mut sim = seeded(1);
        let report = sim.tick(Command::None).unwrap();
        assert!(report.seeded);
        assert_eq!(sim.snakes.len() - report.births + report.removed, 8);
        assert_eq!(sim.world.clock, 8);
    }

    #[test]
    fn test_commands_toggle_flags() {
        let mut sim = seeded(2);
        sim.tick(Command::ShowStats).unwrap();
        assert!(sim.show_stats);
        sim.tick(Command::HideStats).unwrap();
        assert!(!sim.show_stats);
        let report = sim.tick(Command::Pause).unwrap();
        assert!(sim.paused && report.paused);
        sim.tick(Command::Resume).unwrap();
        assert!(!sim.paused);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut sim = seeded(3);
        sim.tick(Command::None).unwrap();
        let clock = sim.world.clock;
        let snakes = sim.snakes.clone();
        sim.tick(Command::Pause).unwrap();
        sim.tick(Command::None).unwrap();
        assert_eq!(sim.world.clock, clock);
        for (before, after) in snakes.iter().zip(&sim.snakes) {
            assert_eq!(before.segments, after.segments);
            assert_eq!(before.score, after.score);
        }
    }

    #[test]
    fn test_mating_pool_with_zero_fitness() {
        let mut sim = seeded(4);
        sim.first_generation(4).unwrap();
        for (i, s) in sim.snakes.iter_mut().enumerate() {
            s.health = 0.0;
            s.score = if i == 2 { 50.0 } else { 0.0 };
        }
        let pool = sim.mating_pool();
        assert_eq!(pool.len(), 100);
        assert!(pool.iter().all(|&i| i == 2));

        for s in &mut sim.snakes {
            s.score = 0.0;
        }
        assert_eq!(sim.mating_pool(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_new_snake_with_zero_peak_fitness() {
        let mut sim = seeded(5);
        sim.first_generation(3).unwrap();
        sim.current_max_fitness = 0.0;
        sim.new_snake().unwrap();
        assert_eq!(sim.snakes.len(), 4);
        assert_eq!(sim.mutation_rate, 10.0);
        assert_eq!(sim.snakes[3].dna.len(), sim.snakes[0].dna.len());
    }

    #[test]
    fn test_new_snake_on_empty_population() {
        let mut sim = seeded(6);
        assert_eq!(sim.new_snake(), Err(SimError::EmptyPopulation));
        assert_eq!(sim.preview(), Err(SimError::EmptyPopulation));
    }

    #[test]
    fn test_single_mode_round_trip() {
        let mut sim = seeded(7);
        sim.tick(Command::None).unwrap();
        let before = sim.snakes.clone();
        sim.tick(Command::ToggleSingleMode).unwrap();
        assert!(sim.single_mode);
        assert_eq!(sim.snakes.len(), 1);
        assert_eq!(sim.backup(), before.as_slice());

        sim.tick(Command::ToggleSingleMode).unwrap();
        assert!(!sim.single_mode);
        assert!(sim.backup().is_empty());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for _ in 0..200 {
            a.tick(Command::None).unwrap();
            b.tick(Command::None).unwrap();
        }
        assert_eq!(a.snakes, b.snakes);
        assert_eq!(a.world.nibbles().unwrap(), b.world.nibbles().unwrap());
        assert_eq!(a.generation, b.generation);
    }
}
