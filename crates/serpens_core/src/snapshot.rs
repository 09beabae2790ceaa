//! Read-only views for a rendering collaborator.
//!
//! A [`SimulationHandle`] is the only thing another thread needs: it carries
//! the population lock and a second handle to the fitness timeline, which
//! has its own guard.

use crate::error::{Result, SimError};
use crate::evolution::Simulation;
use crate::snake::SnakeLogic;
use crate::stats::FitnessTimeline;
use crate::world::Nibble;
use serde::{Deserialize, Serialize};
use serpens_data::{Circle, NeuralNet, Snake};
use std::sync::{Arc, Mutex, MutexGuard};

/// Weights and activations of one stage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StageView {
    pub rows: usize,
    pub cols: usize,
    pub weights: Vec<i8>,
    pub activations: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkView {
    pub stages: Vec<StageView>,
}

impl NetworkView {
    #[must_use]
    pub fn of(net: &NeuralNet) -> Self {
        Self {
            stages: net
                .stages
                .iter()
                .map(|s| StageView {
                    rows: s.rows,
                    cols: s.cols,
                    weights: s.coeffs.clone(),
                    activations: s.output.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnakeView {
    pub segments: Vec<Circle>,
    pub hue: f32,
    pub alpha: f64,
    pub fitness: f64,
    pub is_dead: bool,
    /// Present only for the replayed snake in single-agent mode.
    pub network: Option<NetworkView>,
}

impl SnakeView {
    #[must_use]
    pub fn of(snake: &Snake, with_network: bool) -> Self {
        Self {
            segments: snake.segments.clone(),
            hue: snake.hue,
            alpha: snake.fade_alpha(),
            fitness: snake.fitness(),
            is_dead: snake.is_dead,
            network: with_network.then(|| NetworkView::of(&snake.brain)),
        }
    }
}

/// Everything a frame needs, copied out under the population lock.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    pub width: f64,
    pub height: f64,
    pub clock: u64,
    pub generation: f64,
    pub mutation_rate: f64,
    pub current_max_fitness: f64,
    pub best_score: f64,
    pub paused: bool,
    pub single_mode: bool,
    pub show_stats: bool,
    pub timeline: Vec<f64>,
    pub snakes: Vec<SnakeView>,
    pub nibbles: Vec<Nibble>,
}

impl SimulationSnapshot {
    pub fn capture(sim: &Simulation) -> Result<Self> {
        Ok(Self {
            width: sim.world.width,
            height: sim.world.height,
            clock: sim.world.clock,
            generation: sim.generation,
            mutation_rate: sim.mutation_rate,
            current_max_fitness: sim.current_max_fitness,
            best_score: sim.best_score,
            paused: sim.paused,
            single_mode: sim.single_mode,
            show_stats: sim.show_stats,
            timeline: sim.timeline.samples()?,
            snakes: sim
                .snakes
                .iter()
                .enumerate()
                .map(|(i, s)| SnakeView::of(s, sim.single_mode && i == 0))
                .collect(),
            nibbles: sim.world.nibbles()?,
        })
    }

    /// Number of live (not dying) snakes.
    #[must_use]
    pub fn alive(&self) -> usize {
        self.snakes.iter().filter(|s| !s.is_dead).count()
    }
}

/// Shared access to a running [`Simulation`].
#[derive(Clone)]
pub struct SimulationHandle {
    inner: Arc<Mutex<Simulation>>,
    timeline: FitnessTimeline,
}

impl SimulationHandle {
    #[must_use]
    pub fn new(sim: Simulation) -> Self {
        let timeline = sim.timeline.clone();
        Self {
            inner: Arc::new(Mutex::new(sim)),
            timeline,
        }
    }

    /// Takes the population lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, Simulation>> {
        self.inner
            .lock()
            .map_err(|_| SimError::LockPoisoned("population"))
    }

    pub fn snapshot(&self) -> Result<SimulationSnapshot> {
        let sim = self.lock()?;
        SimulationSnapshot::capture(&sim)
    }

    /// Timeline samples, read without the population lock.
    pub fn timeline(&self) -> Result<Vec<f64>> {
        self.timeline.samples()
    }
}
