//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map to `config.toml`. Every field has a
//! default, so a file only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1200
//! height = 800
//! seed = 42
//!
//! [brain]
//! hidden_layers = [16, 16]
//!
//! [evolution]
//! population_size = 12
//! crossover = "bytewise"
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of network outputs: left and right turning drive.
pub const BRAIN_OUTPUTS: usize = 2;
/// Number of object kinds a snake can tell apart (wall, snake, nibble).
pub const THING_KINDS: usize = 3;

/// Arena and resource configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub max_nibbles: usize,
    /// Nibbles spawned whenever a fresh generation is seeded.
    pub initial_nibbles: usize,
    /// Radius of snake heads and nibbles.
    pub circle_radius: f64,
    /// Nibbles bounce off walls inset by this much from every edge.
    pub nibble_wall_margin: f64,
    /// Clock units added per world update.
    pub tick_period: u64,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
            max_nibbles: 20,
            initial_nibbles: 4,
            circle_radius: 20.0,
            nibble_wall_margin: 50.0,
            tick_period: 8,
            seed: None,
        }
    }
}

/// Movement, perception and scoring constants of a snake.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SnakeConfig {
    pub max_forward_speed: f64,
    /// Largest heading change per tick, in radians.
    pub max_angular_speed: f64,
    pub wall_collision_threshold: f64,
    pub max_sight_distance: f64,
    /// Angular extent of each side (left and right) of the view, in radians.
    pub field_of_view: f64,
    /// Bins per side of the view.
    pub fov_divisions: usize,
    pub nibble_bonus: f64,
    pub health_bonus: f64,
    pub health_decrement: f64,
    pub death_fade: f64,
    pub death_fade_step: f64,
    /// Extra overlap a head needs before it eats a nibble.
    pub eat_slack: f64,
    /// Body segments trail with inertia instead of a rigid chain.
    pub inertia: bool,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            max_forward_speed: 5.0,
            max_angular_speed: PI / 32.0,
            wall_collision_threshold: 4.0,
            max_sight_distance: 600.0,
            field_of_view: PI * 2.0 / 3.0,
            fov_divisions: 8,
            nibble_bonus: 20.0,
            health_bonus: 10.0,
            health_decrement: 0.02,
            death_fade: 180.0,
            death_fade_step: 0.6,
            eat_slack: 10.0,
            inertia: false,
        }
    }
}

/// Network topology between the fixed input and output stages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    pub hidden_layers: Vec<usize>,
    /// Mirror weights point-symmetrically, halving the genome.
    pub symmetric: bool,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![16, 16],
            symmetric: false,
        }
    }
}

/// Crossover operator used when breeding replacements.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverKind {
    Noise,
    Bitwise,
    #[default]
    Bytewise,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Mating pool copies granted to the fittest snake.
    pub mating_pool_scale: f64,
    /// Mutation rate is this value divided by the peak fitness.
    pub mutation_pressure: f64,
    /// Clock units between two fitness timeline samples.
    pub timeline_interval: u64,
    pub crossover: CrossoverKind,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 8,
            mating_pool_scale: 100.0,
            mutation_pressure: 10.0,
            timeline_interval: 1000,
            crossover: CrossoverKind::Bytewise,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub snake: SnakeConfig,
    pub brain: BrainConfig,
    pub evolution: EvolutionConfig,
    /// Wall-clock milliseconds between simulation ticks.
    pub target_tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            snake: SnakeConfig::default(),
            brain: BrainConfig::default(),
            evolution: EvolutionConfig::default(),
            target_tick_ms: 8,
        }
    }
}

impl AppConfig {
    /// Size of the input stage: one slot per bin, side and object kind.
    #[must_use]
    pub fn first_stage_size(&self) -> usize {
        self.snake.fov_divisions * 2 * THING_KINDS
    }

    /// Full stage size list, input first.
    #[must_use]
    pub fn stage_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.brain.hidden_layers.len() + 2);
        sizes.push(self.first_stage_size());
        sizes.extend_from_slice(&self.brain.hidden_layers);
        sizes.push(BRAIN_OUTPUTS);
        sizes
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "World height must be positive");
        anyhow::ensure!(
            self.world.circle_radius > 0.0,
            "Circle radius must be positive"
        );
        anyhow::ensure!(
            self.world.nibble_wall_margin >= 0.0,
            "Nibble wall margin must be non-negative"
        );
        anyhow::ensure!(
            self.world.initial_nibbles <= self.world.max_nibbles,
            "Initial nibbles exceed max nibbles"
        );
        anyhow::ensure!(self.world.tick_period > 0, "Tick period must be positive");

        // Snake validation
        anyhow::ensure!(
            self.snake.max_forward_speed > 0.0,
            "Max forward speed must be positive"
        );
        anyhow::ensure!(
            self.snake.max_angular_speed > 0.0,
            "Max angular speed must be positive"
        );
        anyhow::ensure!(
            self.snake.max_sight_distance > 0.0,
            "Max sight distance must be positive"
        );
        anyhow::ensure!(
            self.snake.field_of_view > 0.0 && self.snake.field_of_view <= PI,
            "Field of view must be in (0, π]"
        );
        anyhow::ensure!(self.snake.fov_divisions > 0, "FOV divisions must be positive");
        anyhow::ensure!(
            self.snake.health_bonus > 0.0,
            "Health bonus must be positive"
        );
        anyhow::ensure!(
            self.snake.health_decrement >= 0.0,
            "Health decrement must be non-negative"
        );
        anyhow::ensure!(
            self.snake.death_fade_step > 0.0,
            "Death fade step must be positive"
        );

        // Brain validation
        anyhow::ensure!(
            self.brain.hidden_layers.iter().all(|&s| s > 0),
            "Hidden layer sizes must be positive"
        );
        if self.brain.symmetric {
            anyhow::ensure!(
                self.brain.hidden_layers.iter().all(|&s| s % 2 == 0),
                "Symmetric networks need even hidden layer sizes"
            );
        }

        // Evolution validation
        anyhow::ensure!(
            self.evolution.population_size > 0,
            "Population size must be positive"
        );
        anyhow::ensure!(
            self.evolution.mating_pool_scale >= 1.0,
            "Mating pool scale must be at least 1"
        );
        anyhow::ensure!(
            self.evolution.mutation_pressure >= 0.0,
            "Mutation pressure must be non-negative"
        );
        anyhow::ensure!(
            self.evolution.timeline_interval > 0,
            "Timeline interval must be positive"
        );

        anyhow::ensure!(self.target_tick_ms > 0, "Target tick must be positive");
        anyhow::ensure!(
            self.target_tick_ms <= 1000,
            "Target tick too long (max 1000 ms)"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the behavior-relevant sections, for telling runs apart.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.snake).as_bytes());
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}
