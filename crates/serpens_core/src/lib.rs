//! # Serpens Core
//!
//! Simulation engine for Serpens, a neuro-evolution sandbox where snakes
//! steered by tiny byte-weighted networks learn to hunt nibbles.
//!
//! This crate contains the deterministic simulation logic:
//! - Circle physics (walls, separation, chain following)
//! - Byte genomes and their crossover/mutation operators
//! - Fixed-topology feed-forward networks
//! - Field-of-view perception and snake behavior
//! - The generational controller with single-agent replay
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use serpens_core::config::{AppConfig, WorldConfig};
//! use serpens_core::evolution::Simulation;
//! use serpens_data::Command;
//!
//! let config = AppConfig {
//!     world: WorldConfig { seed: Some(42), ..Default::default() },
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config);
//! let report = sim.tick(Command::None).unwrap();
//! assert!(report.seeded);
//! assert!(!sim.snakes.is_empty());
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Error types
pub mod error;
/// The generational loop and single-agent replay
pub mod evolution;
/// Genetic operators over byte genomes
pub mod genome;
/// Performance metrics collection and logging
pub mod metrics;
/// Feed-forward network inference and weight loading
pub mod network;
/// Field-of-view bins and sensory input layout
pub mod perception;
/// Circle physics
pub mod physics;
/// Snake spawning, steering, eating and dying
pub mod snake;
/// Read-only views and the shared simulation handle
pub mod snapshot;
/// Fitness timeline
pub mod stats;
/// Arena, clock and nibbles
pub mod world;

pub use error::{Result, SimError};
pub use evolution::{Simulation, TickReport};
pub use genome::DnaLogic;
pub use metrics::{init_logging, Metrics};
pub use network::{NetworkLogic, StageLogic};
pub use physics::CircleLogic;
pub use snake::{SnakeLogic, SnakeTick};
pub use snapshot::{SimulationHandle, SimulationSnapshot};
pub use world::{Nibble, World};
