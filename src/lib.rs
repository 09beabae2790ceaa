//! Headless runner for the Serpens simulation.
//!
//! The simulation itself lives in `serpens_core`; this crate drives it on a
//! dedicated thread at a fixed cadence, feeds it key commands and reports on
//! its progress.

pub mod app;
pub mod model;

pub use model::{CircleLogic, DnaLogic, NetworkLogic, SnakeLogic};
