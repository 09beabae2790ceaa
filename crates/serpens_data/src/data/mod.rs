//! Core data structures for the serpens simulation.

pub mod circle;
pub mod command;
pub mod genome;
pub mod network;
pub mod snake;

pub use circle::Circle;
pub use command::Command;
pub use genome::Dna;
pub use network::{NeuralNet, Stage};
pub use snake::{Snake, Thing, ThingKind};
