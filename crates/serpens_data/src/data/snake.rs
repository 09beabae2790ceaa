use super::circle::Circle;
use super::genome::Dna;
use super::network::NeuralNet;
use serde::{Deserialize, Serialize};

/// Category of an object seen by a snake.
///
/// The discriminant is the block index used when laying out network inputs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThingKind {
    #[default]
    Wall = 0,
    Snake = 1,
    Nibble = 2,
}

impl ThingKind {
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Nearest object registered in one field-of-view bin.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Thing {
    pub distance: f64,
    pub kind: ThingKind,
}

impl Thing {
    /// An empty bin: a wall at the edge of sight.
    #[must_use]
    pub fn unseen(max_sight: f64) -> Self {
        Self {
            distance: max_sight,
            kind: ThingKind::Wall,
        }
    }
}

/// A neural-network controlled agent made of a chain of circles.
///
/// `segments[0]` is the head; segment `i` follows segment `i - 1`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snake {
    pub segments: Vec<Circle>,
    pub dna: Dna,
    pub brain: NeuralNet,
    pub age: f64,
    /// Heading in radians, kept in `[0, 2π)`.
    pub angle: f64,
    pub score: f64,
    pub health: f64,
    pub is_dead: bool,
    /// Post-death countdown; the snake is removed once it reaches zero.
    pub death_fade: f64,
    /// Hue in `[0, 1)`, decoded from the last genome byte.
    pub hue: f32,
}

impl Snake {
    #[must_use]
    pub fn head(&self) -> &Circle {
        &self.segments[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the fade-out after death has completed.
    #[must_use]
    pub fn is_faded(&self) -> bool {
        self.is_dead && self.death_fade <= 0.0
    }
}
