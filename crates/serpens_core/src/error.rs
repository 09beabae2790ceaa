//! Error types for the simulation core.

use thiserror::Error;

/// Main error type for serpens_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Coefficient buffer shorter than the network needs. Nothing was loaded.
    #[error("coefficient buffer too short: expected {expected} bytes, got {actual}")]
    CoeffLength { expected: usize, actual: usize },

    /// Symmetric load hit an odd-sized stage. Earlier stages were reloaded,
    /// this one and the rest keep their previous weights.
    #[error("symmetric network requires even stage sizes, stage {stage} has {size}")]
    AsymmetricStage { stage: usize, size: usize },

    /// A guard was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// An operation needed at least one live snake.
    #[error("population is empty")]
    EmptyPopulation,
}

/// Result type alias for serpens_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Whether the failure leaves the network partially reloaded.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::AsymmetricStage { .. })
    }
}
