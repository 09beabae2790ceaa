//! Peak-fitness history.

use crate::error::{Result, SimError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Bounded history of peak-fitness samples, oldest first.
///
/// Cloning shares the underlying buffer, so a reader can hold its own handle
/// and never needs the population lock.
#[derive(Debug, Clone, Default)]
pub struct FitnessTimeline {
    samples: Arc<Mutex<VecDeque<f64>>>,
}

impl FitnessTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, VecDeque<f64>>> {
        self.samples
            .lock()
            .map_err(|_| SimError::LockPoisoned("timeline"))
    }

    /// Appends a sample, then drops the oldest one once the history has
    /// reached `capacity`.
    pub fn push(&self, value: f64, capacity: usize) -> Result<()> {
        let mut samples = self.guard()?;
        samples.push_back(value);
        if samples.len() >= capacity {
            samples.pop_front();
        }
        Ok(())
    }

    pub fn samples(&self) -> Result<Vec<f64>> {
        Ok(self.guard()?.iter().copied().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.guard()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.guard()?.is_empty())
    }

    pub fn clear(&self) -> Result<()> {
        self.guard()?.clear();
        Ok(())
    }
}
