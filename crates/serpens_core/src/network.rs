//! Fixed-topology feed-forward network with quantized byte weights.
//!
//! Stage `i` computes `output[i] = sigmoid(bias + Σ w[i][j]·prev[j])` where the
//! bias is the trailing weight column scaled by [`SIGNAL_MULTIPLIER`].

use crate::error::{Result, SimError};
use serpens_data::{NeuralNet, Stage};

/// Upper bound of every activation; also scales the bias column.
pub const SIGNAL_MULTIPLIER: f64 = 0.1;

/// Logistic squashing into `(0, SIGNAL_MULTIPLIER)`.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    SIGNAL_MULTIPLIER / (1.0 + (-x / 2.0).exp())
}

/// Number of genome bytes needed to fill a network of the given shape.
///
/// Symmetric networks store half of each stage, rounded up.
#[must_use]
pub fn calc_number_of_coeffs(stage_sizes: &[usize], symmetrical: bool) -> usize {
    stage_sizes
        .windows(2)
        .map(|w| {
            let count = w[1] * (w[0] + 1);
            if symmetrical {
                (count + 1) / 2
            } else {
                count
            }
        })
        .sum()
}

/// Forward pass of a single stage.
pub trait StageLogic {
    fn calc(&mut self, prev: &[f64]);
}

impl StageLogic for Stage {
    fn calc(&mut self, prev: &[f64]) {
        let bias_col = self.cols - 1;
        for i in 0..self.rows {
            let row = &self.coeffs[i * self.cols..(i + 1) * self.cols];
            let sum: f64 = row[..bias_col]
                .iter()
                .zip(prev)
                .map(|(&w, &p)| f64::from(w) * p)
                .sum::<f64>()
                + f64::from(row[bias_col]) * SIGNAL_MULTIPLIER;
            self.output[i] = sigmoid(sum);
        }
    }
}

/// Construction, weight loading and inference for [`NeuralNet`].
pub trait NetworkLogic {
    /// Builds a zero-weight network; stage 0 is the input buffer.
    fn with_stages(stage_sizes: &[usize]) -> Self;

    /// Fills every weight row-major from `coeffs`.
    ///
    /// Extra trailing bytes are ignored. A short buffer fails with
    /// [`SimError::CoeffLength`] before any weight is written.
    fn load_coeffs(&mut self, coeffs: &[i8]) -> Result<()>;

    /// Fills the upper half of each stage and mirrors every value into the
    /// point-symmetric cell.
    ///
    /// An odd-sized stage aborts with [`SimError::AsymmetricStage`], leaving
    /// the stages before it reloaded and the rest untouched.
    fn load_coeffs_symmetrical(&mut self, coeffs: &[i8]) -> Result<()>;

    /// Runs a forward pass and returns the last stage's activations.
    fn calc(&mut self, input: &[f64]) -> &[f64];

    fn coeff_count(&self, symmetrical: bool) -> usize;
}

impl NetworkLogic for NeuralNet {
    fn with_stages(stage_sizes: &[usize]) -> Self {
        let mut stages = Vec::with_capacity(stage_sizes.len());
        let mut prev: Option<usize> = None;
        for &size in stage_sizes {
            stages.push(match prev {
                None => Stage::input(size),
                Some(prev_size) => Stage::hidden(size, prev_size),
            });
            prev = Some(size);
        }
        Self { stages }
    }

    fn load_coeffs(&mut self, coeffs: &[i8]) -> Result<()> {
        let expected = self.coeff_count(false);
        if coeffs.len() < expected {
            return Err(SimError::CoeffLength {
                expected,
                actual: coeffs.len(),
            });
        }
        let mut idx = 0;
        for stage in self.stages.iter_mut().skip(1) {
            let n = stage.coeffs.len();
            stage.coeffs.copy_from_slice(&coeffs[idx..idx + n]);
            idx += n;
        }
        Ok(())
    }

    fn load_coeffs_symmetrical(&mut self, coeffs: &[i8]) -> Result<()> {
        let expected = self.coeff_count(true);
        if coeffs.len() < expected {
            return Err(SimError::CoeffLength {
                expected,
                actual: coeffs.len(),
            });
        }
        let mut idx = 0;
        for (s, stage) in self.stages.iter_mut().enumerate().skip(1) {
            if stage.rows % 2 == 1 {
                tracing::error!(stage = s, size = stage.rows, "Symmetric load on odd stage");
                return Err(SimError::AsymmetricStage {
                    stage: s,
                    size: stage.rows,
                });
            }
            let (rows, cols) = (stage.rows, stage.cols);
            for i in 0..rows / 2 {
                for j in 0..cols {
                    let c = coeffs[idx];
                    stage.set_coeff(i, j, c);
                    stage.set_coeff(rows - 1 - i, cols - 1 - j, c);
                    idx += 1;
                }
            }
        }
        Ok(())
    }

    fn calc(&mut self, input: &[f64]) -> &[f64] {
        let Some((first, rest)) = self.stages.split_first_mut() else {
            return &[];
        };
        for (o, &i) in first.output.iter_mut().zip(input) {
            *o = i;
        }
        let mut prev = &first.output;
        for stage in rest.iter_mut() {
            stage.calc(prev);
            prev = &stage.output;
        }
        prev
    }

    fn coeff_count(&self, symmetrical: bool) -> usize {
        calc_number_of_coeffs(&self.stage_sizes(), symmetrical)
    }
}
