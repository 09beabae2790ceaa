use serde::{Deserialize, Serialize};

/// One layer of a fixed-topology feed-forward network.
///
/// Holds a `rows x cols` weight matrix in row-major order, where `cols` is
/// the previous stage size plus one trailing bias column. The input stage has
/// an empty matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stage {
    /// Activations produced by the last forward pass.
    pub output: Vec<f64>,
    /// Quantized weights, row-major.
    pub coeffs: Vec<i8>,
    pub rows: usize,
    pub cols: usize,
}

impl Stage {
    /// Creates the weightless input stage.
    #[must_use]
    pub fn input(size: usize) -> Self {
        Self {
            output: vec![0.0; size],
            coeffs: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Creates a zero-weight stage fed by a stage of `prev_size` outputs.
    #[must_use]
    pub fn hidden(size: usize, prev_size: usize) -> Self {
        Self {
            output: vec![0.0; size],
            coeffs: vec![0; size * (prev_size + 1)],
            rows: size,
            cols: prev_size + 1,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn coeff(&self, row: usize, col: usize) -> i8 {
        self.coeffs[row * self.cols + col]
    }

    pub fn set_coeff(&mut self, row: usize, col: usize, value: i8) {
        self.coeffs[row * self.cols + col] = value;
    }

    /// Weights of output neuron `row`, bias last.
    #[must_use]
    pub fn row(&self, row: usize) -> &[i8] {
        &self.coeffs[row * self.cols..(row + 1) * self.cols]
    }
}

/// Ordered list of stages; stage 0 is the raw input buffer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NeuralNet {
    pub stages: Vec<Stage>,
}

impl NeuralNet {
    #[must_use]
    pub fn stage_sizes(&self) -> Vec<usize> {
        self.stages.iter().map(Stage::size).collect()
    }

    /// Output vector of the last stage.
    #[must_use]
    pub fn output(&self) -> &[f64] {
        self.stages.last().map_or(&[], |s| s.output.as_slice())
    }
}
