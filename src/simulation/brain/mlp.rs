//! Single fully connected layer with logistic activation.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

/// A single layer of the controller network.
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases uniform in `[-1, 1]`.
    pub fn new_random(input_size: usize, output_size: usize) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new_inclusive(-1.0, 1.0)),
            biases: Array1::random(output_size, Uniform::new_inclusive(-1.0, 1.0)),
        }
    }

    /// Number of inputs the layer accepts.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with logistic sigmoid activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(sigmoid);
        output
    }

    /// Copies the layer and perturbs every weight and bias by independent
    /// uniform noise in `[-mutation_rate, mutation_rate]`.
    pub fn inherit(&self, mutation_rate: f32) -> Self {
        let noise = || Uniform::new_inclusive(-mutation_rate, mutation_rate);
        Self {
            weights: &self.weights + &Array2::random(self.weights.dim(), noise()),
            biases: &self.biases + &Array1::random(self.biases.len(), noise()),
        }
    }
}

/// Logistic function mapping any real number into `(0, 1)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
