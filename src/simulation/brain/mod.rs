//! Neural controller driving organism motion.
//!
//! The controller is a fixed two-layer feedforward network: four sensory
//! inputs, one hidden layer whose width is a species parameter, and two motor
//! outputs (turn, move) in `[-1, 1]`. It has no internal state; behavior only
//! changes between generations, when a child inherits a perturbed copy of its
//! parent's weights.

use ndarray::{Array1, Array2};

use super::error::ConfigError;

pub mod mlp;

pub use mlp::Mlp;

/// Number of controller inputs: three color channels plus normalized energy.
pub const INPUT_SIZE: usize = 4;
/// Number of controller outputs: turn and move.
pub const OUTPUT_SIZE: usize = 2;

/// Motor command produced by one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorSignals {
    /// Turn signal in `[-1, 1]`.
    pub turn: f32,
    /// Move signal in `[-1, 1]`; negative values reverse.
    pub movement: f32,
}

/// Every neuron value of one forward pass, for visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// Inputs as given.
    pub inputs: [f32; INPUT_SIZE],
    /// Hidden layer activations in `(0, 1)`.
    pub hidden: Array1<f32>,
    /// Outputs in `[-1, 1]`, in the order turn, move.
    pub outputs: [f32; OUTPUT_SIZE],
}

/// Two-layer feedforward network owned by a single organism.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralController {
    hidden: Mlp,
    output: Mlp,
}

impl NeuralController {
    /// Creates a seed controller with every weight and bias uniform in `[-1, 1]`.
    pub fn new_random(hidden_size: usize) -> Self {
        Self {
            hidden: Mlp::new_random(INPUT_SIZE, hidden_size),
            output: Mlp::new_random(hidden_size, OUTPUT_SIZE),
        }
    }

    /// Builds a controller from explicit parameters.
    ///
    /// `w1` is `hidden × 4`, `b1` has `hidden` entries, `w2` is `2 × hidden`
    /// and `b2` has 2 entries. Any other layout is rejected.
    pub fn from_parts(
        w1: Array2<f32>,
        b1: Array1<f32>,
        w2: Array2<f32>,
        b2: Array1<f32>,
    ) -> Result<Self, ConfigError> {
        let hidden_size = w1.nrows();
        expect_shape("input weights", w1.shape(), &[hidden_size, INPUT_SIZE])?;
        expect_shape("hidden biases", b1.shape(), &[hidden_size])?;
        expect_shape("output weights", w2.shape(), &[OUTPUT_SIZE, hidden_size])?;
        expect_shape("output biases", b2.shape(), &[OUTPUT_SIZE])?;
        if hidden_size == 0 {
            return Err(ConfigError::NonPositive {
                name: "hidden_size",
                value: 0.0,
            });
        }

        Ok(Self {
            hidden: Mlp {
                weights: w1,
                biases: b1,
            },
            output: Mlp {
                weights: w2,
                biases: b2,
            },
        })
    }

    /// Creates a controller whose outputs are always exactly zero.
    ///
    /// All weights and biases are zero, so both outputs are `2 * sigmoid(0) - 1`.
    pub fn idle(hidden_size: usize) -> Self {
        Self {
            hidden: Mlp {
                weights: Array2::zeros((hidden_size, INPUT_SIZE)),
                biases: Array1::zeros(hidden_size),
            },
            output: Mlp {
                weights: Array2::zeros((OUTPUT_SIZE, hidden_size)),
                biases: Array1::zeros(OUTPUT_SIZE),
            },
        }
    }

    /// Returns a mutated copy for an offspring. Shapes are preserved exactly.
    pub fn inherit(&self, mutation_rate: f32) -> Self {
        Self {
            hidden: self.hidden.inherit(mutation_rate),
            output: self.output.inherit(mutation_rate),
        }
    }

    /// Width of the hidden layer.
    pub fn hidden_size(&self) -> usize {
        self.hidden.output_size()
    }

    /// Input-to-hidden layer.
    pub fn hidden_layer(&self) -> &Mlp {
        &self.hidden
    }

    /// Hidden-to-output layer.
    pub fn output_layer(&self) -> &Mlp {
        &self.output
    }

    /// Maps a sensory vector to turn and move signals.
    #[inline]
    pub fn forward(&self, inputs: &[f32; INPUT_SIZE]) -> MotorSignals {
        let [turn, movement] = self.activations(inputs).outputs;
        MotorSignals { turn, movement }
    }

    /// Runs the decision pass and keeps the intermediate activations.
    pub fn activations(&self, inputs: &[f32; INPUT_SIZE]) -> Activations {
        let hidden = self.hidden.forward(&Array1::from(inputs.to_vec()));
        let out = self.output.forward(&hidden);
        Activations {
            inputs: *inputs,
            hidden,
            // Rescale the logistic output from (0, 1) to (-1, 1).
            outputs: [2.0 * out[0] - 1.0, 2.0 * out[1] - 1.0],
        }
    }
}

fn expect_shape(layer: &'static str, actual: &[usize], expected: &[usize]) -> Result<(), ConfigError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ConfigError::ControllerShape {
            layer,
            actual: actual.to_vec(),
            expected: expected.to_vec(),
        })
    }
}
