//! Feed-forward success-probability predictor.
//!
//! A 4 → 32 → 1 sigmoid network used as an opaque trainable function
//! approximator: nothing about the architecture is load-bearing beyond the
//! input/output contract and incremental trainability. Weights are
//! initialized from the demo's seeded RNG so runs are reproducible; nothing
//! is persisted between runs.

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::{BallError, BallResult};
use crate::normalize::FEATURE_COUNT;
use crate::rng::DemoRng;
use crate::training::TrainingExample;

/// Logistic sigmoid.
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Trainable feed-forward predictor mapping a normalized 4-feature vector to
/// a success probability.
#[derive(Debug, Clone)]
pub struct Predictor {
    /// Hidden layer weights, `hidden_units × FEATURE_COUNT`.
    w1: Array2<f64>,
    /// Hidden layer biases.
    b1: Array1<f64>,
    /// Output weights, one row.
    w2: Array1<f64>,
    /// Output bias.
    b2: f64,
    learning_rate: f64,
    passes: usize,
}

impl Predictor {
    /// Create a predictor with scaled uniform random initialization drawn
    /// from the demo RNG.
    #[must_use]
    pub fn new(config: &PredictorConfig, rng: &mut DemoRng) -> Self {
        let hidden = config.hidden_units;

        let scale_hidden = (2.0 / (FEATURE_COUNT + hidden) as f64).sqrt();
        let scale_output = (2.0 / (hidden + 1) as f64).sqrt();

        let w1 = Array2::from_shape_fn((hidden, FEATURE_COUNT), |_| {
            rng.gen_range_f64(-scale_hidden, scale_hidden)
        });
        let b1 = Array1::zeros(hidden);
        let w2 = Array1::from_shape_fn(hidden, |_| {
            rng.gen_range_f64(-scale_output, scale_output)
        });

        Self {
            w1,
            b1,
            w2,
            b2: 0.0,
            learning_rate: config.learning_rate,
            passes: config.passes,
        }
    }

    /// Evaluate the current network on a feature vector.
    ///
    /// Deterministic given the current trained weights.
    ///
    /// # Errors
    ///
    /// Returns `BallError::FeatureShape` if the vector does not have exactly
    /// four fields.
    pub fn predict(&self, features: &[f64]) -> BallResult<f64> {
        if features.len() != FEATURE_COUNT {
            return Err(BallError::feature_shape(FEATURE_COUNT, features.len()));
        }
        let x = Array1::from_iter(features.iter().copied());
        let (_, output) = self.forward(&x);
        Ok(output)
    }

    /// Run one training call: a fixed number of shuffled SGD passes over the
    /// batch with mean-squared-error loss. Mutates the weights and returns
    /// the batch error after the final pass.
    ///
    /// # Errors
    ///
    /// Returns `BallError::Training` if the batch is empty.
    pub fn train(&mut self, batch: &[TrainingExample], rng: &mut DemoRng) -> BallResult<f64> {
        if batch.is_empty() {
            return Err(BallError::training("cannot train on an empty batch"));
        }

        let mut order: Vec<usize> = (0..batch.len()).collect();
        for _ in 0..self.passes {
            rng.shuffle(&mut order);
            for &idx in &order {
                let example = &batch[idx];
                let x = Array1::from_iter(example.features.iter().copied());
                self.sgd_step(&x, example.label);
            }
        }

        // Report the error the caller displays: mean squared error over the
        // batch with the updated weights.
        let mut error = 0.0;
        for example in batch {
            let x = Array1::from_iter(example.features.iter().copied());
            let (_, output) = self.forward(&x);
            error += (output - example.label).powi(2);
        }
        error /= batch.len() as f64;

        debug!(batch = batch.len(), error, "training step complete");
        Ok(error)
    }

    /// Forward pass returning hidden activations and output.
    fn forward(&self, x: &Array1<f64>) -> (Array1<f64>, f64) {
        let hidden = (self.w1.dot(x) + &self.b1).mapv(sigmoid);
        let output = sigmoid(self.w2.dot(&hidden) + self.b2);
        (hidden, output)
    }

    /// One per-example gradient update under MSE loss.
    fn sgd_step(&mut self, x: &Array1<f64>, target: f64) {
        let (hidden, output) = self.forward(x);

        let out_delta = (output - target) * output * (1.0 - output);

        for i in 0..self.w2.len() {
            let hidden_delta = out_delta * self.w2[i] * hidden[i] * (1.0 - hidden[i]);
            self.w2[i] -= self.learning_rate * out_delta * hidden[i];
            for j in 0..x.len() {
                self.w1[[i, j]] -= self.learning_rate * hidden_delta * x[j];
            }
            self.b1[i] -= self.learning_rate * hidden_delta;
        }
        self.b2 -= self.learning_rate * out_delta;
    }
}
