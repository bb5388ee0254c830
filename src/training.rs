//! Labeled-example accumulation and batched training.
//!
//! Outcomes arrive one episode at a time; training only runs once a full
//! batch has accumulated, trading responsiveness for training stability.
//! While learning mode is engaged the buffer is frozen: `add` is silently
//! ignored and `maybe_train` never fires.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BallResult;
use crate::normalize::FEATURE_COUNT;
use crate::predictor::Predictor;
use crate::rng::DemoRng;

/// A normalized feature vector plus its realized outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Normalized `[jump_power, jump_distance, obstacle_width,
    /// obstacle_height]`.
    pub features: [f64; FEATURE_COUNT],
    /// 1.0 for success, 0.0 for fail.
    pub label: f64,
}

impl TrainingExample {
    /// Create a new example.
    #[must_use]
    pub const fn new(features: [f64; FEATURE_COUNT], label: f64) -> Self {
        Self { features, label }
    }
}

/// Ordered accumulator of training examples, drained in full batches.
#[derive(Debug, Clone)]
pub struct TrainingBuffer {
    examples: Vec<TrainingExample>,
    batch_size: usize,
}

impl TrainingBuffer {
    /// Create an empty buffer with the given batch threshold.
    #[must_use]
    pub const fn new(batch_size: usize) -> Self {
        Self {
            examples: Vec::new(),
            batch_size,
        }
    }

    /// Current number of buffered examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Append an example. No-op while learning mode is engaged.
    pub fn add(&mut self, example: TrainingExample, learning_active: bool) {
        if learning_active {
            return;
        }
        self.examples.push(example);
    }

    /// If learning mode is disengaged and a full batch has accumulated,
    /// train the predictor on the whole buffer, clear it, and return the
    /// reported error. Otherwise `None`.
    ///
    /// # Errors
    ///
    /// Propagates predictor training errors; the buffer is left untouched in
    /// that case.
    pub fn maybe_train(
        &mut self,
        predictor: &mut Predictor,
        rng: &mut DemoRng,
        learning_active: bool,
    ) -> BallResult<Option<f64>> {
        if learning_active || self.examples.len() < self.batch_size {
            return Ok(None);
        }

        let error = predictor.train(&self.examples, rng)?;
        self.examples.clear();
        info!(error, "predictor trained on full batch");
        Ok(Some(error))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::PredictorConfig;

    fn example(label: f64) -> TrainingExample {
        TrainingExample::new([0.5, 0.5, 0.5, 0.5], label)
    }

    fn setup() -> (TrainingBuffer, Predictor, DemoRng) {
        let mut rng = DemoRng::new(42);
        let predictor = Predictor::new(&PredictorConfig::default(), &mut rng);
        (TrainingBuffer::new(10), predictor, rng)
    }

    #[test]
    fn test_add_appends_when_disengaged() {
        let (mut buffer, _, _) = setup();
        buffer.add(example(1.0), false);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_add_ignored_while_learning_engaged() {
        let (mut buffer, _, _) = setup();
        for _ in 0..20 {
            buffer.add(example(1.0), true);
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_maybe_train_below_threshold_is_noop() {
        let (mut buffer, mut predictor, mut rng) = setup();
        for _ in 0..9 {
            buffer.add(example(1.0), false);
        }
        let result = buffer.maybe_train(&mut predictor, &mut rng, false).unwrap();
        assert!(result.is_none());
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn test_exactly_one_training_call_per_full_batch() {
        let (mut buffer, mut predictor, mut rng) = setup();

        let mut training_calls = 0;
        for _ in 0..10 {
            buffer.add(example(1.0), false);
            if buffer
                .maybe_train(&mut predictor, &mut rng, false)
                .unwrap()
                .is_some()
            {
                training_calls += 1;
            }
        }

        assert_eq!(training_calls, 1);
        assert!(buffer.is_empty(), "buffer must be drained after training");
    }

    #[test]
    fn test_length_stays_below_threshold_after_training() {
        let (mut buffer, mut predictor, mut rng) = setup();
        for round in 0..35 {
            buffer.add(example(f64::from(round % 2)), false);
            buffer.maybe_train(&mut predictor, &mut rng, false).unwrap();
            assert!(buffer.len() < 10);
        }
    }

    #[test]
    fn test_maybe_train_noop_while_engaged() {
        let (mut buffer, mut predictor, mut rng) = setup();
        for _ in 0..10 {
            buffer.add(example(1.0), false);
        }
        // Full buffer, but engaged mode must not train or drain
        let result = buffer.maybe_train(&mut predictor, &mut rng, true).unwrap();
        assert!(result.is_none());
        assert_eq!(buffer.len(), 10);
    }

    #[test]
    fn test_training_error_reported() {
        let (mut buffer, mut predictor, mut rng) = setup();
        for _ in 0..10 {
            buffer.add(example(1.0), false);
        }
        let error = buffer
            .maybe_train(&mut predictor, &mut rng, false)
            .unwrap()
            .unwrap();
        assert!(error.is_finite());
        assert!(error >= 0.0);
    }
}
