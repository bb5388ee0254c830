//! Parameter normalization for the predictor.
//!
//! Maps raw physical quantities into the predictor's training range and back.
//! Fixed per-field scale divisors; no clamping. Values sampled outside the
//! designed bounds simply leave the nominal [0, 1] range, which is accepted.

use serde::{Deserialize, Serialize};

use crate::config::DemoConfig;

/// Number of predictor input features.
pub const FEATURE_COUNT: usize = 4;

/// Raw episode parameters fed to the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JumpParams {
    /// Initial upward velocity magnitude applied at jump time.
    pub jump_power: f64,
    /// Horizontal gap from the obstacle at which a jump is triggered.
    pub jump_distance: f64,
    /// Obstacle width.
    pub obstacle_width: f64,
    /// Obstacle height.
    pub obstacle_height: f64,
}

/// Fixed-divisor normalizer, an exact inverse pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalizer {
    power_scale: f64,
    distance_scale: f64,
    obstacle_scale: f64,
}

impl Normalizer {
    /// Build the normalizer from configuration: obstacle dimensions divide by
    /// the sampling upper bound, jump power by the search upper bound, jump
    /// distance by half the field width.
    #[must_use]
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            power_scale: f64::from(config.search.power_max),
            distance_scale: config.half_width(),
            obstacle_scale: config.search.obstacle_max,
        }
    }

    /// Map raw parameters into the predictor's training range.
    #[must_use]
    pub fn normalize(&self, params: &JumpParams) -> [f64; FEATURE_COUNT] {
        [
            params.jump_power / self.power_scale,
            params.jump_distance / self.distance_scale,
            params.obstacle_width / self.obstacle_scale,
            params.obstacle_height / self.obstacle_scale,
        ]
    }

    /// Recover raw parameters from normalized features.
    #[must_use]
    pub fn denormalize(&self, features: &[f64; FEATURE_COUNT]) -> JumpParams {
        JumpParams {
            jump_power: features[0] * self.power_scale,
            jump_distance: features[1] * self.distance_scale,
            obstacle_width: features[2] * self.obstacle_scale,
            obstacle_height: features[3] * self.obstacle_scale,
        }
    }
}
