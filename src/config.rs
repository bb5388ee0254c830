//! Configuration system with YAML schema and validation.
//!
//! Mistake-proofing through:
//! - Type-safe configuration structs
//! - Compile-time validation via serde
//! - Runtime semantic validation
//!
//! The demo is parameter-free at startup beyond the constants here; defaults
//! reproduce the original demo geometry (600 px tall field, 20 px ground,
//! 25 px ball starting at x = 50).

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{BallError, BallResult};

/// Top-level demo configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Master seed for all RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Field and body geometry.
    #[validate(nested)]
    #[serde(default)]
    pub field: FieldConfig,

    /// Predictor architecture and training settings.
    #[validate(nested)]
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Parameter search and sampling settings.
    #[validate(nested)]
    #[serde(default)]
    pub search: SearchConfig,
}

const fn default_seed() -> u64 {
    42
}

impl DemoConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, YAML parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> BallResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> BallResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> DemoConfigBuilder {
        DemoConfigBuilder::default()
    }

    /// Half the field width, the upper bound of the jump-distance range and
    /// the normalization divisor for jump distance.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.field.width / 2.0
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> BallResult<()> {
        if self.search.distance_min >= self.half_width() {
            return Err(BallError::config(format!(
                "Minimum jump distance {} must be below half the field width {}",
                self.search.distance_min,
                self.half_width()
            )));
        }
        if self.search.power_min > self.search.power_max {
            return Err(BallError::config(
                "Jump power range is empty: power_min > power_max",
            ));
        }
        if self.search.obstacle_min > self.search.obstacle_max {
            return Err(BallError::config(
                "Obstacle size range is empty: obstacle_min > obstacle_max",
            ));
        }
        if !(0.0..1.0).contains(&self.search.confidence) {
            return Err(BallError::config(format!(
                "Confidence threshold {} must be in (0, 1)",
                self.search.confidence
            )));
        }
        if self.field.ball_start_x + self.field.ball_radius >= self.mid_x() {
            return Err(BallError::config(
                "Ball start position must lie left of the obstacle",
            ));
        }
        Ok(())
    }

    /// Horizontal midpoint of the field, where the obstacle stands.
    #[must_use]
    pub fn mid_x(&self) -> f64 {
        self.field.width / 2.0
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            field: FieldConfig::default(),
            predictor: PredictorConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct DemoConfigBuilder {
    seed: Option<u64>,
    field_width: Option<f64>,
    batch_size: Option<usize>,
    confidence: Option<f64>,
}

impl DemoConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the field width in pixels.
    #[must_use]
    pub const fn field_width(mut self, width: f64) -> Self {
        self.field_width = Some(width);
        self
    }

    /// Set the training batch threshold.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the search confidence threshold.
    #[must_use]
    pub const fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> DemoConfig {
        let mut config = DemoConfig::default();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.field_width {
            config.field.width = width;
        }
        if let Some(batch_size) = self.batch_size {
            config.predictor.batch_size = batch_size;
        }
        if let Some(confidence) = self.confidence {
            config.search.confidence = confidence;
        }

        config
    }
}

/// Field and body geometry, in screen coordinates (y grows downward).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FieldConfig {
    /// Field width in pixels.
    #[validate(range(min = 100.0))]
    #[serde(default = "default_width")]
    pub width: f64,

    /// Field height in pixels.
    #[validate(range(min = 100.0))]
    #[serde(default = "default_height")]
    pub height: f64,

    /// Ground plate thickness in pixels.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_ground_thickness")]
    pub ground_thickness: f64,

    /// Ball radius in pixels.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_ball_radius")]
    pub ball_radius: f64,

    /// Fixed horizontal start offset of the ball.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_ball_start_x")]
    pub ball_start_x: f64,

    /// Constant forced horizontal speed of the ball, per step.
    #[validate(range(min = 0.1))]
    #[serde(default = "default_ball_speed")]
    pub ball_speed: f64,

    /// Downward gravity, velocity change per step.
    #[validate(range(min = 0.001))]
    #[serde(default = "default_gravity")]
    pub gravity: f64,
}

fn default_width() -> f64 {
    1000.0
}
fn default_height() -> f64 {
    600.0
}
fn default_ground_thickness() -> f64 {
    20.0
}
fn default_ball_radius() -> f64 {
    25.0
}
fn default_ball_start_x() -> f64 {
    50.0
}
fn default_ball_speed() -> f64 {
    5.0
}
fn default_gravity() -> f64 {
    0.3
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            ground_thickness: default_ground_thickness(),
            ball_radius: default_ball_radius(),
            ball_start_x: default_ball_start_x(),
            ball_speed: default_ball_speed(),
            gravity: default_gravity(),
        }
    }
}

impl FieldConfig {
    /// Y coordinate of the ground's top surface.
    #[must_use]
    pub fn ground_top(&self) -> f64 {
        self.height - self.ground_thickness
    }
}

/// Predictor architecture and training settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictorConfig {
    /// Hidden layer width.
    #[validate(range(min = 1))]
    #[serde(default = "default_hidden_units")]
    pub hidden_units: usize,

    /// SGD learning rate.
    #[validate(range(min = 0.000_001, max = 10.0))]
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Optimization passes over the batch per training call.
    #[validate(range(min = 1))]
    #[serde(default = "default_passes")]
    pub passes: usize,

    /// Buffer length that triggers a training step.
    #[validate(range(min = 1))]
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_hidden_units() -> usize {
    32
}
fn default_learning_rate() -> f64 {
    0.2
}
fn default_passes() -> usize {
    10
}
fn default_batch_size() -> usize {
    10
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            hidden_units: default_hidden_units(),
            learning_rate: default_learning_rate(),
            passes: default_passes(),
            batch_size: default_batch_size(),
        }
    }
}

/// Parameter sampling ranges and search thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Lowest jump power the search evaluates.
    #[validate(range(min = 1))]
    #[serde(default = "default_power_min")]
    pub power_min: u32,

    /// Highest jump power the search evaluates; also the power
    /// normalization divisor.
    #[validate(range(min = 1))]
    #[serde(default = "default_power_max")]
    pub power_max: u32,

    /// Upper bound of the random jump-power sample when learning mode is
    /// disengaged.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_random_power_max")]
    pub random_power_max: f64,

    /// Smallest jump distance sampled or searched.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_distance_min")]
    pub distance_min: f64,

    /// Lower bound of the obstacle width/height sample.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_obstacle_min")]
    pub obstacle_min: f64,

    /// Upper bound of the obstacle width/height sample; also the obstacle
    /// normalization divisor.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_obstacle_max")]
    pub obstacle_max: f64,

    /// Minimum predicted success probability for a viable jump.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_power_min() -> u32 {
    1
}
fn default_power_max() -> u32 {
    30
}
fn default_random_power_max() -> f64 {
    20.0
}
fn default_distance_min() -> f64 {
    50.0
}
fn default_obstacle_min() -> f64 {
    50.0
}
fn default_obstacle_max() -> f64 {
    500.0
}
fn default_confidence() -> f64 {
    0.95
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            power_min: default_power_min(),
            power_max: default_power_max(),
            random_power_max: default_random_power_max(),
            distance_min: default_distance_min(),
            obstacle_min: default_obstacle_min(),
            obstacle_max: default_obstacle_max(),
            confidence: default_confidence(),
        }
    }
}
