//! Episode lifecycle: sampling, parameter choice, and world setup.
//!
//! A new episode replaces the whole body set in one swap so no step ever
//! observes a half-built world. Obstacle dimensions are always drawn fresh;
//! jump parameters come from the RNG while the controller is exploring and
//! from the grid search once learning mode is engaged.

use tracing::debug;

use crate::config::DemoConfig;
use crate::error::BallResult;
use crate::normalize::{JumpParams, Normalizer};
use crate::physics::{Body, BodyKind, Vec2, World};
use crate::predictor::Predictor;
use crate::rng::DemoRng;
use crate::search;

/// One attempt at clearing one obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Episode {
    /// The jump parameters and obstacle dimensions in play.
    pub params: JumpParams,
    /// Predicted success probability for these parameters, recorded at
    /// episode start for the end-of-episode report.
    pub predicted: f64,
    /// Whether the single allowed jump has been spent.
    pub has_jumped: bool,
}

/// Builds episodes and installs their bodies into the world.
#[derive(Debug, Clone)]
pub struct EpisodeGenerator {
    config: DemoConfig,
    normalizer: Normalizer,
}

impl EpisodeGenerator {
    /// Create a generator for the given configuration.
    #[must_use]
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            config: config.clone(),
            normalizer: Normalizer::from_config(config),
        }
    }

    /// The normalizer shared with training and search.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Start a new episode: sample the obstacle, pick jump parameters,
    /// record the prediction, and rebuild the world.
    ///
    /// Draw order is fixed (obstacle width, obstacle height, then the random
    /// jump parameters when exploring) so runs with equal seeds replay
    /// identically.
    ///
    /// # Errors
    ///
    /// Propagates predictor evaluation errors from the parameter search.
    pub fn next_episode(
        &self,
        predictor: &Predictor,
        rng: &mut DemoRng,
        learning_active: bool,
        world: &mut World,
    ) -> BallResult<Episode> {
        let s = &self.config.search;
        let obstacle_width = rng.gen_range_f64(s.obstacle_min, s.obstacle_max);
        let obstacle_height = rng.gen_range_f64(s.obstacle_min, s.obstacle_max);

        let (jump_power, jump_distance) = if learning_active {
            let choice = search::search(
                predictor,
                &self.normalizer,
                obstacle_width,
                obstacle_height,
                s,
                self.config.half_width(),
            )?;
            (choice.jump_power, choice.jump_distance)
        } else {
            (
                rng.gen_range_f64(f64::from(s.power_min), s.random_power_max),
                rng.gen_range_f64(s.distance_min, self.config.half_width()),
            )
        };

        let params = JumpParams {
            jump_power,
            jump_distance,
            obstacle_width,
            obstacle_height,
        };
        let predicted = predictor.predict(&self.normalizer.normalize(&params))?;

        self.install_bodies(&params, world);

        debug!(
            jump_power,
            jump_distance,
            obstacle_width,
            obstacle_height,
            predicted,
            learning_active,
            "episode started"
        );

        Ok(Episode {
            params,
            predicted,
            has_jumped: false,
        })
    }

    /// Swap in the ground, the freshly sized obstacle, and the ball at its
    /// start position with the forced horizontal speed.
    fn install_bodies(&self, params: &JumpParams, world: &mut World) {
        let f = &self.config.field;
        let ground_top = f.ground_top();

        let ground = Body::static_rect(
            BodyKind::Ground,
            Vec2::new(f.width / 2.0, f.height - f.ground_thickness / 2.0),
            f.width,
            f.ground_thickness,
        );
        let obstacle = Body::static_rect(
            BodyKind::Obstacle,
            Vec2::new(self.config.mid_x(), ground_top - params.obstacle_height / 2.0),
            params.obstacle_width,
            params.obstacle_height,
        );
        let mut ball = Body::dynamic_circle(
            BodyKind::Ball,
            Vec2::new(f.ball_start_x, ground_top - f.ball_radius),
            f.ball_radius,
            1.0,
        );
        ball.velocity = Vec2::new(f.ball_speed, 0.0);

        world.replace_bodies(vec![ground, obstacle, ball]);
    }
}
