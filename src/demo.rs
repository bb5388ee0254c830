//! The smart-ball control loop.
//!
//! [`SmartBallDemo`] owns the whole state machine: configuration, RNG,
//! world, predictor, training buffer, and the episode in flight. Each call
//! to [`SmartBallDemo::step`] advances the world one tick, fires the jump
//! when due, resolves any terminal condition, and rolls the learning loop
//! forward on episode end. Everything is single-threaded and deterministic
//! under a fixed seed.

use tracing::{info, warn};

use crate::config::DemoConfig;
use crate::episode::{Episode, EpisodeGenerator};
use crate::error::{BallError, BallResult};
use crate::normalize::JumpParams;
use crate::outcome::{self, EpisodeReport, Outcome};
use crate::physics::{Body, BodyKind, Shape, World};
use crate::predictor::Predictor;
use crate::rng::DemoRng;
use crate::training::{TrainingBuffer, TrainingExample};

// Generous upper bound on steps per episode; a healthy episode ends within
// a few thousand.
const MAX_STEPS_PER_EPISODE: u64 = 100_000;

/// The demo state machine.
#[derive(Debug)]
pub struct SmartBallDemo {
    config: DemoConfig,
    rng: DemoRng,
    generator: EpisodeGenerator,
    predictor: Predictor,
    buffer: TrainingBuffer,
    world: World,
    episode: Episode,
    running: bool,
    learning_active: bool,
    fail_count: u64,
    success_count: u64,
    last_error: Option<f64>,
    last_report: Option<EpisodeReport>,
}

impl SmartBallDemo {
    /// Build the demo and install the first episode. Starts paused with
    /// learning mode disengaged.
    ///
    /// # Errors
    ///
    /// Propagates predictor evaluation errors from episode setup.
    pub fn new(config: DemoConfig) -> BallResult<Self> {
        let mut rng = DemoRng::new(config.seed);
        let generator = EpisodeGenerator::new(&config);
        let predictor = Predictor::new(&config.predictor, &mut rng);
        let buffer = TrainingBuffer::new(config.predictor.batch_size);
        let mut world = World::new(config.field.gravity);

        let episode = generator.next_episode(&predictor, &mut rng, false, &mut world)?;

        Ok(Self {
            config,
            rng,
            generator,
            predictor,
            buffer,
            world,
            episode,
            running: false,
            learning_active: false,
            fail_count: 0,
            success_count: 0,
            last_error: None,
            last_report: None,
        })
    }

    /// Resume stepping. Idempotent.
    pub fn on_start(&mut self) {
        self.running = true;
    }

    /// Pause stepping. Idempotent; the world and counters are untouched.
    pub fn on_pause(&mut self) {
        self.running = false;
    }

    /// Abandon the episode in flight and start a fresh one. Counters,
    /// predictor, and buffer are untouched; no outcome is recorded.
    ///
    /// # Errors
    ///
    /// Propagates predictor evaluation errors from episode setup.
    pub fn on_refresh(&mut self) -> BallResult<()> {
        self.start_episode()
    }

    /// Flip learning mode and return the new state. Takes effect at the
    /// next episode transition; the episode in flight keeps its parameters.
    pub fn on_toggle_learning(&mut self) -> bool {
        self.learning_active = !self.learning_active;
        info!(engaged = self.learning_active, "learning mode toggled");
        self.learning_active
    }

    /// Advance the world by one tick.
    ///
    /// Returns the episode report when this step ended an episode, `None`
    /// otherwise. A paused demo does nothing.
    ///
    /// # Errors
    ///
    /// Propagates training and episode-setup errors.
    pub fn step(&mut self) -> BallResult<Option<EpisodeReport>> {
        if !self.running {
            return Ok(None);
        }

        let (leading_edge, obstacle_top, obstacle_center_x) = self.obstacle_extents()?;

        // Horizontal speed is forced every step; only the vertical axis is
        // left to physics.
        let speed = self.config.field.ball_speed;
        if let Some(ball) = self.world.body_mut(BodyKind::Ball) {
            ball.velocity.x = speed;
        }

        // The jump decision reads the pre-step position so the trigger
        // distance is honored before the ball moves past it.
        if !self.episode.has_jumped {
            let ball_x = self.ball()?.position.x;
            if outcome::jump_due(ball_x, leading_edge, self.episode.params.jump_distance) {
                let power = self.episode.params.jump_power;
                if let Some(ball) = self.world.body_mut(BodyKind::Ball) {
                    ball.velocity.y = -power;
                }
                self.episode.has_jumped = true;
            }
        }

        let contacts = self.world.step();
        let ball = *self.ball()?;

        let outcome = outcome::resolve(
            &ball,
            &contacts,
            &self.episode,
            self.config.field.width,
            obstacle_top,
            obstacle_center_x,
        );

        match outcome {
            Some(outcome) => self.finish_episode(outcome).map(Some),
            None => Ok(None),
        }
    }

    /// Run the demo until `episodes` episodes have completed, collecting
    /// their reports.
    ///
    /// # Errors
    ///
    /// Returns a state error if an episode fails to terminate, and
    /// propagates step errors.
    pub fn run_episodes(&mut self, episodes: usize) -> BallResult<Vec<EpisodeReport>> {
        self.on_start();
        let mut reports = Vec::with_capacity(episodes);
        while reports.len() < episodes {
            let mut steps = 0u64;
            loop {
                if let Some(report) = self.step()? {
                    reports.push(report);
                    break;
                }
                steps += 1;
                if steps > MAX_STEPS_PER_EPISODE {
                    return Err(BallError::state("episode did not terminate"));
                }
            }
        }
        Ok(reports)
    }

    /// Episodes failed so far. Frozen while learning mode is engaged.
    #[must_use]
    pub const fn fail_count(&self) -> u64 {
        self.fail_count
    }

    /// Episodes succeeded so far. Frozen while learning mode is engaged.
    #[must_use]
    pub const fn success_count(&self) -> u64 {
        self.success_count
    }

    /// Whether stepping is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether jump parameters come from the search.
    #[must_use]
    pub const fn learning_active(&self) -> bool {
        self.learning_active
    }

    /// The episode currently in flight.
    #[must_use]
    pub const fn episode(&self) -> &Episode {
        &self.episode
    }

    /// The live world, for rendering or inspection.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Report of the most recently finished episode.
    #[must_use]
    pub const fn last_report(&self) -> Option<&EpisodeReport> {
        self.last_report.as_ref()
    }

    /// Mean squared error of the most recent training pass.
    #[must_use]
    pub const fn last_error(&self) -> Option<f64> {
        self.last_error
    }

    /// Number of examples waiting in the training buffer.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Record the outcome, feed the learning loop, and start the next
    /// episode.
    fn finish_episode(&mut self, outcome: Outcome) -> BallResult<EpisodeReport> {
        if !self.learning_active {
            match outcome {
                Outcome::Success => self.success_count += 1,
                Outcome::Fail => self.fail_count += 1,
            }
        }

        let sequence = self.fail_count + self.success_count;
        let report = EpisodeReport::new(sequence, self.episode.predicted, outcome);
        info!(%report, matched = report.matched, "episode finished");
        self.last_report = Some(report);

        let features = self.generator.normalizer().normalize(&self.episode.params);
        self.buffer.add(
            TrainingExample::new(features, outcome.label()),
            self.learning_active,
        );
        if let Some(error) =
            self.buffer
                .maybe_train(&mut self.predictor, &mut self.rng, self.learning_active)?
        {
            self.last_error = Some(error);
        }

        self.start_episode()?;
        Ok(report)
    }

    /// Install a new episode. A feature-shape fault from the search is
    /// degraded to a randomly parameterized episode rather than halting the
    /// demo.
    fn start_episode(&mut self) -> BallResult<()> {
        match self.generator.next_episode(
            &self.predictor,
            &mut self.rng,
            self.learning_active,
            &mut self.world,
        ) {
            Ok(episode) => {
                self.episode = episode;
                Ok(())
            }
            Err(BallError::FeatureShape { expected, got }) => {
                warn!(
                    expected,
                    got, "malformed feature vector during search, falling back to random episode"
                );
                self.episode = self
                    .generator
                    .next_episode(&self.predictor, &mut self.rng, false, &mut self.world)?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn ball(&self) -> BallResult<&Body> {
        self.world
            .body(BodyKind::Ball)
            .ok_or_else(|| BallError::state("world is missing the ball body"))
    }

    /// Leading-edge x, top-edge y, and center x of the obstacle.
    fn obstacle_extents(&self) -> BallResult<(f64, f64, f64)> {
        let obstacle = self
            .world
            .body(BodyKind::Obstacle)
            .ok_or_else(|| BallError::state("world is missing the obstacle body"))?;
        let Shape::Rect { width, height } = obstacle.shape else {
            return Err(BallError::state("obstacle body is not a rectangle"));
        };
        Ok((
            obstacle.position.x - width / 2.0,
            obstacle.position.y - height / 2.0,
            obstacle.position.x,
        ))
    }

    /// Parameters of the episode in flight.
    #[must_use]
    pub const fn params(&self) -> &JumpParams {
        &self.episode.params
    }
}
