//! Episode outcome rules and end-of-episode reporting.
//!
//! Pure functions over the post-step world state so the rules are testable
//! without running the control loop. An episode ends at the first terminal
//! condition observed; bounds checks take priority over contact checks
//! within a step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::episode::Episode;
use crate::physics::{Body, BodyKind, Contact};

/// Terminal result of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The ball cleared the obstacle.
    Success,
    /// The ball struck the obstacle, landed short, or left the field.
    Fail,
}

impl Outcome {
    /// Training label for this outcome.
    #[must_use]
    pub const fn label(self) -> f64 {
        match self {
            Self::Success => 1.0,
            Self::Fail => 0.0,
        }
    }
}

/// Whether the single jump of the episode is due this step.
///
/// Fires when the horizontal gap between the ball center and the obstacle's
/// near face has closed to the episode's jump distance.
#[must_use]
pub fn jump_due(ball_x: f64, obstacle_leading_edge: f64, jump_distance: f64) -> bool {
    obstacle_leading_edge - ball_x <= jump_distance
}

/// Resolve the step's terminal condition, if any.
///
/// - Leaving the field on the left fails, on the right succeeds.
/// - Touching the obstacle fails unless the ball center has cleared the
///   obstacle's top edge (grazing the top while passing over is not a
///   strike).
/// - Touching the ground after the jump ends the episode: success when the
///   ball came down past the obstacle's center line, fail when it landed
///   short.
#[must_use]
pub fn resolve(
    ball: &Body,
    contacts: &[Contact],
    episode: &Episode,
    field_width: f64,
    obstacle_top: f64,
    obstacle_center_x: f64,
) -> Option<Outcome> {
    if ball.position.x < 0.0 {
        return Some(Outcome::Fail);
    }
    if ball.position.x >= field_width {
        return Some(Outcome::Success);
    }

    for contact in contacts {
        match contact.with {
            BodyKind::Obstacle => {
                if ball.position.y > obstacle_top {
                    return Some(Outcome::Fail);
                }
            }
            BodyKind::Ground => {
                if episode.has_jumped {
                    return Some(if ball.position.x > obstacle_center_x {
                        Outcome::Success
                    } else {
                        Outcome::Fail
                    });
                }
            }
            BodyKind::Ball => {}
        }
    }

    None
}

/// End-of-episode record pairing the stored prediction with the realized
/// label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Episode sequence number at the time the outcome landed.
    pub sequence: u64,
    /// Success probability predicted at episode start.
    pub predicted: f64,
    /// Realized label, 1 for success and 0 for fail.
    pub label: f64,
    /// Whether the prediction agreed with the outcome. A prediction of
    /// exactly 0.5 counts as a mismatch either way.
    pub matched: bool,
}

impl EpisodeReport {
    /// Build the report for a finished episode.
    #[must_use]
    pub fn new(sequence: u64, predicted: f64, outcome: Outcome) -> Self {
        let label = outcome.label();
        let matched = match outcome {
            Outcome::Success => predicted > 0.5,
            Outcome::Fail => predicted < 0.5,
        };
        Self {
            sequence,
            predicted,
            label,
            matched,
        }
    }
}

impl fmt::Display for EpisodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} Pred: {:.4} Real: {}",
            self.sequence, self.predicted, self.label
        )
    }
}
