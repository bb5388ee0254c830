//! Exhaustive jump-parameter search.
//!
//! Once the predictor is trusted, every integer (jump power, jump distance)
//! pair in the admissible grid is evaluated against the current obstacle.
//! Survivors above the confidence threshold compete on effort: the smallest
//! jump power wins, ties broken by enumeration order (smallest distance
//! first). The scan is synchronous and is the dominant cost of a
//! learning-mode episode transition; that latency is accepted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::BallResult;
use crate::normalize::{JumpParams, Normalizer};
use crate::predictor::Predictor;

/// Result of a parameter search.
///
/// A non-viable result carries zero power and distance, which
/// deterministically fails the next episode: the ball cannot clear a
/// nonzero obstacle without jumping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpChoice {
    /// Chosen jump power, 0 when no candidate survived.
    pub jump_power: f64,
    /// Chosen jump distance, 0 when no candidate survived.
    pub jump_distance: f64,
    /// Predicted success probability of the chosen candidate, 0 when no
    /// candidate survived.
    pub probability: f64,
    /// Whether any candidate cleared the confidence threshold.
    pub viable: bool,
}

impl JumpChoice {
    /// The no-viable-jump fallback.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            jump_power: 0.0,
            jump_distance: 0.0,
            probability: 0.0,
            viable: false,
        }
    }
}

/// Scan the full grid for the given obstacle using the predictor.
///
/// # Errors
///
/// Propagates predictor evaluation errors.
pub fn search(
    predictor: &Predictor,
    normalizer: &Normalizer,
    obstacle_width: f64,
    obstacle_height: f64,
    config: &SearchConfig,
    half_width: f64,
) -> BallResult<JumpChoice> {
    search_with(obstacle_width, obstacle_height, config, half_width, |params| {
        predictor.predict(&normalizer.normalize(params))
    })
}

/// Grid scan over an arbitrary evaluation function.
///
/// Separated from the predictor so the selection logic is testable against
/// synthetic probability surfaces.
///
/// # Errors
///
/// Propagates evaluation errors.
pub fn search_with<F>(
    obstacle_width: f64,
    obstacle_height: f64,
    config: &SearchConfig,
    half_width: f64,
    mut evaluate: F,
) -> BallResult<JumpChoice>
where
    F: FnMut(&JumpParams) -> BallResult<f64>,
{
    let distance_min = config.distance_min as u32;
    let distance_max = half_width as u32;

    let mut best: Option<JumpChoice> = None;
    let mut evaluated = 0u64;

    for power in config.power_min..=config.power_max {
        for distance in distance_min..=distance_max {
            let params = JumpParams {
                jump_power: f64::from(power),
                jump_distance: f64::from(distance),
                obstacle_width,
                obstacle_height,
            };
            let probability = evaluate(&params)?;
            evaluated += 1;

            if probability <= config.confidence {
                continue;
            }
            // Strict comparison keeps the first-enumerated candidate on
            // equal power, i.e. the smallest distance.
            let better = best.map_or(true, |b| params.jump_power < b.jump_power);
            if better {
                best = Some(JumpChoice {
                    jump_power: params.jump_power,
                    jump_distance: params.jump_distance,
                    probability,
                    viable: true,
                });
            }
        }
    }

    let choice = best.unwrap_or(JumpChoice::none());
    debug!(
        evaluated,
        viable = choice.viable,
        power = choice.jump_power,
        distance = choice.jump_distance,
        probability = choice.probability,
        "parameter search complete"
    );
    Ok(choice)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const HALF_WIDTH: f64 = 500.0;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    #[test]
    fn test_no_survivor_returns_zero_fallback() {
        let choice =
            search_with(100.0, 100.0, &config(), HALF_WIDTH, |_| Ok(0.5)).unwrap();
        assert_eq!(choice, JumpChoice::none());
        assert!((choice.jump_power).abs() < f64::EPSILON);
        assert!((choice.jump_distance).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly 0.95 must not survive
        let choice =
            search_with(100.0, 100.0, &config(), HALF_WIDTH, |_| Ok(0.95)).unwrap();
        assert!(!choice.viable);
    }

    #[test]
    fn test_selects_minimum_power_survivor() {
        let choice = search_with(100.0, 100.0, &config(), HALF_WIDTH, |p| {
            Ok(if p.jump_power >= 17.0 { 0.99 } else { 0.1 })
        })
        .unwrap();
        assert!(choice.viable);
        assert!((choice.jump_power - 17.0).abs() < f64::EPSILON);
        assert!(choice.probability > 0.95);
    }

    #[test]
    fn test_power_ties_break_to_first_enumerated_distance() {
        let choice = search_with(100.0, 100.0, &config(), HALF_WIDTH, |p| {
            let hit = (p.jump_power - 5.0).abs() < f64::EPSILON
                && (p.jump_distance == 60.0 || p.jump_distance == 70.0);
            Ok(if hit { 0.99 } else { 0.0 })
        })
        .unwrap();
        assert!((choice.jump_power - 5.0).abs() < f64::EPSILON);
        assert!((choice.jump_distance - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_never_returns_survivor_at_or_below_threshold() {
        let choice = search_with(100.0, 100.0, &config(), HALF_WIDTH, |p| {
            // A synthetic surface with values straddling the threshold
            Ok((p.jump_power / 30.0).min(0.97))
        })
        .unwrap();
        assert!(choice.viable);
        assert!(choice.probability > 0.95);
    }

    #[test]
    fn test_grid_covers_full_ranges() {
        let mut min_seen = (f64::MAX, f64::MAX);
        let mut max_seen = (f64::MIN, f64::MIN);
        search_with(100.0, 100.0, &config(), HALF_WIDTH, |p| {
            min_seen.0 = min_seen.0.min(p.jump_power);
            min_seen.1 = min_seen.1.min(p.jump_distance);
            max_seen.0 = max_seen.0.max(p.jump_power);
            max_seen.1 = max_seen.1.max(p.jump_distance);
            Ok(0.0)
        })
        .unwrap();
        assert!((min_seen.0 - 1.0).abs() < f64::EPSILON);
        assert!((max_seen.0 - 30.0).abs() < f64::EPSILON);
        assert!((min_seen.1 - 50.0).abs() < f64::EPSILON);
        assert!((max_seen.1 - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_obstacle_dimensions_held_fixed() {
        search_with(123.0, 456.0, &config(), HALF_WIDTH, |p| {
            assert!((p.obstacle_width - 123.0).abs() < f64::EPSILON);
            assert!((p.obstacle_height - 456.0).abs() < f64::EPSILON);
            Ok(0.0)
        })
        .unwrap();
    }

    #[test]
    fn test_search_with_real_predictor_runs() {
        use crate::config::DemoConfig;
        use crate::predictor::Predictor;
        use crate::rng::DemoRng;

        let demo_config = DemoConfig::default();
        let mut rng = DemoRng::new(42);
        let predictor = Predictor::new(&demo_config.predictor, &mut rng);
        let normalizer = Normalizer::from_config(&demo_config);

        let choice = search(
            &predictor,
            &normalizer,
            200.0,
            150.0,
            &demo_config.search,
            demo_config.half_width(),
        )
        .unwrap();

        // Either a genuine survivor or the zero fallback; never in between.
        if choice.viable {
            assert!(choice.probability > 0.95);
        } else {
            assert_eq!(choice, JumpChoice::none());
        }
    }
}
