//! End-to-end demo tests.
//!
//! Exercises the full control loop through the public API, plus scripted
//! episodes with known geometry where the outcome can be computed by hand.
//! All tests are deterministic and reproducible under fixed seeds.

use smartball::prelude::*;

const FIELD_WIDTH: f64 = 1000.0;
const GROUND_TOP: f64 = 580.0;
const BALL_RADIUS: f64 = 25.0;
const BALL_SPEED: f64 = 5.0;
const GRAVITY: f64 = 0.3;
const OBSTACLE_X: f64 = 500.0;

/// Run one episode with fixed parameters through the physics and outcome
/// rules, mirroring the control loop's per-step order: jump decision on the
/// pre-step position, integrate, then resolve.
fn run_scripted(
    jump_power: f64,
    jump_distance: f64,
    obstacle_width: f64,
    obstacle_height: f64,
) -> Outcome {
    let mut world = World::new(GRAVITY);
    let mut ball = Body::dynamic_circle(
        BodyKind::Ball,
        Vec2::new(50.0, GROUND_TOP - BALL_RADIUS),
        BALL_RADIUS,
        1.0,
    );
    ball.velocity = Vec2::new(BALL_SPEED, 0.0);
    world.replace_bodies(vec![
        Body::static_rect(BodyKind::Ground, Vec2::new(500.0, 590.0), FIELD_WIDTH, 20.0),
        Body::static_rect(
            BodyKind::Obstacle,
            Vec2::new(OBSTACLE_X, GROUND_TOP - obstacle_height / 2.0),
            obstacle_width,
            obstacle_height,
        ),
        ball,
    ]);

    let mut episode = Episode {
        params: JumpParams {
            jump_power,
            jump_distance,
            obstacle_width,
            obstacle_height,
        },
        predicted: 0.0,
        has_jumped: false,
    };

    let leading_edge = OBSTACLE_X - obstacle_width / 2.0;
    let obstacle_top = GROUND_TOP - obstacle_height;

    for _ in 0..100_000 {
        if !episode.has_jumped {
            let ball_x = world.body(BodyKind::Ball).expect("ball").position.x;
            if smartball::outcome::jump_due(ball_x, leading_edge, jump_distance) {
                world.body_mut(BodyKind::Ball).expect("ball").velocity.y = -jump_power;
                episode.has_jumped = true;
            }
        }
        let contacts = world.step();
        let ball = *world.body(BodyKind::Ball).expect("ball");
        if let Some(outcome) = smartball::outcome::resolve(
            &ball,
            &contacts,
            &episode,
            FIELD_WIDTH,
            obstacle_top,
            OBSTACLE_X,
        ) {
            return outcome;
        }
    }
    panic!("episode did not terminate");
}

#[test]
fn known_jump_clears_known_obstacle() {
    // Power 15 with a 200 px trigger distance lofts the ball well over a
    // 100 x 100 obstacle and brings it down past midfield.
    let outcome = run_scripted(15.0, 200.0, 100.0, 100.0);
    assert_eq!(outcome, Outcome::Success, "expected a clean clearance");
}

#[test]
fn zero_parameters_always_fail() {
    // The no-viable-jump fallback: the ball never jumps and rolls straight
    // into the obstacle side, whatever its size.
    for (w, h) in [(50.0, 50.0), (100.0, 300.0), (500.0, 500.0), (60.0, 499.0)] {
        let outcome = run_scripted(0.0, 0.0, w, h);
        assert_eq!(outcome, Outcome::Fail, "fallback must fail for {w}x{h}");
    }
}

#[test]
fn weak_jump_strikes_a_tall_obstacle() {
    // Power 2 rises only a few pixels; a 300 px obstacle is a wall.
    let outcome = run_scripted(2.0, 60.0, 100.0, 300.0);
    assert_eq!(outcome, Outcome::Fail);
}

#[test]
fn full_run_counts_every_episode() {
    let config = DemoConfig::builder().seed(42).build();
    let mut demo = SmartBallDemo::new(config).expect("demo");
    let reports = demo.run_episodes(30).expect("run");

    assert_eq!(reports.len(), 30);
    assert_eq!(demo.fail_count() + demo.success_count(), 30);

    // Sequence numbers are strictly increasing while exploring
    for window in reports.windows(2) {
        assert!(window[1].sequence == window[0].sequence + 1);
    }
    for report in &reports {
        assert!((0.0..=1.0).contains(&report.predicted));
        assert!(report.label == 0.0 || report.label == 1.0);
    }
}

#[test]
fn same_seed_reproduces_the_whole_run() {
    let run = |seed| {
        let config = DemoConfig::builder().seed(seed).build();
        let mut demo = SmartBallDemo::new(config).expect("demo");
        demo.run_episodes(15).expect("run")
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn pause_freezes_the_world() {
    let config = DemoConfig::builder().seed(9).build();
    let mut demo = SmartBallDemo::new(config).expect("demo");
    demo.on_start();
    for _ in 0..10 {
        demo.step().expect("step");
    }
    demo.on_pause();

    let frozen = demo.world().body(BodyKind::Ball).expect("ball").position;
    for _ in 0..10 {
        assert!(demo.step().expect("step").is_none());
    }
    assert_eq!(
        demo.world().body(BodyKind::Ball).expect("ball").position,
        frozen
    );

    // Resuming picks up where it left off
    demo.on_start();
    demo.step().expect("step");
    assert_ne!(
        demo.world().body(BodyKind::Ball).expect("ball").position,
        frozen
    );
}

#[test]
fn learning_mode_freezes_counters_until_disengaged() {
    let config = DemoConfig::builder().seed(3).build();
    let mut demo = SmartBallDemo::new(config).expect("demo");
    demo.run_episodes(12).expect("explore");
    let (fails, successes) = (demo.fail_count(), demo.success_count());

    assert!(demo.on_toggle_learning());
    demo.run_episodes(5).expect("learn");
    assert_eq!(demo.fail_count(), fails);
    assert_eq!(demo.success_count(), successes);

    assert!(!demo.on_toggle_learning());
    demo.run_episodes(3).expect("explore again");
    assert_eq!(demo.fail_count() + demo.success_count(), fails + successes + 3);
}

#[test]
fn training_consumes_the_buffer_in_batches() {
    let config = DemoConfig::builder().seed(11).build();
    let mut demo = SmartBallDemo::new(config).expect("demo");

    for completed in 1..=40u64 {
        demo.run_episodes(1).expect("run");
        assert!(demo.buffer_len() < 10, "buffer must stay below one batch");
        assert_eq!(demo.buffer_len() as u64, completed % 10);
    }
    assert!(
        demo.last_error().is_some(),
        "four full batches must have trained"
    );
    let error = demo.last_error().expect("error");
    assert!(error.is_finite() && error >= 0.0);
}

#[test]
fn yaml_config_drives_the_demo() {
    let yaml = r"
seed: 99
field:
  width: 1200.0
search:
  confidence: 0.9
";
    let config = DemoConfig::from_yaml(yaml).expect("config");
    let mut demo = SmartBallDemo::new(config).expect("demo");
    let reports = demo.run_episodes(5).expect("run");
    assert_eq!(reports.len(), 5);
}
