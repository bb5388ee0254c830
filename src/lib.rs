//! # smartball
//!
//! An adaptive control-loop demo: a ball rolls toward a randomly sized
//! obstacle and must pick a jump power and trigger distance to clear it.
//! An online-trained predictor scores candidate parameters; once it is
//! trusted, an exhaustive grid search replaces random exploration.
//!
//! The whole loop is deterministic under a fixed seed.
//!
//! ## Example
//!
//! ```rust
//! use smartball::prelude::*;
//!
//! # fn main() -> BallResult<()> {
//! let config = DemoConfig::builder().seed(42).build();
//! let mut demo = SmartBallDemo::new(config)?;
//! let reports = demo.run_episodes(5)?;
//! assert_eq!(reports.len(), 5);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod config;
pub mod demo;
pub mod episode;
pub mod error;
pub mod normalize;
pub mod outcome;
pub mod physics;
pub mod predictor;
pub mod rng;
pub mod search;
pub mod training;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DemoConfig, DemoConfigBuilder};
    pub use crate::demo::SmartBallDemo;
    pub use crate::episode::{Episode, EpisodeGenerator};
    pub use crate::error::{BallError, BallResult};
    pub use crate::normalize::{JumpParams, Normalizer, FEATURE_COUNT};
    pub use crate::outcome::{EpisodeReport, Outcome};
    pub use crate::physics::{Body, BodyKind, Contact, Shape, Vec2, World};
    pub use crate::predictor::Predictor;
    pub use crate::rng::DemoRng;
    pub use crate::search::JumpChoice;
    pub use crate::training::{TrainingBuffer, TrainingExample};
}
