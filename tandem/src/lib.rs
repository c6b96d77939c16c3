#![warn(missing_docs)]
//! Tandem is a reinforcement learning library built around an
//! interaction-and-training scheduler.
//!
//! This crate collects the pieces of the workspace and ships a toy
//! continuous-control environment, [`env::PointMassEnv`], used by the
//! examples and tests:
//!
//! * [`tandem_core`]: base traits, the [`Agent`](tandem_core::Agent)
//!   update scheduler and the rollout workers;
//! * [`tandem_linear_agent`]: a backend-free linear model with exploration
//!   noise and a deterministic-policy-gradient loss;
//! * [`tandem_tensorboard`]: a TFRecord-backed
//!   [`Recorder`](tandem_core::record::Recorder).
//!
//! See `examples/point_mass_ddpg.rs` for a complete train-then-evaluate run.
pub use tandem_core;
pub use tandem_linear_agent;
pub use tandem_tensorboard;

pub mod env;
