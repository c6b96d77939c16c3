//! Rollout workers driving the interaction loop.
//!
//! [`RolloutWorker`] performs one interaction step per [`rollout`] call and
//! keeps the run's bookkeeping: step/episode counters, bounded score and
//! length histories, trajectory capture and checkpointing. The variants
//! [`MaxStepWorker`] and [`EpisodicWorker`] supply the termination predicate
//! and the logging cadence.
//!
//! [`rollout`]: RolloutWorker::rollout
mod base;
mod config;
mod episodic;
mod history;
mod max_step;
mod render;

pub use base::{RolloutWorker, RunContext};
pub use config::{EpisodicWorkerConfig, MaxStepWorkerConfig, WorkerConfig};
pub use episodic::EpisodicWorker;
pub use history::BoundedHistory;
pub use max_step::MaxStepWorker;
pub(crate) use render::RenderGate;
