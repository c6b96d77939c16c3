#![warn(missing_docs)]
//! Core abstractions of the tandem reinforcement learning library.
//!
//! This crate provides the interaction-and-training scheduler that sits between
//! an environment and a set of function approximators:
//!
//! * [`Env`], [`Model`], [`ReplayBuffer`] and [`ExplorationProcess`] are the
//!   trait seams behind which simulators, networks and storage live.
//! * [`Agent`] owns a model and a replay buffer and decides *when* to train and
//!   when to synchronize target parameters.
//! * [`RolloutWorker`] drives the observe-act-step loop, keeps episode
//!   statistics and trajectory captures, and checkpoints the model.
//! * [`MaxStepWorker`] and [`EpisodicWorker`] supply the loop's termination
//!   predicate and logging cadence.
//!
//! Metrics leave the loop through the [`Recorder`](crate::record::Recorder)
//! trait; `tandem-tensorboard` provides a TFRecord-backed implementation.
pub mod dummy;
pub mod error;
pub mod record;
pub mod replay_buffer;
pub mod util;

mod base;
pub use base::{
    Act, Done, Env, EnvStep, ExplorationProcess, Model, Obs, RenderMode, ReplayBuffer, RgbFrame,
    Transition,
};

mod agent;
pub use agent::{Agent, AgentConfig};

mod checkpoint;
pub use checkpoint::Checkpointer;

mod trajectory;
pub use trajectory::{Trajectory, TrajectorySet};

mod worker;
pub use worker::{
    BoundedHistory, EpisodicWorker, EpisodicWorkerConfig, MaxStepWorker, MaxStepWorkerConfig,
    RolloutWorker, RunContext, WorkerConfig,
};
