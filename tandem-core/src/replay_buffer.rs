//! A simple in-memory replay buffer.
//!
//! [`SimpleReplayBuffer`] is the default collaborator behind the
//! [`ReplayBuffer`](crate::ReplayBuffer) trait for demos and tests: a
//! fixed-capacity ring of [`Transition`](crate::Transition)s sampled uniformly
//! with replacement.
mod base;
mod config;

pub use base::SimpleReplayBuffer;
pub use config::SimpleReplayBufferConfig;
