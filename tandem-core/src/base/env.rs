//! Environment.
use super::{Act, Obs};
use crate::record::Record;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Episode-termination flag of an environment step.
///
/// The shape is fixed at worker construction from the number of parallel
/// environments: a single environment emits [`Done::Scalar`], a vectorized
/// environment emits [`Done::Vector`] with one flag per instance. A worker
/// receiving the wrong shape fails with
/// [`TandemError::DoneShapeMismatch`](crate::error::TandemError).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Done {
    /// Termination flag of a single environment.
    Scalar(bool),

    /// Termination flags of vectorized environments, one per instance.
    Vector(Vec<bool>),
}

impl Done {
    /// Returns the number of environments covered by the flag.
    pub fn num_envs(&self) -> usize {
        match self {
            Done::Scalar(_) => 1,
            Done::Vector(v) => v.len(),
        }
    }

    /// Returns the number of environments that terminated this step.
    pub fn count(&self) -> usize {
        match self {
            Done::Scalar(done) => *done as usize,
            Done::Vector(v) => v.iter().filter(|d| **d).count(),
        }
    }

    /// Returns `true` if any environment terminated this step.
    pub fn any(&self) -> bool {
        self.count() > 0
    }

    /// Returns the flag of the first environment.
    ///
    /// Used as the episode-boundary condition of render windows, which track
    /// environment 0 in vectorized runs.
    pub fn first(&self) -> bool {
        match self {
            Done::Scalar(done) => *done,
            Done::Vector(v) => v[0],
        }
    }
}

/// Rendering mode passed to [`Env::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Render into an RGB pixel array.
    RgbArray,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::RgbArray
    }
}

/// A rendered RGB frame, row-major with interleaved channels.
#[derive(Clone, Debug)]
pub struct RgbFrame {
    /// Frame width in pixels.
    pub width: usize,

    /// Frame height in pixels.
    pub height: usize,

    /// Pixel data, `height * width * 3` bytes.
    pub data: Vec<u8>,
}

/// Result of one environment step: next observation, reward, termination flag
/// and auxiliary information as a [`Record`].
pub struct EnvStep<E: Env> {
    /// Observation after the step.
    pub obs: E::Obs,

    /// Reward, one element per environment.
    pub reward: Vec<f32>,

    /// Termination flag.
    pub done: Done,

    /// Auxiliary information defined by the environment.
    pub info: Record,
}

impl<E: Env> EnvStep<E> {
    /// Constructs an [`EnvStep`] object.
    pub fn new(obs: E::Obs, reward: Vec<f32>, done: Done, info: Record) -> Self {
        Self {
            obs,
            reward,
            done,
            info,
        }
    }
}

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configuration of the environment.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    ///
    /// Vectorized environments reset all instances. Within an episode stream,
    /// a vectorized environment is expected to reset terminated instances
    /// internally; the worker calls this method only at run start and after
    /// a scalar `done`.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs one environment step.
    fn step(&mut self, act: &Self::Act) -> Result<EnvStep<Self>>
    where
        Self: Sized;

    /// Renders the current state, if the environment supports it.
    fn render(&mut self, _mode: RenderMode) -> Option<RgbFrame> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::Done;

    #[test]
    fn test_done_counts() {
        assert_eq!(Done::Scalar(false).count(), 0);
        assert_eq!(Done::Scalar(true).count(), 1);
        let v = Done::Vector(vec![true, false, true, false]);
        assert_eq!(v.num_envs(), 4);
        assert_eq!(v.count(), 2);
        assert!(v.any());
        assert!(v.first());
    }
}
