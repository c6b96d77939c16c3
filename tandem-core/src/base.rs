//! Trait seams between the scheduler and its collaborators.
mod env;
mod exploration;
mod model;
mod replay_buffer;
mod transition;
pub use env::{Done, Env, EnvStep, RenderMode, RgbFrame};
pub use exploration::ExplorationProcess;
pub use model::Model;
pub use replay_buffer::ReplayBuffer;
use std::fmt::Debug;
pub use transition::Transition;

/// A set of observations of an environment.
///
/// A vectorized environment emits one observation per parallel instance;
/// [`Obs::len`] returns that count. Non-vectorized environments return 1.
pub trait Obs: Clone + Debug {
    /// Returns the number of observations in the object.
    fn len(&self) -> usize;

    /// Returns `true` if the object holds no observation.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A set of actions of the environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    fn len(&self) -> usize;

    /// Returns `true` if the object holds no action.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
