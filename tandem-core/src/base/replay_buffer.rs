//! Replay buffer interface.
use anyhow::Result;

/// A buffer storing experiences and generating training batches.
///
/// Transitions are pushed by [`Agent::collect`](crate::Agent::collect) and
/// sampled by [`Agent::train`](crate::Agent::train). Storage mechanics stay
/// behind this trait; the scheduler only relies on [`ReplayBuffer::sample`]
/// returning `None` while the buffer holds too few transitions.
pub trait ReplayBuffer {
    /// Configuration of the buffer.
    type Config: Clone;

    /// The type of experiences stored in the buffer.
    type Transition;

    /// The type of batches generated for training.
    type Batch;

    /// Builds a replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Self
    where
        Self: Sized;

    /// Pushes an experience into the buffer.
    fn push(&mut self, transition: Self::Transition) -> Result<()>;

    /// Samples one training batch, or `None` if the buffer holds
    /// insufficient data.
    fn sample(&mut self) -> Option<Self::Batch>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experience.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
