//! Transition.
use super::{Done, Env};
use std::fmt;

/// One experience `(o_t, a_t, r_t, done_t, o_t+1)`.
///
/// Produced once per interaction step and pushed into the replay buffer
/// immediately; immutable after creation.
pub struct Transition<E: Env> {
    /// Observation before the step.
    pub obs: E::Obs,

    /// Action taken.
    pub act: E::Act,

    /// Reward, one element per environment.
    pub reward: Vec<f32>,

    /// Termination flag.
    pub done: Done,

    /// Observation after the step.
    pub next_obs: E::Obs,
}

impl<E: Env> Transition<E> {
    /// Constructs a [`Transition`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: Vec<f32>, done: Done, next_obs: E::Obs) -> Self {
        Self {
            obs,
            act,
            reward,
            done,
            next_obs,
        }
    }
}

// Manual impls: only the field types need `Clone`/`Debug`, not `E` itself.
impl<E: Env> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            obs: self.obs.clone(),
            act: self.act.clone(),
            reward: self.reward.clone(),
            done: self.done.clone(),
            next_obs: self.next_obs.clone(),
        }
    }
}

impl<E: Env> fmt::Debug for Transition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("obs", &self.obs)
            .field("act", &self.act)
            .field("reward", &self.reward)
            .field("done", &self.done)
            .field("next_obs", &self.next_obs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Transition;
    use crate::dummy::{DummyAct, DummyEnv, DummyObs};
    use crate::Done;

    // `DummyEnv` itself is neither `Clone` nor `Debug`; cloning must depend
    // only on the observation and action types.
    #[test]
    fn test_clone_does_not_require_env_to_be_clone() {
        let tr: Transition<DummyEnv> = Transition::new(
            DummyObs(vec![0.5]),
            DummyAct(vec![-0.5]),
            vec![1.0],
            Done::Scalar(false),
            DummyObs(vec![0.25]),
        );
        let copy = tr.clone();
        assert_eq!(copy.reward, tr.reward);
        assert_eq!(copy.done, tr.done);
        assert_eq!(format!("{:?}", copy.done), "Scalar(false)");
    }
}
