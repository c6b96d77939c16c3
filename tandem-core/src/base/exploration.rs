//! Exploration.
use super::Act;

/// An exploration process perturbing actions with additive noise.
///
/// Applied by [`Agent::act`](crate::Agent::act) after the model's action is
/// computed, when exploration is enabled.
pub trait ExplorationProcess<A: Act> {
    /// Perturbs the given action.
    fn perturb(&mut self, act: A) -> A;
}
