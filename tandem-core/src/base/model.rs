//! Model.
use super::Env;
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// A policy/value approximator with slowly tracking target copies.
///
/// The agent drives a model through four operations: inference ([`Model::act`]
/// and [`Model::evaluate`]), one optimization update ([`Model::step`]) and
/// target synchronization ([`Model::update_target`]). Target parameters are
/// written only by `update_target`, never by the optimizer.
pub trait Model<E: Env> {
    /// Loss values produced by a loss function and consumed by [`Model::step`].
    type Loss;

    /// Computes an action for the given observation.
    ///
    /// Takes `&self`: inference must not mutate the model.
    fn act(&self, obs: &E::Obs) -> E::Act;

    /// Evaluates the value of an observation-action pair.
    fn evaluate(&self, obs: &E::Obs, act: &E::Act) -> f32;

    /// Applies one optimization update and returns loss values as a [`Record`].
    fn step(&mut self, loss: Self::Loss) -> Result<Record>;

    /// Synchronizes target parameters toward the source parameters.
    fn update_target(&mut self);

    /// Saves the model parameters in the given directory.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the model parameters from the given directory.
    fn load(&mut self, path: &Path) -> Result<()>;
}
