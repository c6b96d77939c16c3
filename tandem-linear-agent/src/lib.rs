#![warn(missing_docs)]
//! A backend-free linear agent for tandem.
//!
//! [`LinearModel`] implements the [`Model`](tandem_core::Model) trait with a
//! linear deterministic policy and a linear action value, both shadowed by
//! Polyak-averaged target copies. Gradients of the [`dpg_loss`] pair are
//! computed in closed form on `ndarray` parameters, so the crate depends on
//! no deep-learning backend.
//!
//! [`OuNoise`] and [`GaussianNoise`] provide the additive exploration
//! processes used with a deterministic policy.
mod loss;
mod model;
mod noise;

pub use loss::{dpg_loss, DpgLoss};
pub use model::{LinearModel, LinearModelConfig};
pub use noise::{GaussianNoise, OuNoise};

use serde::{Deserialize, Serialize};
use tandem_core::{Act, Obs};

/// Observation of a single environment as a flat vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VecObs(pub Vec<f32>);

impl Obs for VecObs {
    fn len(&self) -> usize {
        1
    }
}

/// Continuous action of a single environment as a flat vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VecAct(pub Vec<f32>);

impl Act for VecAct {
    fn len(&self) -> usize {
        1
    }
}
