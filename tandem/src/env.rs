//! Environments shipped with the umbrella crate.
mod point_mass;

pub use point_mass::{PointMassEnv, PointMassEnvConfig};
