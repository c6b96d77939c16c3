//! Exploration noise for deterministic policies.
use crate::VecAct;
use std::f32::consts::PI;
use tandem_core::ExplorationProcess;

/// Standard normal sample via Box-Muller over `fastrand`.
fn standard_normal(rng: &mut fastrand::Rng) -> f32 {
    let u1 = rng.f32().max(f32::MIN_POSITIVE);
    let u2 = rng.f32();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Ornstein-Uhlenbeck exploration noise.
///
/// Temporally correlated noise reverting toward `mu`, the classic choice for
/// DDPG-style agents. The internal state persists across steps.
pub struct OuNoise {
    mu: f32,
    theta: f32,
    sigma: f32,
    state: Vec<f32>,
    rng: fastrand::Rng,
}

impl OuNoise {
    /// Constructs the process for actions of the given dimension.
    pub fn new(dim: usize, mu: f32, theta: f32, sigma: f32, seed: u64) -> Self {
        Self {
            mu,
            theta,
            sigma,
            state: vec![mu; dim],
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// The process with the parameters of the original DDPG paper.
    pub fn default_for(dim: usize, seed: u64) -> Self {
        Self::new(dim, 0.0, 0.15, 0.2, seed)
    }
}

impl ExplorationProcess<VecAct> for OuNoise {
    fn perturb(&mut self, mut act: VecAct) -> VecAct {
        for (a, x) in act.0.iter_mut().zip(self.state.iter_mut()) {
            *x += self.theta * (self.mu - *x) + self.sigma * standard_normal(&mut self.rng);
            *a += *x;
        }
        act
    }
}

/// Uncorrelated Gaussian exploration noise.
pub struct GaussianNoise {
    sigma: f32,
    rng: fastrand::Rng,
}

impl GaussianNoise {
    /// Constructs the process with the given standard deviation.
    pub fn new(sigma: f32, seed: u64) -> Self {
        Self {
            sigma,
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl ExplorationProcess<VecAct> for GaussianNoise {
    fn perturb(&mut self, mut act: VecAct) -> VecAct {
        for a in act.0.iter_mut() {
            *a += self.sigma * standard_normal(&mut self.rng);
        }
        act
    }
}

#[cfg(test)]
mod tests {
    use super::{GaussianNoise, OuNoise};
    use crate::VecAct;
    use tandem_core::ExplorationProcess;

    #[test]
    fn test_ou_noise_perturbs_and_keeps_dim() {
        let mut noise = OuNoise::default_for(3, 42);
        let act = noise.perturb(VecAct(vec![0.0; 3]));
        assert_eq!(act.0.len(), 3);
        assert!(act.0.iter().any(|a| *a != 0.0));
    }

    #[test]
    fn test_gaussian_noise_is_seeded() {
        let a = GaussianNoise::new(0.1, 7).perturb(VecAct(vec![0.0; 4]));
        let b = GaussianNoise::new(0.1, 7).perturb(VecAct(vec![0.0; 4]));
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut noise = GaussianNoise::new(0.0, 1);
        let act = noise.perturb(VecAct(vec![0.25, -0.5]));
        assert_eq!(act.0, vec![0.25, -0.5]);
    }
}
