//! Linear policy/value model.
use crate::{DpgLoss, VecAct, VecObs};
use anyhow::Result;
use log::info;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tandem_core::record::{Record, RecordValue::Scalar};
use tandem_core::{util::polyak_update, Env, Model};

const MODEL_FILE: &str = "linear_model.bin";

/// Configuration of [`LinearModel`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LinearModelConfig {
    /// Dimension of observations.
    pub obs_dim: usize,

    /// Dimension of actions.
    pub act_dim: usize,

    /// Learning rate of the policy parameters.
    pub lr_actor: f32,

    /// Learning rate of the value parameters.
    pub lr_critic: f32,

    /// Discount factor of the Bellman target.
    pub gamma: f32,

    /// Retention weight of the target parameters under Polyak averaging.
    pub tau: f32,

    /// Seed of the weight initialization.
    pub seed: u64,
}

impl Default for LinearModelConfig {
    fn default() -> Self {
        Self {
            obs_dim: 1,
            act_dim: 1,
            lr_actor: 1e-3,
            lr_critic: 1e-3,
            gamma: 0.99,
            tau: 0.995,
            seed: 42,
        }
    }
}

impl LinearModelConfig {
    /// Sets the observation and action dimensions.
    pub fn dims(mut self, obs_dim: usize, act_dim: usize) -> Self {
        self.obs_dim = obs_dim;
        self.act_dim = act_dim;
        self
    }

    /// Sets the learning rates of policy and value parameters.
    pub fn learning_rates(mut self, lr_actor: f32, lr_critic: f32) -> Self {
        self.lr_actor = lr_actor;
        self.lr_critic = lr_critic;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the retention weight of the target parameters.
    pub fn tau(mut self, tau: f32) -> Self {
        self.tau = tau;
        self
    }

    /// Sets the seed of the weight initialization.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`LinearModelConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LinearModelConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Serialized parameters of a [`LinearModel`].
#[derive(Serialize, Deserialize)]
struct LinearModelArtifact {
    obs_dim: usize,
    act_dim: usize,
    w_mu: Vec<f32>,
    b_mu: Vec<f32>,
    w_q: Vec<f32>,
    b_q: f32,
    w_mu_trg: Vec<f32>,
    b_mu_trg: Vec<f32>,
    w_q_trg: Vec<f32>,
    b_q_trg: f32,
}

/// A linear deterministic policy and a linear action value with target
/// copies.
///
/// The policy is `mu(s) = tanh(W s + b)`; the value is `q(s, a) = w^T [s; a]
/// + c`. Target copies `mu_trg`/`q_trg` are written only by
/// [`Model::update_target`], never by the optimizer.
pub struct LinearModel {
    obs_dim: usize,
    act_dim: usize,
    pub(crate) w_mu: Array2<f32>,
    pub(crate) b_mu: Array1<f32>,
    pub(crate) w_q: Array1<f32>,
    pub(crate) b_q: f32,
    pub(crate) w_mu_trg: Array2<f32>,
    pub(crate) b_mu_trg: Array1<f32>,
    pub(crate) w_q_trg: Array1<f32>,
    pub(crate) b_q_trg: f32,
    lr_actor: f32,
    lr_critic: f32,
    gamma: f32,
    tau: f32,
}

impl LinearModel {
    /// Constructs a model with seeded uniform initial weights; targets start
    /// as exact copies of the sources.
    pub fn build(config: &LinearModelConfig) -> Self {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let (n_obs, n_act) = (config.obs_dim, config.act_dim);
        let scale = (1.0 / n_obs as f32).sqrt();
        let mut uniform = move || scale * (2.0 * rng.f32() - 1.0);

        let w_mu = Array2::from_shape_simple_fn((n_act, n_obs), &mut uniform);
        let b_mu = Array1::zeros(n_act);
        let w_q = Array1::from_shape_simple_fn(n_obs + n_act, &mut uniform);
        let b_q = 0.0;

        Self {
            obs_dim: n_obs,
            act_dim: n_act,
            w_mu_trg: w_mu.clone(),
            b_mu_trg: b_mu.clone(),
            w_q_trg: w_q.clone(),
            b_q_trg: b_q,
            w_mu,
            b_mu,
            w_q,
            b_q,
            lr_actor: config.lr_actor,
            lr_critic: config.lr_critic,
            gamma: config.gamma,
            tau: config.tau,
        }
    }

    /// The deterministic policy `mu(s)`.
    pub fn policy(&self, obs: &[f32]) -> Vec<f32> {
        let s = Array1::from_vec(obs.to_vec());
        (self.w_mu.dot(&s) + &self.b_mu).mapv(f32::tanh).to_vec()
    }

    /// The target policy `mu_trg(s)`.
    pub fn target_policy(&self, obs: &[f32]) -> Vec<f32> {
        let s = Array1::from_vec(obs.to_vec());
        (self.w_mu_trg.dot(&s) + &self.b_mu_trg)
            .mapv(f32::tanh)
            .to_vec()
    }

    /// The action value `q(s, a)`.
    pub fn value(&self, obs: &[f32], act: &[f32]) -> f32 {
        Self::linear_value(&self.w_q, self.b_q, obs, act)
    }

    /// The target action value `q_trg(s, a)`.
    pub fn target_value(&self, obs: &[f32], act: &[f32]) -> f32 {
        Self::linear_value(&self.w_q_trg, self.b_q_trg, obs, act)
    }

    fn linear_value(w: &Array1<f32>, b: f32, obs: &[f32], act: &[f32]) -> f32 {
        let x: Vec<f32> = obs.iter().chain(act.iter()).copied().collect();
        w.dot(&Array1::from_vec(x)) + b
    }

    /// Pre-activation of the policy, used by the loss gradients.
    pub(crate) fn policy_preact(&self, obs: &[f32]) -> Array1<f32> {
        let s = Array1::from_vec(obs.to_vec());
        self.w_mu.dot(&s) + &self.b_mu
    }

    /// The value weights over the action part of `[s; a]`.
    pub(crate) fn value_act_weights(&self) -> ndarray::ArrayView1<f32> {
        self.w_q.slice(ndarray::s![self.obs_dim..])
    }

    /// Discount factor of the Bellman target.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Dimension of observations.
    pub fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    /// Dimension of actions.
    pub fn act_dim(&self) -> usize {
        self.act_dim
    }

    fn artifact(&self) -> LinearModelArtifact {
        LinearModelArtifact {
            obs_dim: self.obs_dim,
            act_dim: self.act_dim,
            w_mu: self.w_mu.iter().copied().collect(),
            b_mu: self.b_mu.to_vec(),
            w_q: self.w_q.to_vec(),
            b_q: self.b_q,
            w_mu_trg: self.w_mu_trg.iter().copied().collect(),
            b_mu_trg: self.b_mu_trg.to_vec(),
            w_q_trg: self.w_q_trg.to_vec(),
            b_q_trg: self.b_q_trg,
        }
    }

    fn restore(&mut self, artifact: LinearModelArtifact) -> Result<()> {
        anyhow::ensure!(
            artifact.obs_dim == self.obs_dim && artifact.act_dim == self.act_dim,
            "Model dimensions in the artifact do not match the configuration"
        );
        self.w_mu = Array2::from_shape_vec((self.act_dim, self.obs_dim), artifact.w_mu)?;
        self.b_mu = Array1::from_vec(artifact.b_mu);
        self.w_q = Array1::from_vec(artifact.w_q);
        self.b_q = artifact.b_q;
        self.w_mu_trg = Array2::from_shape_vec((self.act_dim, self.obs_dim), artifact.w_mu_trg)?;
        self.b_mu_trg = Array1::from_vec(artifact.b_mu_trg);
        self.w_q_trg = Array1::from_vec(artifact.w_q_trg);
        self.b_q_trg = artifact.b_q_trg;
        Ok(())
    }
}

impl<E> Model<E> for LinearModel
where
    E: Env<Obs = VecObs, Act = VecAct>,
{
    type Loss = DpgLoss;

    fn act(&self, obs: &VecObs) -> VecAct {
        VecAct(self.policy(&obs.0))
    }

    fn evaluate(&self, obs: &VecObs, act: &VecAct) -> f32 {
        self.value(&obs.0, &act.0)
    }

    fn step(&mut self, loss: DpgLoss) -> Result<Record> {
        // The actor and critic updates are independent; target parameters
        // are untouched here.
        self.w_mu.scaled_add(-self.lr_actor, &loss.grad_w_mu);
        self.b_mu.scaled_add(-self.lr_actor, &loss.grad_b_mu);
        self.w_q.scaled_add(-self.lr_critic, &loss.grad_w_q);
        self.b_q -= self.lr_critic * loss.grad_b_q;

        Ok(Record::from_slice(&[
            ("loss_actor", Scalar(loss.actor_loss)),
            ("loss_critic", Scalar(loss.critic_loss)),
        ]))
    }

    fn update_target(&mut self) {
        let tau = self.tau;
        polyak_update(
            self.w_mu.as_slice().unwrap(),
            self.w_mu_trg.as_slice_mut().unwrap(),
            tau,
        );
        polyak_update(
            self.b_mu.as_slice().unwrap(),
            self.b_mu_trg.as_slice_mut().unwrap(),
            tau,
        );
        polyak_update(
            self.w_q.as_slice().unwrap(),
            self.w_q_trg.as_slice_mut().unwrap(),
            tau,
        );
        self.b_q_trg = tau * self.b_q_trg + (1.0 - tau) * self.b_q;
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path.join(MODEL_FILE))?;
        bincode::serialize_into(BufWriter::new(file), &self.artifact())?;
        info!("Saved linear model parameters to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path.join(MODEL_FILE))?;
        let artifact: LinearModelArtifact = bincode::deserialize_from(BufReader::new(file))?;
        self.restore(artifact)?;
        info!("Loaded linear model parameters from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearModel, LinearModelConfig};
    use crate::{dpg_loss, VecAct, VecObs};
    use tandem_core::{Done, Model, Transition};
    use tempdir::TempDir;

    // An environment type only fixing Obs/Act for the Model impl.
    struct VecEnv;
    impl tandem_core::Env for VecEnv {
        type Config = ();
        type Obs = VecObs;
        type Act = VecAct;
        fn build(_: &(), _: i64) -> anyhow::Result<Self> {
            Ok(Self)
        }
        fn reset(&mut self) -> anyhow::Result<VecObs> {
            unimplemented!();
        }
        fn step(&mut self, _: &VecAct) -> anyhow::Result<tandem_core::EnvStep<Self>> {
            unimplemented!();
        }
    }

    fn config() -> LinearModelConfig {
        LinearModelConfig::default().dims(3, 2).tau(0.9)
    }

    fn transition() -> Transition<VecEnv> {
        Transition::new(
            VecObs(vec![0.1, -0.2, 0.3]),
            VecAct(vec![0.5, -0.5]),
            vec![1.0],
            Done::Scalar(false),
            VecObs(vec![0.0, 0.1, -0.1]),
        )
    }

    #[test]
    fn test_polyak_exactness() {
        let mut model = LinearModel::build(&config());
        // Move the sources away from the targets first.
        let batch = vec![transition()];
        let loss = dpg_loss(&batch, &model);
        Model::<VecEnv>::step(&mut model, loss).unwrap();

        let old_trg = model.w_mu_trg.clone();
        let src = model.w_mu.clone();
        Model::<VecEnv>::update_target(&mut model);

        for ((t_new, t_old), s) in model.w_mu_trg.iter().zip(old_trg.iter()).zip(src.iter()) {
            let expected = 0.9 * t_old + 0.1 * s;
            assert!((t_new - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_optimizer_never_touches_targets() {
        let mut model = LinearModel::build(&config());
        let w_mu_trg = model.w_mu_trg.clone();
        let w_q_trg = model.w_q_trg.clone();

        for _ in 0..5 {
            let batch = vec![transition()];
            let loss = dpg_loss(&batch, &model);
            Model::<VecEnv>::step(&mut model, loss).unwrap();
        }
        assert_eq!(model.w_mu_trg, w_mu_trg);
        assert_eq!(model.w_q_trg, w_q_trg);
        assert_eq!(model.b_q_trg, 0.0);
    }

    #[test]
    fn test_save_load_roundtrip() -> anyhow::Result<()> {
        let dir = TempDir::new("linear_model")?;
        let model = LinearModel::build(&config());
        Model::<VecEnv>::save(&model, dir.path())?;

        let mut other = LinearModel::build(&config().seed(7));
        assert_ne!(model.w_mu, other.w_mu);
        Model::<VecEnv>::load(&mut other, dir.path())?;
        assert_eq!(model.w_mu, other.w_mu);
        assert_eq!(model.w_q_trg, other.w_q_trg);
        Ok(())
    }

    #[test]
    fn test_policy_is_bounded() {
        let model = LinearModel::build(&config());
        let act = model.policy(&[10.0, -10.0, 10.0]);
        assert_eq!(act.len(), 2);
        for a in act {
            assert!(a.abs() <= 1.0);
        }
    }
}
