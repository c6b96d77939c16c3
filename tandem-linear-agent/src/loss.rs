//! Deterministic-policy-gradient loss pair.
use crate::{LinearModel, VecAct, VecObs};
use ndarray::{Array1, Array2};
use tandem_core::{Env, Transition};

/// Loss values and closed-form gradients of one training batch.
///
/// The critic loss is the smooth-L1 distance between `q(s, a)` and the
/// Bellman target `r + gamma * q_trg(s', mu_trg(s')) * (1 - done)`; the actor
/// loss is `-q(s, mu(s))`, both averaged over the batch. The two updates are
/// independent: [`LinearModel`] applies them with separate learning rates and
/// no shared upstream computation.
pub struct DpgLoss {
    /// Mean actor loss over the batch.
    pub actor_loss: f32,

    /// Mean critic loss over the batch.
    pub critic_loss: f32,

    pub(crate) grad_w_mu: Array2<f32>,
    pub(crate) grad_b_mu: Array1<f32>,
    pub(crate) grad_w_q: Array1<f32>,
    pub(crate) grad_b_q: f32,
}

/// Derivative of the smooth-L1 loss at residual `e`.
fn smooth_l1_grad(e: f32) -> f32 {
    if e.abs() < 1.0 {
        e
    } else {
        e.signum()
    }
}

fn smooth_l1(e: f32) -> f32 {
    if e.abs() < 1.0 {
        0.5 * e * e
    } else {
        e.abs() - 0.5
    }
}

/// Computes the loss pair of a batch against the given model.
///
/// Injected into the [`Agent`](tandem_core::Agent) as its loss function.
pub fn dpg_loss<E>(batch: &[Transition<E>], model: &LinearModel) -> DpgLoss
where
    E: Env<Obs = VecObs, Act = VecAct>,
{
    let n = batch.len().max(1) as f32;
    let (n_obs, n_act) = (model.obs_dim(), model.act_dim());

    let mut actor_loss = 0.0;
    let mut critic_loss = 0.0;
    let mut grad_w_mu = Array2::zeros((n_act, n_obs));
    let mut grad_b_mu = Array1::zeros(n_act);
    let mut grad_w_q = Array1::zeros(n_obs + n_act);
    let mut grad_b_q = 0.0;

    let w_q_act = model.value_act_weights().to_owned();

    for tr in batch.iter() {
        let s = &tr.obs.0;
        let a = &tr.act.0;
        let s_next = &tr.next_obs.0;
        let r = tr.reward[0];
        let d = tr.done.any() as u8 as f32;

        // Critic: smooth-L1 toward the Bellman target.
        let a_trg = model.target_policy(s_next);
        let y = r + model.gamma() * model.target_value(s_next, &a_trg) * (1.0 - d);
        let e = model.value(s, a) - y;
        critic_loss += smooth_l1(e) / n;
        let g = smooth_l1_grad(e) / n;
        for (i, x) in s.iter().chain(a.iter()).enumerate() {
            grad_w_q[i] += g * x;
        }
        grad_b_q += g;

        // Actor: ascend q(s, mu(s)). With a linear value, dq/da is the action
        // part of the value weights; tanh saturation enters through mu's
        // pre-activation.
        let mu = model.policy(s);
        actor_loss -= model.value(s, &mu) / n;
        let z = model.policy_preact(s);
        for j in 0..n_act {
            let dz = -w_q_act[j] * (1.0 - z[j].tanh().powi(2)) / n;
            for (i, x) in s.iter().enumerate() {
                grad_w_mu[[j, i]] += dz * x;
            }
            grad_b_mu[j] += dz;
        }
    }

    DpgLoss {
        actor_loss,
        critic_loss,
        grad_w_mu,
        grad_b_mu,
        grad_w_q,
        grad_b_q,
    }
}

#[cfg(test)]
mod tests {
    use super::dpg_loss;
    use crate::{LinearModel, LinearModelConfig, VecAct, VecObs};
    use tandem_core::{Done, Transition};

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

    fn batch(done: bool) -> Vec<Transition<VecEnv>> {
        vec![Transition::new(
            VecObs(vec![0.2, -0.4]),
            VecAct(vec![0.3]),
            vec![1.0],
            Done::Scalar(done),
            VecObs(vec![-0.1, 0.1]),
        )]
    }

    #[test]
    fn test_losses_are_finite() {
        let model = LinearModel::build(&LinearModelConfig::default().dims(2, 1));
        let loss = dpg_loss(&batch(false), &model);
        assert!(loss.actor_loss.is_finite());
        assert!(loss.critic_loss.is_finite());
    }

    #[test]
    fn test_terminal_transition_drops_bootstrap() {
        let model = LinearModel::build(&LinearModelConfig::default().dims(2, 1));
        // With done set, the Bellman target is the bare reward; the critic
        // residual must not depend on the target value of the next state.
        let q = model.value(&[0.2, -0.4], &[0.3]);
        let loss = dpg_loss(&batch(true), &model);
        let e = q - 1.0;
        let expected = if e.abs() < 1.0 {
            0.5 * e * e
        } else {
            e.abs() - 0.5
        };
        assert!((loss.critic_loss - expected).abs() < 1e-6);
    }

    #[test]
    fn test_critic_gradient_matches_finite_difference() {
        let config = LinearModelConfig::default().dims(2, 1);
        let model = LinearModel::build(&config);
        let loss = dpg_loss(&batch(false), &model);

        // Perturb the first value weight and compare the loss delta.
        let eps = 1e-3;
        let mut perturbed = LinearModel::build(&config);
        perturbed.w_q[0] += eps;
        let loss_p = dpg_loss(&batch(false), &perturbed);
        let fd = (loss_p.critic_loss - loss.critic_loss) / eps;
        assert!((fd - loss.grad_w_q[0]).abs() < 1e-2);
    }
}
