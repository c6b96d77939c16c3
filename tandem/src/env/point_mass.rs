//! A one-dimensional point-mass control task.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tandem_core::record::{Record, RecordValue::Scalar};
use tandem_core::{Done, Env, EnvStep, RenderMode, RgbFrame};
use tandem_linear_agent::{VecAct, VecObs};

/// Configuration of [`PointMassEnv`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PointMassEnvConfig {
    /// Episode length in steps; the episode is truncated afterwards.
    pub max_episode_steps: usize,

    /// The episode terminates when the position leaves `[-bound, bound]`.
    pub bound: f32,

    /// Integration step size.
    pub dt: f32,
}

impl Default for PointMassEnvConfig {
    fn default() -> Self {
        Self {
            max_episode_steps: 200,
            bound: 3.0,
            dt: 0.05,
        }
    }
}

/// A point mass on a line, pushed by a bounded force.
///
/// Observation is `[position, velocity]`, action is a scalar force clamped to
/// `[-1, 1]`. The reward penalizes distance from the origin, speed and
/// control effort, so a good policy parks the mass at the origin. Episodes
/// end when the mass leaves the bound or after `max_episode_steps`.
pub struct PointMassEnv {
    config: PointMassEnvConfig,
    rng: fastrand::Rng,
    pos: f32,
    vel: f32,
    t: usize,
}

impl PointMassEnv {
    fn obs(&self) -> VecObs {
        VecObs(vec![self.pos, self.vel])
    }
}

impl Env for PointMassEnv {
    type Config = PointMassEnvConfig;
    type Obs = VecObs;
    type Act = VecAct;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            rng: fastrand::Rng::with_seed(seed as u64),
            pos: 0.0,
            vel: 0.0,
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.pos = 2.0 * self.rng.f32() - 1.0;
        self.vel = 0.0;
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, act: &Self::Act) -> Result<EnvStep<Self>> {
        let force = act.0[0].clamp(-1.0, 1.0);
        self.vel += self.config.dt * force;
        self.pos += self.config.dt * self.vel;
        self.t += 1;

        let reward = -(self.pos.powi(2) + 0.1 * self.vel.powi(2) + 0.001 * force.powi(2));
        let done =
            self.pos.abs() > self.config.bound || self.t >= self.config.max_episode_steps;

        let mut info = Record::empty();
        info.insert("Env/pos", Scalar(self.pos));

        Ok(EnvStep::new(
            self.obs(),
            vec![reward],
            Done::Scalar(done),
            info,
        ))
    }

    fn render(&mut self, _mode: RenderMode) -> Option<RgbFrame> {
        // A 64x8 strip with a white marker at the mass position.
        let (w, h) = (64usize, 8usize);
        let mut data = vec![0u8; w * h * 3];
        let x = (((self.pos + self.config.bound) / (2.0 * self.config.bound))
            .clamp(0.0, 1.0)
            * (w - 1) as f32) as usize;
        for y in 0..h {
            let i = (y * w + x) * 3;
            data[i] = 255;
            data[i + 1] = 255;
            data[i + 2] = 255;
        }
        Some(RgbFrame {
            width: w,
            height: h,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PointMassEnv, PointMassEnvConfig};
    use tandem_core::{Done, Env};
    use tandem_linear_agent::VecAct;

    #[test]
    fn test_episode_truncates_at_max_steps() -> anyhow::Result<()> {
        let config = PointMassEnvConfig {
            max_episode_steps: 5,
            ..Default::default()
        };
        let mut env = PointMassEnv::build(&config, 0)?;
        env.reset()?;

        for i in 1..=5 {
            let step = env.step(&VecAct(vec![0.0]))?;
            assert_eq!(step.done, Done::Scalar(i == 5));
        }
        Ok(())
    }

    #[test]
    fn test_reward_is_negative_away_from_origin() -> anyhow::Result<()> {
        let mut env = PointMassEnv::build(&PointMassEnvConfig::default(), 0)?;
        env.reset()?;
        let step = env.step(&VecAct(vec![1.0]))?;
        assert!(step.reward[0] <= 0.0);
        Ok(())
    }
}
