//! Test doubles used in this crate's tests and by downstream crates.
use crate::record::Record;
use crate::{Act, Done, Env, EnvStep, Model, Obs, RenderMode, RgbFrame};
use anyhow::Result;
use serde::Serialize;
use std::{cell::RefCell, path::Path, rc::Rc};

/// Dummy observation, one element per environment.
#[derive(Clone, Debug, Serialize)]
pub struct DummyObs(pub Vec<f32>);

impl Obs for DummyObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Dummy action, one element per environment.
#[derive(Clone, Debug, Serialize)]
pub struct DummyAct(pub Vec<f32>);

impl Act for DummyAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    /// Episode length of each environment instance; the number of instances
    /// is the length of this vector.
    pub episode_lens: Vec<usize>,
}

impl DummyEnvConfig {
    /// A single environment terminating every `episode_len` steps.
    pub fn scalar(episode_len: usize) -> Self {
        Self {
            episode_lens: vec![episode_len],
        }
    }

    /// Vectorized environments with the given per-instance episode lengths.
    pub fn vectorized(episode_lens: Vec<usize>) -> Self {
        Self { episode_lens }
    }
}

/// A scripted environment emitting `done` on a fixed per-instance schedule.
///
/// Each instance terminates after its configured episode length. Vectorized
/// instances auto-reset internally, as the worker expects; the scalar
/// instance waits for [`Env::reset`].
pub struct DummyEnv {
    episode_lens: Vec<usize>,
    t: Vec<usize>,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = DummyAct;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_lens: config.episode_lens.clone(),
            t: vec![0; config.episode_lens.len()],
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        for t in self.t.iter_mut() {
            *t = 0;
        }
        Ok(DummyObs(vec![0.0; self.episode_lens.len()]))
    }

    fn step(&mut self, _act: &Self::Act) -> Result<EnvStep<Self>> {
        let n = self.episode_lens.len();
        let mut dones = vec![false; n];
        for i in 0..n {
            self.t[i] += 1;
            if self.t[i] >= self.episode_lens[i] {
                dones[i] = true;
                if n > 1 {
                    // Vectorized instances auto-reset.
                    self.t[i] = 0;
                }
            }
        }
        let obs = DummyObs(self.t.iter().map(|t| *t as f32).collect());
        let done = if n == 1 {
            Done::Scalar(dones[0])
        } else {
            Done::Vector(dones)
        };
        Ok(EnvStep::new(obs, vec![1.0; n], done, Record::empty()))
    }

    fn render(&mut self, _mode: RenderMode) -> Option<RgbFrame> {
        Some(RgbFrame {
            width: 1,
            height: 1,
            data: vec![0, 0, 0],
        })
    }
}

/// Call counters of a [`DummyModel`], shared with the test body.
#[derive(Debug, Default)]
pub struct DummyModelCounters {
    /// Number of `act` calls.
    pub n_act: usize,

    /// Number of optimization steps.
    pub n_opt: usize,

    /// Number of target synchronizations.
    pub n_target_sync: usize,
}

/// A model that counts its calls.
///
/// Constructed together with a shared handle to its counters, so tests can
/// assert on training and target-sync cadence after the model moved into an
/// agent or worker.
pub struct DummyModel {
    counters: Rc<RefCell<DummyModelCounters>>,
    num_envs: usize,
}

impl DummyModel {
    /// Constructs the model and a handle to its call counters.
    pub fn new(num_envs: usize) -> (Self, Rc<RefCell<DummyModelCounters>>) {
        let counters = Rc::new(RefCell::new(DummyModelCounters::default()));
        (
            Self {
                counters: counters.clone(),
                num_envs,
            },
            counters,
        )
    }
}

impl Model<DummyEnv> for DummyModel {
    type Loss = ();

    fn act(&self, _obs: &DummyObs) -> DummyAct {
        self.counters.borrow_mut().n_act += 1;
        DummyAct(vec![0.0; self.num_envs])
    }

    fn evaluate(&self, _obs: &DummyObs, _act: &DummyAct) -> f32 {
        0.0
    }

    fn step(&mut self, _loss: Self::Loss) -> Result<Record> {
        self.counters.borrow_mut().n_opt += 1;
        Ok(Record::from_scalar("loss", 0.0))
    }

    fn update_target(&mut self) {
        self.counters.borrow_mut().n_target_sync += 1;
    }

    fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(
            path.join("dummy_model"),
            format!("{}", self.counters.borrow().n_opt),
        )?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let _ = std::fs::read_to_string(path.join("dummy_model"))?;
        Ok(())
    }
}
