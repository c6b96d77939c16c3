//! Rollout worker.
use super::{BoundedHistory, WorkerConfig};
use crate::error::TandemError;
use crate::record::Record;
use crate::{
    Agent, Checkpointer, Done, Env, EnvStep, Model, RenderMode, ReplayBuffer, RgbFrame,
    Trajectory, TrajectorySet, Transition,
};
use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Run-wide counters and episode statistics, owned by a single worker.
///
/// `global_step` advances by the number of parallel environments per rollout
/// call; `episode_index` advances by the number of environments that
/// terminated. Per-environment score and step accumulators are flushed into
/// the bounded histories at each episode boundary.
pub struct RunContext {
    global_step: usize,
    episode_index: usize,
    scores: BoundedHistory,
    lengths: BoundedHistory,
    episode_score: Vec<f32>,
    episode_steps: Vec<usize>,
}

impl RunContext {
    fn new(num_envs: usize, history_capacity: usize) -> Self {
        Self {
            global_step: 0,
            episode_index: 0,
            scores: BoundedHistory::new(history_capacity),
            lengths: BoundedHistory::new(history_capacity),
            episode_score: vec![0.0; num_envs],
            episode_steps: vec![0; num_envs],
        }
    }

    /// Total number of environment steps taken, over all instances.
    pub fn global_step(&self) -> usize {
        self.global_step
    }

    /// Number of completed episodes, over all instances.
    pub fn episode_index(&self) -> usize {
        self.episode_index
    }

    /// Scores of the last completed episodes.
    pub fn scores(&self) -> &BoundedHistory {
        &self.scores
    }

    /// Lengths of the last completed episodes.
    pub fn lengths(&self) -> &BoundedHistory {
        &self.lengths
    }

    /// The running score of the given environment's current episode.
    pub fn episode_score(&self, env_ix: usize) -> f32 {
        self.episode_score[env_ix]
    }

    /// The running step count of the given environment's current episode.
    pub fn episode_steps(&self, env_ix: usize) -> usize {
        self.episode_steps[env_ix]
    }

    fn accumulate(&mut self, reward: &[f32]) {
        for (i, r) in reward.iter().enumerate() {
            self.episode_score[i] += r;
            self.episode_steps[i] += 1;
        }
    }

    fn flush_episode(&mut self, env_ix: usize) {
        self.scores.push(self.episode_score[env_ix]);
        self.lengths.push(self.episode_steps[env_ix] as f32);
        self.episode_score[env_ix] = 0.0;
        self.episode_steps[env_ix] = 0;
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Drives the interaction loop between an environment and an agent.
///
/// One [`RolloutWorker::rollout`] call performs exactly one interaction step
/// across all parallel environment instances:
///
/// ```mermaid
/// graph LR
///     W[RolloutWorker]-->|Env::Obs|A[Agent]
///     A -->|Env::Act|B[Env]
///     B -->|"EnvStep&lt;E&gt;"|W
///     W -->|"Transition&lt;E&gt;"|A
///     A -->|push|R[ReplayBuffer]
///     R -->|sample|A
/// ```
///
/// The worker owns the run's counters and histories (a [`RunContext`]), the
/// trajectory capture state and a [`Checkpointer`]. The worker variants wrap
/// it with a termination predicate and a logging cadence, bracketing their
/// loop so that a best-effort checkpoint is attempted on any exit.
///
/// Invariant: one agent, one model, one replay buffer, one environment per
/// worker. Nothing is shared across workers.
pub struct RolloutWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    env: E,
    agent: Agent<E, M, R>,
    ctx: RunContext,
    num_envs: usize,
    train: bool,
    capture_window: Option<(usize, usize)>,
    curr_trajectory: Trajectory<E::Obs, E::Act>,
    trajectories: TrajectorySet<E::Obs, E::Act>,
    checkpointer: Checkpointer,
    interrupt: Arc<AtomicBool>,
    stop_on_interrupt: bool,
    prev_obs: E::Obs,
}

impl<E, M, R> RolloutWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    /// Constructs a worker, resetting the environment for the first episode.
    ///
    /// `worker_name` keys the run directory of the checkpointer. `num_envs`
    /// must be at least 1. A capture window combined with vectorized
    /// environments is ignored with a warning: the episode boundary of a
    /// single instance does not delimit a trajectory of the whole batch.
    pub fn build(config: &WorkerConfig, worker_name: &str, mut env: E, agent: Agent<E, M, R>) -> Result<Self> {
        anyhow::ensure!(config.num_envs >= 1, "num_envs must be at least 1");
        let capture_window = match (config.capture_window, config.num_envs) {
            (Some(window), 1) => Some(window),
            (Some(_), _) => {
                warn!("Trajectory capture requires a single environment; ignoring the window");
                None
            }
            (None, _) => None,
        };
        let prev_obs = env.reset()?;
        let checkpointer = Checkpointer::new(&config.log_dir, worker_name);

        Ok(Self {
            env,
            agent,
            ctx: RunContext::new(config.num_envs, config.history_capacity),
            num_envs: config.num_envs,
            train: config.train,
            capture_window,
            curr_trajectory: Trajectory::new(),
            trajectories: TrajectorySet::new(),
            checkpointer,
            interrupt: Arc::new(AtomicBool::new(false)),
            stop_on_interrupt: config.stop_on_interrupt,
            prev_obs,
        })
    }

    /// Performs one interaction step across all parallel environments.
    ///
    /// Returns the termination flag and the step's information record, the
    /// environment's auxiliary info merged with the agent's training info.
    /// Environment, training and shape errors propagate.
    pub fn rollout(&mut self) -> Result<(Done, Record)> {
        let act = self.agent.act(&self.prev_obs);
        if self.in_capture_window() {
            self.curr_trajectory.push(self.prev_obs.clone(), act.clone());
        }

        let step = self.env.step(&act)?;
        self.validate_shapes(&step)?;
        let EnvStep {
            obs,
            reward,
            done,
            mut info,
        } = step;

        if self.train {
            let record = self.agent.step(
                self.prev_obs.clone(),
                act,
                reward.clone(),
                done.clone(),
                obs.clone(),
            )?;
            info.merge_inplace(record);
        }

        self.ctx.global_step += self.num_envs;
        self.ctx.accumulate(&reward);

        self.prev_obs = match &done {
            Done::Scalar(false) => obs,
            Done::Scalar(true) => {
                let init_obs = self.env.reset()?;
                self.ctx.flush_episode(0);
                if self.in_capture_window() {
                    self.trajectories.push(self.curr_trajectory.take());
                }
                self.ctx.episode_index += 1;
                init_obs
            }
            Done::Vector(flags) => {
                // Vectorized instances auto-reset internally.
                let mut terminated = 0;
                for (i, flag) in flags.iter().enumerate() {
                    if *flag {
                        self.ctx.flush_episode(i);
                        terminated += 1;
                    }
                }
                self.ctx.episode_index += terminated;
                obs
            }
        };

        Ok((done, info))
    }

    /// Returns `true` while the current episode index is inside the capture
    /// window.
    pub fn in_capture_window(&self) -> bool {
        match self.capture_window {
            Some((lo, hi)) => lo <= self.ctx.episode_index && self.ctx.episode_index < hi,
            None => false,
        }
    }

    /// A handle external signal wiring can set to request an interrupt.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Consumes a pending interrupt, if any.
    ///
    /// An observed interrupt triggers a best-effort checkpoint. Returns
    /// `true` when the run should stop; with `stop_on_interrupt` disabled the
    /// worker checkpoints and keeps running.
    pub fn check_interrupt(&mut self) -> bool {
        if !self.interrupt.swap(false, Ordering::SeqCst) {
            return false;
        }
        info!("Interrupt observed at step {}", self.ctx.global_step);
        self.checkpointer
            .save_best_effort(self.agent.model(), self.ctx.global_step);
        self.stop_on_interrupt
    }

    /// Saves a checkpoint at the current step bucket. Failures propagate.
    pub fn checkpoint(&self) -> Result<PathBuf> {
        let dir = self
            .checkpointer
            .save(self.agent.model(), self.ctx.global_step)?;
        info!("Saved model in {:?}", dir);
        Ok(dir)
    }

    /// Best-effort checkpoint at scope exit; failures are logged, never
    /// raised.
    pub fn final_save(&self) {
        self.checkpointer
            .save_best_effort(self.agent.model(), self.ctx.global_step);
    }

    /// Renders the current environment state.
    pub fn render(&mut self, mode: RenderMode) -> Option<RgbFrame> {
        self.env.render(mode)
    }

    /// The run's counters and histories.
    pub fn ctx(&self) -> &RunContext {
        &self.ctx
    }

    /// Number of parallel environment instances.
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// The agent driven by this worker.
    pub fn agent(&self) -> &Agent<E, M, R> {
        &self.agent
    }

    /// Mutable access to the agent.
    pub fn agent_mut(&mut self) -> &mut Agent<E, M, R> {
        &mut self.agent
    }

    /// The trajectories captured so far.
    pub fn trajectories(&self) -> &TrajectorySet<E::Obs, E::Act> {
        &self.trajectories
    }

    /// The checkpointer of this run.
    pub fn checkpointer(&self) -> &Checkpointer {
        &self.checkpointer
    }

    fn validate_shapes(&self, step: &EnvStep<E>) -> Result<()> {
        if step.done.num_envs() != self.num_envs {
            return Err(TandemError::DoneShapeMismatch {
                expected: self.num_envs,
                got: step.done.num_envs(),
            }
            .into());
        }
        if step.reward.len() != self.num_envs {
            return Err(TandemError::RewardShapeMismatch {
                expected: self.num_envs,
                got: step.reward.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl<E, M, R> RolloutWorker<E, M, R>
where
    E: Env,
    E::Obs: Serialize,
    E::Act: Serialize,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    /// Exports the captured trajectories as a bincode file under the run
    /// directory.
    pub fn save_expert_data(&self) -> Result<PathBuf> {
        let path = self.checkpointer.expert_data_path(self.agent.name());
        self.trajectories.save(&path)?;
        Ok(path)
    }
}
