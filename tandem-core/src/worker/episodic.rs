//! Worker running until a maximum episode count.
use super::{EpisodicWorkerConfig, RenderGate, RolloutWorker};
use crate::record::{Record, RecordValue::Scalar, Recorder};
use crate::{Agent, Done, Env, Model, RenderMode, ReplayBuffer, Transition};
use anyhow::Result;
use log::info;
use std::time::SystemTime;

const NAME: &str = "EpisodicWorker";

/// Runs rollouts until `episode_index` reaches a configured maximum.
///
/// Unlike the max-step worker, logging and render arming fire on
/// integer-division bucket changes of the episode index: a summary is emitted
/// only on the iteration where `episode_index / log_interval` moved to a new
/// bucket, evaluated at episode boundaries. Useful at inference time or when
/// training episodically; there is no periodic checkpointing, only the exit
/// and interrupt saves.
pub struct EpisodicWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    worker: RolloutWorker<E, M, R>,
    max_episodes: usize,
    log_interval: usize,
    render_interval: usize,
    render_mode: RenderMode,
    gate: RenderGate,
    info: Record,
}

impl<E, M, R> EpisodicWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    /// Constructs the worker.
    pub fn build(config: &EpisodicWorkerConfig, env: E, agent: Agent<E, M, R>) -> Result<Self> {
        let worker = RolloutWorker::build(&config.worker, NAME, env, agent)?;
        Ok(Self {
            worker,
            max_episodes: config.max_episodes,
            log_interval: config.log_interval,
            render_interval: config.worker.render_interval,
            render_mode: config.worker.render_mode,
            gate: RenderGate::default(),
            info: Record::empty(),
        })
    }

    /// Runs the interaction loop.
    ///
    /// On normal or error exit a final best-effort checkpoint is attempted;
    /// its failure is logged and swallowed. All other errors propagate.
    pub fn run(&mut self, recorder: &mut impl Recorder) -> Result<()> {
        info!("Starts a run of {} for {} episodes", NAME, self.max_episodes);
        let start = SystemTime::now();
        let result = self.run_loop(recorder);
        self.worker.final_save();
        if let Ok(elapsed) = start.elapsed() {
            info!("Time elapsed {:.2} sec", elapsed.as_secs_f32());
        }
        result
    }

    fn run_loop(&mut self, recorder: &mut impl Recorder) -> Result<()> {
        while self.worker.ctx().episode_index() < self.max_episodes {
            if self.worker.check_interrupt() {
                break;
            }

            let prev_episode = self.worker.ctx().episode_index();
            let (done, info) = self.worker.rollout()?;
            self.info.merge_inplace(info);
            self.worker_log(&done, prev_episode, recorder);
        }
        Ok(())
    }

    fn worker_log(&mut self, done: &Done, prev_episode: usize, recorder: &mut impl Recorder) {
        if self.render_interval > 0 && self.gate.recording() {
            if let Some(frame) = self.worker.render(self.render_mode) {
                recorder.store_rgb(&frame);
            }
        }

        if !done.any() {
            return;
        }
        let step = self.worker.ctx().global_step();
        let curr_episode = self.worker.ctx().episode_index();

        if self.gate.recording() {
            recorder.video_summary("playback", step);
            self.gate.stop();
        }
        if self.render_interval > 0
            && prev_episode / self.render_interval != curr_episode / self.render_interval
        {
            self.gate.start();
        }

        let ctx = self.worker.ctx();
        let snapshot = Record::from_slice(&[
            ("Counts/num_steps", Scalar(ctx.global_step() as f32)),
            ("Counts/num_episodes", Scalar(ctx.episode_index() as f32)),
            ("Episodic/rews_avg", Scalar(ctx.scores().mean())),
            ("Episodic/ep_length", Scalar(ctx.lengths().mean())),
        ]);
        self.info.merge_inplace(snapshot);

        if self.log_interval > 0 && prev_episode / self.log_interval != curr_episode / self.log_interval
        {
            recorder.scalar_summary(&self.info, step);
        }
    }

    /// The wrapped rollout worker.
    pub fn worker(&self) -> &RolloutWorker<E, M, R> {
        &self.worker
    }

    /// Mutable access to the wrapped rollout worker.
    pub fn worker_mut(&mut self) -> &mut RolloutWorker<E, M, R> {
        &mut self.worker
    }
}
