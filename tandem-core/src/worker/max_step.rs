//! Worker running until a maximum step count.
use super::{MaxStepWorkerConfig, RenderGate, RolloutWorker};
use crate::record::{Record, RecordValue::Scalar, Recorder};
use crate::{Agent, Done, Env, Model, RenderMode, ReplayBuffer, Transition};
use anyhow::Result;
use log::info;
use std::time::SystemTime;

const NAME: &str = "MaxStepWorker";

/// Runs rollouts until `global_step` reaches a configured maximum.
///
/// Executes `ceil(max_steps / num_envs)` rollout calls. After each call it
/// emits a scalar summary whenever the `log_interval` boundary was crossed
/// this step, checkpoints whenever the `save_interval` boundary was crossed,
/// and drives the render window through its two-boundary debounce.
pub struct MaxStepWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    worker: RolloutWorker<E, M, R>,
    max_steps: usize,
    log_interval: usize,
    save_interval: usize,
    render_interval: usize,
    render_mode: RenderMode,
    gate: RenderGate,
    info: Record,
}

impl<E, M, R> MaxStepWorker<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    /// Constructs the worker.
    pub fn build(config: &MaxStepWorkerConfig, env: E, agent: Agent<E, M, R>) -> Result<Self> {
        let worker = RolloutWorker::build(&config.worker, NAME, env, agent)?;
        Ok(Self {
            worker,
            max_steps: config.max_steps,
            log_interval: config.log_interval,
            save_interval: config.worker.save_interval,
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
        info!("Starts a run of {} for {} steps", NAME, self.max_steps);
        let start = SystemTime::now();
        let result = self.run_loop(recorder);
        self.worker.final_save();
        if let Ok(elapsed) = start.elapsed() {
            info!("Time elapsed {:.2} sec", elapsed.as_secs_f32());
        }
        result
    }

    fn run_loop(&mut self, recorder: &mut impl Recorder) -> Result<()> {
        let num_envs = self.worker.num_envs();
        let n_rollouts = self.max_steps.div_ceil(num_envs);

        for _ in 0..n_rollouts {
            if self.worker.check_interrupt() {
                break;
            }

            let (done, info) = self.worker.rollout()?;
            self.info.merge_inplace(info);
            self.worker_log(&done, recorder);

            if self.in_save_interval() {
                self.worker.checkpoint()?;
            }
        }
        Ok(())
    }

    fn in_save_interval(&self) -> bool {
        let step = self.worker.ctx().global_step();
        self.save_interval > 0 && step % self.save_interval < self.worker.num_envs()
    }

    fn worker_log(&mut self, done: &Done, recorder: &mut impl Recorder) {
        let num_envs = self.worker.num_envs();
        let step = self.worker.ctx().global_step();

        if self.render_interval > 0 {
            if step % self.render_interval < num_envs {
                self.gate.arm();
            }
            // The render window tracks environment 0.
            if done.first() {
                self.gate.on_boundary();
            }
            if self.gate.recording() {
                if let Some(frame) = self.worker.render(self.render_mode) {
                    recorder.store_rgb(&frame);
                }
            } else if self.gate.take_flush() {
                recorder.video_summary("playback", step);
            }
        }

        if self.log_interval > 0 && step % self.log_interval < num_envs {
            let ctx = self.worker.ctx();
            let snapshot = Record::from_slice(&[
                ("Counts/num_steps", Scalar(ctx.global_step() as f32)),
                ("Counts/num_episodes", Scalar(ctx.episode_index() as f32)),
                ("Episodic/rews_avg", Scalar(ctx.scores().mean())),
                ("Episodic/ep_length", Scalar(ctx.lengths().mean())),
            ]);
            self.info.merge_inplace(snapshot);
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
