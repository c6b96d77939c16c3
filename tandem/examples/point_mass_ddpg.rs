use anyhow::Result;
use clap::Parser;
use csv::WriterBuilder;
use serde::Serialize;
use std::{convert::TryFrom, fs::File};
use tandem::env::{PointMassEnv, PointMassEnvConfig};
use tandem_core::{
    record::{BufferedRecorder, Record},
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
    Agent, AgentConfig, Env, EpisodicWorker, EpisodicWorkerConfig, MaxStepWorker,
    MaxStepWorkerConfig, Model, ReplayBuffer, WorkerConfig,
};
use tandem_linear_agent::{dpg_loss, LinearModel, LinearModelConfig, OuNoise};
use tandem_tensorboard::TensorboardRecorder;

const DIM_OBS: usize = 2;
const DIM_ACT: usize = 1;
const LR_ACTOR: f32 = 1e-3;
const LR_CRITIC: f32 = 1e-3;
const DISCOUNT_FACTOR: f32 = 0.99;
const TAU: f32 = 0.995;
const BATCH_SIZE: usize = 64;
const N_TRANSITIONS_WARMUP: usize = 100;
const REPLAY_BUFFER_CAPACITY: usize = 10000;
const TRAIN_INTERVAL: usize = 1;
const TARGET_UPDATE_INTERVAL: usize = 1;
const MAX_STEPS: usize = 30000;
const LOG_INTERVAL: usize = 1000;
const SAVE_INTERVAL: usize = 10000;
const N_EVAL_EPISODES: usize = 5;
const SEED: u64 = 42;

type E = PointMassEnv;
type M = LinearModel;
type B = SimpleReplayBuffer<E>;

#[derive(Parser)]
#[command(name = "point_mass_ddpg")]
struct Args {
    /// Skip training and evaluate the model saved by a previous run.
    #[arg(long)]
    skip_training: bool,

    /// Directory for logs and checkpoints.
    #[arg(long, default_value = "./examples/model/point_mass_ddpg")]
    log_dir: String,
}

fn create_env(seed: i64) -> Result<E> {
    PointMassEnv::build(&PointMassEnvConfig::default(), seed)
}

fn create_agent(explore: bool) -> Agent<E, M, B> {
    let model = LinearModel::build(
        &LinearModelConfig::default()
            .dims(DIM_OBS, DIM_ACT)
            .learning_rates(LR_ACTOR, LR_CRITIC)
            .gamma(DISCOUNT_FACTOR)
            .tau(TAU)
            .seed(SEED),
    );
    let buffer = SimpleReplayBuffer::build(
        &SimpleReplayBufferConfig::default()
            .capacity(REPLAY_BUFFER_CAPACITY)
            .batch_size(BATCH_SIZE)
            .min_size(N_TRANSITIONS_WARMUP)
            .seed(SEED),
    );
    let config = AgentConfig::default()
        .name("PointMassDdpg")
        .train_interval(TRAIN_INTERVAL)
        .target_update_interval(TARGET_UPDATE_INTERVAL)
        .explore(explore);
    let noise = OuNoise::default_for(DIM_ACT, SEED);
    Agent::build(
        &config,
        model,
        buffer,
        |batch, model| dpg_loss(batch, model),
        Some(Box::new(noise)),
    )
}

#[derive(Debug, Serialize)]
struct EvalSnapshot {
    step: usize,
    episodes: usize,
    rews_avg: f32,
    ep_length: f32,
}

impl TryFrom<&(usize, Record)> for EvalSnapshot {
    type Error = anyhow::Error;

    fn try_from((step, record): &(usize, Record)) -> Result<Self> {
        Ok(Self {
            step: *step,
            episodes: record.get_scalar("Counts/num_episodes")? as _,
            rews_avg: record.get_scalar("Episodic/rews_avg")?,
            ep_length: record.get_scalar("Episodic/ep_length")?,
        })
    }
}

fn train(log_dir: &str) -> Result<std::path::PathBuf> {
    let env = create_env(SEED as i64)?;
    let agent = create_agent(true);
    let config = MaxStepWorkerConfig::default()
        .worker(
            WorkerConfig::default()
                .log_dir(log_dir)
                .save_interval(SAVE_INTERVAL),
        )
        .max_steps(MAX_STEPS)
        .log_interval(LOG_INTERVAL);
    let mut worker = MaxStepWorker::build(&config, env, agent)?;
    let mut recorder = TensorboardRecorder::new(log_dir);

    worker.run(&mut recorder)?;

    // The run ends with a checkpoint; its directory is where evaluation
    // loads the model from.
    let step = worker.worker().ctx().global_step();
    Ok(worker.worker().checkpointer().ckpt_dir(step))
}

fn eval(ckpt_dir: &std::path::Path, log_dir: &str) -> Result<Vec<(usize, Record)>> {
    let env = create_env(SEED as i64 + 1)?;
    let mut agent = create_agent(false);
    Model::<E>::load(agent.model_mut(), ckpt_dir)?;

    let config = EpisodicWorkerConfig::default()
        .worker(WorkerConfig::default().log_dir(log_dir).train(false))
        .max_episodes(N_EVAL_EPISODES)
        .log_interval(1);
    let mut worker = EpisodicWorker::build(&config, env, agent)?;
    let mut recorder = BufferedRecorder::new();

    worker.run(&mut recorder)?;
    Ok(recorder.iter().cloned().collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ckpt_dir = if args.skip_training {
        latest_checkpoint(&args.log_dir)?
    } else {
        train(&args.log_dir)?
    };

    let summaries = eval(&ckpt_dir, &args.log_dir)?;

    let mut wtr = WriterBuilder::new()
        .from_writer(File::create(format!("{}/eval.csv", args.log_dir))?);
    for summary in summaries.iter() {
        wtr.serialize(EvalSnapshot::try_from(summary)?)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Finds the most recently written checkpoint under `log_dir`.
fn latest_checkpoint(log_dir: &str) -> Result<std::path::PathBuf> {
    let mut candidates: Vec<_> = std::fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().join("ckpt"))
        .filter(|path| path.is_dir())
        .flat_map(|ckpt| {
            std::fs::read_dir(ckpt)
                .into_iter()
                .flatten()
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
        })
        .collect();
    candidates.sort_by_key(|path| {
        path.metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });
    candidates
        .pop()
        .ok_or_else(|| anyhow::anyhow!("no checkpoint under {}", log_dir))
}
