use anyhow::Result;
use tandem::env::{PointMassEnv, PointMassEnvConfig};
use tandem_core::{
    record::BufferedRecorder,
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
    Agent, AgentConfig, Env, EpisodicWorker, EpisodicWorkerConfig, MaxStepWorker,
    MaxStepWorkerConfig, Model, ReplayBuffer, WorkerConfig,
};
use tandem_linear_agent::{dpg_loss, GaussianNoise, LinearModel, LinearModelConfig};
use tempdir::TempDir;

fn create_agent(explore: bool) -> Agent<PointMassEnv, LinearModel, SimpleReplayBuffer<PointMassEnv>> {
    let model = LinearModel::build(&LinearModelConfig::default().dims(2, 1).seed(7));
    let buffer = SimpleReplayBuffer::build(
        &SimpleReplayBufferConfig::default()
            .capacity(1000)
            .batch_size(8)
            .min_size(16),
    );
    let config = AgentConfig::default().name("PointMassDdpg").explore(explore);
    let noise = GaussianNoise::new(0.2, 7);
    Agent::build(
        &config,
        model,
        buffer,
        |batch, model| dpg_loss(batch, model),
        Some(Box::new(noise)),
    )
}

#[test]
fn test_train_then_eval() -> Result<()> {
    let dir = TempDir::new("point_mass_ddpg")?;
    let log_dir = dir.path().to_str().unwrap().to_string();

    // Train for a few hundred steps with exploration noise.
    let env = PointMassEnv::build(&PointMassEnvConfig::default(), 0)?;
    let config = MaxStepWorkerConfig::default()
        .worker(WorkerConfig::default().log_dir(&log_dir))
        .max_steps(300)
        .log_interval(100);
    let mut worker = MaxStepWorker::build(&config, env, create_agent(true))?;
    let mut recorder = BufferedRecorder::new();
    worker.run(&mut recorder)?;

    assert_eq!(worker.worker().ctx().global_step(), 300);
    assert!(worker.worker().agent().buffer().len() > 0);

    // The exit save leaves a loadable checkpoint.
    let ckpt_dir = worker.worker().checkpointer().ckpt_dir(300);
    assert!(ckpt_dir.join("linear_model.bin").exists());

    // Evaluate the checkpoint without exploration or training.
    let env = PointMassEnv::build(&PointMassEnvConfig::default(), 1)?;
    let mut agent = create_agent(false);
    Model::<PointMassEnv>::load(agent.model_mut(), &ckpt_dir)?;
    let config = EpisodicWorkerConfig::default()
        .worker(WorkerConfig::default().log_dir(&log_dir).train(false))
        .max_episodes(2)
        .log_interval(1);
    let mut worker = EpisodicWorker::build(&config, env, agent)?;
    let mut recorder = BufferedRecorder::new();
    worker.run(&mut recorder)?;

    assert_eq!(worker.worker().ctx().episode_index(), 2);
    assert_eq!(worker.worker().agent().buffer().len(), 0);
    assert_eq!(recorder.iter().count(), 2);
    for (_, record) in recorder.iter() {
        assert!(record.get_scalar("Episodic/ep_length")? > 0.0);
    }
    Ok(())
}
