//! Configurations of the rollout workers.
use crate::RenderMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration shared by all rollout workers.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct WorkerConfig {
    /// Number of parallel environment instances.
    pub num_envs: usize,

    /// Training mode; when `false` the worker performs pure inference
    /// rollouts and never touches the agent's buffer or model.
    pub train: bool,

    /// Directory under which the run directory is created.
    pub log_dir: String,

    /// Interval of periodic checkpointing in global steps, 0 to disable.
    /// Only the max-step worker checkpoints periodically.
    pub save_interval: usize,

    /// Interval of render windows in global steps (max-step worker) or
    /// episodes (episodic worker), 0 to disable.
    pub render_interval: usize,

    /// Rendering mode of captured frames.
    pub render_mode: RenderMode,

    /// Episode-index range `[lo, hi)` during which trajectories are
    /// captured; `None` disables capture. Supported only for a single
    /// environment.
    pub capture_window: Option<(usize, usize)>,

    /// Capacity of the bounded score/length histories.
    pub history_capacity: usize,

    /// Whether an observed interrupt stops the run after the checkpoint.
    /// `false` checkpoints and keeps running.
    pub stop_on_interrupt: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            num_envs: 1,
            train: true,
            log_dir: "./log".to_string(),
            save_interval: 0,
            render_interval: 0,
            render_mode: RenderMode::RgbArray,
            capture_window: None,
            history_capacity: 100,
            stop_on_interrupt: true,
        }
    }
}

impl WorkerConfig {
    /// Sets the number of parallel environment instances.
    pub fn num_envs(mut self, num_envs: usize) -> Self {
        self.num_envs = num_envs;
        self
    }

    /// Sets the training mode.
    pub fn train(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    /// Sets the log directory.
    pub fn log_dir(mut self, log_dir: impl Into<String>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Sets the interval of periodic checkpointing in global steps.
    pub fn save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Sets the interval of render windows.
    pub fn render_interval(mut self, render_interval: usize) -> Self {
        self.render_interval = render_interval;
        self
    }

    /// Sets the trajectory capture window.
    pub fn capture_window(mut self, lo: usize, hi: usize) -> Self {
        self.capture_window = Some((lo, hi));
        self
    }

    /// Sets the capacity of the score/length histories.
    pub fn history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    /// Sets whether an interrupt stops the run after the checkpoint.
    pub fn stop_on_interrupt(mut self, stop_on_interrupt: bool) -> Self {
        self.stop_on_interrupt = stop_on_interrupt;
        self
    }

    /// Constructs [`WorkerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`WorkerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Configuration of [`MaxStepWorker`](super::MaxStepWorker).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MaxStepWorkerConfig {
    /// Shared worker configuration.
    pub worker: WorkerConfig,

    /// The run ends once `global_step` reaches this count.
    pub max_steps: usize,

    /// Interval of scalar summaries in global steps, 0 to disable.
    pub log_interval: usize,
}

impl Default for MaxStepWorkerConfig {
    fn default() -> Self {
        Self {
            worker: WorkerConfig::default(),
            max_steps: 1000,
            log_interval: 5000,
        }
    }
}

impl MaxStepWorkerConfig {
    /// Sets the shared worker configuration.
    pub fn worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Sets the maximum number of global steps.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the interval of scalar summaries in global steps.
    pub fn log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Constructs [`MaxStepWorkerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MaxStepWorkerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Configuration of [`EpisodicWorker`](super::EpisodicWorker).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpisodicWorkerConfig {
    /// Shared worker configuration.
    pub worker: WorkerConfig,

    /// The run ends once `episode_index` reaches this count.
    pub max_episodes: usize,

    /// Interval of scalar summaries in episodes; summaries fire when the
    /// episode index crosses into a new `log_interval` bucket.
    pub log_interval: usize,
}

impl Default for EpisodicWorkerConfig {
    fn default() -> Self {
        Self {
            worker: WorkerConfig::default(),
            max_episodes: 10,
            log_interval: 1,
        }
    }
}

impl EpisodicWorkerConfig {
    /// Sets the shared worker configuration.
    pub fn worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Sets the maximum number of episodes.
    pub fn max_episodes(mut self, max_episodes: usize) -> Self {
        self.max_episodes = max_episodes;
        self
    }

    /// Sets the interval of scalar summaries in episodes.
    pub fn log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Constructs [`EpisodicWorkerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EpisodicWorkerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EpisodicWorkerConfig, MaxStepWorkerConfig, WorkerConfig};
    use tempdir::TempDir;

    #[test]
    fn test_serde_worker_configs() -> anyhow::Result<()> {
        let dir = TempDir::new("worker_config")?;

        let config = MaxStepWorkerConfig::default()
            .worker(
                WorkerConfig::default()
                    .num_envs(4)
                    .save_interval(1000)
                    .capture_window(2, 4),
            )
            .max_steps(50000)
            .log_interval(500);
        let path = dir.path().join("max_step.yaml");
        config.save(&path)?;
        assert_eq!(MaxStepWorkerConfig::load(&path)?, config);

        let config = EpisodicWorkerConfig::default().max_episodes(20);
        let path = dir.path().join("episodic.yaml");
        config.save(&path)?;
        assert_eq!(EpisodicWorkerConfig::load(&path)?, config);
        Ok(())
    }
}
