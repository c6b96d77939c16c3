//! Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleReplayBufferConfig {
    /// Maximum number of transitions held in the buffer.
    pub capacity: usize,

    /// Number of transitions in a sampled batch.
    pub batch_size: usize,

    /// Minimum number of stored transitions before sampling succeeds.
    pub min_size: usize,

    /// Seed of the sampling RNG.
    pub seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            batch_size: 64,
            min_size: 100,
            seed: 42,
        }
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the minimum number of transitions before sampling succeeds.
    pub fn min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Sets the seed of the sampling RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`SimpleReplayBufferConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimpleReplayBufferConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SimpleReplayBufferConfig;
    use tempdir::TempDir;

    #[test]
    fn test_serde_replay_buffer_config() -> anyhow::Result<()> {
        let config = SimpleReplayBufferConfig::default()
            .capacity(256)
            .batch_size(8)
            .min_size(16);

        let dir = TempDir::new("replay_buffer_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = SimpleReplayBufferConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
