//! Configuration of [`Agent`](super::Agent).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Agent`](super::Agent).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AgentConfig {
    /// Name of the agent, used as the expert-trajectory file stem.
    pub name: String,

    /// Interval of training updates in collected steps. Must be at least 1.
    pub train_interval: usize,

    /// Interval of target synchronizations in collected steps.
    /// Must be at least 1.
    pub target_update_interval: usize,

    /// Whether actions are perturbed by the exploration process.
    pub explore: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".to_string(),
            train_interval: 1,
            target_update_interval: 1,
            explore: false,
        }
    }
}

impl AgentConfig {
    /// Sets the name of the agent.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the interval of training updates in collected steps.
    pub fn train_interval(mut self, train_interval: usize) -> Self {
        self.train_interval = train_interval;
        self
    }

    /// Sets the interval of target synchronizations in collected steps.
    pub fn target_update_interval(mut self, target_update_interval: usize) -> Self {
        self.target_update_interval = target_update_interval;
        self
    }

    /// Enables or disables exploration.
    pub fn explore(mut self, explore: bool) -> Self {
        self.explore = explore;
        self
    }

    /// Constructs [`AgentConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AgentConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AgentConfig;
    use tempdir::TempDir;

    #[test]
    fn test_serde_agent_config() -> anyhow::Result<()> {
        let config = AgentConfig::default()
            .name("DdpgAgent")
            .train_interval(4)
            .target_update_interval(16)
            .explore(true);

        let dir = TempDir::new("agent_config")?;
        let path = dir.path().join("agent.yaml");
        config.save(&path)?;
        assert_eq!(AgentConfig::load(&path)?, config);
        Ok(())
    }
}
