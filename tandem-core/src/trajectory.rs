//! Expert-trajectory capture.
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, io::BufWriter, path::Path};

/// The ordered `(observation, action)` pairs of one episode.
///
/// A trajectory is opened while the episode index falls inside the worker's
/// capture window, appended to once per step, and flushed into a
/// [`TrajectorySet`] at the episode boundary.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trajectory<O, A> {
    steps: Vec<(O, A)>,
}

impl<O, A> Trajectory<O, A> {
    /// Constructs an empty trajectory.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends one `(observation, action)` pair.
    pub fn push(&mut self, obs: O, act: A) {
        self.steps.push((obs, act));
    }

    /// The recorded pairs.
    pub fn steps(&self) -> &[(O, A)] {
        &self.steps
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Takes the recorded pairs out, leaving the trajectory empty.
    pub fn take(&mut self) -> Self {
        Self {
            steps: std::mem::take(&mut self.steps),
        }
    }
}

/// The trajectories captured during a run, in completion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrajectorySet<O, A> {
    trajectories: Vec<Trajectory<O, A>>,
}

impl<O, A> TrajectorySet<O, A> {
    /// Constructs an empty set.
    pub fn new() -> Self {
        Self {
            trajectories: Vec::new(),
        }
    }

    /// Appends a completed trajectory.
    pub fn push(&mut self, trajectory: Trajectory<O, A>) {
        self.trajectories.push(trajectory);
    }

    /// The captured trajectories.
    pub fn trajectories(&self) -> &[Trajectory<O, A>] {
        &self.trajectories
    }

    /// Number of captured trajectories.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Returns `true` if no trajectory was captured.
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }
}

impl<O, A> TrajectorySet<O, A>
where
    O: Serialize,
    A: Serialize,
{
    /// Serializes the set into the given file with bincode.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path.as_ref())?;
        bincode::serialize_into(BufWriter::new(file), &self.trajectories)?;
        info!("Saved expert trajectories to {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Trajectory, TrajectorySet};
    use tempdir::TempDir;

    #[test]
    fn test_take_leaves_empty() {
        let mut traj = Trajectory::new();
        traj.push(vec![0.0f32], vec![1.0f32]);
        traj.push(vec![0.5f32], vec![0.0f32]);

        let taken = traj.take();
        assert_eq!(taken.len(), 2);
        assert!(traj.is_empty());
    }

    #[test]
    fn test_save_roundtrip() -> anyhow::Result<()> {
        let mut set = TrajectorySet::new();
        let mut traj = Trajectory::new();
        traj.push(vec![1.0f32, 2.0], vec![0.5f32]);
        set.push(traj);

        let dir = TempDir::new("trajectory")?;
        let path = dir.path().join("expert_data").join("Agent_trajs.bin");
        set.save(&path)?;

        let file = std::fs::File::open(&path)?;
        let loaded: Vec<Trajectory<Vec<f32>, Vec<f32>>> =
            bincode::deserialize_from(std::io::BufReader::new(file))?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].steps()[0].0, vec![1.0, 2.0]);
        Ok(())
    }
}
