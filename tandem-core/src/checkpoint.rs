//! Checkpointing of model parameters during a run.
use crate::{Env, Model};
use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Writes model checkpoints under a run directory.
///
/// The run directory is `<log_dir>/<worker name>_<timestamp>`, with the
/// timestamp captured once at construction. A checkpoint lands in
/// `ckpt/<global_step / 1000>k/` inside it, so the path is a pure function of
/// the worker name, the timestamp and the step bucket. Writes are serialized
/// by a mutex: an interrupt-driven save cannot interleave with a loop save.
pub struct Checkpointer {
    base_dir: PathBuf,
    lock: Mutex<()>,
}

impl Checkpointer {
    /// Constructs a checkpointer, capturing the run timestamp.
    pub fn new(log_dir: impl AsRef<Path>, worker_name: &str) -> Self {
        let stamp = Local::now().format("%Y%m%d%H%M%S");
        let base_dir = log_dir
            .as_ref()
            .join(format!("{}_{}", worker_name, stamp));
        Self {
            base_dir,
            lock: Mutex::new(()),
        }
    }

    /// The run directory of this checkpointer.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The checkpoint directory for the given step.
    pub fn ckpt_dir(&self, global_step: usize) -> PathBuf {
        self.base_dir
            .join("ckpt")
            .join(format!("{}k", global_step / 1000))
    }

    /// The expert-trajectory export path for the given agent name.
    pub fn expert_data_path(&self, agent_name: &str) -> PathBuf {
        self.base_dir
            .join("expert_data")
            .join(format!("{}_trajs.bin", agent_name))
    }

    /// Saves the model in the checkpoint directory of the given step.
    pub fn save<E, M>(&self, model: &M, global_step: usize) -> Result<PathBuf>
    where
        E: Env,
        M: Model<E>,
    {
        let _guard = self.lock.lock().unwrap();
        let dir = self.ckpt_dir(global_step);
        fs::create_dir_all(&dir)?;
        model.save(&dir)?;
        Ok(dir)
    }

    /// Saves the model, logging the outcome instead of returning it.
    ///
    /// Used for the exit and interrupt saves, where a failure must never
    /// propagate past the run scope.
    pub fn save_best_effort<E, M>(&self, model: &M, global_step: usize)
    where
        E: Env,
        M: Model<E>,
    {
        match self.save(model, global_step) {
            Ok(dir) => info!("Saved model in {:?}", dir),
            Err(e) => warn!("Failed to save model: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Checkpointer;
    use crate::dummy::DummyModel;
    use tempdir::TempDir;

    #[test]
    fn test_ckpt_path_buckets_steps_in_thousands() {
        let ckpt = Checkpointer::new("/tmp/logs", "MaxStepWorker");
        let d0 = ckpt.ckpt_dir(999);
        let d1 = ckpt.ckpt_dir(1000);
        let d2 = ckpt.ckpt_dir(1999);

        assert!(d0.ends_with("ckpt/0k"));
        assert!(d1.ends_with("ckpt/1k"));
        // Same bucket, same path.
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_save_writes_into_bucket_dir() -> anyhow::Result<()> {
        let dir = TempDir::new("checkpointer")?;
        let ckpt = Checkpointer::new(dir.path(), "MaxStepWorker");
        let (model, _) = DummyModel::new(1);

        let saved = ckpt.save(&model, 2500)?;
        assert!(saved.ends_with("ckpt/2k"));
        assert!(saved.join("dummy_model").exists());

        // Saving again at the same bucket does not advance the path.
        let saved_again = ckpt.save(&model, 2999)?;
        assert_eq!(saved, saved_again);
        Ok(())
    }

    #[test]
    fn test_expert_data_path() {
        let ckpt = Checkpointer::new("/tmp/logs", "EpisodicWorker");
        let path = ckpt.expert_data_path("DdpgAgent");
        assert!(path.ends_with("expert_data/DdpgAgent_trajs.bin"));
    }
}
