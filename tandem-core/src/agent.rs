//! Agent: collects experience and schedules model updates.
mod config;

use crate::record::Record;
use crate::{Done, Env, ExplorationProcess, Model, ReplayBuffer, Transition};
use anyhow::Result;
pub use config::AgentConfig;

/// Owns a model and a replay buffer and decides when to train and when to
/// synchronize target parameters.
///
/// [`Agent::step`] is called once per interaction step. It always pushes the
/// transition into the buffer, then checks two independent cadences against
/// its step counter: a training update every `train_interval` steps and a
/// target synchronization every `target_update_interval` steps. Either,
/// neither or both may fire on a given step.
///
/// The loss function is injected at construction; it maps a sampled batch and
/// the current model to the loss values consumed by [`Model::step`].
pub struct Agent<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    model: M,
    buffer: R,
    loss_fn: Box<dyn Fn(&R::Batch, &M) -> M::Loss>,
    exploration: Option<Box<dyn ExplorationProcess<E::Act>>>,
    name: String,
    train_interval: usize,
    target_update_interval: usize,
    curr_step: usize,
}

impl<E, M, R> Agent<E, M, R>
where
    E: Env,
    M: Model<E>,
    R: ReplayBuffer<Transition = Transition<E>>,
{
    /// Constructs an agent.
    ///
    /// `exploration` is applied in [`Agent::act`] iff `config.explore` is set
    /// and a process is given. Both intervals in the configuration must be at
    /// least 1.
    pub fn build(
        config: &AgentConfig,
        model: M,
        buffer: R,
        loss_fn: impl Fn(&R::Batch, &M) -> M::Loss + 'static,
        exploration: Option<Box<dyn ExplorationProcess<E::Act>>>,
    ) -> Self {
        assert!(config.train_interval > 0);
        assert!(config.target_update_interval > 0);
        let exploration = if config.explore { exploration } else { None };

        Self {
            model,
            buffer,
            loss_fn: Box::new(loss_fn),
            exploration,
            name: config.name.clone(),
            train_interval: config.train_interval,
            target_update_interval: config.target_update_interval,
            curr_step: 0,
        }
    }

    /// Computes an action for the given observation, perturbed by the
    /// exploration process when one is enabled.
    pub fn act(&mut self, obs: &E::Obs) -> E::Act {
        let act = self.model.act(obs);
        match &mut self.exploration {
            Some(process) => process.perturb(act),
            None => act,
        }
    }

    /// Collects one transition, then fires the training and target-sync
    /// cadences that are due.
    ///
    /// The returned record carries the training information (loss scalars) of
    /// this step, empty when no update happened.
    pub fn step(
        &mut self,
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        done: Done,
        next_obs: E::Obs,
    ) -> Result<Record> {
        self.collect(obs, act, reward, done, next_obs)?;

        let mut record = Record::empty();
        if self.curr_step % self.train_interval == 0 {
            record = self.train()?;
        }
        if self.curr_step % self.target_update_interval == 0 {
            self.model.update_target();
        }
        Ok(record)
    }

    /// Pushes one transition into the replay buffer, incrementing the step
    /// counter by exactly one.
    pub fn collect(
        &mut self,
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        done: Done,
        next_obs: E::Obs,
    ) -> Result<()> {
        self.curr_step += 1;
        self.buffer
            .push(Transition::new(obs, act, reward, done, next_obs))
    }

    /// Performs one training update.
    ///
    /// Sampling failure (buffer below its minimum size) is a warmup no-op
    /// returning an empty record; callers may not assume every call performs
    /// an update.
    pub fn train(&mut self) -> Result<Record> {
        match self.buffer.sample() {
            None => Ok(Record::empty()),
            Some(batch) => {
                let loss = (self.loss_fn)(&batch, &self.model);
                self.model.step(loss)
            }
        }
    }

    /// The name of the agent, used as the expert-trajectory file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of [`Agent::collect`] calls so far.
    pub fn curr_step(&self) -> usize {
        self.curr_step
    }

    /// The model owned by the agent.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model, for loading parameters.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The replay buffer owned by the agent.
    pub fn buffer(&self) -> &R {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::{Agent, AgentConfig};
    use crate::dummy::{DummyAct, DummyEnv, DummyModel, DummyObs};
    use crate::replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig};
    use crate::{Done, ReplayBuffer};

    fn build_agent(
        train_interval: usize,
        target_update_interval: usize,
        min_size: usize,
    ) -> (
        Agent<DummyEnv, DummyModel, SimpleReplayBuffer<DummyEnv>>,
        std::rc::Rc<std::cell::RefCell<crate::dummy::DummyModelCounters>>,
    ) {
        let (model, counters) = DummyModel::new(1);
        let buffer = SimpleReplayBuffer::build(
            &SimpleReplayBufferConfig::default()
                .capacity(100)
                .batch_size(2)
                .min_size(min_size),
        );
        let config = AgentConfig::default()
            .train_interval(train_interval)
            .target_update_interval(target_update_interval);
        let agent = Agent::build(&config, model, buffer, |_, _| (), None);
        (agent, counters)
    }

    fn step(agent: &mut Agent<DummyEnv, DummyModel, SimpleReplayBuffer<DummyEnv>>) {
        agent
            .step(
                DummyObs(vec![0.0]),
                DummyAct(vec![0.0]),
                vec![1.0],
                Done::Scalar(false),
                DummyObs(vec![0.0]),
            )
            .unwrap();
    }

    #[test]
    fn test_train_cadence() {
        let (mut agent, counters) = build_agent(3, 1000, 1);
        for i in 1..=12 {
            step(&mut agent);
            assert_eq!(counters.borrow().n_opt, i / 3);
        }
    }

    #[test]
    fn test_target_sync_cadence() {
        let (mut agent, counters) = build_agent(1000, 4, 1);
        for i in 1..=12 {
            step(&mut agent);
            assert_eq!(counters.borrow().n_target_sync, i / 4);
        }
    }

    #[test]
    fn test_both_cadences_may_fire_on_one_step() {
        let (mut agent, counters) = build_agent(1, 1, 1);
        for i in 1..=5 {
            step(&mut agent);
            assert_eq!(counters.borrow().n_opt, i);
            assert_eq!(counters.borrow().n_target_sync, i);
        }
    }

    #[test]
    fn test_train_below_min_size_is_noop() {
        let (mut agent, counters) = build_agent(1, 1000, 8);
        for _ in 0..7 {
            step(&mut agent);
        }
        // Buffer warmup: cadence fired every step but no update happened.
        assert_eq!(counters.borrow().n_opt, 0);

        step(&mut agent);
        assert_eq!(counters.borrow().n_opt, 1);
    }

    #[test]
    fn test_collect_increments_step_by_one() {
        let (mut agent, _) = build_agent(1, 1, 1);
        for i in 1..=3 {
            step(&mut agent);
            assert_eq!(agent.curr_step(), i);
            assert_eq!(agent.buffer().len(), i);
        }
    }
}
