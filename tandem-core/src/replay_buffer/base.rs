//! Simple replay buffer.
use super::SimpleReplayBufferConfig;
use crate::{Env, ReplayBuffer, Transition};
use anyhow::Result;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A fixed-capacity ring of transitions sampled uniformly with replacement.
///
/// [`ReplayBuffer::sample`] returns `None` while the buffer holds fewer than
/// `min_size` transitions, which the agent treats as a warmup no-op.
pub struct SimpleReplayBuffer<E: Env> {
    capacity: usize,
    i: usize,
    size: usize,
    batch_size: usize,
    min_size: usize,
    transitions: Vec<Transition<E>>,
    rng: StdRng,
}

impl<E: Env> ReplayBuffer for SimpleReplayBuffer<E> {
    type Config = SimpleReplayBufferConfig;
    type Transition = Transition<E>;
    type Batch = Vec<Transition<E>>;

    fn build(config: &Self::Config) -> Self {
        Self {
            capacity: config.capacity,
            i: 0,
            size: 0,
            batch_size: config.batch_size,
            min_size: config.min_size,
            transitions: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn push(&mut self, transition: Self::Transition) -> Result<()> {
        if self.size < self.capacity {
            self.transitions.push(transition);
        } else {
            self.transitions[self.i] = transition;
        }
        self.i = (self.i + 1) % self.capacity;
        self.size += 1;
        if self.size >= self.capacity {
            self.size = self.capacity;
        }
        Ok(())
    }

    fn sample(&mut self) -> Option<Self::Batch> {
        if self.size < self.min_size {
            return None;
        }
        let batch = (0..self.batch_size)
            .map(|_| {
                let ix = (self.rng.next_u32() as usize) % self.size;
                self.transitions[ix].clone()
            })
            .collect();
        Some(batch)
    }

    fn len(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAct, DummyEnv, DummyObs};
    use crate::Done;

    fn transition(r: f32) -> Transition<DummyEnv> {
        Transition::new(
            DummyObs(vec![0.0]),
            DummyAct(vec![0.0]),
            vec![r],
            Done::Scalar(false),
            DummyObs(vec![0.0]),
        )
    }

    #[test]
    fn test_sample_below_min_size_is_none() {
        let config = SimpleReplayBufferConfig::default()
            .capacity(16)
            .batch_size(4)
            .min_size(3);
        let mut buffer = SimpleReplayBuffer::<DummyEnv>::build(&config);

        buffer.push(transition(0.0)).unwrap();
        buffer.push(transition(1.0)).unwrap();
        assert!(buffer.sample().is_none());

        buffer.push(transition(2.0)).unwrap();
        let batch = buffer.sample().unwrap();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_capacity_wraps() {
        let config = SimpleReplayBufferConfig::default()
            .capacity(4)
            .batch_size(2)
            .min_size(1);
        let mut buffer = SimpleReplayBuffer::<DummyEnv>::build(&config);

        for i in 0..10 {
            buffer.push(transition(i as f32)).unwrap();
        }
        assert_eq!(buffer.len(), 4);
        // Oldest entries were overwritten in place.
        let rewards: Vec<f32> = buffer.transitions.iter().map(|t| t.reward[0]).collect();
        for r in rewards {
            assert!(r >= 6.0);
        }
    }
}
