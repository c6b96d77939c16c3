//! Bounded history of episode statistics.
use std::collections::VecDeque;

/// A fixed-capacity FIFO of completed-episode statistics.
///
/// Pushing past capacity evicts the oldest entry. The workers keep two of
/// these, for the scores and lengths of the last completed episodes, and log
/// their means.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    capacity: usize,
    buf: VecDeque<f32>,
}

impl BoundedHistory {
    /// Constructs a history retaining the last `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a value, evicting the oldest when at capacity.
    pub fn push(&mut self, value: f32) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Number of retained values.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no value is retained.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Maximum number of retained values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mean of the retained values, 0 when empty.
    pub fn mean(&self) -> f32 {
        if self.buf.is_empty() {
            return 0.0;
        }
        self.buf.iter().sum::<f32>() / self.buf.len() as f32
    }

    /// Iterates over the retained values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.buf.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedHistory;

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut history = BoundedHistory::new(100);
        for i in 0..250 {
            history.push(i as f32);
            assert!(history.len() <= 100);
        }
        assert_eq!(history.len(), 100);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut history = BoundedHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            history.push(v);
        }
        let retained: Vec<f32> = history.iter().copied().collect();
        assert_eq!(retained, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.mean(), 3.0);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(BoundedHistory::new(5).mean(), 0.0);
    }
}
