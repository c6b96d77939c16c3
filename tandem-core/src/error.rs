//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TandemError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The shape of the done flag does not match the number of environments.
    #[error("Done flag covers {got} environments, worker drives {expected}")]
    DoneShapeMismatch {
        /// Number of environments the worker was built for.
        expected: usize,
        /// Number of environments covered by the done flag.
        got: usize,
    },

    /// The reward vector does not match the number of environments.
    #[error("Reward vector has {got} elements, worker drives {expected} environments")]
    RewardShapeMismatch {
        /// Number of environments the worker was built for.
        expected: usize,
        /// Number of elements in the reward vector.
        got: usize,
    },
}
