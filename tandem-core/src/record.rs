//! Types for recording training and evaluation metrics.
//!
//! A [`Record`] is a string-keyed map of [`RecordValue`]s. Environments return
//! their auxiliary step information as a `Record`, the agent returns its
//! training information (loss scalars) as a `Record`, and the workers merge the
//! two before handing them to a [`Recorder`].
//!
//! ```rust
//! use tandem_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward", RecordValue::Scalar(-1.0));
//! record.insert("obs", RecordValue::Array1(vec![1f32, 2.0, 3.0]));
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
