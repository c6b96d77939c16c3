use super::{Record, Recorder};
use crate::base::RgbFrame;

/// A recorder that ignores any record. This struct is used just for debugging.
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn scalar_summary(&mut self, _record: &Record, _step: usize) {}

    fn store_rgb(&mut self, _frame: &RgbFrame) {}

    fn video_summary(&mut self, _tag: &str, _step: usize) {}
}
