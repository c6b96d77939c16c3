use super::Record;
use crate::base::RgbFrame;

/// Writes metrics to an output destination.
///
/// Workers emit three kinds of data: periodic scalar snapshots, raw frames
/// rendered from the environment, and a flush marker turning the frames stored
/// so far into one clip.
pub trait Recorder {
    /// Writes the scalar values in `record` at the given step.
    fn scalar_summary(&mut self, record: &Record, step: usize);

    /// Stores a rendered frame for the clip currently being recorded.
    fn store_rgb(&mut self, frame: &RgbFrame);

    /// Flushes the frames stored since the last flush as a clip under `tag`.
    fn video_summary(&mut self, tag: &str, step: usize);
}
