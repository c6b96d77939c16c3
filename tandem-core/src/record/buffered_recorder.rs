use super::{Record, Recorder};
use crate::base::RgbFrame;

/// Buffered recorder.
///
/// This is used for recording sequences of summaries during evaluation runs
/// and in tests that assert on what a worker logged and when.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
    n_frames: usize,
    videos: Vec<(String, usize)>,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the scalar summaries written so far,
    /// as `(step, record)` pairs.
    pub fn iter(&self) -> std::slice::Iter<(usize, Record)> {
        self.buf.iter()
    }

    /// Number of frames stored since construction.
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// The `(tag, step)` pairs of the clips flushed so far.
    pub fn videos(&self) -> &[(String, usize)] {
        &self.videos
    }
}

impl Recorder for BufferedRecorder {
    /// Keeps a copy of the [`Record`] in the buffer.
    fn scalar_summary(&mut self, record: &Record, step: usize) {
        self.buf.push((step, record.clone()));
    }

    fn store_rgb(&mut self, _frame: &RgbFrame) {
        self.n_frames += 1;
    }

    fn video_summary(&mut self, tag: &str, step: usize) {
        self.videos.push((tag.to_string(), step));
    }
}
