#![warn(missing_docs)]
//! Tensorboard recorder for tandem.
//!
//! [`TensorboardRecorder`] writes the workers' scalar summaries and rendered
//! clips into TFRecord event files readable by Tensorboard.
use log::warn;
use std::path::Path;
use tandem_core::record::{Record, RecordValue, Recorder};
use tandem_core::RgbFrame;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Writes records into TFRecord event files.
///
/// Scalar values are written as scalar summaries; frames stored through
/// [`Recorder::store_rgb`] are buffered and flushed as an image sequence by
/// [`Recorder::video_summary`], one image per frame under `<tag>/frame`.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    frames: Vec<RgbFrame>,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Constructs a [`TensorboardRecorder`] writing under `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            frames: Vec::new(),
            ignore_unsupported_value: true,
        }
    }

    /// As [`TensorboardRecorder::new`], but unsupported record values are
    /// reported with a warning instead of being silently dropped.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            frames: Vec::new(),
            ignore_unsupported_value: false,
        }
    }

    fn chw(frame: &RgbFrame) -> Vec<u8> {
        let (w, h) = (frame.width, frame.height);
        let mut data = vec![0u8; 3 * h * w];
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    data[c * h * w + y * w + x] = frame.data[(y * w + x) * 3 + c];
                }
            }
        }
        data
    }
}

impl Recorder for TensorboardRecorder {
    fn scalar_summary(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::DateTime(_) => {} // discard value
                _ => {
                    if !self.ignore_unsupported_value {
                        warn!("Unsupported value: {:?}", (k, v));
                    }
                }
            }
        }
    }

    fn store_rgb(&mut self, frame: &RgbFrame) {
        self.frames.push(frame.clone());
    }

    fn video_summary(&mut self, tag: &str, step: usize) {
        // tensorboard-rs has no video op; the clip is written as an image
        // sequence indexed by frame number.
        let frames = std::mem::take(&mut self.frames);
        if frames.is_empty() {
            return;
        }
        let tag = format!("{}/frame", tag);
        for (i, frame) in frames.iter().enumerate() {
            let shape = [3, frame.height, frame.width];
            self.writer
                .add_image(&tag, Self::chw(frame).as_slice(), &shape, step + i);
        }
        self.writer.flush();
    }
}
