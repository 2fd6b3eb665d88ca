//! For tracking compositing progress and aborting early

use pbr::ProgressBar;
use std::io::Write;

/// A trait that is used to report progress to some consumer.
pub trait ProgressReporter {
    /// Called once, as soon as the number of frames is known
    fn total_frames(&mut self, _frames: u64) {}

    /// Called after each frame has been composited.
    ///
    /// This method may return `false` to abort processing.
    fn increase(&mut self) -> bool;

    /// Writing and uploading are done when `run()` returns
    fn done(&mut self, _msg: &str) {}
}

/// No-op progress reporter
pub struct NoProgress {}

impl ProgressReporter for NoProgress {
    fn increase(&mut self) -> bool {
        true
    }
}

/// Implement the progress reporter trait for a progress bar,
/// to make it usable for frame processing reporting.
impl<T> ProgressReporter for ProgressBar<T> where T: Write {
    fn total_frames(&mut self, frames: u64) {
        self.total = frames;
    }

    fn increase(&mut self) -> bool {
        self.inc();
        true
    }

    fn done(&mut self, msg: &str) {
        self.finish_print(msg);
    }
}
