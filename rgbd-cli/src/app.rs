//! Application state and the sink that enforces it

use tracing::info;

use rgbd_core::{FrameOutput, FrameSink, SinkAction};
use rgbd_io::FileSink;

/// Explicit run state, one instance per capture loop
pub struct AppState {
    pub running: bool,
    pub write_enabled: bool,
    frames_left: usize,
}

impl AppState {
    pub fn new(frames: usize, write_enabled: bool) -> Self {
        Self {
            running: frames > 0,
            write_enabled,
            frames_left: frames,
        }
    }

    /// Account for one processed frame; returns false once the budget is
    /// spent
    pub fn frame_done(&mut self) -> bool {
        if self.frames_left > 0 {
            self.frames_left -= 1;
        }
        if self.frames_left == 0 {
            self.running = false;
        }
        self.running
    }
}

/// Routes pipeline outputs to the file writer while the app state allows it
pub struct AppSink {
    state: AppState,
    file: Option<FileSink>,
}

impl AppSink {
    pub fn new(state: AppState, file: Option<FileSink>) -> Self {
        Self { state, file }
    }
}

impl FrameSink for AppSink {
    fn consume(&mut self, output: FrameOutput) -> rgbd_core::Result<SinkAction> {
        // a spent budget must not write the frame that is already in hand
        if !self.state.running {
            return Ok(SinkAction::Stop);
        }

        info!(
            timestamp_us = output.timestamp_us,
            valid_points = output.cloud.valid_count(),
            "frame complete"
        );

        if self.state.write_enabled
            && let Some(file) = &mut self.file
        {
            file.consume(output)?;
        }

        if self.state.frame_done() {
            Ok(SinkAction::Continue)
        } else {
            Ok(SinkAction::Stop)
        }
    }
}
