//! File-writing frame sink

use std::path::PathBuf;

use tracing::info;

use rgbd_core::{FrameOutput, FrameSink, RgbdError, SinkAction};

use crate::{cloud_filename, color_filename, depth_filename, ply, raster};

/// Persists each frame output under one directory, named by capture
/// timestamp. Stops the run after `max_frames` when set.
pub struct FileSink {
    dir: PathBuf,
    max_frames: Option<usize>,
    written: usize,
}

impl FileSink {
    pub fn new(dir: PathBuf, max_frames: Option<usize>) -> Self {
        Self {
            dir,
            max_frames,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for FileSink {
    fn consume(&mut self, output: FrameOutput) -> rgbd_core::Result<SinkAction> {
        let ts = output.timestamp_us;

        if let Some(depth) = &output.aligned_depth {
            raster::save_depth_png(self.dir.join(depth_filename(ts)), depth)
                .map_err(|e| RgbdError::Io(e.to_string()))?;
        }
        if let Some(color) = &output.aligned_color {
            raster::save_color_jpeg(self.dir.join(color_filename(ts)), color)
                .map_err(|e| RgbdError::Io(e.to_string()))?;
        }
        ply::write_point_cloud(self.dir.join(cloud_filename(ts)), &output.cloud)
            .map_err(|e| RgbdError::Io(e.to_string()))?;

        self.written += 1;
        info!(
            timestamp_us = ts,
            valid_points = output.cloud.valid_count(),
            "frame written"
        );

        match self.max_frames {
            Some(limit) if self.written >= limit => Ok(SinkAction::Stop),
            _ => Ok(SinkAction::Continue),
        }
    }
}
