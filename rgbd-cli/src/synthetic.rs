//! Synthetic capture source standing in for a real device

use std::time::Duration;

use rgbd_core::{
    Calibration, CaptureError, CaptureSource, ColorFrame, DepthFrame, DepthRange, Extrinsics,
    FramePair, PinholeCamera,
};

use crate::cli::DepthMode;

const FRAME_INTERVAL_US: u64 = 33_333;

/// Generates synchronized frame pairs of a slanted plane drifting in depth,
/// with a color gradient
pub struct SyntheticSource {
    calibration: Calibration,
    frame_index: u64,
}

impl SyntheticSource {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            frame_index: 0,
        }
    }
}

impl CaptureSource for SyntheticSource {
    fn calibration(&mut self) -> Result<Calibration, CaptureError> {
        Ok(self.calibration.clone())
    }

    fn next_frame_pair(&mut self, _timeout: Duration) -> Result<FramePair, CaptureError> {
        let (dw, dh) = self.calibration.depth_resolution();
        let mut depth =
            DepthFrame::new(dw, dh).map_err(|e| CaptureError::Device(e.to_string()))?;

        // plane tilted along u, drifting 10 mm per frame
        let drift = (self.frame_index % 100) * 10;
        for v in 0..dh {
            for u in 0..dw {
                let d = 800 + (u * 600 / dw) as u64 + drift;
                depth.set(u, v, d as u16);
            }
        }

        let (cw, ch) = self.calibration.color_resolution();
        let mut color =
            ColorFrame::new(cw, ch).map_err(|e| CaptureError::Device(e.to_string()))?;
        for v in 0..ch {
            for u in 0..cw {
                color.set(u, v, [(u * 255 / cw) as u8, (v * 255 / ch) as u8, 128, 255]);
            }
        }

        let timestamp_us = self.frame_index * FRAME_INTERVAL_US;
        self.frame_index += 1;

        Ok(FramePair {
            depth,
            color,
            timestamp_us,
        })
    }
}

/// Calibration used when no record file is supplied: ideal optics at the
/// requested depth mode plus a 720p color sensor with a small baseline
pub fn default_calibration(mode: DepthMode) -> Calibration {
    let (dw, dh) = mode.resolution();
    Calibration::new(
        PinholeCamera::new_ideal(
            dw,
            dh,
            504.0,
            504.0,
            dw as f64 / 2.0,
            dh as f64 / 2.0,
        ),
        PinholeCamera::new_ideal(1280, 720, 608.0, 608.0, 640.0, 360.0),
        Extrinsics::from_row_major(
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            [-32.0, 2.0, 4.0],
        ),
        DepthRange::default(),
    )
}
