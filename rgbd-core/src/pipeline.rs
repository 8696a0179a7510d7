//! Per-frame orchestration of the alignment and projection steps

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::calibration::{Calibration, ReferenceCamera};
use crate::error::{CaptureError, Result, RgbdError, TransformError};
use crate::frame::{ColorFrame, DepthFrame};
use crate::pointcloud::PointCloud;
use crate::transform;

/// One synchronized depth + color acquisition. Both frames originate from
/// the same sensor instant; the pair owns its buffers and they are dropped
/// at the end of the processing pass whatever the outcome.
pub struct FramePair {
    pub depth: DepthFrame,
    pub color: ColorFrame,
    pub timestamp_us: u64,
}

/// Pull-based frame provider (device, recording, synthetic)
pub trait CaptureSource {
    /// Calibration record, queried once at startup
    fn calibration(&mut self) -> std::result::Result<Calibration, CaptureError>;

    /// Next synchronized frame pair, waiting at most `timeout`
    fn next_frame_pair(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<FramePair, CaptureError>;
}

/// Results of one completed pipeline pass, handed to the sink as a unit
pub struct FrameOutput {
    pub reference: ReferenceCamera,
    /// Color reprojected into the depth grid (depth reference only)
    pub aligned_color: Option<ColorFrame>,
    /// Depth reprojected into the color grid (color reference only)
    pub aligned_depth: Option<DepthFrame>,
    pub cloud: PointCloud,
    pub timestamp_us: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkAction {
    Continue,
    Stop,
}

/// Consumer of per-frame outputs (renderer, file writer). Accepts one
/// output at a time
pub trait FrameSink {
    fn consume(&mut self, output: FrameOutput) -> Result<SinkAction>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No frame pair in flight
    Idle,
    /// A frame pair is being reprojected and projected
    Processing,
    /// Results ready for handoff, resources pending release
    Complete,
}

/// Drives the reprojection and point-cloud steps for one frame pair at a
/// time. A failed step discards the pair and returns the driver to idle;
/// no partial results are surfaced.
pub struct PipelineDriver {
    calibration: Calibration,
    reference: ReferenceCamera,
    state: DriverState,
}

impl PipelineDriver {
    pub fn new(calibration: Calibration, reference: ReferenceCamera) -> Self {
        Self {
            calibration,
            reference,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn reference(&self) -> ReferenceCamera {
        self.reference
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Run the pipeline steps for one frame pair. The driver must be idle:
    /// a second pair is not accepted until the prior one is released or
    /// discarded
    pub fn process_pair(&mut self, pair: FramePair) -> Result<FrameOutput> {
        if self.state != DriverState::Idle {
            return Err(RgbdError::InvalidInput(
                "a frame pair is already in flight".to_string(),
            ));
        }
        self.state = DriverState::Processing;

        let started = Instant::now();
        match self.run_steps(&pair) {
            Ok(output) => {
                self.state = DriverState::Complete;
                debug!(
                    timestamp_us = pair.timestamp_us,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    valid_points = output.cloud.valid_count(),
                    "frame pair processed"
                );
                Ok(output)
            }
            Err(err) => {
                // abort this frame entirely, pair is dropped here
                self.state = DriverState::Idle;
                Err(err.into())
            }
        }
    }

    /// Release the completed pass and return to idle
    pub fn release(&mut self) {
        self.state = DriverState::Idle;
    }

    fn run_steps(&self, pair: &FramePair) -> std::result::Result<FrameOutput, TransformError> {
        match self.reference {
            ReferenceCamera::Depth => {
                let aligned_color =
                    transform::color_to_depth(&self.calibration, &pair.depth, &pair.color)?;
                let cloud = transform::point_cloud(
                    &self.calibration,
                    &pair.depth,
                    ReferenceCamera::Depth,
                    Some(&aligned_color),
                )?;
                Ok(FrameOutput {
                    reference: ReferenceCamera::Depth,
                    aligned_color: Some(aligned_color),
                    aligned_depth: None,
                    cloud,
                    timestamp_us: pair.timestamp_us,
                })
            }
            ReferenceCamera::Color => {
                let aligned_depth = transform::depth_to_color(&self.calibration, &pair.depth)?;
                let cloud = transform::point_cloud(
                    &self.calibration,
                    &aligned_depth,
                    ReferenceCamera::Color,
                    Some(&pair.color),
                )?;
                Ok(FrameOutput {
                    reference: ReferenceCamera::Color,
                    aligned_color: None,
                    aligned_depth: Some(aligned_depth),
                    cloud,
                    timestamp_us: pair.timestamp_us,
                })
            }
        }
    }
}

/// Capture/process/handoff loop: pull pairs until the sink asks to stop or
/// the device fails. Timeouts and per-frame failures are logged and the
/// loop keeps pulling.
pub fn run<S, K>(
    source: &mut S,
    sink: &mut K,
    reference: ReferenceCamera,
    timeout: Duration,
) -> Result<()>
where
    S: CaptureSource,
    K: FrameSink,
{
    let calibration = source.calibration()?;
    let mut driver = PipelineDriver::new(calibration, reference);

    loop {
        let pair = match source.next_frame_pair(timeout) {
            Ok(pair) => pair,
            Err(CaptureError::Timeout(ms)) => {
                warn!("no synchronized frame pair within {ms} ms");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let timestamp_us = pair.timestamp_us;
        let output = match driver.process_pair(pair) {
            Ok(output) => output,
            Err(err) => {
                warn!("frame {timestamp_us}: {err}, pair discarded");
                continue;
            }
        };

        let action = sink.consume(output);
        driver.release();
        if action? == SinkAction::Stop {
            return Ok(());
        }
    }
}
