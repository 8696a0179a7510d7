pub mod calibration;
pub mod camera;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod pointcloud;
pub mod transform;

pub use calibration::{Calibration, DepthRange, Extrinsics, ReferenceCamera};
pub use camera::{CameraModel, DistortionError, PinholeCamera};
pub use error::{CaptureError, Result, RgbdError, TransformError};
pub use frame::{Bgra, ColorFrame, DepthFrame, INVALID_BGRA};
pub use pipeline::{
    CaptureSource, DriverState, FrameOutput, FramePair, FrameSink, PipelineDriver, SinkAction,
};
pub use pointcloud::PointCloud;
