use thiserror::Error;

/// Common errors across the RGB-D pipeline
#[derive(Error, Debug)]
pub enum RgbdError {
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures inside a single reprojection or projection step
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to allocate {width}x{height} destination buffer")]
    Allocation { width: usize, height: usize },

    #[error("Reprojection could not be computed: {0}")]
    Transformation(String),

    #[error("Frame is {got_width}x{got_height} but the {camera} camera is calibrated for {want_width}x{want_height}")]
    InvalidReferenceCamera {
        camera: &'static str,
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },
}

/// Failures at the capture boundary
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No synchronized frame pair within {0} ms")]
    Timeout(u64),

    #[error("Capture device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, RgbdError>;

impl From<crate::camera::DistortionError> for TransformError {
    fn from(err: crate::camera::DistortionError) -> Self {
        TransformError::Transformation(err.to_string())
    }
}
