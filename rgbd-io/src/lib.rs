//! File output and calibration records for the RGB-D pipeline

pub mod calib_file;
pub mod ply;
pub mod raster;
pub mod sink;

pub use calib_file::{CalibrationFile, load_calibration};
pub use ply::write_point_cloud;
pub use raster::{save_color_jpeg, save_depth_png};
pub use sink::FileSink;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Calibration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid calibration record: {0}")]
    Calibration(String),
}

pub type Result<T> = std::result::Result<T, IoError>;

/// Deterministic output names derived from the capture timestamp
pub fn depth_filename(timestamp_us: u64) -> String {
    format!("d_{timestamp_us}.png")
}

pub fn color_filename(timestamp_us: u64) -> String {
    format!("c_{timestamp_us}.jpg")
}

pub fn cloud_filename(timestamp_us: u64) -> String {
    format!("pc_{timestamp_us}.ply")
}
