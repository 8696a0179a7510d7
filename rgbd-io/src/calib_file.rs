//! On-disk calibration records

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rgbd_core::{Calibration, DepthRange, Extrinsics, PinholeCamera};

use crate::{IoError, Result};

/// Brown-Conrady coefficients as stored in the record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistortionRecord {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRecord {
    pub width: usize,
    pub height: usize,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    #[serde(default)]
    pub distortion: Option<DistortionRecord>,
}

impl CameraRecord {
    fn into_camera(self) -> PinholeCamera {
        match self.distortion {
            Some(d) => PinholeCamera::new_brown_conrady(
                self.width,
                self.height,
                self.fx,
                self.fy,
                self.cx,
                self.cy,
                d.k1,
                d.k2,
                d.k3,
                d.p1,
                d.p2,
            ),
            None => PinholeCamera::new_ideal(
                self.width,
                self.height,
                self.fx,
                self.fy,
                self.cx,
                self.cy,
            ),
        }
    }
}

/// Row-major rotation plus translation in millimeters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtrinsicsRecord {
    pub rotation: [f64; 9],
    pub translation: [f64; 3],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepthRangeRecord {
    pub min_mm: u16,
    pub max_mm: u16,
}

/// Complete calibration record for one depth + color sensor pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationFile {
    pub depth: CameraRecord,
    pub color: CameraRecord,
    pub extrinsics: ExtrinsicsRecord,
    #[serde(default)]
    pub depth_range: Option<DepthRangeRecord>,
}

impl CalibrationFile {
    pub fn into_calibration(self) -> Result<Calibration> {
        if self.depth.fx == 0.0 || self.depth.fy == 0.0 || self.color.fx == 0.0
            || self.color.fy == 0.0
        {
            return Err(IoError::Calibration("zero focal length".to_string()));
        }
        let range = self
            .depth_range
            .map(|r| DepthRange {
                min_mm: r.min_mm,
                max_mm: r.max_mm,
            })
            .unwrap_or_default();
        Ok(Calibration::new(
            self.depth.into_camera(),
            self.color.into_camera(),
            Extrinsics::from_row_major(self.extrinsics.rotation, self.extrinsics.translation),
            range,
        ))
    }
}

/// Load a JSON calibration record from disk
pub fn load_calibration<P: AsRef<Path>>(path: P) -> Result<Calibration> {
    let contents = fs::read_to_string(path)?;
    let record: CalibrationFile = serde_json::from_str(&contents)?;
    record.into_calibration()
}
