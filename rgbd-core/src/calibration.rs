use nalgebra::{Rotation3, Vector3};

use crate::camera::{CameraModel, PinholeCamera};

/// Rigid transform mapping points from the depth camera frame into the
/// color camera frame. Translation is in millimeters.
#[derive(Debug, Clone)]
pub struct Extrinsics {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Extrinsics {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Build from a row-major 3x3 rotation and a translation in millimeters
    pub fn from_row_major(rotation: [f64; 9], translation: [f64; 3]) -> Self {
        let rot = nalgebra::Matrix3::from_row_slice(&rotation);
        Self {
            rotation: Rotation3::from_matrix_unchecked(rot),
            translation: Vector3::from(translation),
        }
    }

    /// Transform a point from the depth camera frame to the color camera frame
    pub fn transform(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.translation
    }
}

/// Calibrated depth operating range in millimeters. Samples outside the
/// range carry no usable geometry
#[derive(Debug, Clone, Copy)]
pub struct DepthRange {
    pub min_mm: u16,
    pub max_mm: u16,
}

impl Default for DepthRange {
    fn default() -> Self {
        // NFOV unbinned operating range
        Self {
            min_mm: 250,
            max_mm: 5460,
        }
    }
}

impl DepthRange {
    pub fn contains(&self, depth_mm: u16) -> bool {
        depth_mm >= self.min_mm && depth_mm <= self.max_mm
    }
}

/// Which camera's coordinate frame a point cloud is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceCamera {
    Depth,
    Color,
}

impl ReferenceCamera {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceCamera::Depth => "depth",
            ReferenceCamera::Color => "color",
        }
    }
}

/// Factory calibration for one depth + color sensor pair. Obtained once
/// from the capture source and shared read-only by all pipeline passes.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub depth_camera: PinholeCamera,
    pub color_camera: PinholeCamera,
    pub extrinsics: Extrinsics,
    pub depth_range: DepthRange,
}

impl Calibration {
    pub fn new(
        depth_camera: PinholeCamera,
        color_camera: PinholeCamera,
        extrinsics: Extrinsics,
        depth_range: DepthRange,
    ) -> Self {
        Self {
            depth_camera,
            color_camera,
            extrinsics,
            depth_range,
        }
    }

    pub fn camera(&self, reference: ReferenceCamera) -> &PinholeCamera {
        match reference {
            ReferenceCamera::Depth => &self.depth_camera,
            ReferenceCamera::Color => &self.color_camera,
        }
    }

    pub fn depth_resolution(&self) -> (usize, usize) {
        self.depth_camera.image_size()
    }

    pub fn color_resolution(&self) -> (usize, usize) {
        self.color_camera.image_size()
    }
}
