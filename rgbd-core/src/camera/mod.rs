//! Camera models and projections

mod distortion;
mod pinhole;

pub use distortion::DistortionError;
pub use pinhole::PinholeCamera;

use nalgebra::Vector3;

/// Generic camera model
pub trait CameraModel {
    /// Project a 3D point in the camera frame to pixel coordinates.
    /// Returns None if the point is behind the camera
    fn project(&self, point_camera: &Vector3<f64>) -> Option<(f64, f64)>;

    /// Unproject pixel coordinates to a ray in the camera frame with z = 1,
    /// so the 3D point at a measured depth d is `ray * d`
    fn unproject(&self, pixel: (f64, f64)) -> Result<Vector3<f64>, DistortionError>;

    /// Get image dimensions this camera is calibrated for
    fn image_size(&self) -> (usize, usize);
}
