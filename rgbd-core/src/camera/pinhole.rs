use super::{CameraModel, DistortionError, distortion::DistortionModel};
use nalgebra::Vector3;

/// Pinhole camera model with optional distortion
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    width: usize,
    height: usize,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    distortion: DistortionModel,
}

impl PinholeCamera {
    /// Create a new pinhole camera with Brown-Conrady distortion
    #[allow(clippy::too_many_arguments)]
    pub fn new_brown_conrady(
        width: usize,
        height: usize,
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        k1: f64,
        k2: f64,
        k3: f64,
        p1: f64,
        p2: f64,
    ) -> Self {
        Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
            distortion: DistortionModel::BrownConrady { k1, k2, k3, p1, p2 },
        }
    }

    /// Create a new pinhole camera with no distortion
    pub fn new_ideal(width: usize, height: usize, fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
            distortion: DistortionModel::None,
        }
    }

    /// Get focal lengths
    pub fn focal_length(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }

    /// Get principal point
    pub fn principal_point(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    /// Unproject a pixel at a measured depth to a 3D point in the camera
    /// frame, same unit as `depth`
    pub fn unproject_at_depth(
        &self,
        pixel: (f64, f64),
        depth: f64,
    ) -> Result<Vector3<f64>, DistortionError> {
        Ok(self.unproject(pixel)? * depth)
    }
}

impl CameraModel for PinholeCamera {
    fn project(&self, point_camera: &Vector3<f64>) -> Option<(f64, f64)> {
        if point_camera.z <= 0.0 {
            return None;
        }

        // Normalized coordinates
        let x_norm = point_camera.x / point_camera.z;
        let y_norm = point_camera.y / point_camera.z;

        // Apply distortion
        let (x_dist, y_dist) = self.distortion.distort(x_norm, y_norm);

        // To pixel coordinates
        let u = self.fx * x_dist + self.cx;
        let v = self.fy * y_dist + self.cy;

        Some((u, v))
    }

    fn unproject(&self, pixel: (f64, f64)) -> Result<Vector3<f64>, DistortionError> {
        // Pixel to distorted normalized coordinates
        let x_dist = (pixel.0 - self.cx) / self.fx;
        let y_dist = (pixel.1 - self.cy) / self.fy;

        // Remove distortion
        let (x_norm, y_norm) = self.distortion.undistort(x_dist, y_dist)?;

        Ok(Vector3::new(x_norm, y_norm, 1.0))
    }

    fn image_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinhole_ideal_projection() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        // Test center point
        let point = Vector3::new(0.0, 0.0, 1000.0);
        let pixel = camera.project(&point).unwrap();
        assert!((pixel.0 - 320.0).abs() < 1e-6);
        assert!((pixel.1 - 288.0).abs() < 1e-6);
    }

    #[test]
    fn test_pinhole_ideal_offset_projection() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        let point = Vector3::new(500.0, 300.0, 1000.0);
        let pixel = camera.project(&point).unwrap();
        assert!((pixel.0 - 570.0).abs() < 1e-6); // 320 + 500 * 0.5
        assert!((pixel.1 - 438.0).abs() < 1e-6); // 288 + 500 * 0.3
    }

    #[test]
    fn test_pinhole_behind_camera() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        // Point behind camera (negative Z)
        let point = Vector3::new(0.0, 0.0, -1000.0);
        let result = camera.project(&point);
        assert!(result.is_none());
    }

    #[test]
    fn test_pinhole_at_camera() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        // Point at camera origin (Z = 0)
        let point = Vector3::new(0.0, 0.0, 0.0);
        let result = camera.project(&point);
        assert!(result.is_none());
    }

    #[test]
    fn test_pinhole_unproject() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        // Unproject center pixel
        let ray = camera.unproject((320.0, 288.0)).unwrap();

        assert!((ray.z - 1.0).abs() < 1e-12);
        assert!(ray.x.abs() < 1e-6);
        assert!(ray.y.abs() < 1e-6);
    }

    #[test]
    fn test_pinhole_unproject_at_depth() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        let point = camera.unproject_at_depth((420.0, 288.0), 1000.0).unwrap();
        assert!((point.x - 200.0).abs() < 1e-6); // (420 - 320) / 500 * 1000
        assert!(point.y.abs() < 1e-6);
        assert!((point.z - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pinhole_roundtrip() {
        let camera = PinholeCamera::new_ideal(640, 576, 500.0, 500.0, 320.0, 288.0);

        // Test roundtrip: project then unproject at the same depth
        let point = Vector3::new(500.0, 300.0, 2000.0);
        let pixel = camera.project(&point).unwrap();
        let recovered = camera.unproject_at_depth(pixel, point.z).unwrap();

        assert!((recovered - point).norm() < 1e-6);
    }

    #[test]
    fn test_pinhole_brown_conrady_roundtrip() {
        let camera = PinholeCamera::new_brown_conrady(
            640, 576, 500.0, 500.0, 320.0, 288.0, -0.1, 0.05, 0.0, 0.001, -0.001,
        );

        let point = Vector3::new(500.0, 300.0, 1000.0);
        let pixel = camera.project(&point).unwrap();
        assert!(pixel.0 > 0.0 && pixel.0 < 640.0);
        assert!(pixel.1 > 0.0 && pixel.1 < 576.0);

        let recovered = camera.unproject_at_depth(pixel, point.z).unwrap();
        assert!((recovered - point).norm() < 1e-3);
    }

    #[test]
    fn test_pinhole_accessors() {
        let camera = PinholeCamera::new_ideal(640, 576, 504.1, 504.2, 320.5, 288.3);
        assert_eq!(camera.focal_length(), (504.1, 504.2));
        assert_eq!(camera.principal_point(), (320.5, 288.3));
        assert_eq!(camera.image_size(), (640, 576));
    }
}
