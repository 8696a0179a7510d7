//! Depth/color reprojection and point-cloud projection

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::calibration::{Calibration, ReferenceCamera};
use crate::camera::CameraModel;
use crate::error::TransformError;
use crate::frame::{Bgra, ColorFrame, DepthFrame};
use crate::pointcloud::PointCloud;

type Result<T> = std::result::Result<T, TransformError>;

fn check_resolution(
    frame: (usize, usize),
    camera: (usize, usize),
    name: &'static str,
) -> Result<()> {
    if frame != camera {
        return Err(TransformError::InvalidReferenceCamera {
            camera: name,
            got_width: frame.0,
            got_height: frame.1,
            want_width: camera.0,
            want_height: camera.1,
        });
    }
    Ok(())
}

/// Reproject a color frame into the depth camera's pixel grid.
///
/// The output has the depth frame's resolution; pixel (u, v) holds the color
/// sample visible from the depth camera's viewpoint at that pixel's measured
/// depth. Pixels with no measurement, out-of-range depth, or a projection
/// outside the color frame keep the zero-alpha sentinel.
pub fn color_to_depth(
    calibration: &Calibration,
    depth: &DepthFrame,
    color: &ColorFrame,
) -> Result<ColorFrame> {
    check_resolution(depth.resolution(), calibration.depth_resolution(), "depth")?;
    check_resolution(color.resolution(), calibration.color_resolution(), "color")?;

    let mut out = ColorFrame::new(depth.width(), depth.height())?;
    let (color_width, color_height) = color.resolution();

    for (u, v, d) in depth.pixels() {
        if d == 0 || !calibration.depth_range.contains(d) {
            continue;
        }

        // 1. unproject in depth camera space
        let p_depth = calibration
            .depth_camera
            .unproject_at_depth((u as f64, v as f64), d as f64)?;

        // 2. transform into color camera space
        let p_color = calibration.extrinsics.transform(&p_depth);

        // 3. project and nearest-sample the color buffer
        let Some((uc, vc)) = calibration.color_camera.project(&p_color) else {
            continue;
        };
        let uc = uc.round() as isize;
        let vc = vc.round() as isize;
        if uc < 0 || uc >= color_width as isize || vc < 0 || vc >= color_height as isize {
            // out of the color frame, discard rather than clamp
            continue;
        }
        out.set(u, v, color.get(uc as usize, vc as usize));
    }

    Ok(out)
}

/// Reproject a depth frame into the color camera's pixel grid.
///
/// Each source measurement is forward-mapped to the nearest destination
/// pixel; when two sources land on the same pixel the smaller depth wins,
/// since nearer surfaces occlude farther ones. Untouched pixels stay zero.
pub fn depth_to_color(calibration: &Calibration, depth: &DepthFrame) -> Result<DepthFrame> {
    check_resolution(depth.resolution(), calibration.depth_resolution(), "depth")?;

    let (color_width, color_height) = calibration.color_resolution();
    let mut out = DepthFrame::new(color_width, color_height)?;

    for (u, v, d) in depth.pixels() {
        if d == 0 || !calibration.depth_range.contains(d) {
            continue;
        }

        let p_depth = calibration
            .depth_camera
            .unproject_at_depth((u as f64, v as f64), d as f64)?;
        let p_color = calibration.extrinsics.transform(&p_depth);

        let Some((uc, vc)) = calibration.color_camera.project(&p_color) else {
            continue;
        };
        let uc = uc.round() as isize;
        let vc = vc.round() as isize;
        if uc < 0 || uc >= color_width as isize || vc < 0 || vc >= color_height as isize {
            continue;
        }

        let z = p_color.z.round();
        if z <= 0.0 || z > f64::from(u16::MAX) {
            continue;
        }
        let z = z as u16;

        // keep the nearest sample on collisions
        let existing = out.get(uc as usize, vc as usize);
        if existing == 0 || z < existing {
            out.set(uc as usize, vc as usize, z);
        }
    }

    Ok(out)
}

/// Project a depth frame into a 3D point cloud in the chosen reference
/// camera's frame.
///
/// The depth frame must already be expressed in that camera's pixel grid
/// (the raw frame for [`ReferenceCamera::Depth`], a [`depth_to_color`]
/// output for [`ReferenceCamera::Color`]). A color frame aligned to the same
/// grid attaches one sample per slot.
pub fn point_cloud(
    calibration: &Calibration,
    depth: &DepthFrame,
    reference: ReferenceCamera,
    color: Option<&ColorFrame>,
) -> Result<PointCloud> {
    let camera = calibration.camera(reference);
    check_resolution(depth.resolution(), camera.image_size(), reference.name())?;

    if let Some(color) = color
        && color.resolution() != depth.resolution()
    {
        return Err(TransformError::Transformation(format!(
            "color frame {}x{} is not aligned to the {}x{} depth frame",
            color.width(),
            color.height(),
            depth.width(),
            depth.height()
        )));
    }

    let (width, height) = depth.resolution();
    let range = calibration.depth_range;

    let rows: Vec<Vec<Option<Vector3<f64>>>> = (0..height)
        .into_par_iter()
        .map(|v| -> Result<Vec<Option<Vector3<f64>>>> {
            let mut row = Vec::with_capacity(width);
            for u in 0..width {
                let d = depth.get(u, v);
                if d == 0 || !range.contains(d) {
                    row.push(None);
                    continue;
                }
                let p = camera.unproject_at_depth((u as f64, v as f64), d as f64)?;
                row.push(Some(p));
            }
            Ok(row)
        })
        .collect::<Result<_>>()?;

    let points: Vec<Option<Vector3<f64>>> = rows.into_iter().flatten().collect();
    let colors: Option<Vec<Bgra>> =
        color.map(|c| c.pixels().map(|(_, _, sample)| sample).collect());

    PointCloud::new(width, height, points, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{DepthRange, Extrinsics};
    use crate::camera::PinholeCamera;

    fn identity_calibration() -> Calibration {
        // Same intrinsics on both sensors so pixels map 1:1
        Calibration::new(
            PinholeCamera::new_ideal(32, 24, 100.0, 100.0, 16.0, 12.0),
            PinholeCamera::new_ideal(32, 24, 100.0, 100.0, 16.0, 12.0),
            Extrinsics::identity(),
            DepthRange::default(),
        )
    }

    #[test]
    fn test_zero_depth_yields_invalid_points() {
        let calib = identity_calibration();
        let depth = DepthFrame::new(32, 24).unwrap();

        let cloud = point_cloud(&calib, &depth, ReferenceCamera::Depth, None).unwrap();
        assert_eq!(cloud.valid_count(), 0);
        assert!(cloud.points().iter().all(|p| p.is_none()));
    }

    #[test]
    fn test_cloud_len_equals_pixel_count() {
        for (w, h) in [(32, 24), (7, 5), (1, 1)] {
            let calib = Calibration::new(
                PinholeCamera::new_ideal(w, h, 50.0, 50.0, w as f64 / 2.0, h as f64 / 2.0),
                PinholeCamera::new_ideal(w, h, 50.0, 50.0, w as f64 / 2.0, h as f64 / 2.0),
                Extrinsics::identity(),
                DepthRange::default(),
            );
            let depth = DepthFrame::new(w, h).unwrap();
            let cloud = point_cloud(&calib, &depth, ReferenceCamera::Depth, None).unwrap();
            assert_eq!(cloud.len(), depth.pixel_count());
        }
    }

    #[test]
    fn test_out_of_range_depth_yields_invalid_points() {
        let calib = identity_calibration();
        let mut depth = DepthFrame::new(32, 24).unwrap();
        depth.set(4, 4, 100); // below the calibrated minimum
        depth.set(5, 5, 6000); // above the calibrated maximum
        depth.set(6, 6, 1000);

        let cloud = point_cloud(&calib, &depth, ReferenceCamera::Depth, None).unwrap();
        assert_eq!(cloud.valid_count(), 1);
        assert!(cloud.point(6 * 32 + 6).is_some());
    }

    #[test]
    fn test_cloud_rejects_frame_in_wrong_camera_grid() {
        let calib = Calibration::new(
            PinholeCamera::new_ideal(32, 24, 100.0, 100.0, 16.0, 12.0),
            PinholeCamera::new_ideal(64, 48, 100.0, 100.0, 32.0, 24.0),
            Extrinsics::identity(),
            DepthRange::default(),
        );
        // 32x24 frame is the depth grid, not the color grid
        let depth = DepthFrame::new(32, 24).unwrap();
        let res = point_cloud(&calib, &depth, ReferenceCamera::Color, None);
        assert!(matches!(
            res,
            Err(TransformError::InvalidReferenceCamera { camera: "color", .. })
        ));
    }

    #[test]
    fn test_cloud_rejects_misaligned_color_frame() {
        let calib = identity_calibration();
        let depth = DepthFrame::new(32, 24).unwrap();
        let color = ColorFrame::new(16, 12).unwrap();
        let res = point_cloud(&calib, &depth, ReferenceCamera::Depth, Some(&color));
        assert!(matches!(res, Err(TransformError::Transformation(_))));
    }

    #[test]
    fn test_identity_roundtrip_within_one_pixel() {
        let calib = identity_calibration();
        let mut depth = DepthFrame::new(32, 24).unwrap();
        depth.set(10, 8, 1000);

        let aligned = depth_to_color(&calib, &depth).unwrap();
        assert_eq!(aligned.get(10, 8), 1000);

        // and back: treat the aligned frame as the source
        let calib_back = Calibration::new(
            calib.color_camera.clone(),
            calib.depth_camera.clone(),
            Extrinsics::identity(),
            DepthRange::default(),
        );
        let back = depth_to_color(&calib_back, &aligned).unwrap();
        let recovered: Vec<(usize, usize)> = back
            .pixels()
            .filter(|(_, _, d)| *d != 0)
            .map(|(u, v, _)| (u, v))
            .collect();
        assert_eq!(recovered.len(), 1);
        let (u, v) = recovered[0];
        assert!(u.abs_diff(10) <= 1);
        assert!(v.abs_diff(8) <= 1);
    }

    #[test]
    fn test_occlusion_keeps_nearest_depth() {
        // Color focal length 1/4 of depth so neighbouring source pixels
        // collapse onto one destination pixel
        let calib = Calibration::new(
            PinholeCamera::new_ideal(8, 1, 100.0, 100.0, 0.0, 0.0),
            PinholeCamera::new_ideal(8, 1, 25.0, 25.0, 0.0, 0.0),
            Extrinsics::identity(),
            DepthRange::default(),
        );

        let mut depth = DepthFrame::new(8, 1).unwrap();
        depth.set(0, 0, 1500);
        depth.set(1, 0, 500); // projects to the same destination pixel

        let aligned = depth_to_color(&calib, &depth).unwrap();
        assert_eq!(aligned.get(0, 0), 500);
    }

    #[test]
    fn test_boundary_projection_is_discarded_not_clamped() {
        // Depth sensor sees 6 columns, color only 4; identical optics, so a
        // source at u = 4 lands exactly one pixel outside the color frame
        let calib = Calibration::new(
            PinholeCamera::new_ideal(6, 1, 100.0, 100.0, 0.0, 0.0),
            PinholeCamera::new_ideal(4, 1, 100.0, 100.0, 0.0, 0.0),
            Extrinsics::identity(),
            DepthRange::default(),
        );

        let mut depth = DepthFrame::new(6, 1).unwrap();
        depth.set(4, 0, 1000);

        let color = ColorFrame::filled(4, 1, [9, 9, 9, 255]).unwrap();
        let out = color_to_depth(&calib, &depth, &color).unwrap();
        assert!(out.pixels().all(|(_, _, c)| c == crate::frame::INVALID_BGRA));

        let aligned = depth_to_color(&calib, &depth).unwrap();
        assert!(aligned.pixels().all(|(_, _, d)| d == 0));
    }

    #[test]
    fn test_color_to_depth_samples_visible_pixel() {
        let calib = identity_calibration();
        let mut depth = DepthFrame::new(32, 24).unwrap();
        depth.set(3, 2, 1000);

        let color = ColorFrame::filled(32, 24, [10, 20, 30, 255]).unwrap();
        let out = color_to_depth(&calib, &depth, &color).unwrap();

        assert_eq!(out.get(3, 2), [10, 20, 30, 255]);
        let valid: Vec<_> = out
            .pixels()
            .filter(|(_, _, c)| *c != crate::frame::INVALID_BGRA)
            .collect();
        assert_eq!(valid.len(), 1);
    }

    #[test]
    fn test_reprojection_rejects_wrong_resolution_inputs() {
        let calib = identity_calibration();
        let depth = DepthFrame::new(16, 12).unwrap();
        let color = ColorFrame::new(32, 24).unwrap();
        assert!(color_to_depth(&calib, &depth, &color).is_err());
        assert!(depth_to_color(&calib, &depth).is_err());
    }

    #[test]
    fn test_cloud_attaches_aligned_colors() {
        let calib = identity_calibration();
        let mut depth = DepthFrame::new(32, 24).unwrap();
        depth.set(3, 2, 1000);

        let color = ColorFrame::filled(32, 24, [10, 20, 30, 255]).unwrap();
        let aligned = color_to_depth(&calib, &depth, &color).unwrap();
        let cloud = point_cloud(&calib, &depth, ReferenceCamera::Depth, Some(&aligned)).unwrap();

        assert_eq!(cloud.valid_count(), 1);
        let idx = 2 * 32 + 3;
        let p = cloud.point(idx).unwrap();
        assert!((p.z - 1000.0).abs() < 1e-9);
        assert_eq!(cloud.colors().unwrap()[idx], [10, 20, 30, 255]);
    }
}
