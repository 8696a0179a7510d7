//! Raster output for depth and color frames

use std::path::Path;

use image::{ImageBuffer, Luma, Rgb};

use rgbd_core::{ColorFrame, DepthFrame};

use crate::{IoError, Result};

/// Save a depth frame as a 16-bit grayscale PNG, values in millimeters
pub fn save_depth_png<P: AsRef<Path>>(path: P, frame: &DepthFrame) -> Result<()> {
    let (width, height) = frame.resolution();
    let pixels: Vec<u16> = frame.pixels().map(|(_, _, d)| d).collect();

    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| IoError::Calibration("depth buffer size mismatch".to_string()))?;
    buffer.save(path)?;
    Ok(())
}

/// Save a color frame as JPEG, converting BGRA to RGB and dropping alpha
pub fn save_color_jpeg<P: AsRef<Path>>(path: P, frame: &ColorFrame) -> Result<()> {
    let (width, height) = frame.resolution();
    let mut pixels = Vec::with_capacity(width * height * 3);
    for (_, _, [b, g, r, _a]) in frame.pixels() {
        pixels.extend_from_slice(&[r, g, b]);
    }

    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| IoError::Calibration("color buffer size mismatch".to_string()))?;
    buffer.save(path)?;
    Ok(())
}
