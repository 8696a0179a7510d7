use crate::error::TransformError;

/// One BGRA color sample
pub type Bgra = [u8; 4];

/// Sentinel written where no color sample is visible (zero alpha)
pub const INVALID_BGRA: Bgra = [0, 0, 0, 0];

fn checked_len(width: usize, height: usize, stride: usize) -> Result<usize, TransformError> {
    if width == 0 || height == 0 || stride < width {
        return Err(TransformError::Allocation { width, height });
    }
    stride
        .checked_mul(height)
        .ok_or(TransformError::Allocation { width, height })
}

/// A 16-bit depth image, values in millimeters, zero meaning no measurement.
/// Row-major with a stride in pixels per row.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u16>,
}

impl DepthFrame {
    /// Allocate a zero-filled (all invalid) depth frame
    pub fn new(width: usize, height: usize) -> Result<Self, TransformError> {
        let len = checked_len(width, height, width)?;
        Ok(Self {
            width,
            height,
            stride: width,
            data: vec![0; len],
        })
    }

    /// Wrap an existing buffer. The buffer length must match stride * height
    pub fn from_data(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<u16>,
    ) -> Result<Self, TransformError> {
        let len = checked_len(width, height, stride)?;
        if data.len() != len {
            return Err(TransformError::Allocation { width, height });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of addressable pixels, excluding stride padding
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> u16 {
        self.data[v * self.stride + u]
    }

    #[inline]
    pub fn set(&mut self, u: usize, v: usize, depth_mm: u16) {
        self.data[v * self.stride + u] = depth_mm;
    }

    /// Iterate pixels in row-major order, skipping stride padding
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, u16)> + '_ {
        (0..self.height)
            .flat_map(move |v| (0..self.width).map(move |u| (u, v, self.get(u, v))))
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }
}

/// A 4-channel BGRA8 color image, row-major with a stride in pixels per row
#[derive(Debug, Clone)]
pub struct ColorFrame {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<Bgra>,
}

impl ColorFrame {
    /// Allocate a frame filled with the invalid (zero alpha) sentinel
    pub fn new(width: usize, height: usize) -> Result<Self, TransformError> {
        let len = checked_len(width, height, width)?;
        Ok(Self {
            width,
            height,
            stride: width,
            data: vec![INVALID_BGRA; len],
        })
    }

    /// Wrap an existing buffer. The buffer length must match stride * height
    pub fn from_data(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<Bgra>,
    ) -> Result<Self, TransformError> {
        let len = checked_len(width, height, stride)?;
        if data.len() != len {
            return Err(TransformError::Allocation { width, height });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Allocate a frame filled with one color
    pub fn filled(width: usize, height: usize, color: Bgra) -> Result<Self, TransformError> {
        let len = checked_len(width, height, width)?;
        Ok(Self {
            width,
            height,
            stride: width,
            data: vec![color; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Bgra {
        self.data[v * self.stride + u]
    }

    #[inline]
    pub fn set(&mut self, u: usize, v: usize, color: Bgra) {
        self.data[v * self.stride + u] = color;
    }

    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Bgra)> + '_ {
        (0..self.height)
            .flat_map(move |v| (0..self.width).map(move |u| (u, v, self.get(u, v))))
    }

    pub fn data(&self) -> &[Bgra] {
        &self.data
    }
}
