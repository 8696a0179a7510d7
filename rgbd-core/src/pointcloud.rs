use nalgebra::Vector3;

use crate::error::TransformError;
use crate::frame::Bgra;

/// An ordered point cloud with one slot per source depth pixel, row-major.
/// A slot is `None` when the source depth sample carried no usable geometry,
/// so an invalid point can never be mistaken for real geometry at the origin.
/// Coordinates are in millimeters in the reference camera frame.
#[derive(Debug, Clone)]
pub struct PointCloud {
    width: usize,
    height: usize,
    points: Vec<Option<Vector3<f64>>>,
    colors: Option<Vec<Bgra>>,
}

impl PointCloud {
    /// Create a point cloud from per-pixel slots and optional paired colors
    pub fn new(
        width: usize,
        height: usize,
        points: Vec<Option<Vector3<f64>>>,
        colors: Option<Vec<Bgra>>,
    ) -> Result<Self, TransformError> {
        if points.len() != width * height {
            return Err(TransformError::Allocation { width, height });
        }
        if let Some(colors) = &colors
            && colors.len() != points.len()
        {
            return Err(TransformError::Allocation { width, height });
        }
        Ok(Self {
            width,
            height,
            points,
            colors,
        })
    }

    /// Number of slots (valid and invalid), equal to the source pixel count
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of slots holding a valid point
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get as reference the per-pixel slots
    pub fn points(&self) -> &[Option<Vector3<f64>>] {
        &self.points
    }

    /// Get as reference the colors paired 1:1 with the slots
    pub fn colors(&self) -> Option<&[Bgra]> {
        self.colors.as_deref()
    }

    /// Slot at a row-major index
    #[inline]
    pub fn point(&self, index: usize) -> Option<Vector3<f64>> {
        self.points[index]
    }

    /// Iterate valid points with their paired color, if colors are attached
    pub fn valid_points(&self) -> impl Iterator<Item = (Vector3<f64>, Option<Bgra>)> + '_ {
        self.points.iter().enumerate().filter_map(|(i, p)| {
            p.map(|p| (p, self.colors.as_ref().map(|c| c[i])))
        })
    }
}
