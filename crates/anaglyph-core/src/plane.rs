//! Single-channel float images.

use crate::error::{AnaglyphError, AnaglyphResult};

/// A row-major 2D buffer of `f64` samples.
///
/// Used for luminance and alpha channels during compositing, for depth maps,
/// and for per-pixel disparity fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl Plane {
    /// A zero-filled plane.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// A plane with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Wrap row-major samples, checking the length.
    pub fn from_vec(width: u32, height: u32, data: Vec<f64>) -> AnaglyphResult<Self> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(AnaglyphError::InvalidArgument(format!(
                "plane of {}x{} needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sample at `(x, y)`. Panics if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Row `y` as a slice.
    pub fn row(&self, y: u32) -> &[f64] {
        let w = self.width as usize;
        let start = (y as usize) * w;
        &self.data[start..start + w]
    }

    /// Row `y` as a mutable slice.
    pub fn row_mut(&mut self, y: u32) -> &mut [f64] {
        let w = self.width as usize;
        let start = (y as usize) * w;
        &mut self.data[start..start + w]
    }

    /// Smallest and largest sample, or None for an empty plane.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Apply `f` to every sample, producing a new plane of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Plane {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}
