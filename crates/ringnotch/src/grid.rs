//! Dense row-major 2-D sample grids.
//!
//! Every stage consumes grids by reference and returns a new grid, so a grid
//! that is already held elsewhere is never mutated.

use image::{GrayImage, ImageBuffer, Luma};

/// Single-channel `f32` image buffer used at `imageproc` boundaries.
pub(crate) type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Dense 2-D array of samples, indexed as `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer. Returns `None` if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major samples.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable access for stages that own a freshly built grid.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Both dimensions even (required by the quadrant swap and notch mirroring).
    pub fn has_even_dims(&self) -> bool {
        self.width % 2 == 0 && self.height % 2 == 0
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Like [`Grid::map`], with the cell coordinates.
    pub fn map_indexed<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        let width = self.width.max(1);
        Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .enumerate()
                .map(|(i, v)| f(i % width, i / width, v))
                .collect(),
        }
    }

    /// Element-wise combination of two grids.
    ///
    /// Returns `None` when the dimensions differ.
    pub fn zip_map<U, V>(&self, other: &Grid<U>, mut f: impl FnMut(&T, &U) -> V) -> Option<Grid<V>> {
        if self.dims() != other.dims() {
            return None;
        }
        Some(Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Top-left `width x height` window.
    ///
    /// Sizes larger than the grid are clamped.
    pub fn cropped(&self, width: usize, height: usize) -> Self {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Self::from_fn(width, height, |x, y| self[(x, y)].clone())
    }

    /// Drop a trailing odd row and/or column so both dimensions are even.
    pub fn crop_even(&self) -> Self {
        self.cropped(self.width & !1, self.height & !1)
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.data[y * self.width + x]
    }
}

impl Grid<f32> {
    /// Gray levels as floats in `[0, 255]`.
    pub fn from_gray(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as usize,
            height: h as usize,
            data: img.as_raw().iter().map(|&v| v as f32).collect(),
        }
    }

    pub(crate) fn from_float_image(img: &FloatImage) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as usize,
            height: h as usize,
            data: img.as_raw().clone(),
        }
    }

    /// Smallest and largest finite sample, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Min-max rescale into `[lo, hi]`.
    ///
    /// A constant grid maps to `lo` everywhere.
    pub fn normalized(&self, lo: f32, hi: f32) -> Self {
        let Some((min, max)) = self.min_max() else {
            return self.clone();
        };
        let range = max - min;
        let scale = if range > f32::EPSILON {
            (hi - lo) / range
        } else {
            0.0
        };
        self.map(|&v| (v - min) * scale + lo)
    }

    /// Round and clamp each sample into `u8`.
    pub fn to_gray_saturating(&self) -> GrayImage {
        let raw = self
            .data
            .iter()
            .map(|&v| if v.is_nan() { 0 } else { v.round().clamp(0.0, 255.0) as u8 })
            .collect();
        GrayImage::from_raw(self.width as u32, self.height as u32, raw)
            .expect("grid buffer matches its dimensions")
    }
}
