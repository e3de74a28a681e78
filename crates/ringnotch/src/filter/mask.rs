//! Notch-filter mask synthesis.
//!
//! Masks are authored in DC-centered coordinates (the layout produced by
//! [`crate::spectrum::center_shift`]); the pipeline shifts them back to the
//! raw transform layout before use.

use image::{DynamicImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

use crate::error::DetectError;
use crate::grid::{FloatImage, Grid};

/// One circular notch in DC-centered mask coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notch {
    /// Center `[x, y]` in pixels.
    pub center: [i32; 2],
    /// Disk radius in pixels (inclusive).
    pub radius: i32,
}

impl Notch {
    pub fn new(x: i32, y: i32, radius: i32) -> Self {
        Self {
            center: [x, y],
            radius,
        }
    }

    /// The notch center and its reflections `(W-x, y)`, `(x, H-y)`, `(W-x, H-y)`.
    pub fn mirrored_centers(&self, width: usize, height: usize) -> [[i32; 2]; 4] {
        let [x, y] = self.center;
        let mx = width as i32 - x;
        let my = height as i32 - y;
        [[x, y], [x, my], [mx, y], [mx, my]]
    }
}

/// How the filter mask is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Unit mask with a zeroed disk at every notch and its three mirrors.
    ExplicitNotches(Vec<Notch>),
    /// User-supplied gray image, min-max normalized to `[0, 1]`.
    ///
    /// No symmetry is enforced; the caller is responsible for it.
    MaskImage(Grid<f32>),
}

impl FilterSpec {
    /// Mask-image filter from a decoded image of any color type.
    pub fn from_mask_image(img: &DynamicImage) -> Self {
        Self::MaskImage(Grid::from_gray(&img.to_luma8()))
    }

    pub(crate) fn mode_name(&self) -> &'static str {
        match self {
            Self::ExplicitNotches(_) => "explicit_notches",
            Self::MaskImage(_) => "mask_image",
        }
    }
}

/// Unit mask of `width x height` with four filled zero disks per notch.
///
/// Disks are rasterized by `imageproc`'s midpoint filled circle, which is
/// symmetric about its integer center, so the mask stays invariant under
/// the four reflections. Disk parts falling outside the grid are clipped.
pub fn notch_mask(width: usize, height: usize, notches: &[Notch]) -> Grid<f32> {
    let mut canvas = FloatImage::from_pixel(width as u32, height as u32, Luma([1.0]));
    for notch in notches {
        if notch.radius < 0 {
            tracing::warn!("Skipping notch at {:?} with negative radius", notch.center);
            continue;
        }
        for c in notch.mirrored_centers(width, height) {
            draw_filled_circle_mut(&mut canvas, (c[0], c[1]), notch.radius, Luma([0.0]));
        }
    }
    Grid::from_float_image(&canvas)
}

/// Build the DC-centered mask for a `width x height` working image.
///
/// A mask image is cropped to even dimensions the same way as the input
/// and must then match the working size exactly.
pub fn build_mask(spec: &FilterSpec, width: usize, height: usize) -> Result<Grid<f32>, DetectError> {
    match spec {
        FilterSpec::ExplicitNotches(notches) => Ok(notch_mask(width, height, notches)),
        FilterSpec::MaskImage(image) => {
            let image = image.crop_even();
            if image.dims() != (width, height) {
                return Err(DetectError::DimensionMismatch {
                    expected: [width as u32, height as u32],
                    got: [image.width() as u32, image.height() as u32],
                });
            }
            Ok(image.normalized(0.0, 1.0))
        }
    }
}
