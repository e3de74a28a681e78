//! Frequency-domain notch filtering of a grayscale image.
//!
//! Stages: crop to even size → optional diagnostic PSD → build mask →
//! center-shift mask → multiply spectrum → inverse → 8-bit min-max stretch.

mod apply;
mod mask;

pub use apply::apply_mask;
pub use mask::{build_mask, notch_mask, FilterSpec, Notch};

use image::GrayImage;

use crate::error::DetectError;
use crate::grid::Grid;
use crate::spectrum::{center_shift, power_spectrum, PsdScale};

/// Result of [`filter_image`].
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// Filtered image, stretched to the full `[0, 255]` range.
    pub filtered: GrayImage,
    /// Power spectrum of the cropped input (raw layout), when requested.
    pub power_spectrum: Option<Grid<f32>>,
}

/// Suppress the frequencies selected by `spec` in `gray`.
///
/// The output is cropped to even dimensions. Pass `psd` to also get the
/// diagnostic power spectrum of the cropped input.
pub fn filter_image(
    gray: &GrayImage,
    spec: &FilterSpec,
    psd: Option<PsdScale>,
) -> Result<FilterOutput, DetectError> {
    let image = Grid::from_gray(gray).crop_even();
    let (w, h) = image.dims();
    if (w, h) != (gray.width() as usize, gray.height() as usize) {
        tracing::debug!(
            "Cropped {}x{} to even working size {}x{}",
            gray.width(),
            gray.height(),
            w,
            h
        );
    }

    let power_spectrum = psd.map(|scale| power_spectrum(&image, scale));

    let mask = build_mask(spec, w, h)?;
    let mask = center_shift(&mask);
    let filtered = apply_mask(&image, &mask)?;

    // Saturate into u8 first, then stretch what is left.
    let saturated = Grid::from_gray(&filtered.to_gray_saturating());
    let filtered = saturated.normalized(0.0, 255.0).to_gray_saturating();

    Ok(FilterOutput {
        filtered,
        power_spectrum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{add_stripes, draw_disks};

    #[test]
    fn output_is_cropped_and_stretched() {
        let img = draw_disks(33, 21, &[([16.0, 10.0], 5.0)], 200, 40);
        let out = filter_image(&img, &FilterSpec::ExplicitNotches(vec![]), None).unwrap();
        assert_eq!(out.filtered.dimensions(), (32, 20));
        let min = out.filtered.as_raw().iter().copied().min().unwrap();
        let max = out.filtered.as_raw().iter().copied().max().unwrap();
        assert_eq!((min, max), (0, 255));
        assert!(out.power_spectrum.is_none());
    }

    #[test]
    fn notch_at_stripe_frequency_flattens_background() {
        // Period-4 stripes take exact integer values, so nothing but the
        // notched bins carries energy besides DC.
        let (w, h, k) = (128u32, 64u32, 32u32);
        let img = add_stripes(&draw_disks(w, h, &[], 0, 100), k, 50.0);
        let stripes_only = filter_image(&img, &FilterSpec::ExplicitNotches(vec![]), None).unwrap();
        let notched = filter_image(
            &img,
            &FilterSpec::ExplicitNotches(vec![Notch::new((w / 2 + k) as i32, (h / 2) as i32, 1)]),
            Some(PsdScale::Log),
        )
        .unwrap();

        let spread = |g: &GrayImage| {
            let lo = g.as_raw().iter().copied().min().unwrap() as i32;
            let hi = g.as_raw().iter().copied().max().unwrap() as i32;
            hi - lo
        };
        assert_eq!(spread(&stripes_only.filtered), 255);
        // A flat result stretches to zero everywhere.
        assert_eq!(spread(&notched.filtered), 0);
        assert_eq!(notched.power_spectrum.map(|p| p.dims()), Some((128, 64)));
    }

    #[test]
    fn mask_image_with_wrong_size_fails() {
        let img = draw_disks(32, 32, &[], 0, 10);
        let spec = FilterSpec::MaskImage(Grid::filled(16, 16, 1.0));
        assert!(matches!(
            filter_image(&img, &spec, None),
            Err(DetectError::DimensionMismatch { .. })
        ));
    }
}
