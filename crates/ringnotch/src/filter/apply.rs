use rustfft::num_complex::Complex;

use crate::error::DetectError;
use crate::grid::Grid;
use crate::spectrum::{forward, inverse, Scaling};

/// Attenuate each frequency bin of `image` by the matching `mask` value.
///
/// `mask` must already be in raw (corner-DC) layout. The imaginary part of
/// the inverse transform is dropped; it is negligible whenever the mask is
/// point-symmetric about DC.
pub fn apply_mask(image: &Grid<f32>, mask: &Grid<f32>) -> Result<Grid<f32>, DetectError> {
    let spectrum = forward(image, Scaling::Normalized);
    let filtered = spectrum
        .zip_map(mask, |c, &m| c * Complex::new(m as f64, 0.0))
        .ok_or(DetectError::DimensionMismatch {
            expected: [image.width() as u32, image.height() as u32],
            got: [mask.width() as u32, mask.height() as u32],
        })?;
    Ok(inverse(&filtered).map(|c| c.re as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{notch_mask, Notch};
    use crate::spectrum::center_shift;
    use approx::assert_abs_diff_eq;
    use rand::prelude::*;

    #[test]
    fn all_pass_mask_returns_input() {
        let mut rng = StdRng::seed_from_u64(3);
        let img = Grid::from_fn(40, 30, |_, _| rng.gen_range(0.0f32..255.0));
        let out = apply_mask(&img, &Grid::filled(40, 30, 1.0)).unwrap();
        for (a, b) in img.as_slice().iter().zip(out.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn zero_mask_returns_zero() {
        let img = Grid::filled(8, 8, 17.0f32);
        let out = apply_mask(&img, &Grid::filled(8, 8, 0.0)).unwrap();
        assert!(out.as_slice().iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn notch_removes_stripe_and_keeps_mean() {
        let (w, h, k) = (64usize, 32usize, 8usize);
        let img = Grid::from_fn(w, h, |x, _| {
            120.0 + 40.0 * (2.0 * std::f32::consts::PI * (k * x) as f32 / w as f32).sin()
        });
        let mask = notch_mask(w, h, &[Notch::new((w / 2 + k) as i32, (h / 2) as i32, 1)]);
        let out = apply_mask(&img, &center_shift(&mask)).unwrap();
        for v in out.as_slice() {
            assert_abs_diff_eq!(*v, 120.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let img = Grid::filled(8, 8, 1.0f32);
        assert!(matches!(
            apply_mask(&img, &Grid::filled(8, 6, 1.0)),
            Err(DetectError::DimensionMismatch { .. })
        ));
    }
}
