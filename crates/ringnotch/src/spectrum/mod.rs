//! Frequency-domain primitives.
//!
//! - [`forward`] / [`inverse`]: 2-D discrete Fourier transform pair.
//! - [`center_shift`]: quadrant swap moving the DC term to the grid center.
//! - [`power_spectrum`]: diagnostic power spectral density.

mod psd;
mod shift;

pub use psd::{power_spectrum, power_spectrum_preview, PsdScale};
pub use shift::center_shift;

use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

use crate::grid::Grid;

/// Complex spectrum of a real image; DC coefficient at index `(0, 0)`.
pub type Spectrum = Grid<Complex<f64>>;

/// Scale convention of the forward transform.
///
/// The inverse transform is always unscaled, so a `Normalized` forward pass
/// followed by [`inverse`] is unity gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Raw sums (used for the power spectrum).
    Unscaled,
    /// Divide by `width * height`.
    Normalized,
}

/// Forward 2-D DFT of a real grid.
pub fn forward(image: &Grid<f32>, scaling: Scaling) -> Spectrum {
    let mut spectrum = image.map(|&v| Complex::new(v as f64, 0.0));
    transform_2d(&mut spectrum, FftDirection::Forward);
    if scaling == Scaling::Normalized {
        let n = (spectrum.width() * spectrum.height()).max(1) as f64;
        let scale = 1.0 / n;
        for c in spectrum.as_mut_slice() {
            *c *= scale;
        }
    }
    spectrum
}

/// Unscaled inverse 2-D DFT.
pub fn inverse(spectrum: &Spectrum) -> Spectrum {
    let mut out = spectrum.clone();
    transform_2d(&mut out, FftDirection::Inverse);
    out
}

/// Separable transform: every row, then every column.
fn transform_2d(grid: &mut Spectrum, direction: FftDirection) {
    let (w, h) = grid.dims();
    if w == 0 || h == 0 {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();

    let row_fft = planner.plan_fft(w, direction);
    let mut scratch = vec![Complex::default(); row_fft.get_inplace_scratch_len()];
    // Buffer length is a multiple of `w`: each row is transformed independently.
    row_fft.process_with_scratch(grid.as_mut_slice(), &mut scratch);

    let col_fft = planner.plan_fft(h, direction);
    let mut scratch = vec![Complex::default(); col_fft.get_inplace_scratch_len()];
    let mut column = vec![Complex::default(); h];
    let data = grid.as_mut_slice();
    for x in 0..w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = data[y * w + x];
        }
        col_fft.process_with_scratch(&mut column, &mut scratch);
        for (y, c) in column.iter().enumerate() {
            data[y * w + x] = *c;
        }
    }
}
