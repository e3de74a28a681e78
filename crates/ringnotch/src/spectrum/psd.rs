//! Power spectral density, kept as a diagnostic output.

use image::GrayImage;

use super::{center_shift, forward, Scaling};
use crate::grid::Grid;

/// Output scale of [`power_spectrum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsdScale {
    /// `|F|^2`.
    #[default]
    Linear,
    /// `ln(1 + |F|^2)`.
    Log,
}

/// Power spectral density of `image` in raw (corner-DC) layout.
///
/// The DC coefficient is zeroed before the magnitude is taken so the
/// average brightness does not dominate the result.
pub fn power_spectrum(image: &Grid<f32>, scale: PsdScale) -> Grid<f32> {
    let spectrum = forward(image, Scaling::Unscaled);
    spectrum.map_indexed(|x, y, c| {
        if x == 0 && y == 0 {
            return 0.0;
        }
        let power = c.norm().powi(2);
        let v = match scale {
            PsdScale::Linear => power,
            PsdScale::Log => power.ln_1p(),
        };
        v as f32
    })
}

/// Center-shift a PSD and min-max stretch it to `[0, 255]` for viewing.
pub fn power_spectrum_preview(psd: &Grid<f32>) -> GrayImage {
    center_shift(psd).normalized(0.0, 255.0).to_gray_saturating()
}
