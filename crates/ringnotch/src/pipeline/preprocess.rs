//! Binarization of the filtered image ahead of contour extraction.

use image::GrayImage;
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, open};

use crate::config::BinarizeConfig;

/// Threshold, open away speckle, then grow blobs.
///
/// The opening uses a 3x3 square per unit of radius; the dilation uses a
/// diamond, equal to repeated dilation by a 3x3 cross.
pub(crate) fn binarize(filtered: &GrayImage, config: &BinarizeConfig) -> GrayImage {
    let mut binary = threshold(filtered, config.threshold, ThresholdType::Binary);
    if config.open_radius > 0 {
        binary = open(&binary, Norm::LInf, config.open_radius);
    }
    if config.dilate_radius > 0 {
        binary = dilate(&binary, Norm::L1, config.dilate_radius);
    }
    binary
}

/// Number of foreground pixels in a binary image.
pub(crate) fn foreground_count(binary: &GrayImage) -> usize {
    binary.as_raw().iter().filter(|&&v| v > 0).count()
}
