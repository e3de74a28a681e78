//! Drawing accepted signals onto the output image.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::pipeline::DetectionResult;
use crate::signal::Signal;

/// Stroke used for annotation circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    /// RGB stroke color.
    pub color: [u8; 3],
    /// Stroke width in pixels, centered on the signal radius.
    pub thickness: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: [12, 255, 36],
            thickness: 2,
        }
    }
}

/// Copy of `image` with every accepted signal of `result` circled.
pub fn annotate(
    image: &RgbImage,
    result: &DetectionResult,
    style: &AnnotationStyle,
) -> Result<RgbImage, DetectError> {
    annotate_signals(image, &result.accepted_signals(), style)
}

/// Copy of `image` with every signal in `signals` circled.
///
/// All centers are checked against the canvas before anything is drawn, so
/// an out-of-range signal fails the call without partial output.
pub fn annotate_signals(
    image: &RgbImage,
    signals: &[Signal],
    style: &AnnotationStyle,
) -> Result<RgbImage, DetectError> {
    let (w, h) = image.dimensions();
    for (index, s) in signals.iter().enumerate() {
        let inside = s.x >= 0.0
            && s.y >= 0.0
            && s.x < w as f64
            && s.y < h as f64
            && s.r.is_finite()
            && s.r >= 0.0;
        if !inside {
            return Err(DetectError::IndexOutOfRange {
                index,
                center: s.center(),
                size: [w, h],
            });
        }
    }

    let mut canvas = image.clone();
    let color = Rgb(style.color);
    let thickness = style.thickness.max(1) as i32;
    for s in signals {
        let center = (s.x.round() as i32, s.y.round() as i32);
        let r0 = s.r.round() as i32 - thickness / 2;
        for r in (r0..r0 + thickness).filter(|&r| r >= 0) {
            draw_hollow_circle_mut(&mut canvas, center, r, color);
        }
    }
    Ok(canvas)
}
