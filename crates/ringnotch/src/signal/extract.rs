use image::GrayImage;
use imageproc::contours::find_contours;

use super::enclosing_circle::min_enclosing_circle;
use super::Signal;

/// Rejection gates applied to raw enclosing circles.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Keep only circles with radius strictly above this (pixels).
    pub min_radius: f64,
    /// Keep only circles whose center x and y are strictly above this (pixels).
    pub min_coord: f64,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            min_coord: 1.0,
        }
    }
}

/// Output of [`extract_candidates`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Accepted candidates, in reverse contour discovery order.
    pub candidates: Vec<Signal>,
    /// Number of contours found (outer borders and holes).
    pub n_contours: usize,
}

/// Turn the blobs of a binary image into circular candidates.
///
/// Every contour (outer border or hole) is replaced by its minimal enclosing
/// circle; circles that are too small or hug the top/left border are dropped.
pub fn extract_candidates(binary: &GrayImage, config: &CandidateConfig, seed: u64) -> Extraction {
    let contours = find_contours::<i32>(binary);
    let n_contours = contours.len();

    let mut candidates = Vec::with_capacity(n_contours);
    for contour in contours.iter().rev() {
        let points: Vec<[f64; 2]> = contour
            .points
            .iter()
            .map(|p| [p.x as f64, p.y as f64])
            .collect();
        let Some(circle) = min_enclosing_circle(&points, seed) else {
            continue;
        };
        let signal = Signal::new(circle.center[0], circle.center[1], circle.radius);
        if signal.r > config.min_radius
            && signal.x > config.min_coord
            && signal.y > config.min_coord
        {
            candidates.push(signal);
        }
    }

    tracing::debug!(
        "Candidate extraction: {} of {} contours kept",
        candidates.len(),
        n_contours
    );

    Extraction {
        candidates,
        n_contours,
    }
}
