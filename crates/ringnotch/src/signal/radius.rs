use serde::{Deserialize, Serialize};

use super::{Signal, Statistics};
use crate::DetectError;

/// Population statistics of candidate radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusStats {
    pub mean: f64,
    pub std_dev: f64,
    /// `std_dev²`, compared against the acceptance gate.
    pub variance: f64,
}

/// Output of [`filter_by_radius`].
#[derive(Debug, Clone)]
pub struct RadiusFilter {
    pub stats: RadiusStats,
    /// Per-input flag, `true` when the radius falls inside the band.
    pub in_band: Vec<bool>,
    /// Signals inside the band, in input order.
    pub retained: Vec<Signal>,
}

/// Keep signals whose radius lies in `(mean - std_dev, mean)`.
///
/// The band is open on both ends and deliberately stops at the mean, not at
/// `mean + std_dev`; a lone signal is therefore always rejected.
pub fn filter_by_radius(signals: &[Signal]) -> Result<RadiusFilter, DetectError> {
    let radii: Vec<f64> = signals.iter().map(|s| s.r).collect();
    let Statistics { mean, std_dev } =
        Statistics::from_samples(&radii).ok_or(DetectError::EmptyCandidateSet)?;
    let stats = RadiusStats {
        mean,
        std_dev,
        variance: std_dev * std_dev,
    };

    let in_band: Vec<bool> = radii
        .iter()
        .map(|&r| r > mean - std_dev && r < mean)
        .collect();
    let retained = signals
        .iter()
        .zip(&in_band)
        .filter_map(|(s, &keep)| keep.then_some(*s))
        .collect::<Vec<_>>();

    tracing::debug!(
        "Radius band ({:.2}, {:.2}): kept {} of {} (variance {:.2})",
        mean - std_dev,
        mean,
        retained.len(),
        signals.len(),
        stats.variance
    );

    Ok(RadiusFilter {
        stats,
        in_band,
        retained,
    })
}
