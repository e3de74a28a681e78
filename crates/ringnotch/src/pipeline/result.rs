use serde::{Deserialize, Serialize};

use crate::signal::{MembershipStats, RadiusStats, Signal};

/// One extracted candidate and the decisions taken on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub signal: Signal,
    /// Radius fell inside `(mean - std_dev, mean)`.
    pub in_radius_band: bool,
    /// Local consistency score; present only for in-band candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_score: Option<f64>,
    /// Passed every filter and the variance gate.
    pub accepted: bool,
}

/// Full detection result for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Input dimensions `[width, height]`.
    pub image_size: [u32; 2],
    /// Dimensions after cropping to even size.
    pub working_size: [u32; 2],
    /// Every extracted candidate, in extraction order.
    pub candidates: Vec<CandidateRecord>,
    pub radius_stats: RadiusStats,
    pub membership_stats: MembershipStats,
    /// Radius variance was below the configured threshold.
    pub variance_gate_passed: bool,
}

impl DetectionResult {
    /// Records that survived every stage.
    pub fn accepted(&self) -> impl Iterator<Item = &CandidateRecord> + '_ {
        self.candidates.iter().filter(|c| c.accepted)
    }

    pub fn accepted_signals(&self) -> Vec<Signal> {
        self.accepted().map(|c| c.signal).collect()
    }

    pub fn n_accepted(&self) -> usize {
        self.accepted().count()
    }
}
