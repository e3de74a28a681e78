//! Circular signal candidates and their statistical validation.
//!
//! Stages:
//! 1. **Extract** – contours of a binary blob image → minimal enclosing circles.
//! 2. **Radius band** – keep radii in `(mean - stddev, mean)`.
//! 3. **Membership** – keep signals whose nearest-neighbor spacing is regular.

mod enclosing_circle;
mod extract;
mod membership;
mod radius;
mod stats;

pub use extract::{extract_candidates, CandidateConfig, Extraction};
pub use membership::{
    filter_by_membership, local_consistency_scores, MembershipFilter, MembershipStats,
    MembershipThreshold, MIN_MEMBERSHIP_SIGNALS,
};
pub use radius::{filter_by_radius, RadiusFilter, RadiusStats};
pub use stats::Statistics;

/// A circular artifact candidate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Signal {
    /// Center x (pixels).
    pub x: f64,
    /// Center y (pixels).
    pub y: f64,
    /// Radius (pixels), always positive for extracted candidates.
    pub r: f64,
}

impl Signal {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    #[inline]
    pub fn center(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Euclidean distance between centers.
    #[inline]
    pub fn distance_to(&self, other: &Signal) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
