use serde::{Deserialize, Serialize};

use super::{Signal, Statistics};
use crate::DetectError;

/// Fewest signals for which the second and third nearest distances exist.
pub const MIN_MEMBERSHIP_SIGNALS: usize = 3;

/// Margin above the mean consistency score under which a signal is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipThreshold {
    /// Use the standard deviation of all scores.
    #[default]
    GlobalStdDev,
    /// Use a caller-chosen margin.
    Fixed(f64),
}

impl MembershipThreshold {
    /// Command-line value that selects [`MembershipThreshold::GlobalStdDev`].
    pub const SENTINEL: f64 = -1.0;

    /// Decode the command-line convention where `-1` means "use the global std".
    pub fn from_sentinel(value: f64) -> Self {
        if value == Self::SENTINEL {
            Self::GlobalStdDev
        } else {
            Self::Fixed(value)
        }
    }

    fn bound(self, score_stats: &Statistics) -> f64 {
        match self {
            Self::GlobalStdDev => score_stats.std_dev,
            Self::Fixed(margin) => margin,
        }
    }
}

/// Score distribution and the resulting acceptance bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipStats {
    pub scores: Statistics,
    /// Margin added to the mean score.
    pub bound: f64,
}

impl MembershipStats {
    /// Scores strictly below this value are accepted.
    pub fn cutoff(&self) -> f64 {
        self.scores.mean + self.bound
    }
}

/// Output of [`filter_by_membership`].
#[derive(Debug, Clone)]
pub struct MembershipFilter {
    /// Local consistency score per input signal.
    pub scores: Vec<f64>,
    pub stats: MembershipStats,
    /// Per-input acceptance flag.
    pub accepted: Vec<bool>,
    /// Accepted signals, in input order.
    pub retained: Vec<Signal>,
}

/// Local consistency score for every signal.
///
/// The score of signal `i` is the population standard deviation of its
/// second and third smallest center distances (the smallest being the zero
/// self-distance). Regularly spaced signals score zero.
pub fn local_consistency_scores(signals: &[Signal]) -> Result<Vec<f64>, DetectError> {
    if signals.len() < MIN_MEMBERSHIP_SIGNALS {
        return Err(DetectError::DegenerateSignalSet {
            needed: MIN_MEMBERSHIP_SIGNALS,
            got: signals.len(),
        });
    }

    let mut distances = vec![0.0f64; signals.len()];
    let scores = signals
        .iter()
        .map(|si| {
            for (d, sj) in distances.iter_mut().zip(signals) {
                *d = si.distance_to(sj);
            }
            distances.sort_unstable_by(|a, b| a.total_cmp(b));
            Statistics::from_samples(&distances[1..3]).map_or(0.0, |s| s.std_dev)
        })
        .collect();
    Ok(scores)
}

/// Keep signals whose local consistency score is below `mean + bound`.
pub fn filter_by_membership(
    signals: &[Signal],
    threshold: MembershipThreshold,
) -> Result<MembershipFilter, DetectError> {
    let scores = local_consistency_scores(signals)?;
    let score_stats =
        Statistics::from_samples(&scores).ok_or(DetectError::EmptyCandidateSet)?;
    let stats = MembershipStats {
        scores: score_stats,
        bound: threshold.bound(&score_stats),
    };
    let cutoff = stats.cutoff();

    let accepted: Vec<bool> = scores.iter().map(|&s| s < cutoff).collect();
    let retained = signals
        .iter()
        .zip(&accepted)
        .filter_map(|(s, &keep)| keep.then_some(*s))
        .collect::<Vec<_>>();

    tracing::debug!(
        "Membership: score mean {:.3}, std {:.3}, cutoff {:.3}; kept {} of {}",
        score_stats.mean,
        score_stats.std_dev,
        cutoff,
        retained.len(),
        signals.len()
    );

    Ok(MembershipFilter {
        scores,
        stats,
        accepted,
        retained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn row() -> Vec<Signal> {
        vec![
            Signal::new(0.0, 0.0, 4.0),
            Signal::new(10.0, 0.0, 4.0),
            Signal::new(20.0, 0.0, 4.0),
        ]
    }

    #[test]
    fn middle_of_a_row_is_most_consistent() {
        let scores = local_consistency_scores(&row()).unwrap();
        assert_abs_diff_eq!(scores[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[2], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn global_std_bound_accepts_within_one_std() {
        let f = filter_by_membership(&row(), MembershipThreshold::GlobalStdDev).unwrap();
        // mean 10/3, std sqrt(50/9): cutoff ~5.69 keeps all three.
        assert_abs_diff_eq!(f.stats.scores.mean, 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.stats.bound, (50.0f64 / 9.0).sqrt(), epsilon = 1e-12);
        assert_eq!(f.accepted, vec![true, true, true]);
        assert_eq!(f.retained.len(), 3);
    }

    #[test]
    fn fixed_bound_tightens_acceptance() {
        let f = filter_by_membership(&row(), MembershipThreshold::Fixed(1.0)).unwrap();
        assert_abs_diff_eq!(f.stats.cutoff(), 10.0 / 3.0 + 1.0, epsilon = 1e-12);
        assert_eq!(f.accepted, vec![false, true, false]);
        assert_eq!(f.retained, vec![Signal::new(10.0, 0.0, 4.0)]);
    }

    #[test]
    fn lattice_outlier_is_rejected() {
        let mut signals: Vec<Signal> = (0..9)
            .map(|i| Signal::new(10.0 * (i % 3) as f64, 10.0 * (i / 3) as f64, 3.0))
            .collect();
        signals.push(Signal::new(100.0, 100.0, 3.0));

        let f = filter_by_membership(&signals, MembershipThreshold::GlobalStdDev).unwrap();
        assert!(f.scores[..9].iter().all(|&s| s.abs() < 1e-12));
        assert_abs_diff_eq!(
            f.scores[9],
            0.5 * (14500.0f64.sqrt() - 12800.0f64.sqrt()),
            epsilon = 1e-9
        );
        assert_eq!(f.retained.len(), 9);
        assert!(!f.accepted[9]);
    }

    #[test]
    fn fewer_than_three_signals_is_degenerate() {
        let err = filter_by_membership(&row()[..2], MembershipThreshold::GlobalStdDev).unwrap_err();
        assert_eq!(err, DetectError::DegenerateSignalSet { needed: 3, got: 2 });
    }

    #[test]
    fn sentinel_decoding() {
        assert_eq!(
            MembershipThreshold::from_sentinel(-1.0),
            MembershipThreshold::GlobalStdDev
        );
        assert_eq!(
            MembershipThreshold::from_sentinel(2.5),
            MembershipThreshold::Fixed(2.5)
        );
    }
}
