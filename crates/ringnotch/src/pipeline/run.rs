//! Top-level orchestrator: filter → binarize → extract → statistics.

use image::GrayImage;

use super::preprocess::{binarize, foreground_count};
use super::{CandidateRecord, DetectionResult};
use crate::config::DetectConfig;
use crate::debug_dump::{DebugCollectConfig, DebugDump, StageCounts};
use crate::error::DetectError;
use crate::filter::{filter_image, FilterSpec};
use crate::grid::Grid;
use crate::signal::{
    extract_candidates, filter_by_membership, filter_by_radius, MembershipFilter, RadiusFilter,
    Signal,
};
use crate::spectrum::PsdScale;

#[derive(Debug)]
pub(crate) struct PipelineOutput {
    pub result: DetectionResult,
    pub power_spectrum: Option<Grid<f32>>,
    pub counts: StageCounts,
}

impl PipelineOutput {
    pub fn debug_dump(
        &self,
        collect: &DebugCollectConfig,
        config: &DetectConfig,
        spec: &FilterSpec,
    ) -> DebugDump {
        DebugDump::collect(collect, config, spec, &self.result, self.counts)
    }
}

pub(crate) fn run(
    gray: &GrayImage,
    spec: &FilterSpec,
    config: &DetectConfig,
    psd: Option<PsdScale>,
) -> Result<PipelineOutput, DetectError> {
    let (w, h) = gray.dimensions();
    tracing::info!("Detecting signals in {}x{} image ({})", w, h, spec.mode_name());

    let filtered = filter_image(gray, spec, psd)?;
    let binary = binarize(&filtered.filtered, &config.binarize);
    let foreground_px = foreground_count(&binary);

    let extraction = extract_candidates(&binary, &config.candidates, config.mec_seed);
    tracing::info!(
        "{} candidates from {} contours",
        extraction.candidates.len(),
        extraction.n_contours
    );
    if extraction.candidates.is_empty() {
        tracing::warn!("No candidates survived extraction");
        return Err(DetectError::EmptyCandidateSet);
    }

    let radius = filter_by_radius(&extraction.candidates)?;
    tracing::info!(
        "Radius mean={:.2} std={:.2} var={:.2}; {} in band",
        radius.stats.mean,
        radius.stats.std_dev,
        radius.stats.variance,
        radius.retained.len()
    );

    let membership = filter_by_membership(&radius.retained, config.membership_threshold)?;

    let variance_gate_passed = radius.stats.variance < config.radius_variance_threshold;
    if !variance_gate_passed {
        tracing::warn!(
            "Radius variance {:.2} is not below {:.2}; no signal accepted",
            radius.stats.variance,
            config.radius_variance_threshold
        );
    }

    let result = DetectionResult {
        image_size: [w, h],
        working_size: [filtered.filtered.width(), filtered.filtered.height()],
        candidates: pair_records(
            &extraction.candidates,
            &radius,
            &membership,
            variance_gate_passed,
        ),
        radius_stats: radius.stats,
        membership_stats: membership.stats,
        variance_gate_passed,
    };
    tracing::info!(
        "Accepted {} of {} candidates",
        result.n_accepted(),
        result.candidates.len()
    );

    Ok(PipelineOutput {
        result,
        power_spectrum: filtered.power_spectrum,
        counts: StageCounts {
            foreground_px,
            n_contours: extraction.n_contours,
            n_members: membership.retained.len(),
        },
    })
}

/// Attach radius and membership decisions to every raw candidate.
///
/// Membership results are indexed over the in-band subset, so they are
/// consumed in step with the in-band flags.
fn pair_records(
    candidates: &[Signal],
    radius: &RadiusFilter,
    membership: &MembershipFilter,
    gate: bool,
) -> Vec<CandidateRecord> {
    let mut members = membership
        .scores
        .iter()
        .copied()
        .zip(membership.accepted.iter().copied());
    candidates
        .iter()
        .zip(&radius.in_band)
        .map(|(&signal, &in_band)| {
            let (score, member) = match in_band.then(|| members.next()).flatten() {
                Some((score, member)) => (Some(score), member),
                None => (None, false),
            };
            CandidateRecord {
                signal,
                in_radius_band: in_band,
                membership_score: score,
                accepted: gate && member,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Notch;
    use crate::signal::MembershipThreshold;
    use crate::test_utils::{add_stripes, draw_disks};
    use approx::assert_abs_diff_eq;

    const TOP_ROW: [[f32; 2]; 3] = [[48.0, 64.0], [128.0, 64.0], [208.0, 64.0]];

    /// Six disks (three of radius 14 on top, radii 10/18/22 below) under
    /// strong vertical stripes at horizontal frequency 64.
    fn striped_scene() -> (GrayImage, FilterSpec) {
        let mut disks: Vec<([f32; 2], f32)> = TOP_ROW.iter().map(|&c| (c, 14.0)).collect();
        disks.extend([
            ([48.0, 180.0], 10.0),
            ([128.0, 180.0], 18.0),
            ([208.0, 180.0], 22.0),
        ]);
        let img = add_stripes(&draw_disks(256, 256, &disks, 180, 80), 64, 50.0);
        let spec = FilterSpec::ExplicitNotches(vec![Notch::new(128 + 64, 128, 1)]);
        (img, spec)
    }

    #[test]
    fn stripes_are_removed_and_consistent_signals_accepted() {
        let (img, spec) = striped_scene();
        let out = run(&img, &spec, &DetectConfig::default(), None).unwrap();
        let result = out.result;

        assert_eq!(result.candidates.len(), 6);
        assert!(result.variance_gate_passed);
        // Dilation grows every radius by its L1 reach.
        assert_abs_diff_eq!(result.radius_stats.mean, 152.0 / 6.0, epsilon = 1.0);

        let accepted = result.accepted_signals();
        assert_eq!(accepted.len(), 3);
        for s in &accepted {
            assert_abs_diff_eq!(s.r, 24.0, epsilon = 1.5);
            let near = TOP_ROW
                .iter()
                .any(|c| (s.x - c[0] as f64).hypot(s.y - c[1] as f64) < 1.5);
            assert!(near, "unexpected accepted signal {:?}", s);
        }
        for rec in &result.candidates {
            assert_eq!(rec.membership_score.is_some(), rec.in_radius_band);
        }
    }

    #[test]
    fn unfiltered_stripes_swamp_the_scene() {
        let (img, _) = striped_scene();
        let spec = FilterSpec::ExplicitNotches(vec![]);
        let outcome = run(&img, &spec, &DetectConfig::default(), None);
        let accepted_on_top_row = outcome
            .map(|o| o.result.n_accepted() == 3)
            .unwrap_or(false);
        assert!(!accepted_on_top_row);
    }

    #[test]
    fn variance_gate_withholds_acceptance() {
        let (img, spec) = striped_scene();
        let config = DetectConfig {
            radius_variance_threshold: 10.0,
            ..DetectConfig::default()
        };
        let result = run(&img, &spec, &config, None).unwrap().result;
        assert!(!result.variance_gate_passed);
        assert_eq!(result.n_accepted(), 0);
        assert_eq!(result.candidates.len(), 6);
        assert_eq!(
            result.candidates.iter().filter(|c| c.in_radius_band).count(),
            3
        );
    }

    #[test]
    fn blank_image_has_no_candidates() {
        let img = GrayImage::from_pixel(64, 64, image::Luma([90]));
        let spec = FilterSpec::ExplicitNotches(vec![]);
        let err = run(&img, &spec, &DetectConfig::default(), None).unwrap_err();
        assert_eq!(err, DetectError::EmptyCandidateSet);
    }

    #[test]
    fn too_few_in_band_signals_is_degenerate() {
        // Observed radii 18, 19, 24: only the two smaller ones fall in the band.
        let disks = [([28.0, 32.0], 8.0), ([80.0, 32.0], 9.0), ([132.0, 32.0], 14.0)];
        let img = draw_disks(160, 64, &disks, 200, 20);
        let spec = FilterSpec::ExplicitNotches(vec![]);
        let err = run(&img, &spec, &DetectConfig::default(), None).unwrap_err();
        assert_eq!(err, DetectError::DegenerateSignalSet { needed: 3, got: 2 });
    }

    #[test]
    fn debug_dump_and_psd_are_collected_on_request() {
        let (img, spec) = striped_scene();
        let collect = DebugCollectConfig {
            image_path: Some("scene.png".into()),
            max_candidates: 4,
        };
        let config = DetectConfig::default();
        let out = run(&img, &spec, &config, Some(PsdScale::Log)).unwrap();
        assert_eq!(out.power_spectrum.as_ref().map(|p| p.dims()), Some((256, 256)));

        let dump = out.debug_dump(&collect, &config, &spec);
        assert_eq!(dump.schema_version, "ringnotch.debug.v1");
        assert_eq!(dump.filter.mode, "explicit_notches");
        assert_eq!(dump.stages.stage1_extraction.n_candidates, 6);
        assert_eq!(dump.stages.stage2_radius.n_in_band, 3);
        assert_eq!(dump.stages.stage3_membership.n_members, 3);
        assert_eq!(dump.stages.final_.n_accepted, 3);
        assert_eq!(dump.stages.final_.n_recorded, 4);
        assert!(dump.stages.stage0_binarize.foreground_px > 0);
        let json = serde_json::to_value(&dump).unwrap();
        assert!(json["stages"]["final"]["candidates"].is_array());
    }

    #[test]
    fn pairing_follows_in_band_order() {
        let candidates = vec![
            Signal::new(0.0, 0.0, 1.0),
            Signal::new(1.0, 0.0, 1.0),
            Signal::new(2.0, 0.0, 1.0),
            Signal::new(3.0, 0.0, 1.0),
        ];
        let radius = RadiusFilter {
            stats: crate::signal::RadiusStats {
                mean: 1.0,
                std_dev: 0.0,
                variance: 0.0,
            },
            in_band: vec![true, false, true, true],
            retained: vec![candidates[0], candidates[2], candidates[3]],
        };
        let membership =
            filter_by_membership(&radius.retained, MembershipThreshold::Fixed(0.0)).unwrap();
        let records = pair_records(&candidates, &radius, &membership, true);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].membership_score, None);
        assert!(!records[1].accepted);
        assert_eq!(records[0].membership_score, Some(membership.scores[0]));
        assert_eq!(records[2].membership_score, Some(membership.scores[1]));
        assert_eq!(records[3].membership_score, Some(membership.scores[2]));

        let gated = pair_records(&candidates, &radius, &membership, false);
        assert!(gated.iter().all(|r| !r.accepted));
    }
}
