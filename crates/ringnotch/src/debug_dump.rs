//! Versioned debug dump for one detection run.
//!
//! Reuses the production result and statistics types; the debug-only
//! structs carry per-stage counts.

use serde::{Deserialize, Serialize};

use crate::config::DetectConfig;
use crate::filter::{FilterSpec, Notch};
use crate::pipeline::{CandidateRecord, DetectionResult};
use crate::signal::{MembershipStats, RadiusStats};

pub const DEBUG_SCHEMA_V1: &str = "ringnotch.debug.v1";

/// Debug collection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugCollectConfig {
    /// Source image path copied into the dump metadata.
    pub image_path: Option<String>,
    /// Maximum number of candidate records stored in the final stage.
    pub max_candidates: usize,
}

impl Default for DebugCollectConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            max_candidates: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugDump {
    pub schema_version: String,
    pub image: ImageDebug,
    pub detect_config: DetectConfig,
    pub filter: FilterDebug,
    pub stages: StagesDebug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDebug {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub width: u32,
    pub height: u32,
    pub working_width: u32,
    pub working_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDebug {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notches: Vec<Notch>,
}

impl From<&FilterSpec> for FilterDebug {
    fn from(spec: &FilterSpec) -> Self {
        let notches = match spec {
            FilterSpec::ExplicitNotches(n) => n.clone(),
            FilterSpec::MaskImage(_) => Vec::new(),
        };
        Self {
            mode: spec.mode_name().to_string(),
            notches,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesDebug {
    pub stage0_binarize: BinarizeDebug,
    pub stage1_extraction: ExtractionDebug,
    pub stage2_radius: RadiusDebug,
    pub stage3_membership: MembershipDebug,
    pub stage4_gate: GateDebug,
    #[serde(rename = "final")]
    pub final_: FinalDebug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinarizeDebug {
    pub foreground_px: usize,
    /// Foreground share of the working image, in `[0, 1]`.
    pub foreground_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionDebug {
    pub n_contours: usize,
    pub n_candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusDebug {
    pub stats: RadiusStats,
    pub n_in_band: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipDebug {
    pub stats: MembershipStats,
    pub n_members: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDebug {
    pub radius_variance: f64,
    pub threshold: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalDebug {
    pub n_accepted: usize,
    pub n_recorded: usize,
    pub candidates: Vec<CandidateRecord>,
}

/// Per-stage counts gathered by the pipeline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageCounts {
    pub foreground_px: usize,
    pub n_contours: usize,
    pub n_members: usize,
}

impl DebugDump {
    pub(crate) fn collect(
        collect: &DebugCollectConfig,
        config: &DetectConfig,
        spec: &FilterSpec,
        result: &DetectionResult,
        counts: StageCounts,
    ) -> Self {
        let [width, height] = result.image_size;
        let [working_width, working_height] = result.working_size;
        let working_px = (working_width as usize * working_height as usize).max(1);
        let recorded: Vec<CandidateRecord> = result
            .candidates
            .iter()
            .take(collect.max_candidates)
            .copied()
            .collect();

        Self {
            schema_version: DEBUG_SCHEMA_V1.to_string(),
            image: ImageDebug {
                path: collect.image_path.clone(),
                width,
                height,
                working_width,
                working_height,
            },
            detect_config: config.clone(),
            filter: FilterDebug::from(spec),
            stages: StagesDebug {
                stage0_binarize: BinarizeDebug {
                    foreground_px: counts.foreground_px,
                    foreground_fraction: counts.foreground_px as f64 / working_px as f64,
                },
                stage1_extraction: ExtractionDebug {
                    n_contours: counts.n_contours,
                    n_candidates: result.candidates.len(),
                },
                stage2_radius: RadiusDebug {
                    stats: result.radius_stats,
                    n_in_band: result.candidates.iter().filter(|c| c.in_radius_band).count(),
                },
                stage3_membership: MembershipDebug {
                    stats: result.membership_stats,
                    n_members: counts.n_members,
                },
                stage4_gate: GateDebug {
                    radius_variance: result.radius_stats.variance,
                    threshold: config.radius_variance_threshold,
                    passed: result.variance_gate_passed,
                },
                final_: FinalDebug {
                    n_accepted: result.n_accepted(),
                    n_recorded: recorded.len(),
                    candidates: recorded,
                },
            },
        }
    }
}
