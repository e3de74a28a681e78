//! Detection configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotationStyle;
use crate::filter::{FilterSpec, Notch};
use crate::signal::{CandidateConfig, MembershipThreshold};

/// Binary threshold and morphology applied to the filtered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeConfig {
    /// Pixels strictly above this level become foreground.
    pub threshold: u8,
    /// Radius of the square (L∞) opening element; `0` skips the opening.
    pub open_radius: u8,
    /// Radius of the diamond (L1) dilation element; `0` skips the dilation.
    pub dilate_radius: u8,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            open_radius: 1,
            dilate_radius: 10,
        }
    }
}

/// Top-level detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Notches used when no mask image is supplied.
    pub notches: Vec<Notch>,
    pub binarize: BinarizeConfig,
    pub candidates: CandidateConfig,
    /// Accepted signals are reported only when the radius variance is
    /// strictly below this value.
    pub radius_variance_threshold: f64,
    pub membership_threshold: MembershipThreshold,
    pub annotation: AnnotationStyle,
    /// Seed for the enclosing-circle point shuffle.
    pub mec_seed: u64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            notches: vec![Notch::new(320, 240, 21)],
            binarize: BinarizeConfig::default(),
            candidates: CandidateConfig::default(),
            radius_variance_threshold: 800.0,
            membership_threshold: MembershipThreshold::GlobalStdDev,
            annotation: AnnotationStyle::default(),
            mec_seed: 42,
        }
    }
}

impl DetectConfig {
    /// Load a (possibly partial) configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Filter built from the configured notches.
    pub fn notch_filter(&self) -> FilterSpec {
        FilterSpec::ExplicitNotches(self.notches.clone())
    }
}
