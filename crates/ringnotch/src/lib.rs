//! ringnotch: frequency-domain suppression and statistical localization of
//! periodic ring-shaped artifacts.
//!
//! The pipeline stages are:
//!
//! 1. **Filter** – crop to even size, build a notch mask (explicit notches
//!    mirrored four ways, or a user mask image), multiply the spectrum,
//!    inverse-transform and stretch back to 8 bits.
//! 2. **Binarize** – threshold, opening, dilation.
//! 3. **Extract** – contours → minimal enclosing circles → candidates.
//! 4. **Radius band** – keep radii in `(mean - std, mean)`.
//! 5. **Membership** – keep signals with regular nearest-neighbor spacing.
//! 6. **Gate** – report accepted signals only when the radius variance is low.
//!
//! # Public API
//! - [`Detector`] for in-memory images, [`run`] for file-to-file runs
//! - [`DetectConfig`] for tuning
//! - [`DetectionResult`] with one [`CandidateRecord`] per extracted candidate
//!
//! Spectral and statistical building blocks are exported for diagnostics
//! and for callers composing their own pipelines.

mod annotate;
mod api;
mod config;
mod debug_dump;
mod error;
mod filter;
mod grid;
mod pipeline;
mod signal;
mod spectrum;

#[cfg(test)]
mod test_utils;

pub use annotate::{annotate, annotate_signals, AnnotationStyle};
pub use api::{run, Detector, PsdRequest, RunOutput, RunRequest};
pub use config::{BinarizeConfig, DetectConfig};
pub use debug_dump::{DebugCollectConfig, DebugDump, DEBUG_SCHEMA_V1};
pub use error::DetectError;
pub use filter::{apply_mask, build_mask, filter_image, notch_mask, FilterOutput, FilterSpec, Notch};
pub use grid::Grid;
pub use pipeline::{CandidateRecord, DetectionResult};
pub use signal::{
    extract_candidates, filter_by_membership, filter_by_radius, local_consistency_scores,
    CandidateConfig, Extraction, MembershipFilter, MembershipStats, MembershipThreshold,
    RadiusFilter, RadiusStats, Signal, Statistics, MIN_MEMBERSHIP_SIGNALS,
};
pub use rustfft::num_complex::Complex;
pub use spectrum::{
    center_shift, forward, inverse, power_spectrum, power_spectrum_preview, PsdScale, Scaling,
    Spectrum,
};
