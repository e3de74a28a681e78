//! High-level detection API.
//!
//! [`Detector`] wraps a [`DetectConfig`] and runs the pipeline on in-memory
//! images. [`run`] is the file-to-file entry point: decode, detect, annotate,
//! encode.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage};

use crate::annotate::annotate;
use crate::config::DetectConfig;
use crate::debug_dump::{DebugCollectConfig, DebugDump};
use crate::error::DetectError;
use crate::filter::{filter_image, FilterOutput, FilterSpec};
use crate::pipeline::{self, DetectionResult};
use crate::spectrum::{power_spectrum_preview, PsdScale};

/// Primary detection interface.
///
/// Create once, detect on many images.
///
/// # Examples
///
/// ```no_run
/// use ringnotch::Detector;
///
/// let image = image::open("frame.png").unwrap().to_luma8();
/// let detector = Detector::new();
/// match detector.detect(&image) {
///     Ok(result) => println!("{} signals accepted", result.n_accepted()),
///     Err(e) => eprintln!("detection failed: {e}"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectConfig,
}

impl Detector {
    /// Detector with the default configuration and calibration notch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: DetectConfig) -> Self {
        Self { config }
    }

    /// Load a JSON configuration and create a detector in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(DetectConfig::from_json_file(path)?))
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut DetectConfig {
        &mut self.config
    }

    /// Detect with the configured notches.
    pub fn detect(&self, image: &GrayImage) -> Result<DetectionResult, DetectError> {
        self.detect_with_filter(image, &self.config.notch_filter())
    }

    /// Detect with an explicit filter (notches or mask image).
    pub fn detect_with_filter(
        &self,
        image: &GrayImage,
        spec: &FilterSpec,
    ) -> Result<DetectionResult, DetectError> {
        pipeline::run(image, spec, &self.config, None).map(|out| out.result)
    }

    /// Detect and collect a versioned debug dump.
    pub fn detect_with_debug(
        &self,
        image: &GrayImage,
        spec: &FilterSpec,
        debug_cfg: &DebugCollectConfig,
    ) -> Result<(DetectionResult, DebugDump), DetectError> {
        let out = pipeline::run(image, spec, &self.config, None)?;
        let dump = out.debug_dump(debug_cfg, &self.config, spec);
        Ok((out.result, dump))
    }

    /// Only the frequency-domain filter stage.
    pub fn filter(
        &self,
        image: &GrayImage,
        spec: &FilterSpec,
        psd: Option<PsdScale>,
    ) -> Result<FilterOutput, DetectError> {
        filter_image(image, spec, psd)
    }
}

/// Where and how to write the diagnostic power spectrum.
#[derive(Debug, Clone)]
pub struct PsdRequest {
    pub path: PathBuf,
    pub scale: PsdScale,
}

/// File-level detection request.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Image to analyze.
    pub input: PathBuf,
    /// Destination of the annotated copy of `input`.
    pub output: PathBuf,
    /// Mask image; the configured notches are used when absent.
    pub filter: Option<PathBuf>,
    pub config: DetectConfig,
    pub psd: Option<PsdRequest>,
    pub debug: Option<DebugCollectConfig>,
}

impl RunRequest {
    /// Request with the default configuration and no optional outputs.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            filter: None,
            config: DetectConfig::default(),
            psd: None,
            debug: None,
        }
    }
}

/// Outcome of a successful [`run`].
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub result: DetectionResult,
    pub debug: Option<DebugDump>,
}

/// Decode `input`, detect, draw accepted signals on the original image and
/// write it to `output`.
///
/// Nothing is written when any stage fails.
pub fn run(request: &RunRequest) -> Result<RunOutput, DetectError> {
    let input = open_image(&request.input)?;
    let spec = match &request.filter {
        Some(path) => FilterSpec::from_mask_image(&open_image(path)?),
        None => request.config.notch_filter(),
    };

    let out = pipeline::run(
        &input.to_luma8(),
        &spec,
        &request.config,
        request.psd.as_ref().map(|p| p.scale),
    )?;
    let annotated = annotate(&input.to_rgb8(), &out.result, &request.config.annotation)?;

    if let (Some(req), Some(psd)) = (&request.psd, &out.power_spectrum) {
        power_spectrum_preview(psd)
            .save(&req.path)
            .map_err(|e| output_error(&req.path, e))?;
        tracing::info!("Power spectrum written to {}", req.path.display());
    }
    annotated
        .save(&request.output)
        .map_err(|e| output_error(&request.output, e))?;
    tracing::info!("Annotated image written to {}", request.output.display());

    let debug = request
        .debug
        .as_ref()
        .map(|collect| out.debug_dump(collect, &request.config, &spec));
    Ok(RunOutput {
        result: out.result,
        debug,
    })
}

fn open_image(path: &Path) -> Result<DynamicImage, DetectError> {
    image::open(path).map_err(|e| DetectError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn output_error(path: &Path, e: image::ImageError) -> DetectError {
    DetectError::Output {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
