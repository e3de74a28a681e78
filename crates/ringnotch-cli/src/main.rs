//! ringnotch CLI: notch-filter an image and report ring-shaped signals.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ringnotch::{
    notch_mask, power_spectrum, power_spectrum_preview, DebugCollectConfig, DetectConfig, Grid,
    MembershipThreshold, Notch, PsdRequest, PsdScale, RunRequest,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ringnotch")]
#[command(about = "Suppress periodic noise in the frequency domain and locate ring-shaped signals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect signals and write an annotated copy of the input image.
    Detect(CliDetectArgs),

    /// Render an explicit-notch mask as an editable image.
    Mask(CliMaskArgs),

    /// Write the center-shifted power spectrum of an image.
    Psd(CliPsdArgs),
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the annotated image.
    #[arg(long)]
    out: PathBuf,

    /// Mask image used instead of the explicit notches.
    #[arg(long)]
    filter: Option<PathBuf>,

    /// JSON configuration; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Notch "x,y,r" in DC-centered spectrum coordinates (repeatable).
    /// Replaces the configured notches.
    #[arg(long = "notch", value_parser = parse_notch)]
    notches: Vec<Notch>,

    /// Report signals only when the radius variance is below this [default: 800].
    #[arg(long)]
    radius_variance_threshold: Option<f64>,

    /// Membership margin above the mean score; -1 uses the score std [default: -1].
    #[arg(long, allow_negative_numbers = true)]
    membership_threshold: Option<f64>,

    /// Binarization level applied to the filtered image [default: 50].
    #[arg(long)]
    bin_threshold: Option<u8>,

    /// Path to write detection results (JSON).
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Path to write a versioned debug dump (JSON).
    #[arg(long)]
    debug_json: Option<PathBuf>,

    /// Maximum number of candidates to record in the debug dump.
    #[arg(long, default_value = "300")]
    debug_max_candidates: usize,

    /// Path to write the diagnostic power spectrum image.
    #[arg(long)]
    psd_out: Option<PathBuf>,

    /// Log-scale the diagnostic power spectrum.
    #[arg(long)]
    psd_log: bool,
}

#[derive(Debug, Clone, Args)]
struct CliMaskArgs {
    /// Mask width in pixels (even).
    #[arg(long, default_value = "640")]
    width: usize,

    /// Mask height in pixels (even).
    #[arg(long, default_value = "480")]
    height: usize,

    /// Notch "x,y,r" (repeatable). Defaults to the calibration notch.
    #[arg(long = "notch", value_parser = parse_notch)]
    notches: Vec<Notch>,

    /// Path to write the mask image.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct CliPsdArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the spectrum image.
    #[arg(long)]
    out: PathBuf,

    /// Log-scale the spectrum.
    #[arg(long)]
    log: bool,
}

fn parse_notch(s: &str) -> Result<Notch, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, r] = parts[..] else {
        return Err(format!("expected \"x,y,r\", got \"{}\"", s));
    };
    let num = |v: &str| {
        v.parse::<i32>()
            .map_err(|e| format!("invalid notch value \"{}\": {}", v, e))
    };
    let radius = num(r)?;
    if radius < 0 {
        return Err(format!("notch radius must be non-negative, got {}", radius));
    }
    Ok(Notch::new(num(x)?, num(y)?, radius))
}

fn psd_scale(log: bool) -> PsdScale {
    if log {
        PsdScale::Log
    } else {
        PsdScale::Linear
    }
}

impl CliDetectArgs {
    fn build_config(&self) -> CliResult<DetectConfig> {
        let mut config = match &self.config {
            Some(path) => DetectConfig::from_json_file(path).map_err(|e| -> CliError {
                format!("Failed to load config {}: {}", path.display(), e).into()
            })?,
            None => DetectConfig::default(),
        };

        if !self.notches.is_empty() {
            config.notches = self.notches.clone();
        }
        if let Some(v) = self.radius_variance_threshold {
            config.radius_variance_threshold = v;
        }
        if let Some(v) = self.membership_threshold {
            config.membership_threshold = MembershipThreshold::from_sentinel(v);
        }
        if let Some(v) = self.bin_threshold {
            config.binarize.threshold = v;
        }
        Ok(config)
    }

    fn to_request(&self) -> CliResult<RunRequest> {
        let debug = self.debug_json.as_ref().map(|_| DebugCollectConfig {
            image_path: Some(self.image.display().to_string()),
            max_candidates: self.debug_max_candidates,
        });
        let psd = self.psd_out.as_ref().map(|path| PsdRequest {
            path: path.clone(),
            scale: psd_scale(self.psd_log),
        });

        Ok(RunRequest {
            input: self.image.clone(),
            output: self.out.clone(),
            filter: self.filter.clone(),
            config: self.build_config()?,
            psd,
            debug,
        })
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Mask(args) => run_mask(&args),
        Commands::Psd(args) => run_psd(&args),
    }
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    let request = args.to_request()?;
    tracing::info!("Loading image: {}", request.input.display());
    match &request.filter {
        Some(path) => tracing::info!("Mask image: {}", path.display()),
        None => tracing::info!("Notches: {:?}", request.config.notches),
    }

    let out = ringnotch::run(&request)?;
    let result = &out.result;
    tracing::info!(
        "Accepted {} of {} candidates (radius mean={:.2}, var={:.2}, gate {})",
        result.n_accepted(),
        result.candidates.len(),
        result.radius_stats.mean,
        result.radius_stats.variance,
        if result.variance_gate_passed {
            "passed"
        } else {
            "failed"
        },
    );

    if let Some(json_path) = &args.out_json {
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(json_path, &json)?;
        tracing::info!("Results written to {}", json_path.display());
    }

    if let (Some(debug_path), Some(dump)) = (&args.debug_json, &out.debug) {
        let debug_json = serde_json::to_string_pretty(dump)?;
        std::fs::write(debug_path, &debug_json)?;
        tracing::info!("Debug dump written to {}", debug_path.display());
    }

    Ok(())
}

// ── mask ───────────────────────────────────────────────────────────────

fn run_mask(args: &CliMaskArgs) -> CliResult<()> {
    if args.width % 2 != 0 || args.height % 2 != 0 {
        return Err(format!(
            "mask size must be even, got {}x{}",
            args.width, args.height
        )
        .into());
    }
    let notches = if args.notches.is_empty() {
        DetectConfig::default().notches
    } else {
        args.notches.clone()
    };

    let mask = notch_mask(args.width, args.height, &notches);
    mask.map(|&v| v * 255.0).to_gray_saturating().save(&args.out)?;
    tracing::info!(
        "{}x{} mask with {} notch(es) written to {}",
        args.width,
        args.height,
        notches.len(),
        args.out.display()
    );
    Ok(())
}

// ── psd ────────────────────────────────────────────────────────────────

fn run_psd(args: &CliPsdArgs) -> CliResult<()> {
    let img = image::open(&args.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", args.image.display(), e).into()
    })?;
    let gray = Grid::from_gray(&img.to_luma8()).crop_even();
    let (w, h) = gray.dims();
    tracing::info!("Spectrum of {}x{} working image", w, h);

    let psd = power_spectrum(&gray, psd_scale(args.log));
    power_spectrum_preview(&psd).save(&args.out)?;
    tracing::info!("Power spectrum written to {}", args.out.display());
    Ok(())
}
