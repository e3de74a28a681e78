//! Error type shared by every pipeline stage.

use std::path::PathBuf;

/// Errors that abort a detection run.
///
/// A run that returns one of these writes no output image.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectError {
    /// Input or filter image is missing or cannot be decoded.
    InvalidInput {
        /// Offending path.
        path: PathBuf,
        /// Decoder / filesystem message.
        reason: String,
    },
    /// Filter-mask dimensions differ from the (cropped) working image.
    DimensionMismatch {
        /// Working image size `[width, height]`.
        expected: [u32; 2],
        /// Mask size `[width, height]` after cropping to even dimensions.
        got: [u32; 2],
    },
    /// Too few signals for the nearest-neighbor membership test.
    DegenerateSignalSet {
        /// Required minimum number of signals.
        needed: usize,
        /// Number of signals provided.
        got: usize,
    },
    /// No candidate survived extraction.
    EmptyCandidateSet,
    /// An accepted signal cannot be drawn onto the output canvas.
    IndexOutOfRange {
        /// Position of the signal within the accepted set.
        index: usize,
        /// Signal center `[x, y]`.
        center: [f64; 2],
        /// Canvas size `[width, height]`.
        size: [u32; 2],
    },
    /// The annotated image could not be encoded or written.
    Output {
        /// Destination path.
        path: PathBuf,
        /// Encoder / filesystem message.
        reason: String,
    },
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { path, reason } => {
                write!(f, "cannot read image {}: {}", path.display(), reason)
            }
            Self::DimensionMismatch { expected, got } => write!(
                f,
                "filter mask is {}x{}, expected {}x{}",
                got[0], got[1], expected[0], expected[1]
            ),
            Self::DegenerateSignalSet { needed, got } => {
                write!(f, "too few signals: need {}, got {}", needed, got)
            }
            Self::EmptyCandidateSet => write!(f, "no signal candidates survived extraction"),
            Self::IndexOutOfRange {
                index,
                center,
                size,
            } => write!(
                f,
                "accepted signal #{} at ({:.1}, {:.1}) lies outside the {}x{} canvas",
                index, center[0], center[1], size[0], size[1]
            ),
            Self::Output { path, reason } => {
                write!(f, "cannot write {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for DetectError {}
