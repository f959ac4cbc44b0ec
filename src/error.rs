//! Error types for the label generator.
//!
//! Two families live here:
//! - [`Error`]: fatal conditions that abort a run (unreadable input,
//!   unwritable output, invalid configuration, rendering failures under the
//!   default policy).
//! - [`RejectReason`]: per-line rejections that are logged and skipped while
//!   the batch continues.

use std::path::PathBuf;

use crate::record::ParseError;
use crate::sscc::InvalidCodeReason;
use crate::writer::ImageError;

/// Result type alias for label generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a label run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be opened.
    #[error("Cannot open input file '{}': {source}", path.display())]
    InputUnreadable {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The output document could not be written.
    #[error("Cannot write output document '{}': {source}", path.display())]
    OutputUnwritable {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Barcode encoding or rasterization failed
    #[error("Barcode error: {0}")]
    Barcode(String),

    /// Image embedding error
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// A label could not be rendered.
    #[error("Failed to render label {code}: {reason}")]
    Rendering {
        /// Code of the label being rendered
        code: String,
        /// What went wrong
        reason: String,
    },
}

/// Why an input line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// The line could not be split into a record.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The code failed SSCC validation.
    #[error(transparent)]
    InvalidCode(#[from] InvalidCodeReason),

    /// The label failed to render and the run is configured to skip it.
    #[error("rendering failed: {0}")]
    Rendering(String),
}

impl RejectReason {
    /// Short, stable name of the rejection kind (for summaries and logs).
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Parse(ParseError::MissingCode) => "MissingCode",
            RejectReason::InvalidCode(InvalidCodeReason::WrongLength { .. }) => "WrongLength",
            RejectReason::InvalidCode(InvalidCodeReason::NonDigitCharacter { .. }) => {
                "NonDigitCharacter"
            },
            RejectReason::InvalidCode(InvalidCodeReason::CheckDigitMismatch { .. }) => {
                "CheckDigitMismatch"
            },
            RejectReason::Rendering(_) => "RenderingError",
        }
    }
}
