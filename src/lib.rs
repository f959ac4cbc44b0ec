// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]

//! # SSCC Labels
//!
//! Batch generator of printable GS1 logistics labels. Reads one record per
//! line (`code[,pallet[,item]]`), validates each Serial Shipping Container
//! Code, and writes one PDF page per valid record: a Code 128 barcode, the
//! grouped human-readable code, and an outline box holding the pallet and
//! item text.
//!
//! ## Pipeline
//!
//! ```text
//! input line
//!     ↓
//! [record]    code, pallet, item
//!     ↓
//! [sscc]      length, digits, GS1 Mod-10 check digit
//!     ↓
//! [layout]    barcode / text / outline placement
//!     ↓
//! [rendering] barcode PNG + PDF page
//! ```
//!
//! Invalid lines are logged and skipped; the run continues.
//!
//! ## Quick Start
//!
//! ```
//! use sscc_labels::{validate, InvalidCodeReason};
//!
//! let code = validate("00123456789012345675").unwrap();
//! assert_eq!(code.formatted(), "(00)123456789012345675");
//!
//! assert_eq!(
//!     validate("34012345678901234567"),
//!     Err(InvalidCodeReason::CheckDigitMismatch { expected: 0, found: 7 })
//! );
//! ```
//!
//! Whole runs go through [`api::generate_labels`].

#![warn(missing_docs)]

// Error handling
pub mod error;

// Validation and records
pub mod record;
pub mod sscc;

// Label geometry
pub mod geometry;
pub mod layout;

// Batch processing
pub mod pipeline;

// Rendering boundary
pub mod rendering;

// PDF writing and barcodes
pub mod object;
pub mod writer;

// Configuration
pub mod config;

// High-level API
pub mod api;

// Re-exports
pub use api::{generate_labels, RunSummary};
pub use config::{LabelConfig, RenderingFailurePolicy};
pub use error::{Error, RejectReason, Result};
pub use layout::{LabelBuilder, LabelLayout, TextMetrics};
pub use pipeline::{BatchPipeline, BatchResult, Diagnostic};
pub use record::{InputRecord, ParseError};
pub use rendering::{BarcodeEncoder, PdfLabelRenderer, RenderingPort};
pub use sscc::{validate, InvalidCodeReason, SsccCode};
