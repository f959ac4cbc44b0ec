//! Configuration for a label run.
//!
//! Defaults reproduce the classic output: A6 landscape pages, Code 128,
//! Courier-Bold text, at most 1000 accepted lines, written to
//! `sscc_labels.pdf`. Any field can be overridden from a JSON file named by
//! the `SSCC_LABELS_CONFIG` environment variable; missing fields keep their
//! defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::mm_to_pt;
use crate::layout::{LabelBuilder, LabelStyle};
use crate::pipeline::DEFAULT_MAX_LINES;
use crate::sscc;
use crate::writer::{BarcodeOptions, BarcodeType, FontManager, PdfWriterConfig};

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "SSCC_LABELS_CONFIG";

/// Default output document.
pub const DEFAULT_OUTPUT_PATH: &str = "sscc_labels.pdf";

/// What to do when a validated label cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingFailurePolicy {
    /// Stop the run with an error
    #[default]
    Abort,
    /// Record the line as rejected and continue
    Skip,
}

/// Label run configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Ceiling on accepted lines; `None` for no limit
    pub max_lines: Option<usize>,

    /// Where the document is written
    pub output_path: PathBuf,

    /// Base-14 font for all label text
    pub font_name: String,

    /// Human-readable code size in points
    pub code_font_size: f32,

    /// Pallet and item text size in points
    pub auxiliary_font_size: f32,

    /// Outline stroke width in points
    pub outline_width: f32,

    /// Symbology for every label in the run
    pub barcode_type: BarcodeType,

    /// Barcode raster options
    pub barcode: BarcodeOptions,

    /// Flate-compress page content
    pub compress: bool,

    /// Document title
    pub title: Option<String>,

    /// Rendering failure handling
    pub rendering_failure: RenderingFailurePolicy,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            page_width: mm_to_pt(148.0),
            page_height: mm_to_pt(105.0),
            max_lines: Some(DEFAULT_MAX_LINES),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            font_name: "Courier-Bold".to_string(),
            code_font_size: 18.0,
            auxiliary_font_size: 12.0,
            outline_width: 2.0,
            barcode_type: BarcodeType::Code128,
            barcode: BarcodeOptions::default(),
            compress: true,
            title: Some("SSCC Labels".to_string()),
            rendering_failure: RenderingFailurePolicy::Abort,
        }
    }

    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page size in millimetres.
    pub fn with_page_size_mm(self, width: f32, height: f32) -> Self {
        self.with_page_size(mm_to_pt(width), mm_to_pt(height))
    }

    /// Set the accepted-line ceiling.
    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Set the output document path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the label font.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    /// Set the code and auxiliary font sizes.
    pub fn with_font_sizes(mut self, code: f32, auxiliary: f32) -> Self {
        self.code_font_size = code;
        self.auxiliary_font_size = auxiliary;
        self
    }

    /// Set the barcode symbology.
    pub fn with_barcode_type(mut self, barcode_type: BarcodeType) -> Self {
        self.barcode_type = barcode_type;
        self
    }

    /// Set the barcode raster options.
    pub fn with_barcode_options(mut self, options: BarcodeOptions) -> Self {
        self.barcode = options;
        self
    }

    /// Enable or disable content compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set how rendering failures are handled.
    pub fn with_rendering_failure(mut self, policy: RenderingFailurePolicy) -> Self {
        self.rendering_failure = policy;
        self
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Defaults, or the file at `path` if one is given; validated either way.
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.as_ref().display());
                Self::from_json_file(path)?
            },
            None => Self::new(),
        };
        config.validate()?;
        Ok(config)
    }

    /// [`load`](Self::load) from the file named by `SSCC_LABELS_CONFIG`, if set.
    pub fn from_env() -> Result<Self> {
        Self::load(std::env::var_os(CONFIG_ENV_VAR))
    }

    /// Text style derived from the font settings.
    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            font_name: self.font_name.clone(),
            code_font_size: self.code_font_size,
            auxiliary_font_size: self.auxiliary_font_size,
        }
    }

    /// PDF writer settings derived from this configuration.
    pub fn writer_config(&self) -> PdfWriterConfig {
        let mut config = PdfWriterConfig::default().with_compress(self.compress);
        if let Some(title) = &self.title {
            config = config.with_title(title.clone());
        }
        config
    }

    /// Reject settings that cannot produce a label on the page.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        };
        positive("page_width", self.page_width)?;
        positive("page_height", self.page_height)?;
        positive("code_font_size", self.code_font_size)?;
        positive("auxiliary_font_size", self.auxiliary_font_size)?;
        positive("outline_width", self.outline_width)?;

        if self.max_lines == Some(0) {
            return Err(Error::Config("max_lines must be at least 1".to_string()));
        }

        let fonts = FontManager::new();
        if !fonts.is_base14(&self.font_name) {
            return Err(Error::Config(format!(
                "unknown font '{}', expected one of: {}",
                self.font_name,
                fonts.font_names().join(", ")
            )));
        }

        self.barcode.validate()?;

        // The layout is the same for every code, so one sample settles it.
        let sample = sscc::with_check_digit(&"0".repeat(sscc::SSCC_LENGTH - 1))
            .map_err(|e| Error::Config(e.to_string()))?;
        let layout = LabelBuilder::new(fonts)
            .with_style(self.label_style())
            .build(sample, None, None, self.page_width, self.page_height);
        if !layout.within_page() {
            return Err(Error::Config(format!(
                "page {}x{} pt is too small for the label layout",
                self.page_width, self.page_height
            )));
        }

        Ok(())
    }
}
