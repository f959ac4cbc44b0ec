//! High-level API: one call from input file to label document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sscc_labels::api::generate_labels;
//! use sscc_labels::LabelConfig;
//!
//! # fn main() -> sscc_labels::Result<()> {
//! let config = LabelConfig::default().with_output_path("labels.pdf");
//! let summary = generate_labels(&config, "shipments.csv")?;
//! println!("{} labels, {} lines skipped", summary.pages, summary.batch.rejected());
//! # Ok(())
//! # }
//! ```
//!
//! [`render_batch`] drives any [`RenderingPort`], which is how the run is
//! tested without producing a document.

use std::path::{Path, PathBuf};

use crate::config::{LabelConfig, RenderingFailurePolicy};
use crate::error::{Error, RejectReason, Result};
use crate::layout::LabelBuilder;
use crate::pipeline::{BatchPipeline, BatchResult};
use crate::rendering::{PdfLabelRenderer, RenderingPort, SymbologyEncoder};
use crate::writer::FontManager;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Accepted layouts and per-line diagnostics
    pub batch: BatchResult,
    /// Pages in the written document
    pub pages: usize,
    /// Where the document was written
    pub output_path: PathBuf,
}

/// Read `input`, lay out every valid record and render it with `renderer`.
///
/// Each accepted label is rendered before the next line is read. A rendering
/// failure aborts the run or becomes a diagnostic, depending on
/// [`LabelConfig::rendering_failure`].
pub fn render_batch<R: RenderingPort>(
    config: &LabelConfig,
    input: impl AsRef<Path>,
    renderer: &mut R,
) -> Result<BatchResult> {
    config.validate()?;
    let pipeline = BatchPipeline::new(LabelBuilder::new(FontManager::new()).with_style(config.label_style()));
    let policy = config.rendering_failure;

    pipeline.run_file_with(
        input,
        config.page_width,
        config.page_height,
        config.max_lines,
        |layout| match renderer.render_label(layout) {
            Ok(()) => Ok(None),
            Err(e) if policy == RenderingFailurePolicy::Skip => {
                log::warn!("Skipping label {}: {}", layout.code, e);
                Ok(Some(RejectReason::Rendering(rendering_reason(e))))
            },
            Err(e) => Err(e),
        },
    )
}

/// Generate the label document for `input` as configured.
///
/// The document is written to [`LabelConfig::output_path`] even when no line
/// was accepted.
pub fn generate_labels(config: &LabelConfig, input: impl AsRef<Path>) -> Result<RunSummary> {
    let input = input.as_ref();
    log::info!("Generating labels from {}", input.display());

    let encoder = SymbologyEncoder::new(config.barcode_type, config.barcode.clone());
    let mut renderer = PdfLabelRenderer::new(encoder, config.writer_config(), config.outline_width);
    let batch = render_batch(config, input, &mut renderer)?;

    let pages = renderer.page_count();
    if pages == 0 {
        log::warn!("No valid records in {}; writing an empty document", input.display());
    }
    renderer.save(&config.output_path)?;
    log::info!("Wrote {} label(s) to {}", pages, config.output_path.display());

    Ok(RunSummary {
        batch,
        pages,
        output_path: config.output_path.clone(),
    })
}

fn rendering_reason(error: Error) -> String {
    match error {
        Error::Rendering { reason, .. } => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LabelLayout;
    use std::io::Write;

    /// Records the codes it is asked to render; fails on the listed ones.
    #[derive(Default)]
    struct RecordingPort {
        rendered: Vec<String>,
        fail_on: Vec<&'static str>,
    }

    impl RenderingPort for RecordingPort {
        fn render_label(&mut self, layout: &LabelLayout) -> Result<()> {
            let code = layout.code.as_str();
            if self.fail_on.contains(&code) {
                return Err(Error::Rendering {
                    code: code.to_string(),
                    reason: "encoder rejected data".to_string(),
                });
            }
            self.rendered.push(code.to_string());
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.rendered.len()
        }
    }

    fn input_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    const LINES: [&str; 3] = [
        "00123456789012345675,PAL001",
        "34012345678901234567",
        "34012345678901234560,PAL002,Widget B",
    ];

    #[test]
    fn test_render_batch_renders_accepted_in_order() {
        let input = input_file(&LINES);
        let mut port = RecordingPort::default();
        let batch = render_batch(&LabelConfig::default(), input.path(), &mut port).unwrap();

        assert_eq!(port.rendered, vec!["00123456789012345675", "34012345678901234560"]);
        assert_eq!(batch.accepted(), 2);
        assert_eq!(batch.diagnostics[0].reason.kind(), "CheckDigitMismatch");
    }

    #[test]
    fn test_rendering_failure_aborts_by_default() {
        let input = input_file(&LINES);
        let mut port = RecordingPort {
            fail_on: vec!["00123456789012345675"],
            ..Default::default()
        };
        let err = render_batch(&LabelConfig::default(), input.path(), &mut port).unwrap_err();
        assert!(matches!(err, Error::Rendering { .. }));
        assert!(port.rendered.is_empty());
    }

    #[test]
    fn test_rendering_failure_skipped_when_configured() {
        let input = input_file(&LINES);
        let mut port = RecordingPort {
            fail_on: vec!["00123456789012345675"],
            ..Default::default()
        };
        let config = LabelConfig::default().with_rendering_failure(RenderingFailurePolicy::Skip);
        let batch = render_batch(&config, input.path(), &mut port).unwrap();

        assert_eq!(port.rendered, vec!["34012345678901234560"]);
        assert_eq!(batch.accepted(), 1);
        assert_eq!(batch.rejected(), 2);
        assert_eq!(batch.diagnostics[0].line_number, 1);
        assert_eq!(
            batch.diagnostics[0].reason,
            RejectReason::Rendering("encoder rejected data".to_string())
        );
    }

    #[test]
    fn test_invalid_config_is_rejected_before_reading() {
        let mut port = RecordingPort::default();
        let config = LabelConfig::default().with_max_lines(Some(0));
        let err = render_batch(&config, "/nonexistent/input.csv", &mut port).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_generate_labels_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = input_file(&LINES);
        let config = LabelConfig::default().with_output_path(dir.path().join("labels.pdf"));

        let summary = generate_labels(&config, input.path()).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.batch.rejected(), 1);

        let pdf = std::fs::read(&summary.output_path).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.7"));
        assert!(pdf.ends_with(b"%%EOF"));
    }
}
