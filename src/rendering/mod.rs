//! Rendering boundary: label layouts in, document pages out.
//!
//! The pipeline only ever sees [`RenderingPort`]. The PDF implementation,
//! [`PdfLabelRenderer`], draws each layout as one page:
//!
//! 1. barcode image (PNG from a [`BarcodeEncoder`]) scaled into the barcode rectangle
//! 2. human-readable code
//! 3. stroked outline
//! 4. pallet and item lines, when present
//!
//! Barcode images stay in memory from encoder to page.

use std::path::Path;

use crate::error::{Error, Result};
use crate::layout::{LabelBuilder, LabelLayout};
use crate::pipeline::BatchPipeline;
use crate::writer::{
    BarcodeGenerator, BarcodeOptions, BarcodeType, FontManager, ImageData, PdfWriter,
    PdfWriterConfig,
};

/// Produces a barcode image for a code.
pub trait BarcodeEncoder {
    /// Encode `data` and return the symbol as PNG bytes.
    fn encode(&self, data: &str) -> Result<Vec<u8>>;
}

/// Draws finished labels into an output document.
pub trait RenderingPort {
    /// Add one page for `layout`.
    fn render_label(&mut self, layout: &LabelLayout) -> Result<()>;

    /// Pages rendered so far.
    fn page_count(&self) -> usize;
}

/// [`BarcodeEncoder`] backed by [`BarcodeGenerator`].
#[derive(Debug, Clone, Default)]
pub struct SymbologyEncoder {
    barcode_type: BarcodeType,
    options: BarcodeOptions,
}

impl SymbologyEncoder {
    /// Encoder for one symbology and raster setting.
    pub fn new(barcode_type: BarcodeType, options: BarcodeOptions) -> Self {
        Self {
            barcode_type,
            options,
        }
    }

    /// The configured symbology.
    pub fn barcode_type(&self) -> BarcodeType {
        self.barcode_type
    }
}

impl BarcodeEncoder for SymbologyEncoder {
    fn encode(&self, data: &str) -> Result<Vec<u8>> {
        BarcodeGenerator::generate_1d(self.barcode_type, data, &self.options)
    }
}

/// Lays labels out with the Base-14 metrics the PDF renderer draws with.
impl Default for LabelBuilder<FontManager> {
    fn default() -> Self {
        Self::new(FontManager::new())
    }
}

impl Default for BatchPipeline<FontManager> {
    fn default() -> Self {
        Self::new(LabelBuilder::default())
    }
}

/// Renders labels as pages of a PDF document.
pub struct PdfLabelRenderer<E> {
    encoder: E,
    writer: PdfWriter,
    outline_width: f32,
}

impl<E: BarcodeEncoder> PdfLabelRenderer<E> {
    /// Create a renderer drawing barcodes with `encoder`.
    pub fn new(encoder: E, config: PdfWriterConfig, outline_width: f32) -> Self {
        Self {
            encoder,
            writer: PdfWriter::with_config(config),
            outline_width,
        }
    }

    /// Serialize the document.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.writer.finish()
    }

    /// Write the document to `path`.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        self.writer.save(path)
    }
}

impl<E: BarcodeEncoder> RenderingPort for PdfLabelRenderer<E> {
    fn render_label(&mut self, layout: &LabelLayout) -> Result<()> {
        let code = layout.code.as_str();
        let failed = |reason: String| Error::Rendering {
            code: code.to_string(),
            reason,
        };

        let png = self
            .encoder
            .encode(code)
            .map_err(|e| failed(e.to_string()))?;
        let image = ImageData::from_png(&png).map_err(|e| failed(e.to_string()))?;

        let mut page = self.writer.add_page(layout.page_width, layout.page_height);
        page.draw_image(image, layout.barcode);
        let text = &layout.code_text;
        page.add_text(&text.text, text.origin.x, text.origin.y, &text.font_name, text.font_size);
        page.draw_rect(layout.outline, self.outline_width);
        for aux in &layout.auxiliary {
            page.add_text(&aux.text, aux.origin.x, aux.origin.y, &aux.font_name, aux.font_size);
        }
        page.finish();

        log::debug!("Rendered label {} as page {}", code, self.writer.page_count());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.writer.page_count()
    }
}
