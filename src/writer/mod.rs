//! PDF writing module for label documents.
//!
//! ## Architecture
//!
//! ```text
//! LabelLayout + barcode image
//!     ↓
//! [PageBuilder] (text, outline, images)
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use sscc_labels::geometry::Rect;
//! use sscc_labels::writer::{PdfWriter, PdfWriterConfig};
//!
//! let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_title("Labels"));
//! {
//!     let mut page = writer.add_page(419.53, 297.64);
//!     page.add_text("(00)123456789012345675", 90.0, 140.0, "Courier-Bold", 18.0);
//!     page.draw_rect(Rect::new(20.0, 30.0, 379.53, 119.06), 2.0);
//!     page.finish();
//! }
//! let bytes = writer.finish()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok::<(), sscc_labels::Error>(())
//! ```

pub mod barcode;
mod content_stream;
mod font_manager;
mod image_handler;
mod object_serializer;
mod pdf_writer;

pub use barcode::{BarcodeGenerator, BarcodeOptions, BarcodeRaster, BarcodeType};
pub use content_stream::{encode_win_ansi, ContentStreamBuilder, ContentStreamOp};
pub use font_manager::{FontFamily, FontInfo, FontManager};
pub use image_handler::{ColorSpace, ImageData, ImageError};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PageBuilder, PdfWriter, PdfWriterConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _serializer = ObjectSerializer::new();
        let _builder = ContentStreamBuilder::new();
        let _fonts = FontManager::new();
        assert_eq!(BarcodeType::default(), BarcodeType::Code128);
    }
}
