//! PDF content stream builder.
//!
//! Records the graphics and text operators for one page (ISO 32000-1
//! §8-9) and writes them out as the bytes of the page's content stream.

use crate::error::Result;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show text (Tj), already encoded for the font
    ShowText(Vec<u8>),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
    current_font: Option<(String, f32)>,
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object (no-op if one is already open).
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End the open text object, if any.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Select a font resource; repeated selections of the same font are elided.
    pub fn set_font(&mut self, resource_name: &str, size: f32) -> &mut Self {
        let wanted = (resource_name.to_string(), size);
        if self.current_font.as_ref() != Some(&wanted) {
            self.op(ContentStreamOp::SetFont(resource_name.to_string(), size));
            self.current_font = Some(wanted);
        }
        self
    }

    /// Show `text` with its baseline origin at (`x`, `y`).
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowText(encode_win_ansi(text)))
    }

    /// Paint an image XObject scaled into the given rectangle.
    pub fn draw_image(
        &mut self,
        resource_id: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState)
            .op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y))
            .op(ContentStreamOp::PaintXObject(resource_id.to_string()))
            .op(ContentStreamOp::RestoreState)
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Append a rectangle to the current path.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, size),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
        },
        ContentStreamOp::ShowText(bytes) => {
            write!(w, "(")?;
            for &byte in bytes {
                match byte {
                    b'(' | b')' | b'\\' => w.write_all(&[b'\\', byte])?,
                    b'\n' => write!(w, "\\n")?,
                    b'\r' => write!(w, "\\r")?,
                    b'\t' => write!(w, "\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            write!(w, ") Tj")
        },
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", width),
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write!(w, "{} {} {} {} re", x, y, width, height)
        },
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

/// Encode text for a Base-14 font with WinAnsiEncoding.
///
/// Latin-1 characters map to their code point; anything outside it becomes
/// `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            cp @ 0x20..=0x7E | cp @ 0xA0..=0xFF => cp as u8,
            0x09 | 0x0A | 0x0D => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(builder: &ContentStreamBuilder) -> String {
        String::from_utf8_lossy(&builder.build().unwrap()).into_owned()
    }

    #[test]
    fn test_simple_text() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_font("CourierBold", 18.0)
            .text("(00)123456789012345675", 72.0, 150.0)
            .end_text();

        let content = render(&builder);
        assert!(content.contains("/CourierBold 18 Tf"));
        assert!(content.contains("BT\n"));
        assert!(content.contains("1 0 0 1 72 150 Tm"));
        assert!(content.contains("(\\(00\\)123456789012345675) Tj"));
        assert!(content.ends_with("ET\n"));
    }

    #[test]
    fn test_repeated_font_is_elided() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_font("CourierBold", 12.0)
            .text("PAL001", 30.0, 60.0)
            .set_font("CourierBold", 12.0)
            .text("Widget A", 30.0, 40.0);
        let fonts = builder
            .operations()
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::SetFont(..)))
            .count();
        assert_eq!(fonts, 1);
    }

    #[test]
    fn test_draw_image_closes_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("x", 0.0, 0.0).draw_image("Im1", 10.0, 20.0, 300.0, 75.0);

        let content = render(&builder);
        assert!(content.contains("ET\nq\n300 0 0 75 10 20 cm\n/Im1 Do\nQ"));
    }

    #[test]
    fn test_outline_rectangle() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_line_width(2.0).rect(20.0, 30.0, 379.5, 119.0).stroke();

        let content = render(&builder);
        assert!(content.contains("2 w"));
        assert!(content.contains("20 30 379.5 119 re"));
        assert!(content.contains("\nS\n"));
    }

    #[test]
    fn test_path_after_text_closes_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("x", 0.0, 0.0).set_line_width(2.0).rect(20.0, 30.0, 10.0, 10.0).stroke();
        assert!(render(&builder).contains("Tj\nET\n2 w\n20 30 10 10 re\nS\n"));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Widget A"), b"Widget A".to_vec());
        assert_eq!(encode_win_ansi("Artículo"), vec![b'A', b'r', b't', 0xED, b'c', b'u', b'l', b'o']);
        assert_eq!(encode_win_ansi("€→"), b"??".to_vec());
    }
}
