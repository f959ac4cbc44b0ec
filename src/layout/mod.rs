//! Label geometry.
//!
//! [`LabelBuilder`] turns a validated code and its optional pallet and item
//! text into a [`LabelLayout`]: where the barcode, the human-readable code,
//! the outline box and the auxiliary lines go on the page. Nothing here
//! draws or touches the filesystem; text widths come from an injected
//! [`TextMetrics`].
//!
//! All coordinates are PDF points with the origin at the lower-left corner.
//!
//! ```text
//!  +-----------------------------------------+  H
//!  |        30 pt                             |
//!  |    +-------------------------------+     |
//!  |    |||| ||| || |||| barcode 0.8W x |     |
//!  |    +-------------------------------+     |
//!  |        20 pt                             |
//!  |          (00)123456789012345675          |
//!  |  +-------------------------------------+ |
//!  |  | PALLET                              | |  outline 0.4H
//!  |  | ITEM                                | |
//!  |  +-------------------------------------+ |  30
//!  +-----------------------------------------+  0
//! ```

use crate::geometry::{Point, Rect};
use crate::sscc::SsccCode;

/// Barcode width as a fraction of page width.
pub const BARCODE_WIDTH_RATIO: f32 = 0.8;
/// Barcode height as a fraction of page height.
pub const BARCODE_HEIGHT_RATIO: f32 = 0.25;
/// Gap between the top of the page and the top of the barcode.
pub const BARCODE_TOP_MARGIN: f32 = 30.0;
/// Distance from the bottom of the barcode down to the code text baseline.
pub const CODE_TEXT_GAP: f32 = 20.0;
/// Left and right margin of the outline box.
pub const OUTLINE_SIDE_MARGIN: f32 = 20.0;
/// Bottom edge of the outline box.
pub const OUTLINE_BOTTOM: f32 = 30.0;
/// Outline height as a fraction of page height.
pub const OUTLINE_HEIGHT_RATIO: f32 = 0.40;
/// Horizontal inset of auxiliary text inside the outline.
pub const AUXILIARY_INSET: f32 = 10.0;
/// Pallet baseline above the outline bottom.
pub const PALLET_OFFSET: f32 = 30.0;
/// Item baseline above the outline bottom.
pub const ITEM_OFFSET: f32 = 10.0;

/// Measures rendered text width.
pub trait TextMetrics {
    /// Width of `text` in points when set in `font_name` at `font_size`.
    fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32;
}

/// A line of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    /// Text to draw
    pub text: String,
    /// Baseline origin
    pub origin: Point,
    /// Font name
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Measured width in points
    pub width: f32,
}

impl TextPlacement {
    /// Approximate extent: baseline to one em above it.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.width, self.font_size)
    }
}

/// Fonts used on a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Font for all label text
    pub font_name: String,
    /// Size of the human-readable code
    pub code_font_size: f32,
    /// Size of the pallet and item lines
    pub auxiliary_font_size: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_name: "Courier-Bold".to_string(),
            code_font_size: 18.0,
            auxiliary_font_size: 12.0,
        }
    }
}

/// Geometry of one label page.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    /// Code encoded in the barcode
    pub code: SsccCode,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Where the barcode image goes
    pub barcode: Rect,
    /// Human-readable `(AI)serial` line under the barcode
    pub code_text: TextPlacement,
    /// Stroked box in the lower part of the page
    pub outline: Rect,
    /// Pallet then item, each only if present
    pub auxiliary: Vec<TextPlacement>,
}

impl LabelLayout {
    /// The grouped human-readable code, e.g. `(00)123456789012345675`.
    pub fn human_readable(&self) -> &str {
        &self.code_text.text
    }

    /// The page as a rectangle.
    pub fn page(&self) -> Rect {
        Rect::new(0.0, 0.0, self.page_width, self.page_height)
    }

    /// Whether every drawn element fits on the page. Text is checked
    /// against its measured width and font size.
    pub fn within_page(&self) -> bool {
        let page = self.page();
        page.contains_rect(&self.barcode)
            && page.contains_rect(&self.outline)
            && page.contains_rect(&self.code_text.bounds())
            && self.auxiliary.iter().all(|t| page.contains_rect(&t.bounds()))
    }
}

/// Computes [`LabelLayout`]s.
#[derive(Debug, Clone)]
pub struct LabelBuilder<M> {
    metrics: M,
    style: LabelStyle,
}

impl<M: TextMetrics> LabelBuilder<M> {
    /// Create a builder measuring text with `metrics`.
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            style: LabelStyle::default(),
        }
    }

    /// Use a different label style.
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Current style.
    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    /// Lay out one label on a `page_width` x `page_height` page.
    pub fn build(
        &self,
        code: SsccCode,
        pallet: Option<String>,
        item: Option<String>,
        page_width: f32,
        page_height: f32,
    ) -> LabelLayout {
        let barcode_width = page_width * BARCODE_WIDTH_RATIO;
        let barcode_height = page_height * BARCODE_HEIGHT_RATIO;
        let barcode = Rect::new(
            (page_width - barcode_width) / 2.0,
            page_height - barcode_height - BARCODE_TOP_MARGIN,
            barcode_width,
            barcode_height,
        );

        let human_readable = code.formatted();
        let code_width = self.measure(&human_readable, self.style.code_font_size);
        let code_text = TextPlacement {
            origin: Point::new((page_width - code_width) / 2.0, barcode.y - CODE_TEXT_GAP),
            text: human_readable,
            font_name: self.style.font_name.clone(),
            font_size: self.style.code_font_size,
            width: code_width,
        };

        let outline = Rect::new(
            OUTLINE_SIDE_MARGIN,
            OUTLINE_BOTTOM,
            page_width - 2.0 * OUTLINE_SIDE_MARGIN,
            page_height * OUTLINE_HEIGHT_RATIO,
        );

        let auxiliary = [(pallet, PALLET_OFFSET), (item, ITEM_OFFSET)]
            .into_iter()
            .filter_map(|(text, offset)| {
                let text = text?;
                let width = self.measure(&text, self.style.auxiliary_font_size);
                Some(TextPlacement {
                    text,
                    origin: Point::new(outline.x + AUXILIARY_INSET, outline.y + offset),
                    font_name: self.style.font_name.clone(),
                    font_size: self.style.auxiliary_font_size,
                    width,
                })
            })
            .collect();

        LabelLayout {
            code,
            page_width,
            page_height,
            barcode,
            code_text,
            outline,
            auxiliary,
        }
    }

    fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.metrics.text_width(text, &self.style.font_name, font_size)
    }
}
