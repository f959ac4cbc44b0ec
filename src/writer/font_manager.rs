//! Font metrics for the PDF Base-14 fonts.
//!
//! Labels only use the standard fonts every PDF reader ships with, so no
//! font program is embedded. Widths come from the Adobe AFM files and are
//! expressed in 1/1000 em.

use crate::layout::TextMetrics;
use std::collections::HashMap;

/// Width used for characters outside printable ASCII in proportional fonts.
const DEFAULT_CHAR_WIDTH: u16 = 500;

/// Every Courier face advances 600 units per glyph.
const COURIER_WIDTH: u16 = 600;

/// Helvetica and Helvetica-Oblique, ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold and Helvetica-BoldOblique, ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Times-Roman, also used for Times-Italic, ASCII 0x20..=0x7E.
#[rustfmt::skip]
const TIMES_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// Times-Bold, also used for Times-BoldItalic, ASCII 0x20..=0x7E.
#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Font family classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Times (serif)
    Times,
    /// Courier (monospace)
    Courier,
}

/// Information about a Base-14 font.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// PostScript name (e.g. "Courier-Bold")
    pub name: String,
    /// Font family
    pub family: FontFamily,
    /// Bold face
    pub bold: bool,
    /// Italic or oblique face
    pub italic: bool,
    widths: FontWidths,
    /// Ascender height (above baseline), 1/1000 em
    pub ascender: f32,
    /// Descender depth (below baseline, negative), 1/1000 em
    pub descender: f32,
}

#[derive(Debug, Clone, Copy)]
enum FontWidths {
    Proportional(&'static [u16; 95]),
    Monospace(u16),
}

impl FontInfo {
    fn base14(name: &str, family: FontFamily, bold: bool, italic: bool) -> Self {
        let widths = match (family, bold) {
            (FontFamily::Courier, _) => FontWidths::Monospace(COURIER_WIDTH),
            (FontFamily::Helvetica, false) => FontWidths::Proportional(&HELVETICA_WIDTHS),
            (FontFamily::Helvetica, true) => FontWidths::Proportional(&HELVETICA_BOLD_WIDTHS),
            (FontFamily::Times, false) => FontWidths::Proportional(&TIMES_WIDTHS),
            (FontFamily::Times, true) => FontWidths::Proportional(&TIMES_BOLD_WIDTHS),
        };
        let (ascender, descender) = match (family, bold) {
            (FontFamily::Helvetica, _) => (718.0, -207.0),
            (FontFamily::Times, false) => (683.0, -217.0),
            (FontFamily::Times, true) => (676.0, -205.0),
            (FontFamily::Courier, false) => (629.0, -157.0),
            (FontFamily::Courier, true) => (626.0, -142.0),
        };

        Self {
            name: name.to_string(),
            family,
            bold,
            italic,
            widths,
            ascender,
            descender,
        }
    }

    /// Width of a single character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f32 {
        let units = match self.widths {
            FontWidths::Monospace(width) => width,
            FontWidths::Proportional(table) => match u32::from(ch) {
                cp @ 0x20..=0x7E => table[(cp - 0x20) as usize],
                _ => DEFAULT_CHAR_WIDTH,
            },
        };
        f32::from(units)
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }
}

/// Registry of the Base-14 text fonts.
#[derive(Debug, Clone)]
pub struct FontManager {
    fonts: HashMap<String, FontInfo>,
}

impl FontManager {
    /// Create a font manager with the Helvetica, Times and Courier faces.
    pub fn new() -> Self {
        let faces = [
            ("Helvetica", FontFamily::Helvetica, false, false),
            ("Helvetica-Bold", FontFamily::Helvetica, true, false),
            ("Helvetica-Oblique", FontFamily::Helvetica, false, true),
            ("Helvetica-BoldOblique", FontFamily::Helvetica, true, true),
            ("Times-Roman", FontFamily::Times, false, false),
            ("Times-Bold", FontFamily::Times, true, false),
            ("Times-Italic", FontFamily::Times, false, true),
            ("Times-BoldItalic", FontFamily::Times, true, true),
            ("Courier", FontFamily::Courier, false, false),
            ("Courier-Bold", FontFamily::Courier, true, false),
            ("Courier-Oblique", FontFamily::Courier, false, true),
            ("Courier-BoldOblique", FontFamily::Courier, true, true),
        ];
        let fonts = faces
            .iter()
            .map(|&(name, family, bold, italic)| {
                (name.to_string(), FontInfo::base14(name, family, bold, italic))
            })
            .collect();
        Self { fonts }
    }

    /// Get font info by PostScript name.
    pub fn get_font(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.get(name)
    }

    /// Whether `name` is one of the registered Base-14 fonts.
    pub fn is_base14(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Registered font names, sorted.
    pub fn font_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Width of `text` in points. Unknown fonts measure every character at
    /// 500 units.
    pub fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        match self.get_font(font_name) {
            Some(font) => font.text_width(text, font_size),
            None => {
                text.chars().count() as f32 * f32::from(DEFAULT_CHAR_WIDTH) * font_size / 1000.0
            },
        }
    }

    /// Width of a single character in points.
    pub fn char_width(&self, ch: char, font_name: &str, font_size: f32) -> f32 {
        self.text_width(ch.encode_utf8(&mut [0; 4]), font_name, font_size)
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMetrics for FontManager {
    fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        FontManager::text_width(self, text, font_name, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_is_monospace() {
        let fm = FontManager::new();
        // 22 characters of "(00)123456789012345675" at 18pt
        let width = fm.text_width("(00)123456789012345675", "Courier-Bold", 18.0);
        assert!((width - 22.0 * 600.0 * 18.0 / 1000.0).abs() < 1e-3);
        assert_eq!(fm.char_width('W', "Courier", 10.0), fm.char_width('i', "Courier", 10.0));
    }

    #[test]
    fn test_helvetica_widths() {
        let fm = FontManager::new();
        let font = fm.get_font("Helvetica").unwrap();
        assert_eq!(font.char_width(' '), 278.0);
        assert_eq!(font.char_width('0'), 556.0);
        assert_eq!(font.char_width('W'), 944.0);
        assert_eq!(font.char_width('~'), 584.0);
        assert_eq!(font.char_width('é'), 500.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let fm = FontManager::new();
        let regular = fm.text_width("Widget", "Helvetica", 12.0);
        let bold = fm.text_width("Widget", "Helvetica-Bold", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_unknown_font_fallback() {
        let fm = FontManager::new();
        assert!(!fm.is_base14("Comic Sans"));
        assert_eq!(fm.text_width("abcd", "Comic Sans", 10.0), 20.0);
    }

    #[test]
    fn test_font_names() {
        let fm = FontManager::new();
        let names = fm.font_names();
        assert_eq!(names.len(), 12);
        assert!(names.contains(&"Courier-Bold"));
        assert!(fm.is_base14("Times-Roman"));
    }

    #[test]
    fn test_text_metrics_trait() {
        let fm = FontManager::new();
        let metrics: &dyn TextMetrics = &fm;
        assert_eq!(metrics.text_width("AB", "Courier", 10.0), 12.0);
    }
}
