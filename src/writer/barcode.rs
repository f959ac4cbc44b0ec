//! Linear barcode generation.
//!
//! Symbols are encoded to a module sequence with the `barcoders` crate and
//! rasterized here into an 8-bit gray image: quiet zones on both sides, an
//! optional bearer box around the whole symbol, and no human-readable text
//! (labels print that themselves). The raster leaves as PNG bytes.
//!
//! ## Supported Barcode Types
//! - Code 128 (set C for even-length numeric data, set B otherwise)
//! - Code 39
//! - ITF (Interleaved 2 of 5)
//!
//! ## Example
//!
//! ```ignore
//! use sscc_labels::writer::barcode::{BarcodeGenerator, BarcodeOptions, BarcodeType};
//!
//! let png = BarcodeGenerator::generate_1d(
//!     BarcodeType::Code128,
//!     "00123456789012345675",
//!     &BarcodeOptions::default(),
//! )?;
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};

/// Code 128 start character for set B.
#[cfg(feature = "barcodes")]
const CODE128_SET_B: char = '\u{0181}';

/// Code 128 start character for set C.
#[cfg(feature = "barcodes")]
const CODE128_SET_C: char = '\u{0106}';

/// Largest accepted module width in pixels.
pub const MAX_XDIM: u32 = 20;

/// Largest accepted bar height in pixels.
pub const MAX_HEIGHT: u32 = 2000;

/// Largest accepted quiet zone, in modules.
pub const MAX_QUIET_ZONE: u32 = 100;

/// Largest accepted box thickness in pixels.
pub const MAX_BORDER: u32 = 100;

/// Types of linear barcodes supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeType {
    /// Code 128
    #[default]
    Code128,
    /// Code 39 (uppercase alphanumeric)
    Code39,
    /// ITF - Interleaved 2 of 5 (numeric pairs)
    Itf,
}

impl std::fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarcodeType::Code128 => write!(f, "Code 128"),
            BarcodeType::Code39 => write!(f, "Code 39"),
            BarcodeType::Itf => write!(f, "ITF"),
        }
    }
}

/// Raster options for linear barcodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarcodeOptions {
    /// Width of one module in pixels
    pub xdim: u32,
    /// Bar height in pixels
    pub height: u32,
    /// Quiet zone on each side, in modules
    pub quiet_zone: u32,
    /// Thickness of the box around the symbol in pixels (0 for none)
    pub border: u32,
    /// Bar gray level
    pub foreground: u8,
    /// Space gray level
    pub background: u8,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            xdim: 2,
            height: 100,
            quiet_zone: 10,
            border: 2,
            foreground: 0,
            background: 255,
        }
    }
}

impl BarcodeOptions {
    /// Create new barcode options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module width in pixels.
    pub fn xdim(mut self, xdim: u32) -> Self {
        self.xdim = xdim;
        self
    }

    /// Set the bar height in pixels.
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the quiet zone width in modules.
    pub fn quiet_zone(mut self, modules: u32) -> Self {
        self.quiet_zone = modules;
        self
    }

    /// Set the box thickness in pixels.
    pub fn border(mut self, pixels: u32) -> Self {
        self.border = pixels;
        self
    }

    /// Set the bar and space gray levels.
    pub fn colors(mut self, foreground: u8, background: u8) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Check that the options describe a drawable symbol.
    pub fn validate(&self) -> Result<()> {
        if self.xdim == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "barcode module width and height must be positive (xdim={}, height={})",
                self.xdim, self.height
            )));
        }
        let limits = [
            ("xdim", self.xdim, MAX_XDIM),
            ("height", self.height, MAX_HEIGHT),
            ("quiet_zone", self.quiet_zone, MAX_QUIET_ZONE),
            ("border", self.border, MAX_BORDER),
        ];
        for (name, value, max) in limits {
            if value > max {
                return Err(Error::Config(format!(
                    "barcode {} must be at most {}, got {}",
                    name, max, value
                )));
            }
        }
        if self.foreground == self.background {
            return Err(Error::Config("barcode foreground and background are identical".to_string()));
        }
        Ok(())
    }
}

/// A rasterized barcode: row-major 8-bit gray samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRaster {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Gray samples, `width * height` long
    pub pixels: Vec<u8>,
}

impl BarcodeRaster {
    /// Sample at (`x`, `y`), counted from the top-left corner.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Encode as an 8-bit grayscale PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = image::GrayImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| Error::Barcode("raster size does not match its pixels".to_string()))?;
        let mut png = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| Error::Barcode(format!("PNG encoding error: {}", e)))?;
        Ok(png)
    }
}

/// Barcode generator for linear symbols.
pub struct BarcodeGenerator;

#[cfg(feature = "barcodes")]
impl BarcodeGenerator {
    /// Encode `data` to a module sequence (1 = bar, 0 = space), including
    /// start, check and stop characters.
    pub fn encode(barcode_type: BarcodeType, data: &str) -> Result<Vec<u8>> {
        use barcoders::sym::code128::Code128;
        use barcoders::sym::code39::Code39;
        use barcoders::sym::tf::TF;

        if data.is_empty() {
            return Err(Error::Barcode(format!("{} cannot encode empty data", barcode_type)));
        }

        let modules = match barcode_type {
            BarcodeType::Code128 => {
                let numeric = data.bytes().all(|b| b.is_ascii_digit());
                let start = if numeric && data.len() % 2 == 0 {
                    CODE128_SET_C
                } else {
                    CODE128_SET_B
                };
                Code128::new(&format!("{}{}", start, data))
                    .map_err(|e| Error::Barcode(format!("Code128 encoding error: {}", e)))?
                    .encode()
            },
            BarcodeType::Code39 => Code39::new(data)
                .map_err(|e| Error::Barcode(format!("Code39 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Itf => TF::interleaved(data)
                .map_err(|e| Error::Barcode(format!("ITF encoding error: {}", e)))?
                .encode(),
        };
        Ok(modules)
    }

    /// Encode and rasterize `data`.
    pub fn generate_raster(
        barcode_type: BarcodeType,
        data: &str,
        options: &BarcodeOptions,
    ) -> Result<BarcodeRaster> {
        let modules = Self::encode(barcode_type, data)?;
        Self::rasterize(&modules, options)
    }

    /// Encode `data` and produce a PNG image.
    pub fn generate_1d(
        barcode_type: BarcodeType,
        data: &str,
        options: &BarcodeOptions,
    ) -> Result<Vec<u8>> {
        let raster = Self::generate_raster(barcode_type, data, options)?;
        log::debug!(
            "Generated {} barcode for {}: {}x{} px",
            barcode_type,
            data,
            raster.width,
            raster.height
        );
        raster.to_png()
    }
}

#[cfg(not(feature = "barcodes"))]
impl BarcodeGenerator {
    /// Stub when barcodes feature is disabled.
    pub fn encode(_barcode_type: BarcodeType, _data: &str) -> Result<Vec<u8>> {
        Err(Error::Barcode(
            "Barcode generation requires the 'barcodes' feature".to_string(),
        ))
    }

    /// Stub when barcodes feature is disabled.
    pub fn generate_raster(
        _barcode_type: BarcodeType,
        _data: &str,
        _options: &BarcodeOptions,
    ) -> Result<BarcodeRaster> {
        Err(Error::Barcode(
            "Barcode generation requires the 'barcodes' feature".to_string(),
        ))
    }

    /// Stub when barcodes feature is disabled.
    pub fn generate_1d(
        _barcode_type: BarcodeType,
        _data: &str,
        _options: &BarcodeOptions,
    ) -> Result<Vec<u8>> {
        Err(Error::Barcode(
            "Barcode generation requires the 'barcodes' feature".to_string(),
        ))
    }
}

impl BarcodeGenerator {
    /// Draw a module sequence: border, quiet zone, bars, quiet zone, border.
    pub fn rasterize(modules: &[u8], options: &BarcodeOptions) -> Result<BarcodeRaster> {
        options.validate()?;
        if modules.is_empty() {
            return Err(Error::Barcode("no modules to draw".to_string()));
        }

        let too_large = || {
            Error::Barcode(format!(
                "{} modules at {} px do not fit in a raster",
                modules.len(),
                options.xdim
            ))
        };
        let border = options.border;
        let quiet = options.quiet_zone.checked_mul(2).ok_or_else(too_large)?;
        let width = u32::try_from(modules.len())
            .ok()
            .and_then(|n| n.checked_add(quiet))
            .and_then(|n| n.checked_mul(options.xdim))
            .and_then(|n| n.checked_add(border.checked_mul(2)?))
            .ok_or_else(too_large)?;
        let height = border
            .checked_mul(2)
            .and_then(|n| n.checked_add(options.height))
            .ok_or_else(too_large)?;
        let len = (width as usize).checked_mul(height as usize).ok_or_else(too_large)?;

        // `width` fits in u32, so every offset inside a row does too.
        let xdim = options.xdim as usize;
        let bars_start = (border + options.quiet_zone * options.xdim) as usize;
        let mut row = vec![options.background; width as usize];
        for (i, &module) in modules.iter().enumerate() {
            if module == 1 {
                let x = bars_start + i * xdim;
                row[x..x + xdim].fill(options.foreground);
            }
        }
        row[..border as usize].fill(options.foreground);
        row[(width - border) as usize..].fill(options.foreground);

        let solid = vec![options.foreground; width as usize];
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            if y < border || y >= height - border {
                pixels.extend_from_slice(&solid);
            } else {
                pixels.extend_from_slice(&row);
            }
        }

        Ok(BarcodeRaster {
            width,
            height,
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_type_display() {
        assert_eq!(BarcodeType::Code128.to_string(), "Code 128");
        assert_eq!(BarcodeType::Itf.to_string(), "ITF");
        assert_eq!(BarcodeType::default(), BarcodeType::Code128);
    }

    #[test]
    fn test_barcode_type_deserialize() {
        let t: BarcodeType = serde_json::from_str("\"code39\"").unwrap();
        assert_eq!(t, BarcodeType::Code39);
        assert!(serde_json::from_str::<BarcodeType>("\"qr\"").is_err());
    }

    #[test]
    fn test_barcode_options_builder() {
        let opts = BarcodeOptions::new().xdim(3).height(50).quiet_zone(5).border(0).colors(10, 200);
        assert_eq!(opts.xdim, 3);
        assert_eq!(opts.height, 50);
        assert_eq!(opts.quiet_zone, 5);
        assert_eq!(opts.border, 0);
        assert_eq!((opts.foreground, opts.background), (10, 200));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_barcode_options_validate() {
        assert!(BarcodeOptions::new().xdim(0).validate().is_err());
        assert!(BarcodeOptions::new().height(0).validate().is_err());
        assert!(BarcodeOptions::new().colors(0, 0).validate().is_err());
    }

    #[test]
    fn test_rasterize_layout() {
        let opts = BarcodeOptions::new().xdim(2).height(4).quiet_zone(3).border(1);
        let raster = BarcodeGenerator::rasterize(&[1, 0, 1], &opts).unwrap();

        // (3 modules + 2*3 quiet) * 2 px + 2 px border
        assert_eq!(raster.width, 20);
        assert_eq!(raster.height, 6);
        assert_eq!(raster.pixels.len(), 120);

        // Top border row is solid
        assert!((0..20).all(|x| raster.pixel(x, 0) == Some(0)));
        // Interior row: border, quiet zone, bar, space, bar, quiet zone, border
        assert_eq!(raster.pixel(0, 2), Some(0));
        assert_eq!(raster.pixel(1, 2), Some(255));
        assert_eq!(raster.pixel(6, 2), Some(255));
        assert_eq!(raster.pixel(7, 2), Some(0));
        assert_eq!(raster.pixel(8, 2), Some(0));
        assert_eq!(raster.pixel(9, 2), Some(255));
        assert_eq!(raster.pixel(11, 2), Some(0));
        assert_eq!(raster.pixel(13, 2), Some(255));
        assert_eq!(raster.pixel(19, 2), Some(0));
        assert_eq!(raster.pixel(20, 2), None);
    }

    #[test]
    fn test_rasterize_without_border() {
        let opts = BarcodeOptions::new().xdim(1).height(1).quiet_zone(0).border(0);
        let raster = BarcodeGenerator::rasterize(&[1, 1, 0, 1], &opts).unwrap();
        assert_eq!(raster.pixels, vec![0, 0, 255, 0]);
    }

    #[test]
    fn test_validate_caps_dimensions() {
        assert!(BarcodeOptions::new().xdim(MAX_XDIM).validate().is_ok());
        assert!(BarcodeOptions::new().xdim(100_000_000).validate().is_err());
        assert!(BarcodeOptions::new().height(MAX_HEIGHT + 1).validate().is_err());
        assert!(BarcodeOptions::new().quiet_zone(u32::MAX).validate().is_err());
        assert!(BarcodeOptions::new().border(MAX_BORDER + 1).validate().is_err());
    }

    #[test]
    fn test_rasterize_huge_dimensions_is_error() {
        let opts = BarcodeOptions {
            xdim: u32::MAX / 2,
            height: u32::MAX,
            quiet_zone: u32::MAX,
            border: u32::MAX,
            foreground: 0,
            background: 255,
        };
        let err = BarcodeGenerator::rasterize(&[1, 0, 1], &opts).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rasterize_at_caps() {
        let opts = BarcodeOptions::new()
            .xdim(MAX_XDIM)
            .height(8)
            .quiet_zone(MAX_QUIET_ZONE)
            .border(MAX_BORDER);
        let raster = BarcodeGenerator::rasterize(&[1, 0, 1], &opts).unwrap();
        assert_eq!(raster.width, (3 + 2 * MAX_QUIET_ZONE) * MAX_XDIM + 2 * MAX_BORDER);
        assert_eq!(raster.height, 8 + 2 * MAX_BORDER);
        assert_eq!(raster.pixels.len(), (raster.width * raster.height) as usize);
    }

    #[test]
    fn test_rasterize_rejects_empty() {
        assert!(BarcodeGenerator::rasterize(&[], &BarcodeOptions::default()).is_err());
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_code128_sscc_uses_set_c() {
        let modules = BarcodeGenerator::encode(BarcodeType::Code128, "00123456789012345675").unwrap();
        // start C + 10 digit pairs + check symbol at 11 modules each, stop is 13
        assert_eq!(modules.len(), 12 * 11 + 13);
        assert_eq!(modules[0], 1);
        assert_eq!(*modules.last().unwrap(), 1);
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_code128_alphanumeric_uses_set_b() {
        let modules = BarcodeGenerator::encode(BarcodeType::Code128, "PAL001").unwrap();
        // start B + 6 chars + check at 11 modules each, plus stop
        assert_eq!(modules.len(), 8 * 11 + 13);
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_encode_other_symbologies() {
        assert!(BarcodeGenerator::encode(BarcodeType::Code39, "PAL001").is_ok());
        assert!(BarcodeGenerator::encode(BarcodeType::Itf, "00123456789012345675").is_ok());
        assert!(BarcodeGenerator::encode(BarcodeType::Itf, "12AB").is_err());
        assert!(BarcodeGenerator::encode(BarcodeType::Code128, "").is_err());
    }

    #[test]
    fn test_raster_to_png() {
        let opts = BarcodeOptions::new().xdim(1).height(3).quiet_zone(1).border(0);
        let raster = BarcodeGenerator::rasterize(&[1, 0, 1], &opts).unwrap();
        let png = raster.to_png().unwrap();
        assert!(png.starts_with(b"\x89PNG"));

        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.as_raw(), &raster.pixels);
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_generate_1d_png() {
        let opts = BarcodeOptions::default();
        let png = BarcodeGenerator::generate_1d(BarcodeType::Code128, "00123456789012345675", &opts)
            .unwrap();
        let image = crate::writer::ImageData::from_png(&png).unwrap();
        assert_eq!(image.width, (145 + 20) * 2 + 4);
        assert_eq!(image.height, 104);
    }

    #[cfg(not(feature = "barcodes"))]
    #[test]
    fn test_generate_requires_feature() {
        assert!(BarcodeGenerator::encode(BarcodeType::Code128, "00").is_err());
    }
}
