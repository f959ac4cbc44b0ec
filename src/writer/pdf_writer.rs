//! PDF document writer.
//!
//! Assembles complete PDF documents: header, body, xref table and trailer.
//! Pages are recorded in memory and serialized in one pass by
//! [`PdfWriter::finish`], so object numbers are contiguous and follow write
//! order.

use super::content_stream::ContentStreamBuilder;
use super::image_handler::ImageData;
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::object::Object;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to Flate-compress content streams
    pub compress: bool,
    /// Creation timestamp; the time of [`PdfWriter::finish`] when unset
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some(format!("sscc_labels {}", env!("CARGO_PKG_VERSION"))),
            compress: true,
            creation_date: None,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Fix the creation timestamp (reproducible output).
    pub fn with_creation_date(mut self, date: chrono::DateTime<chrono::Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Format a timestamp as a PDF date string (ISO 32000-1 §7.9.4).
fn pdf_date(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// A page being built.
pub struct PageBuilder<'a> {
    writer: &'a mut PdfWriter,
    page_index: usize,
}

impl<'a> PageBuilder<'a> {
    /// Add text with its baseline origin at (`x`, `y`), in a Base-14 font.
    pub fn add_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font_name: &str,
        font_size: f32,
    ) -> &mut Self {
        let resource = self.writer.font_resource(font_name);
        let page = &mut self.writer.pages[self.page_index];
        page.fonts.entry(resource.clone()).or_insert_with(|| font_name.to_string());
        page.content
            .set_font(&resource, font_size)
            .text(text, x, y);
        self
    }

    /// Stroke a rectangle outline.
    pub fn draw_rect(&mut self, rect: Rect, line_width: f32) -> &mut Self {
        let page = &mut self.writer.pages[self.page_index];
        page.content
            .set_line_width(line_width)
            .rect(rect.x, rect.y, rect.width, rect.height)
            .stroke();
        self
    }

    /// Paint an image scaled to fill `rect`.
    pub fn draw_image(&mut self, image: ImageData, rect: Rect) -> &mut Self {
        let page = &mut self.writer.pages[self.page_index];
        page.images.push(image);
        let resource = format!("Im{}", page.images.len());
        page.content
            .draw_image(&resource, rect.x, rect.y, rect.width, rect.height);
        self
    }

    /// Finish building this page and return to the writer.
    pub fn finish(self) -> &'a mut PdfWriter {
        let page = &mut self.writer.pages[self.page_index];
        page.content.end_text();
        self.writer
    }
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    content: ContentStreamBuilder,
    /// Font resource name -> BaseFont, for fonts used on this page
    fonts: HashMap<String, String>,
    /// Images in `Im1..ImN` order
    images: Vec<ImageData>,
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, images and content.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    /// Document-wide font resource names, in first-use order
    fonts: Vec<String>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            fonts: Vec::new(),
        }
    }

    /// Add a page with the given dimensions in points.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageBuilder<'_> {
        let page_index = self.pages.len();
        self.pages.push(PageData {
            width,
            height,
            content: ContentStreamBuilder::new(),
            fonts: HashMap::new(),
            images: Vec::new(),
        });
        PageBuilder {
            writer: self,
            page_index,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Resource name (`F1`, `F2`, ...) for a font, assigned on first use.
    fn font_resource(&mut self, font_name: &str) -> String {
        let index = match self.fonts.iter().position(|f| f == font_name) {
            Some(index) => index,
            None => {
                self.fonts.push(font_name.to_string());
                self.fonts.len() - 1
            },
        };
        format!("F{}", index + 1)
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out = ObjectWriter::new(&self.config.version)?;

        // Fixed objects first, then fonts, then each page with its content
        // and images.
        let catalog_id = 1;
        let pages_id = 2;
        let info_id = 3;
        let first_font_id = 4;
        let font_ids: HashMap<String, u32> = self
            .fonts
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), first_font_id + i as u32))
            .collect();

        let mut next_id = first_font_id + self.fonts.len() as u32;
        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let page_id = next_id;
            next_id += 2 + page.images.iter().map(|img| 1 + u32::from(img.soft_mask.is_some())).sum::<u32>();
            page_ids.push(page_id);
        }

        out.write(
            catalog_id,
            &ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(pages_id)),
            ]),
        )?;
        out.write(
            pages_id,
            &ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                ("Kids", Object::Array(page_ids.iter().map(|&id| ObjectSerializer::reference(id)).collect())),
                ("Count", ObjectSerializer::integer(self.pages.len() as i64)),
            ]),
        )?;
        out.write(info_id, &self.info_dict())?;

        for (i, font_name) in self.fonts.iter().enumerate() {
            out.write(
                first_font_id + i as u32,
                &ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("Type1")),
                    ("BaseFont", ObjectSerializer::name(font_name)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                ]),
            )?;
        }

        for (page, &page_id) in self.pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;
            let mut id = content_id + 1;

            let mut xobjects = HashMap::new();
            let mut image_objects = Vec::new();
            for (n, image) in page.images.iter().enumerate() {
                let image_id = id;
                let smask_id = image.soft_mask.as_ref().map(|_| image_id + 1);
                id += 1 + u32::from(smask_id.is_some());
                xobjects.insert(format!("Im{}", n + 1), ObjectSerializer::reference(image_id));
                image_objects.push((image_id, image.to_xobject(smask_id)));
                if let (Some(smask_id), Some(mask)) = (smask_id, image.soft_mask_xobject()) {
                    image_objects.push((smask_id, mask));
                }
            }

            let fonts: HashMap<String, Object> = page
                .fonts
                .iter()
                .filter_map(|(resource, name)| {
                    font_ids
                        .get(name)
                        .map(|&fid| (resource.clone(), ObjectSerializer::reference(fid)))
                })
                .collect();
            let mut resources = HashMap::new();
            if !fonts.is_empty() {
                resources.insert("Font".to_string(), Object::Dictionary(fonts));
            }
            if !xobjects.is_empty() {
                resources.insert("XObject".to_string(), Object::Dictionary(xobjects));
            }

            out.write(
                page_id,
                &ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Page")),
                    ("Parent", ObjectSerializer::reference(pages_id)),
                    (
                        "MediaBox",
                        ObjectSerializer::rect(0.0, 0.0, f64::from(page.width), f64::from(page.height)),
                    ),
                    ("Contents", ObjectSerializer::reference(content_id)),
                    ("Resources", Object::Dictionary(resources)),
                ]),
            )?;
            out.write(content_id, &self.content_stream(&page.content)?)?;
            for (image_id, obj) in &image_objects {
                out.write(*image_id, obj)?;
            }
        }

        log::debug!(
            "Serialized PDF: {} pages, {} fonts, {} objects",
            self.pages.len(),
            self.fonts.len(),
            out.offsets.len()
        );
        out.finish(catalog_id, info_id)
    }

    fn info_dict(&self) -> Object {
        let created = self.config.creation_date.unwrap_or_else(chrono::Utc::now);
        let mut entries = vec![
            ("Producer", ObjectSerializer::string(concat!("sscc_labels ", env!("CARGO_PKG_VERSION")))),
            ("CreationDate", ObjectSerializer::string(&pdf_date(&created))),
        ];
        if let Some(title) = &self.config.title {
            entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(creator) = &self.config.creator {
            entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        ObjectSerializer::dict(entries)
    }

    fn content_stream(&self, content: &ContentStreamBuilder) -> Result<Object> {
        let raw = content.build()?;
        let mut dict = HashMap::new();
        let data = if self.config.compress {
            dict.insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
            compress_data(&raw)?
        } else {
            raw
        };
        Ok(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }

    /// Write the PDF to a file.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.finish()?;
        std::fs::write(path, bytes).map_err(|source| Error::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Output buffer that tracks object offsets for the xref table.
struct ObjectWriter {
    serializer: ObjectSerializer,
    output: Vec<u8>,
    offsets: Vec<(u32, usize)>,
}

impl ObjectWriter {
    fn new(version: &str) -> Result<Self> {
        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", version)?;
        // Binary marker
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Ok(Self {
            serializer: ObjectSerializer::new(),
            output,
            offsets: Vec::new(),
        })
    }

    fn write(&mut self, id: u32, obj: &Object) -> Result<()> {
        self.offsets.push((id, self.output.len()));
        let bytes = self.serializer.serialize_indirect(id, 0, obj)?;
        self.output.extend_from_slice(&bytes);
        Ok(())
    }

    fn finish(mut self, root_id: u32, info_id: u32) -> Result<Vec<u8>> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.len() as u32 + 1;

        let xref_start = self.output.len();
        writeln!(self.output, "xref")?;
        writeln!(self.output, "0 {}", size)?;
        writeln!(self.output, "0000000000 65535 f ")?;
        for (_, offset) in &self.offsets {
            writeln!(self.output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(i64::from(size))),
            ("Root", ObjectSerializer::reference(root_id)),
            ("Info", ObjectSerializer::reference(info_id)),
        ]);
        writeln!(self.output, "trailer")?;
        let trailer = self.serializer.serialize(&trailer)?;
        self.output.extend_from_slice(&trailer);
        writeln!(self.output)?;
        writeln!(self.output, "startxref")?;
        writeln!(self.output, "{}", xref_start)?;
        write!(self.output, "%%EOF")?;

        Ok(self.output)
    }
}
