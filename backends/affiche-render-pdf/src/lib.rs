//! Paged-document renderer: one PDF page, zero margins, embedded resources.
//!
//! The page shares the template's coordinate space (one template unit = one
//! point) but the PDF origin is bottom-left, so every y flips on the way
//! in. Fonts are fetched through the shared store and registered with the
//! document before any line in that family is measured or drawn; an
//! unresolvable family rejects the whole chain. Images are normalized to
//! PNG through an intermediate raster step when they are not PNG already,
//! and fill-crops are pre-cropped to the shared placement's source window
//! before embedding.
//!
//! The page content stream is stateful (current font, fill color, open text
//! section), so elements append through one writer that tracks and resets
//! that state between text and geometry operations.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageEncoder;
use printpdf::font::ParsedFont;
use printpdf::graphics::{LinePoint, PaintMode, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{FontId, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, XObjectId};

use affiche_core::assets::{resolve_image_bytes, AssetSource};
use affiche_core::element::{ImageElement, RenderElement, TextContainer};
use affiche_core::error::{FontError, RenderError, Result};
use affiche_core::geometry::{place, Placement};
use affiche_core::render::{check_dimensions, Renderer};
use affiche_core::text::stack_lines;
use affiche_core::{Color, Rect};
use affiche_fonts::{metrics, FontData, FontStore};

const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

/// The finished document, ready to stream to the caller.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    bytes: Vec<u8>,
}

impl PdfArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The paged-document backend.
pub struct PdfRenderer {
    assets: Arc<dyn AssetSource>,
    fonts: Arc<FontStore>,
}

impl PdfRenderer {
    pub fn new(assets: Arc<dyn AssetSource>, fonts: Arc<FontStore>) -> Self {
        Self { assets, fonts }
    }

    async fn draw_image(
        &self,
        doc: &mut PdfDocument,
        page: &mut PageWriter,
        image: &ImageElement,
    ) -> Result<()> {
        let Some(source) = &image.source else {
            return Ok(());
        };

        let bytes = resolve_image_bytes(source, self.assets.as_ref()).await?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|err| RenderError::ImageDecode {
                key: image.key.clone(),
                reason: err.to_string(),
            })?
            .to_rgba8();
        let (natural_width, natural_height) = decoded.dimensions();

        if let Some(background) = image.background {
            page.fill_rect(background.expand(image.frame), background.fill);
        }

        let Some(placement) = place(
            image.frame,
            natural_width as f32,
            natural_height as f32,
            image.horizontal_align,
            image.vertical_align,
            image.scale,
        ) else {
            return Ok(());
        };
        let Placement { dest, src } = placement;

        // Embed the source window only: a cover-crop window becomes its own
        // image, so the document shows the same pixels the raster surface
        // keeps. Whole-image PNG sources embed untouched.
        let full_window = src.x == 0.0
            && src.y == 0.0
            && src.width as u32 == natural_width
            && src.height as u32 == natural_height;
        let embed_bytes = if full_window && bytes.starts_with(&PNG_MAGIC) {
            bytes.as_ref().clone()
        } else {
            let window = image::imageops::crop_imm(
                &decoded,
                src.x.round() as u32,
                src.y.round() as u32,
                (src.width.round() as u32).max(1),
                (src.height.round() as u32).max(1),
            )
            .to_image();
            let mut png = Vec::new();
            image::codecs::png::PngEncoder::new(&mut png)
                .write_image(
                    window.as_raw(),
                    window.width(),
                    window.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|err| RenderError::Encode(err.to_string()))?;
            png
        };

        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&embed_bytes, &mut warnings).map_err(|err| {
            RenderError::ImageDecode {
                key: image.key.clone(),
                reason: err.to_string(),
            }
        })?;
        let embedded_width = raw.width as f32;
        let embedded_height = raw.height as f32;

        let xobject_id = XObjectId::new();
        doc.resources
            .xobjects
            .map
            .insert(xobject_id.clone(), XObject::Image(raw));

        page.use_image(xobject_id, dest, embedded_width, embedded_height);
        Ok(())
    }

    async fn draw_text(
        &self,
        doc: &mut PdfDocument,
        page: &mut PageWriter,
        text: &TextContainer,
    ) -> Result<()> {
        if text.is_blank() {
            return Ok(());
        }

        // Resolve and register every family first; drawing only starts once
        // the whole block's fonts are embeddable.
        let mut line_fonts = Vec::with_capacity(text.lines.len());
        for line in &text.lines {
            let data = self.fonts.family_data(&line.font_family).await?;
            let font_id = page.register_font(doc, &data)?;
            line_fonts.push((data, font_id));
        }

        let mut line_metrics = Vec::with_capacity(text.lines.len());
        for (line, (data, _)) in text.lines.iter().zip(&line_fonts) {
            line_metrics.push(metrics::measure_line(data, line.font_size, &line.text)?);
        }

        let layout = stack_lines(
            &line_metrics,
            text.anchor,
            text.horizontal_align,
            text.distribution,
        );

        if let Some(background) = text.background {
            page.fill_rect(background.expand(layout.bounds), background.fill);
        }

        for ((line, (_, font_id)), placed) in
            text.lines.iter().zip(&line_fonts).zip(&layout.lines)
        {
            page.write_text_line(
                &line.text,
                font_id.clone(),
                line.font_size,
                line.color,
                placed.x,
                placed.baseline,
            );
        }
        Ok(())
    }
}

impl Renderer for PdfRenderer {
    type Artifact = PdfArtifact;

    fn render<'a>(
        &'a self,
        width: f32,
        height: f32,
        elements: &'a [RenderElement],
    ) -> BoxFuture<'a, Result<PdfArtifact>> {
        async move {
            check_dimensions(width, height)?;
            log::debug!("pdf render {}x{} with {} elements", width, height, elements.len());

            let mut doc = PdfDocument::new("Affiche");
            let mut page = PageWriter::new(height);

            for element in elements {
                match element {
                    RenderElement::Image(image) => {
                        self.draw_image(&mut doc, &mut page, image).await?
                    }
                    RenderElement::Text(text) => {
                        self.draw_text(&mut doc, &mut page, text).await?
                    }
                }
            }

            let (page_width, page_height): (Mm, Mm) = (Pt(width).into(), Pt(height).into());
            doc.pages
                .push(PdfPage::new(page_width, page_height, page.into_ops()));

            let mut bytes = Vec::new();
            let mut warnings = Vec::new();
            doc.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);
            for warning in &warnings {
                log::debug!("pdf save warning: {warning:?}");
            }
            Ok(PdfArtifact { bytes })
        }
        .boxed()
    }
}

/// Appends content-stream ops for one page, tracking the mutable stream
/// state (open text section, current font/fill) between elements.
struct PageWriter {
    page_height: f32,
    ops: Vec<Op>,
    fonts: HashMap<String, FontId>,
    is_text_section_open: bool,
    current_font: Option<(FontId, f32)>,
    current_fill: Option<Color>,
}

impl PageWriter {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            ops: Vec::new(),
            fonts: HashMap::new(),
            is_text_section_open: false,
            current_font: None,
            current_fill: None,
        }
    }

    fn into_ops(mut self) -> Vec<Op> {
        self.close_text_section();
        self.ops
    }

    fn close_text_section(&mut self) {
        if self.is_text_section_open {
            self.ops.push(Op::EndTextSection);
            self.is_text_section_open = false;
        }
    }

    /// Register a family's bytes with the document once per render.
    fn register_font(&mut self, doc: &mut PdfDocument, data: &FontData) -> Result<FontId> {
        if let Some(font_id) = self.fonts.get(data.family()) {
            return Ok(font_id.clone());
        }
        let mut warnings = Vec::new();
        let parsed =
            ParsedFont::from_bytes(data.bytes(), 0, &mut warnings).ok_or_else(|| {
                FontError::InvalidData {
                    family: data.family().to_owned(),
                }
            })?;
        let font_id = doc.add_font(&parsed);
        self.fonts.insert(data.family().to_owned(), font_id.clone());
        Ok(font_id)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.close_text_section();
        let bottom = self.page_height - (rect.y + rect.height);
        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(rect.x, bottom),
                    corner(rect.x + rect.width, bottom),
                    corner(rect.x + rect.width, bottom + rect.height),
                    corner(rect.x, bottom + rect.height),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::EvenOdd,
        };
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.current_fill = Some(color);
        self.ops.push(Op::DrawPolygon { polygon });
    }

    fn use_image(&mut self, id: XObjectId, dest: Rect, image_width: f32, image_height: f32) {
        self.close_text_section();
        let bottom = self.page_height - (dest.y + dest.height);
        let transform = XObjectTransform {
            translate_x: Some(Pt(dest.x)),
            translate_y: Some(Pt(bottom)),
            scale_x: Some(dest.width / image_width),
            scale_y: Some(dest.height / image_height),
            rotate: None,
            dpi: Some(72.0),
        };
        self.ops.push(Op::UseXobject { id, transform });
    }

    fn write_text_line(
        &mut self,
        content: &str,
        font_id: FontId,
        font_size: f32,
        color: Color,
        x: f32,
        baseline: f32,
    ) {
        if !self.is_text_section_open {
            self.ops.push(Op::StartTextSection);
            self.is_text_section_open = true;
        }
        if self.current_fill != Some(color) {
            self.ops.push(Op::SetFillColor {
                col: pdf_color(color),
            });
            self.current_fill = Some(color);
        }
        let font_changed = match &self.current_font {
            Some((current_id, current_size)) => {
                *current_id != font_id || *current_size != font_size
            }
            None => true,
        };
        if font_changed {
            self.ops.push(Op::SetFontSize {
                size: Pt(font_size),
                font: font_id.clone(),
            });
            self.current_font = Some((font_id.clone(), font_size));
        }

        let pdf_y = self.page_height - baseline;
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(pdf_y)),
        });
        self.ops.push(Op::WriteText {
            items: vec![TextItem::Text(content.to_owned())],
            font: font_id,
        });
    }
}

fn corner(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: printpdf::graphics::Point {
            x: Pt(x),
            y: Pt(y),
        },
        bezier: false,
    }
}

fn pdf_color(color: Color) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}
